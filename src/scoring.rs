//! Scoring engine
//!
//! Converts raw sandbox reports into verdicts and verdicts into numeric
//! scores. Deterministic: identical inputs always produce identical scores.

use crate::judge::sandbox::{RunReport, RunStatus};
use crate::models::Verdict;

/// Map a raw run report to a verdict by comparing observed output against
/// the expected output
///
/// Output comparison trims surrounding whitespace and normalizes CRLF line
/// endings; everything else must match exactly.
pub fn evaluate(report: &RunReport, expected_output: &str, memory_limit_kb: i64) -> Verdict {
    match report.status {
        RunStatus::CompileFailed => Verdict::CompileError,
        RunStatus::TimedOut => Verdict::TimeLimitExceeded,
        RunStatus::OutOfMemory => Verdict::MemoryLimitExceeded,
        RunStatus::Completed { exit_code } => {
            if exit_code != 0 {
                return Verdict::RuntimeError;
            }
            if report.memory_kb > memory_limit_kb {
                return Verdict::MemoryLimitExceeded;
            }
            if outputs_match(&report.stdout, expected_output) {
                Verdict::Accepted
            } else {
                Verdict::WrongAnswer
            }
        }
    }
}

fn outputs_match(actual: &str, expected: &str) -> bool {
    let actual = actual.trim().replace("\r\n", "\n");
    let expected = expected.trim().replace("\r\n", "\n");
    actual == expected
}

/// Raw weighted score: the sum of weights of accepted test cases
///
/// No partial credit within a single test case. The result is bounded by the
/// sum of all weights.
pub fn score(verdicts: &[Verdict], weights: &[u32]) -> u32 {
    debug_assert_eq!(verdicts.len(), weights.len());
    verdicts
        .iter()
        .zip(weights)
        .filter(|(v, _)| v.is_accepted())
        .map(|(_, w)| *w)
        .sum()
}

/// Scale a raw weighted sum to a configured maximum
///
/// Applied by the leaderboard aggregator when a maximum question score is
/// configured; the scoring engine itself always returns raw sums.
pub fn normalize(raw: u32, total_weight: u32, max_score: u32) -> u32 {
    if total_weight == 0 {
        return 0;
    }
    ((raw as u64 * max_score as u64) / total_weight as u64) as u32
}
