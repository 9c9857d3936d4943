//! Per-submission judging pipeline
//!
//! A claimed submission runs its question's test cases to completion, the
//! verdicts are scored, and the result is folded into the leaderboard before
//! the record reaches its terminal state. Infrastructure failures are
//! retried a bounded number of times; a submission is never left Running.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::{
    config::JudgeConfig,
    eligibility,
    error::AppResult,
    leaderboard::Leaderboard,
    models::{Submission, TestCase, TestCaseResult, Verdict},
    registry::ContestRegistry,
    scoring,
    store::SubmissionStore,
};

use super::sandbox::{RunLimits, RunReport, RunRequest, Sandbox, SandboxFailure};

/// Shared judging context handed to every worker
pub(crate) struct JudgeContext {
    pub config: JudgeConfig,
    pub registry: Arc<ContestRegistry>,
    pub store: Arc<SubmissionStore>,
    pub leaderboard: Arc<Leaderboard>,
    pub sandbox: Arc<dyn Sandbox>,
}

/// Judge one queued submission end-to-end
pub(crate) async fn judge_submission(ctx: &JudgeContext, id: Uuid) {
    // Defensive re-check against the submission's own intake timestamp,
    // before the claim. Judging after the contest closed is fine; intake
    // after close is not, and can only appear here through a bug in the
    // intake path. Such a submission never transitions past Queued.
    if let Ok(queued) = ctx.store.get(&id) {
        if let Ok(contest) = ctx.registry.get_contest(&queued.contest_id) {
            if !eligibility::is_eligible(&contest, queued.submitted_at) {
                tracing::warn!(
                    submission = %id,
                    contest = %contest.id,
                    "refusing to judge a submission accepted outside the contest window"
                );
                return;
            }
        }
    }

    // Atomic claim: Queued -> Running. A submission that is not Queued was
    // already claimed by another worker and is left alone.
    let submission = match ctx.store.claim(&id) {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!(submission = %id, "skipping unclaimable submission: {}", e);
            return;
        }
    };

    if let Err(e) = run_pipeline(ctx, &submission).await {
        // Infrastructure retries are exhausted (or the records backing the
        // submission vanished). The submission still reaches a terminal
        // state, marked as an infrastructure failure rather than a judged
        // program fault.
        tracing::error!(submission = %id, "judging failed after retries: {}", e);

        if let Err(e) = ctx
            .store
            .finish_judging(&id, Verdict::RuntimeError, 0, vec![], true)
        {
            tracing::error!(submission = %id, "failed to record infrastructure failure: {}", e);
            return;
        }
        ctx.leaderboard.record_score(
            &submission.contest_id,
            &submission.user_handle,
            &submission.question_id,
            0,
            submission.submitted_at,
        );
        if let Err(e) = ctx.store.mark_scored(&id) {
            tracing::error!(submission = %id, "failed to finalize submission: {}", e);
        }
    }
}

async fn run_pipeline(ctx: &JudgeContext, submission: &Submission) -> AppResult<()> {
    let question = ctx
        .registry
        .get_question(&submission.contest_id, &submission.question_id)?;

    let limits = RunLimits::from_config(&ctx.config);
    let memory_limit_kb = (ctx.config.memory_limit_mb * 1024) as i64;

    let mut verdicts = Vec::with_capacity(question.test_cases.len());
    let mut weights = Vec::with_capacity(question.test_cases.len());
    let mut results = Vec::with_capacity(question.test_cases.len());
    let mut overall = Verdict::Accepted;

    for (index, case) in question.test_cases.iter().enumerate() {
        let report = run_with_retries(ctx, submission, case, &limits).await?;
        let verdict = scoring::evaluate(&report, &case.expected_output, memory_limit_kb);

        results.push(TestCaseResult {
            index,
            verdict,
            wall_time_ms: report.wall_time_ms,
            memory_kb: report.memory_kb,
        });
        verdicts.push(verdict);
        weights.push(case.weight);

        if verdict == Verdict::CompileError {
            // The compile step fails identically for every case
            overall = Verdict::CompileError;
            break;
        }
        if overall == Verdict::Accepted && verdict != Verdict::Accepted {
            overall = verdict;
        }
    }

    let raw = scoring::score(&verdicts, &weights);
    let score = match ctx.config.max_question_score {
        Some(cap) => scoring::normalize(raw, question.total_weight(), cap),
        None => raw,
    };

    ctx.store
        .finish_judging(&submission.id, overall, score, results, false)?;
    ctx.leaderboard.record_score(
        &submission.contest_id,
        &submission.user_handle,
        &submission.question_id,
        score,
        submission.submitted_at,
    );
    ctx.store.mark_scored(&submission.id)?;

    tracing::info!(
        submission = %submission.id,
        contest = %submission.contest_id,
        verdict = %overall,
        score,
        "submission judged"
    );
    Ok(())
}

/// Run one test case, retrying infrastructure failures with backoff
async fn run_with_retries(
    ctx: &JudgeContext,
    submission: &Submission,
    case: &TestCase,
    limits: &RunLimits,
) -> Result<RunReport, SandboxFailure> {
    let mut backoff = Duration::from_millis(ctx.config.retry_backoff_ms);
    let mut attempt = 0u32;

    loop {
        let request = RunRequest {
            submission_id: submission.id,
            code: &submission.source_code,
            language: submission.language,
            input: &case.input,
            limits,
        };

        match ctx.sandbox.run(request).await {
            Ok(report) => return Ok(report),
            Err(e) if attempt < ctx.config.sandbox_retries => {
                attempt += 1;
                tracing::warn!(
                    submission = %submission.id,
                    attempt,
                    "sandbox failure, retrying: {}",
                    e
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
