//! Submission model and lifecycle state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::judge::languages::Language;

/// Submission record
///
/// Created at intake and retained forever as an audit record. Once `Scored`
/// the record is immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub contest_id: String,
    pub question_id: String,
    pub user_handle: String,
    pub language: Language,
    #[serde(skip_serializing)]
    pub source_code: String,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    /// Final numeric score, set when judging completes
    pub score: Option<u32>,
    /// Set when the verdict was produced by exhausted infrastructure retries
    /// rather than by the submitted program itself
    pub infra_failure: bool,
    /// Per-test-case outcomes, populated during judging
    pub test_results: Vec<TestCaseResult>,
}

/// Submission lifecycle state
///
/// Queued → Running → Judged(verdict) → Scored(verdict). No transition skips
/// a state and none reverses; the Queued → Running claim happens at most
/// once per submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "verdict", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Queued,
    Running,
    Judged(Verdict),
    Scored(Verdict),
}

impl SubmissionStatus {
    /// Whether moving to `next` is a legal lifecycle transition
    pub fn can_transition_to(&self, next: &SubmissionStatus) -> bool {
        match (self, next) {
            (Self::Queued, Self::Running) => true,
            (Self::Running, Self::Judged(_)) => true,
            (Self::Judged(v), Self::Scored(w)) => v == w,
            _ => false,
        }
    }

    /// Whether judging has produced a verdict
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::Queued | Self::Running => None,
            Self::Judged(v) | Self::Scored(v) => Some(*v),
        }
    }

    /// Whether this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Scored(_))
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Running => write!(f, "running"),
            Self::Judged(_) => write!(f, "judged"),
            Self::Scored(_) => write!(f, "scored"),
        }
    }
}

/// Categorical judging outcome of a test case or submission execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    RuntimeError,
    CompileError,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::WrongAnswer => "wrong_answer",
            Self::TimeLimitExceeded => "time_limit_exceeded",
            Self::MemoryLimitExceeded => "memory_limit_exceeded",
            Self::RuntimeError => "runtime_error",
            Self::CompileError => "compile_error",
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one test case run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub index: usize,
    pub verdict: Verdict,
    pub wall_time_ms: f64,
    pub memory_kb: i64,
}
