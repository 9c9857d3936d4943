//! Submission response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Submission, TestCaseResult, Verdict};

/// Response for a newly accepted submission
#[derive(Debug, Serialize)]
pub struct CreateSubmissionResponse {
    pub id: Uuid,
    pub message: String,
    pub status: String,
}

/// Submission status query response
#[derive(Debug, Serialize)]
pub struct SubmissionStatusResponse {
    pub id: Uuid,
    pub contest_id: String,
    pub question_id: String,
    pub user_handle: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    pub infra_failure: bool,
    pub submitted_at: DateTime<Utc>,
    pub test_results: Vec<TestCaseResult>,
}

impl From<Submission> for SubmissionStatusResponse {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id,
            contest_id: submission.contest_id,
            question_id: submission.question_id,
            user_handle: submission.user_handle,
            status: submission.status.to_string(),
            verdict: submission.status.verdict(),
            score: submission.score,
            infra_failure: submission.infra_failure,
            submitted_at: submission.submitted_at,
            test_results: submission.test_results,
        }
    }
}
