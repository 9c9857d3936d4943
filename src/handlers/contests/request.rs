//! Contest request DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create contest request
///
/// Arrives through the management path; the owner handle is pre-verified by
/// the external identity provider.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContestRequest {
    /// Human-chosen contest identifier, unique across the registry
    #[validate(length(min = 1, max = 64))]
    pub id: String,

    #[validate(length(min = 1, max = 256))]
    pub title: String,

    /// Pre-verified handle of the contest owner
    #[validate(length(min = 1, max = 64))]
    pub owner: String,

    pub start_time: DateTime<Utc>,

    /// Time limit of the contest window in seconds
    #[validate(range(min = 1))]
    pub duration_secs: i64,

    #[validate(length(min = 1), nested)]
    pub questions: Vec<CreateQuestionRequest>,
}

/// One question inside a create contest request
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 64))]
    pub id: String,

    /// Reference to the statement content (stored outside the engine)
    #[validate(length(min = 1, max = 512))]
    pub statement_ref: String,

    #[validate(length(min = 1), nested)]
    pub test_cases: Vec<CreateTestCaseRequest>,
}

/// One test case inside a create contest request
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTestCaseRequest {
    pub input: String,

    pub expected_output: String,

    #[validate(range(min = 1))]
    pub weight: u32,
}
