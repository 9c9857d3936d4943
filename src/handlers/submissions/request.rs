//! Submission request DTOs

use serde::Deserialize;
use validator::Validate;

/// Create submission request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubmissionRequest {
    /// Contest to submit into
    #[validate(length(min = 1, max = 64))]
    pub contest_id: String,

    /// Question within the contest
    #[validate(length(min = 1, max = 64))]
    pub question_id: String,

    /// Pre-verified handle of the submitting user (identity is established
    /// upstream; this engine trusts the supplied handle)
    #[validate(length(min = 1, max = 64))]
    pub user_handle: String,

    /// Programming language
    #[validate(length(min = 1, max = 20))]
    pub language: String,

    /// Source code
    #[validate(length(min = 1, max = 262144))] // 256 KB max
    pub source_code: String,
}
