//! Submission intake
//!
//! Validates a submission request against contest state, question ownership
//! and input limits, then hands it to the judging queue. Validation and
//! eligibility failures surface synchronously and never enter the queue; a
//! full queue is an explicit backpressure signal, never a silent drop.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    constants::{MAX_SOURCE_CODE_SIZE, MAX_USER_HANDLE_LENGTH},
    eligibility,
    error::{AppError, AppResult},
    models::{Submission, SubmissionStatus},
    registry::ContestRegistry,
    store::SubmissionStore,
};

/// Validated intake boundary in front of the judging queue
pub struct SubmissionIntake {
    registry: Arc<ContestRegistry>,
    store: Arc<SubmissionStore>,
    queue: mpsc::Sender<Uuid>,
}

impl SubmissionIntake {
    pub fn new(
        registry: Arc<ContestRegistry>,
        store: Arc<SubmissionStore>,
        queue: mpsc::Sender<Uuid>,
    ) -> Self {
        Self {
            registry,
            store,
            queue,
        }
    }

    /// Accept a submission and enqueue it for judging
    ///
    /// The eligibility check uses the server clock only; whatever timestamps
    /// the client claims are irrelevant here.
    pub fn submit(
        &self,
        contest_id: &str,
        question_id: &str,
        user_handle: &str,
        source_code: String,
        language: &str,
    ) -> AppResult<Uuid> {
        let language = language.parse()?;
        validate_user_handle(user_handle)?;
        validate_source_code(&source_code)?;

        let contest = self.registry.get_contest(contest_id)?;
        let now = Utc::now();
        if !eligibility::is_eligible(&contest, now) {
            return Err(AppError::ContestNotActive);
        }

        // Question must belong to this contest
        self.registry.get_question(contest_id, question_id)?;

        // Reserve queue capacity before creating the record, so a rejected
        // submission leaves no orphaned Queued entry behind
        let permit = self
            .queue
            .try_reserve()
            .map_err(|_| AppError::Overloaded)?;

        let submission = Submission {
            id: Uuid::new_v4(),
            contest_id: contest_id.to_string(),
            question_id: question_id.to_string(),
            user_handle: user_handle.to_string(),
            language,
            source_code,
            submitted_at: now,
            status: SubmissionStatus::Queued,
            score: None,
            infra_failure: false,
            test_results: vec![],
        };
        let id = submission.id;

        self.store.insert(submission);
        permit.send(id);

        tracing::debug!(submission = %id, contest = contest_id, user = user_handle, "submission queued");
        Ok(id)
    }
}

fn validate_user_handle(handle: &str) -> AppResult<()> {
    if handle.is_empty() {
        return Err(AppError::Validation("User handle cannot be empty".to_string()));
    }
    if handle.len() > MAX_USER_HANDLE_LENGTH {
        return Err(AppError::Validation(format!(
            "User handle exceeds {} characters",
            MAX_USER_HANDLE_LENGTH
        )));
    }
    Ok(())
}

fn validate_source_code(code: &str) -> AppResult<()> {
    if code.is_empty() {
        return Err(AppError::Validation("Source code cannot be empty".to_string()));
    }
    if code.len() > MAX_SOURCE_CODE_SIZE {
        return Err(AppError::Validation(format!(
            "Source code exceeds maximum size of {} bytes",
            MAX_SOURCE_CODE_SIZE
        )));
    }
    Ok(())
}
