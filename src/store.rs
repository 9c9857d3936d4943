//! Submission store
//!
//! In-memory owner of submission records. Records are append-only audit
//! data: only the status (and the judging outcome fields set alongside it)
//! ever changes, and every change goes through the lifecycle state machine.
//! Claiming a submission for judging is atomic, so at most one worker can
//! ever run a given submission.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Submission, SubmissionStatus, TestCaseResult, Verdict},
};

/// In-memory submission record store
#[derive(Default)]
pub struct SubmissionStore {
    inner: RwLock<HashMap<Uuid, Submission>>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created (Queued) submission
    pub fn insert(&self, submission: Submission) {
        let mut inner = self.inner.write().expect("submission lock poisoned");
        inner.insert(submission.id, submission);
    }

    /// Snapshot of a submission record
    pub fn get(&self, id: &Uuid) -> AppResult<Submission> {
        let inner = self.inner.read().expect("submission lock poisoned");
        inner
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Submission '{}' not found", id)))
    }

    /// Atomically claim a queued submission for judging
    ///
    /// Fails if the submission is not in `Queued`, which makes re-claiming
    /// impossible: the transition check runs under the write lock.
    pub fn claim(&self, id: &Uuid) -> AppResult<Submission> {
        self.transition(id, SubmissionStatus::Running)
    }

    /// Record the judging outcome: Running → Judged(verdict)
    pub fn finish_judging(
        &self,
        id: &Uuid,
        verdict: Verdict,
        score: u32,
        test_results: Vec<TestCaseResult>,
        infra_failure: bool,
    ) -> AppResult<Submission> {
        let mut inner = self.inner.write().expect("submission lock poisoned");
        let submission = inner
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Submission '{}' not found", id)))?;

        let next = SubmissionStatus::Judged(verdict);
        if !submission.status.can_transition_to(&next) {
            return Err(AppError::InvalidTransition(format!(
                "{} -> {}",
                submission.status, next
            )));
        }

        submission.status = next;
        submission.score = Some(score);
        submission.test_results = test_results;
        submission.infra_failure = infra_failure;
        Ok(submission.clone())
    }

    /// Terminal transition: Judged(verdict) → Scored(verdict)
    pub fn mark_scored(&self, id: &Uuid) -> AppResult<Submission> {
        let verdict = {
            let inner = self.inner.read().expect("submission lock poisoned");
            inner
                .get(id)
                .and_then(|s| s.status.verdict())
                .ok_or_else(|| {
                    AppError::InvalidTransition(format!("submission '{}' has no verdict", id))
                })?
        };
        self.transition(id, SubmissionStatus::Scored(verdict))
    }

    fn transition(&self, id: &Uuid, next: SubmissionStatus) -> AppResult<Submission> {
        let mut inner = self.inner.write().expect("submission lock poisoned");
        let submission = inner
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Submission '{}' not found", id)))?;

        if !submission.status.can_transition_to(&next) {
            return Err(AppError::InvalidTransition(format!(
                "{} -> {}",
                submission.status, next
            )));
        }

        submission.status = next;
        Ok(submission.clone())
    }
}
