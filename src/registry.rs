//! Contest registry
//!
//! Exclusive in-memory owner of contest and question records. Read-mostly:
//! the judging path only reads; writes arrive through the management surface
//! (contest creation and archival). The registry is constructed explicitly at
//! startup and shared behind an `Arc`.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{Contest, ContestState, Question},
};

#[derive(Default)]
struct RegistryInner {
    contests: HashMap<String, Contest>,
    /// Keyed by (contest_id, question_id): questions are owned by their contest
    questions: HashMap<(String, String), Question>,
}

/// In-memory contest and question store
#[derive(Default)]
pub struct ContestRegistry {
    inner: RwLock<RegistryInner>,
}

impl ContestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a contest by id
    pub fn get_contest(&self, id: &str) -> AppResult<Contest> {
        let inner = self.inner.read().expect("registry lock poisoned");
        inner
            .contests
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Contest '{}' not found", id)))
    }

    /// Look up a question, checking it belongs to the given contest
    pub fn get_question(&self, contest_id: &str, question_id: &str) -> AppResult<Question> {
        let inner = self.inner.read().expect("registry lock poisoned");
        inner
            .questions
            .get(&(contest_id.to_string(), question_id.to_string()))
            .cloned()
            .ok_or(AppError::QuestionNotFound)
    }

    /// Register a contest and its questions
    ///
    /// Management path: contests are created while Scheduled (or already
    /// inside their window for short-notice rounds); ids must be unique.
    pub fn insert_contest(&self, contest: Contest, questions: Vec<Question>) -> AppResult<()> {
        let mut inner = self.inner.write().expect("registry lock poisoned");

        if inner.contests.contains_key(&contest.id) {
            return Err(AppError::AlreadyExists(format!(
                "Contest '{}' already exists",
                contest.id
            )));
        }

        for question in &questions {
            if question.contest_id != contest.id {
                return Err(AppError::Validation(format!(
                    "Question '{}' does not reference contest '{}'",
                    question.id, contest.id
                )));
            }
            if !contest.questions.contains(&question.id) {
                return Err(AppError::Validation(format!(
                    "Question '{}' missing from contest question order",
                    question.id
                )));
            }
        }

        for question in questions {
            inner
                .questions
                .insert((contest.id.clone(), question.id.clone()), question);
        }
        inner.contests.insert(contest.id.clone(), contest);

        Ok(())
    }

    /// Archive a contest; only legal once the contest has closed
    pub fn archive_contest(&self, id: &str) -> AppResult<Contest> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let contest = inner
            .contests
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Contest '{}' not found", id)))?;

        if contest.state_at(Utc::now()) != ContestState::Closed {
            return Err(AppError::Conflict(
                "Only a closed contest can be archived".to_string(),
            ));
        }

        contest.archived = true;
        Ok(contest.clone())
    }
}
