//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor. Every component is
//! constructed explicitly at startup; nothing here is global.

use std::sync::Arc;

use crate::{
    config::Config, intake::SubmissionIntake, leaderboard::Leaderboard,
    registry::ContestRegistry, store::SubmissionStore,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    config: Config,
    registry: Arc<ContestRegistry>,
    submissions: Arc<SubmissionStore>,
    leaderboard: Arc<Leaderboard>,
    intake: SubmissionIntake,
}

impl AppState {
    pub fn new(
        config: Config,
        registry: Arc<ContestRegistry>,
        submissions: Arc<SubmissionStore>,
        leaderboard: Arc<Leaderboard>,
        intake: SubmissionIntake,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                submissions,
                leaderboard,
                intake,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn registry(&self) -> &ContestRegistry {
        &self.inner.registry
    }

    pub fn submissions(&self) -> &SubmissionStore {
        &self.inner.submissions
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.inner.leaderboard
    }

    pub fn intake(&self) -> &SubmissionIntake {
        &self.inner.intake
    }
}
