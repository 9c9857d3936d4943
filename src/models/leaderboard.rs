//! Leaderboard entry model

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-(contest, user) standing
///
/// Created lazily on the user's first scored submission in a contest and
/// owned exclusively by the leaderboard aggregator. `total_score` is always
/// the sum of `best_scores` and never decreases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_handle: String,
    /// Best score achieved per question
    pub best_scores: HashMap<String, u32>,
    pub total_score: u32,
    /// Timestamp of the submission that achieved the current total,
    /// used for tie-breaking (earliest achiever ranks higher)
    pub achieved_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    pub fn new(user_handle: String, achieved_at: DateTime<Utc>) -> Self {
        Self {
            user_handle,
            best_scores: HashMap::new(),
            total_score: 0,
            achieved_at,
        }
    }
}
