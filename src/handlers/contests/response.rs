//! Contest response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::leaderboard::RankedEntry;
use crate::models::ContestState;

/// Contest details response
#[derive(Debug, Serialize)]
pub struct ContestResponse {
    pub id: String,
    pub title: String,
    pub owner: String,
    pub state: ContestState,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_secs: i64,
    pub questions: Vec<String>,
}

/// Ranked leaderboard response
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub contest_id: String,
    pub entries: Vec<RankedEntry>,
    pub updated_at: DateTime<Utc>,
}
