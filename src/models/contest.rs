//! Contest model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Contest record
///
/// The lifecycle state is never persisted: it is always recomputed from the
/// time window, so a stored flag can never drift from the clock. Once a
/// contest has entered its window, `start_time` and `duration_secs` are not
/// mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contest {
    pub id: String,
    pub title: String,
    /// Pre-verified handle of the contest owner (identity is established
    /// upstream by the external provider)
    pub owner: String,
    /// Ordered question identifiers belonging to this contest
    pub questions: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub duration_secs: i64,
    /// Set by an explicit management action after the contest has closed
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl Contest {
    /// The instant the contest stops accepting submissions
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::seconds(self.duration_secs)
    }

    /// Lifecycle state as a pure function of the time window and `now`
    pub fn state_at(&self, now: DateTime<Utc>) -> ContestState {
        if self.archived {
            ContestState::Archived
        } else if now < self.start_time {
            ContestState::Scheduled
        } else if now < self.end_time() {
            ContestState::Active
        } else {
            ContestState::Closed
        }
    }
}

/// Contest lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestState {
    Scheduled,
    Active,
    Closed,
    Archived,
}

impl std::fmt::Display for ContestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Active => write!(f, "active"),
            Self::Closed => write!(f, "closed"),
            Self::Archived => write!(f, "archived"),
        }
    }
}
