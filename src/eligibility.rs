//! Time window enforcement
//!
//! Pure policy layer answering "is this contest accepting submissions at
//! instant `now`". Used by intake before enqueue and, defensively, by the
//! dispatcher against the submission's own intake timestamp. Only the server
//! clock is ever consulted; client-supplied timestamps play no part in
//! eligibility.

use chrono::{DateTime, Utc};

use crate::models::{Contest, ContestState};

/// Whether the contest accepts submissions at `now`
pub fn is_eligible(contest: &Contest, now: DateTime<Utc>) -> bool {
    contest.state_at(now) == ContestState::Active
}
