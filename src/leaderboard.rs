//! Leaderboard aggregator
//!
//! Exclusive owner of leaderboard entries. Each contest has its own board
//! behind its own lock, so updates within a contest are serialized (single
//! writer) while contests stay fully independent. Reads take the board's
//! read side and always observe a fully applied update or none of it.
//! Ranking is computed on every read, never stored.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::LeaderboardEntry;

#[derive(Default)]
struct ContestBoard {
    entries: HashMap<String, LeaderboardEntry>,
}

/// Per-contest leaderboard store
#[derive(Default)]
pub struct Leaderboard {
    boards: RwLock<HashMap<String, Arc<RwLock<ContestBoard>>>>,
}

/// One row of the ranked leaderboard view
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub user_handle: String,
    pub total_score: u32,
    pub best_scores: HashMap<String, u32>,
    pub achieved_at: DateTime<Utc>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn board(&self, contest_id: &str) -> Arc<RwLock<ContestBoard>> {
        if let Some(board) = self
            .boards
            .read()
            .expect("leaderboard lock poisoned")
            .get(contest_id)
        {
            return Arc::clone(board);
        }

        let mut boards = self.boards.write().expect("leaderboard lock poisoned");
        Arc::clone(
            boards
                .entry(contest_id.to_string())
                .or_insert_with(|| Arc::new(RwLock::new(ContestBoard::default()))),
        )
    }

    /// Fold one scored submission into the user's entry
    ///
    /// Best-of policy: a lower or equal score never displaces the stored
    /// best. The tie-break timestamp moves to `submitted_at` only when the
    /// total actually changes, so resubmitting a worse solution cannot hurt
    /// the user's rank.
    pub fn record_score(
        &self,
        contest_id: &str,
        user_handle: &str,
        question_id: &str,
        score: u32,
        submitted_at: DateTime<Utc>,
    ) {
        let board = self.board(contest_id);
        let mut board = board.write().expect("board lock poisoned");

        let entry = board
            .entries
            .entry(user_handle.to_string())
            .or_insert_with(|| LeaderboardEntry::new(user_handle.to_string(), submitted_at));

        let best = entry.best_scores.entry(question_id.to_string()).or_insert(0);
        if score > *best {
            *best = score;
            let new_total: u32 = entry.best_scores.values().sum();
            if new_total != entry.total_score {
                entry.total_score = new_total;
                entry.achieved_at = submitted_at;
            }
        }
    }

    /// Ranked view: total score descending, earliest achiever first on ties
    pub fn ranking(&self, contest_id: &str) -> Vec<RankedEntry> {
        let board = self.board(contest_id);
        let board = board.read().expect("board lock poisoned");

        let mut entries: Vec<&LeaderboardEntry> = board.entries.values().collect();
        entries.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then(a.achieved_at.cmp(&b.achieved_at))
                .then(a.user_handle.cmp(&b.user_handle))
        });

        entries
            .into_iter()
            .enumerate()
            .map(|(i, e)| RankedEntry {
                rank: i + 1,
                user_handle: e.user_handle.clone(),
                total_score: e.total_score,
                best_scores: e.best_scores.clone(),
                achieved_at: e.achieved_at,
            })
            .collect()
    }

    /// Current entry for a single user, if any
    pub fn entry(&self, contest_id: &str, user_handle: &str) -> Option<LeaderboardEntry> {
        let board = self.board(contest_id);
        let board = board.read().expect("board lock poisoned");
        board.entries.get(user_handle).cloned()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_best_of_keeps_highest() {
        let lb = Leaderboard::new();
        let t0 = Utc::now();

        lb.record_score("c1", "alice", "q1", 100, t0);
        lb.record_score("c1", "alice", "q1", 50, t0 + Duration::seconds(10));

        let entry = lb.entry("c1", "alice").unwrap();
        assert_eq!(entry.total_score, 100);
        assert_eq!(entry.best_scores["q1"], 100);
        // the worse resubmission must not move the tie-break timestamp
        assert_eq!(entry.achieved_at, t0);
    }

    #[test]
    fn test_total_is_sum_of_bests() {
        let lb = Leaderboard::new();
        let t0 = Utc::now();

        lb.record_score("c1", "alice", "q1", 40, t0);
        lb.record_score("c1", "alice", "q2", 30, t0 + Duration::seconds(5));
        lb.record_score("c1", "alice", "q1", 60, t0 + Duration::seconds(9));

        let entry = lb.entry("c1", "alice").unwrap();
        assert_eq!(entry.total_score, 90);
        assert_eq!(entry.achieved_at, t0 + Duration::seconds(9));
    }

    #[test]
    fn test_ranking_orders_by_total_then_time() {
        let lb = Leaderboard::new();
        let t0 = Utc::now();

        lb.record_score("c1", "late", "q1", 100, t0 + Duration::seconds(30));
        lb.record_score("c1", "early", "q1", 100, t0);
        lb.record_score("c1", "behind", "q1", 40, t0 + Duration::seconds(1));

        let ranking = lb.ranking("c1");
        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].user_handle, "early");
        assert_eq!(ranking[0].rank, 1);
        assert_eq!(ranking[1].user_handle, "late");
        assert_eq!(ranking[2].user_handle, "behind");
        assert_eq!(ranking[2].rank, 3);
    }

    #[test]
    fn test_contests_are_independent() {
        let lb = Leaderboard::new();
        let t0 = Utc::now();

        lb.record_score("c1", "alice", "q1", 10, t0);
        lb.record_score("c2", "alice", "q1", 90, t0);

        assert_eq!(lb.entry("c1", "alice").unwrap().total_score, 10);
        assert_eq!(lb.entry("c2", "alice").unwrap().total_score, 90);
        assert_eq!(lb.ranking("c1").len(), 1);
    }

    #[test]
    fn test_zero_score_still_creates_entry() {
        let lb = Leaderboard::new();
        lb.record_score("c1", "bob", "q1", 0, Utc::now());
        let entry = lb.entry("c1", "bob").unwrap();
        assert_eq!(entry.total_score, 0);
        assert_eq!(lb.ranking("c1")[0].user_handle, "bob");
    }
}
