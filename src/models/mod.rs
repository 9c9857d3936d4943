//! Domain models
//!
//! Typed records owned by the engine's in-memory stores. All inputs are
//! validated at the intake boundary before entering any of these structures.

pub mod contest;
pub mod leaderboard;
pub mod question;
pub mod submission;

pub use contest::{Contest, ContestState};
pub use leaderboard::LeaderboardEntry;
pub use question::{Question, TestCase};
pub use submission::{Submission, SubmissionStatus, TestCaseResult, Verdict};
