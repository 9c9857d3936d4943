//! CodeArena - Contest Judging & Leaderboard Engine
//!
//! This library provides the core functionality for the CodeArena platform:
//! accepting submissions against timed contests, executing them in an
//! isolated sandbox, scoring them against weighted test cases and folding
//! the results into a live per-contest ranking.
//!
//! # Architecture
//!
//! The engine follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Intake / Registry / Stores**: validated in-memory ownership of
//!   contest, question, submission and leaderboard records
//! - **Judge**: bounded worker pool, sandbox contract, per-submission runner
//! - **Scoring**: deterministic verdict evaluation and weighted scoring

pub mod config;
pub mod constants;
pub mod eligibility;
pub mod error;
pub mod handlers;
pub mod intake;
pub mod judge;
pub mod leaderboard;
pub mod models;
pub mod registry;
pub mod scoring;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
