//! Judging pipeline
//!
//! A bounded pool of workers drains the submission queue, runs each
//! submission's test cases in an isolated sandbox, scores the verdicts and
//! publishes the result to the leaderboard aggregator.

pub mod dispatcher;
pub mod docker;
pub mod languages;
pub mod runner;
pub mod sandbox;

pub use dispatcher::JudgeEngine;
pub use docker::DockerSandbox;
pub use sandbox::{RunLimits, RunReport, RunRequest, RunStatus, Sandbox, SandboxFailure};
