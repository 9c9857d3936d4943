//! Sandbox contract
//!
//! One test case is one isolated run: the submitted program executes with no
//! network, a capped memory/process budget and a scratch workspace that lives
//! only as long as the run. The sandbox returns the raw observed output;
//! verdict comparison happens in the scoring engine.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::languages::Language;
use crate::config::JudgeConfig;

/// Resource limits applied to a single run
#[derive(Debug, Clone)]
pub struct RunLimits {
    /// Hard wall-clock limit; a run exceeding it is forcibly terminated
    pub wall_clock: Duration,
    /// Memory ceiling in megabytes
    pub memory_mb: u64,
    /// Wall-clock limit for the compile step
    pub compile_wall_clock: Duration,
}

impl RunLimits {
    pub fn from_config(config: &JudgeConfig) -> Self {
        Self {
            wall_clock: Duration::from_millis(config.time_limit_ms),
            memory_mb: config.memory_limit_mb,
            compile_wall_clock: Duration::from_millis(config.compile_time_limit_ms),
        }
    }
}

/// Everything the sandbox needs for one isolated test case run
#[derive(Debug)]
pub struct RunRequest<'a> {
    pub submission_id: Uuid,
    pub code: &'a str,
    pub language: Language,
    pub input: &'a str,
    pub limits: &'a RunLimits,
}

/// How a run ended, before any output comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// The program ran to completion (possibly with a non-zero exit code)
    Completed { exit_code: i32 },
    /// The wall-clock limit was hit and the run was terminated
    TimedOut,
    /// The memory ceiling was hit
    OutOfMemory,
    /// The compile step failed; no test case was executed
    CompileFailed,
}

/// Raw result of one sandbox run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: RunStatus,
    /// Observed standard output, uninterpreted
    pub stdout: String,
    pub stderr: Option<String>,
    /// Compiler diagnostics when `status` is `CompileFailed`
    pub compile_log: Option<String>,
    pub wall_time_ms: f64,
    pub memory_kb: i64,
}

impl RunReport {
    pub fn compile_failed(log: String) -> Self {
        Self {
            status: RunStatus::CompileFailed,
            stdout: String::new(),
            stderr: None,
            compile_log: Some(log),
            wall_time_ms: 0.0,
            memory_kb: 0,
        }
    }
}

/// Infrastructure-level failure to even start or drive a run
///
/// Distinct from every judging verdict: a program that crashes is judged
/// `RuntimeError`, a sandbox that cannot be created is a `SandboxFailure`
/// and is retried by the dispatcher.
#[derive(Debug, thiserror::Error)]
#[error("sandbox failure: {0}")]
pub struct SandboxFailure(pub String);

impl From<bollard::errors::Error> for SandboxFailure {
    fn from(err: bollard::errors::Error) -> Self {
        SandboxFailure(err.to_string())
    }
}

impl From<SandboxFailure> for crate::error::AppError {
    fn from(err: SandboxFailure) -> Self {
        crate::error::AppError::Sandbox(err.0)
    }
}

/// Pluggable isolation capability
///
/// Runs must not share mutable state: each call gets its own workspace and
/// its own process tree.
#[async_trait]
pub trait Sandbox: Send + Sync {
    async fn run(&self, request: RunRequest<'_>) -> Result<RunReport, SandboxFailure>;
}
