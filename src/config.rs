//! Application configuration management
//!
//! This module handles loading and validating configuration from environment
//! variables. Configuration is constructed once at startup and passed
//! explicitly to the components that need it; there is no global config
//! state.

use std::env;

use crate::constants::{
    DEFAULT_COMPILE_TIME_LIMIT_MS, DEFAULT_JUDGE_WORKERS, DEFAULT_MEMORY_LIMIT_MB,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_RETRY_BACKOFF_MS, DEFAULT_SANDBOX_RETRIES,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_TIME_LIMIT_MS, MAX_TIME_LIMIT_MS,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub judge: JudgeConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Judging engine configuration
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Number of workers draining the submission queue
    pub workers: usize,
    /// Bounded submission queue capacity
    pub queue_capacity: usize,
    /// Wall-clock limit per test case run in milliseconds
    pub time_limit_ms: u64,
    /// Memory limit per test case run in megabytes
    pub memory_limit_mb: u64,
    /// Compile step wall-clock limit in milliseconds
    pub compile_time_limit_ms: u64,
    /// Bounded retry count for infrastructure-level sandbox failures
    pub sandbox_retries: u32,
    /// Base backoff between sandbox retries in milliseconds
    pub retry_backoff_ms: u64,
    /// When set, question scores recorded on the leaderboard are normalized
    /// to this maximum; raw weighted sums are recorded otherwise
    pub max_question_score: Option<u32>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            judge: JudgeConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl JudgeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let time_limit_ms: u64 = env::var("JUDGE_TIME_LIMIT_MS")
            .unwrap_or_else(|_| DEFAULT_TIME_LIMIT_MS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("JUDGE_TIME_LIMIT_MS".to_string()))?;

        if time_limit_ms == 0 || time_limit_ms > MAX_TIME_LIMIT_MS {
            return Err(ConfigError::InvalidValue("JUDGE_TIME_LIMIT_MS".to_string()));
        }

        let max_question_score = match env::var("JUDGE_MAX_QUESTION_SCORE") {
            Ok(v) => Some(
                v.parse()
                    .map_err(|_| ConfigError::InvalidValue("JUDGE_MAX_QUESTION_SCORE".to_string()))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            workers: env::var("JUDGE_WORKERS")
                .unwrap_or_else(|_| DEFAULT_JUDGE_WORKERS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JUDGE_WORKERS".to_string()))?,
            queue_capacity: env::var("JUDGE_QUEUE_CAPACITY")
                .unwrap_or_else(|_| DEFAULT_QUEUE_CAPACITY.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JUDGE_QUEUE_CAPACITY".to_string()))?,
            time_limit_ms,
            memory_limit_mb: env::var("JUDGE_MEMORY_LIMIT_MB")
                .unwrap_or_else(|_| DEFAULT_MEMORY_LIMIT_MB.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JUDGE_MEMORY_LIMIT_MB".to_string()))?,
            compile_time_limit_ms: env::var("JUDGE_COMPILE_TIME_LIMIT_MS")
                .unwrap_or_else(|_| DEFAULT_COMPILE_TIME_LIMIT_MS.to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("JUDGE_COMPILE_TIME_LIMIT_MS".to_string())
                })?,
            sandbox_retries: env::var("JUDGE_SANDBOX_RETRIES")
                .unwrap_or_else(|_| DEFAULT_SANDBOX_RETRIES.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JUDGE_SANDBOX_RETRIES".to_string()))?,
            retry_backoff_ms: env::var("JUDGE_RETRY_BACKOFF_MS")
                .unwrap_or_else(|_| DEFAULT_RETRY_BACKOFF_MS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JUDGE_RETRY_BACKOFF_MS".to_string()))?,
            max_question_score,
        })
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_JUDGE_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
            memory_limit_mb: DEFAULT_MEMORY_LIMIT_MB,
            compile_time_limit_ms: DEFAULT_COMPILE_TIME_LIMIT_MS,
            sandbox_retries: DEFAULT_SANDBOX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            max_question_score: None,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
