//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// JUDGING DEFAULTS
// =============================================================================

/// Default number of judge workers draining the submission queue
pub const DEFAULT_JUDGE_WORKERS: usize = 4;

/// Default submission queue capacity (backpressure threshold)
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Default wall-clock limit per test case run in milliseconds
pub const DEFAULT_TIME_LIMIT_MS: u64 = 2_000;

/// Default memory limit per test case run in megabytes
pub const DEFAULT_MEMORY_LIMIT_MB: u64 = 256;

/// Default compile step wall-clock limit in milliseconds
pub const DEFAULT_COMPILE_TIME_LIMIT_MS: u64 = 10_000;

/// Maximum configurable time limit in milliseconds (to prevent abuse)
pub const MAX_TIME_LIMIT_MS: u64 = 30_000;

/// Bounded retry count for infrastructure-level sandbox failures
pub const DEFAULT_SANDBOX_RETRIES: u32 = 2;

/// Base backoff between sandbox retries in milliseconds (doubled per attempt)
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

/// Grace period added on top of the per-run wall-clock limit before the
/// container is forcibly removed
pub const WALL_CLOCK_GRACE_MS: u64 = 500;

/// Process count cap inside a sandbox container
pub const SANDBOX_PIDS_LIMIT: i64 = 64;

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum source code size in bytes (256 KB)
pub const MAX_SOURCE_CODE_SIZE: usize = 256 * 1024;

/// Maximum contest title length
pub const MAX_CONTEST_TITLE_LENGTH: usize = 256;

/// Maximum user handle length
pub const MAX_USER_HANDLE_LENGTH: usize = 64;

/// Maximum test case input size in bytes (10 MB)
pub const MAX_TEST_CASE_INPUT_SIZE: usize = 10 * 1024 * 1024;

// =============================================================================
// API VERSIONING
// =============================================================================

/// Current API version
pub const API_VERSION: &str = "v1";

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";
