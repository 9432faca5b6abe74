// src/error.rs
// =============================================================================
// Errors the library can return.
//
// A broken link is NOT an error: it is reported through CheckResult::problem.
// The only failures that reach a caller are the ones that happen before any
// probe runs (bad configuration, HTTP client or runtime that can't start).
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckerError {
    /// The shared reqwest client could not be built (TLS backend, bad user agent...)
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The runtime used by check_links_blocking could not be started
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// check_links_blocking was called from inside a tokio runtime
    #[error("check_links_blocking cannot run inside an async runtime; use check_links")]
    NestedRuntime,
}
