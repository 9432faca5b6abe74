// src/checker/result.rs
// =============================================================================
// The record produced for every probed link.
//
// A CheckResult is built exactly once, when its probe finishes, and never
// changes afterwards: the fields are private and only this crate constructs
// results. Callers read them through accessors and own the returned Vec.
// =============================================================================

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Problem text recorded for probes stopped by a cancelled batch
pub const CANCELLED_PROBLEM: &str = "cancelled";

// Why a request never produced a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No response within the configured timeout
    Timeout,
    /// Could not resolve the host name
    Dns,
    /// Connection refused, reset or otherwise not established
    Connect,
    /// TLS handshake or certificate failure
    Tls,
    /// The link could not be turned into a request URL
    InvalidUrl,
    /// The batch was cancelled before this probe finished
    Cancelled,
    /// Anything else reported by the HTTP client
    Other,
}

// Terminal state of one probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// 2xx response
    Healthy { code: u16 },
    /// Response with any non-2xx status
    HttpStatus { code: u16 },
    /// The request failed before a response arrived
    Transport { kind: FailureKind },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    link: String,
    outcome: Outcome,
    problem: Option<String>,
    checked_at: DateTime<Utc>,
}

impl CheckResult {
    // Builds the result for a probe that got a response
    pub(crate) fn from_status(link: String, status: StatusCode) -> Self {
        let code = status.as_u16();
        let (outcome, problem) = if status.is_success() {
            (Outcome::Healthy { code }, None)
        } else {
            (Outcome::HttpStatus { code }, Some(describe_status(status)))
        };
        Self {
            link,
            outcome,
            problem,
            checked_at: Utc::now(),
        }
    }

    // Builds the result for a probe whose request failed
    pub(crate) fn from_failure(link: String, kind: FailureKind, message: String) -> Self {
        Self {
            link,
            outcome: Outcome::Transport { kind },
            problem: Some(message),
            checked_at: Utc::now(),
        }
    }

    pub(crate) fn cancelled(link: String) -> Self {
        Self::from_failure(link, FailureKind::Cancelled, CANCELLED_PROBLEM.to_string())
    }

    /// The URL that was probed
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Why the link is unhealthy, or None when it answered with a 2xx status
    pub fn problem(&self) -> Option<&str> {
        self.problem.as_deref()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// When the probe finished
    pub fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }

    pub fn exists(&self) -> bool {
        self.problem.is_none()
    }

    pub fn is_missing(&self) -> bool {
        !self.exists()
    }
}

// Serialized by hand so the derived `exists` flag shows up in the JSON report
impl Serialize for CheckResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CheckResult", 5)?;
        state.serialize_field("link", &self.link)?;
        state.serialize_field("exists", &self.exists())?;
        state.serialize_field("problem", &self.problem)?;
        state.serialize_field("outcome", &self.outcome)?;
        state.serialize_field("checked_at", &self.checked_at)?;
        state.end()
    }
}

// Human-readable description of a status code: the canonical reason phrase
// ("Not Found"), or "HTTP 599" for codes without one
fn describe_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("HTTP {}", status.as_u16()),
    }
}

// Counts for the end-of-report summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct Summary {
    pub total: usize,
    pub healthy: usize,
    pub broken: usize,
}

impl Summary {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let healthy = results.iter().filter(|r| r.exists()).count();
        Self {
            total: results.len(),
            healthy,
            broken: results.len() - healthy,
        }
    }

    pub fn has_broken(&self) -> bool {
        self.broken > 0
    }
}
