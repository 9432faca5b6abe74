// src/config.rs
// =============================================================================
// Settings shared by the extractor and the checker.
//
// Everything that used to be a hidden default (timeout, how many probes run
// at once, which hrefs count as links) lives here so callers can see and
// change it. The CLI fills this struct from its flags.
// =============================================================================

use crate::error::CheckerError;
use std::time::Duration;

/// Default number of probes in flight at the same time
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Default time budget for one probe, from sending the request to the status line
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default time budget for opening the TCP/TLS connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// Which href values the extractor keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkFilter {
    /// Non-empty and starts with the literal text "http".
    ///
    /// This is a plain prefix match, so "httpfoo" passes too. Kept as the
    /// default so results match existing audit reports.
    #[default]
    HttpPrefix,
    /// Parses as an absolute URL whose scheme is http or https
    HttpScheme,
}

#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Maximum number of probes running at once (at least 1)
    pub concurrency: usize,
    /// Per-probe timeout
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub filter: LinkFilter,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: format!("link-audit/{}", env!("CARGO_PKG_VERSION")),
            filter: LinkFilter::default(),
        }
    }
}

impl CheckerConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_filter(mut self, filter: LinkFilter) -> Self {
        self.filter = filter;
        self
    }

    // Rejects values that would make the checker hang or never run a probe
    pub fn validate(&self) -> Result<(), CheckerError> {
        if self.concurrency == 0 {
            return Err(CheckerError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(CheckerError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(CheckerError::InvalidConfig(
                "connect timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CheckerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.concurrency, 50);
        assert_eq!(config.filter, LinkFilter::HttpPrefix);
        assert!(config.user_agent.starts_with("link-audit/"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = CheckerConfig::default().with_concurrency(0);
        assert!(matches!(
            config.validate(),
            Err(CheckerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = CheckerConfig::default().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
