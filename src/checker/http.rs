// src/checker/http.rs
// =============================================================================
// This module checks if link targets are alive by making HTTP requests.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Never follows redirects: a 3xx answer is reported as a problem
// - Turns every transport failure into a per-link problem, so one bad link
//   can never abort the batch
// - Runs probes concurrently, bounded by CheckerConfig::concurrency
// - Returns results in the same order as the input links
// =============================================================================

use crate::checker::result::{CheckResult, FailureKind};
use crate::config::CheckerConfig;
use crate::error::CheckerError;
use futures::stream::{self, StreamExt}; // StreamExt gives us .buffer_unordered()
use reqwest::{redirect, Client};
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;
use tracing::{debug, trace, Dispatch};

// Probes link targets with one shared HTTP client (connection pooling)
#[derive(Clone)]
pub struct LinkChecker {
    client: Client,
    config: CheckerConfig,
    dispatch: Dispatch,
}

impl LinkChecker {
    // Builds the shared client from the configuration
    //
    // Fails only on bad configuration or if the TLS backend can't start;
    // nothing about individual links is checked here.
    pub fn new(config: CheckerConfig) -> Result<Self, CheckerError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(redirect::Policy::none())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            config,
            dispatch: tracing::dispatcher::get_default(Dispatch::clone),
        })
    }

    /// Sends this checker's diagnostics to `dispatch` instead of the
    /// subscriber that was the default at construction time
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    // Checks multiple links concurrently
    //
    // Returns exactly one result per input link, at the same position as the
    // link in the input. Duplicated links are probed independently.
    pub async fn check_links<I>(&self, links: I) -> Vec<CheckResult>
    where
        I: IntoIterator<Item = String>,
    {
        self.check_links_with_cancel(links, CancellationToken::new())
            .await
    }

    // Same as check_links, but stops early once `cancel` fires
    //
    // Probes still running at that point end with a "cancelled" problem, so
    // the returned Vec is still as long as the input.
    pub async fn check_links_with_cancel<I>(
        &self,
        links: I,
        cancel: CancellationToken,
    ) -> Vec<CheckResult>
    where
        I: IntoIterator<Item = String>,
    {
        let links: Vec<String> = links.into_iter().collect();

        self.run_batch(links, &cancel)
            .with_subscriber(self.dispatch.clone())
            .await
    }

    // Blocking wrapper for callers without an async runtime
    //
    // Starts a private current-thread runtime for the duration of the batch.
    // Inside a tokio runtime it returns CheckerError::NestedRuntime: async
    // callers must use check_links.
    pub fn check_links_blocking<I>(&self, links: I) -> Result<Vec<CheckResult>, CheckerError>
    where
        I: IntoIterator<Item = String>,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(CheckerError::NestedRuntime);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.check_links(links)))
    }

    async fn run_batch(&self, links: Vec<String>, cancel: &CancellationToken) -> Vec<CheckResult> {
        let total = links.len();
        debug!(
            total,
            concurrency = self.config.concurrency,
            "checking links"
        );

        // One slot per input link; each probe writes only its own slot
        let mut slots: Vec<Option<CheckResult>> = (0..total).map(|_| None).collect();

        let probes = links.into_iter().enumerate().map(move |(index, link)| async move {
            let finished = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = self.probe(&link) => Some(result),
            };
            let result = finished.unwrap_or_else(|| CheckResult::cancelled(link));
            (index, result)
        });

        // .buffer_unordered(N) runs up to N probes at once and yields them as
        // they complete, hence the indexed slots above
        let mut completed = stream::iter(probes).buffer_unordered(self.config.concurrency);
        while let Some((index, result)) = completed.next().await {
            slots[index] = Some(result);
        }

        let results: Vec<CheckResult> = slots.into_iter().flatten().collect();
        debug_assert_eq!(results.len(), total);

        let broken = results.iter().filter(|r| r.is_missing()).count();
        debug!(total, broken, "finished checking links");

        results
    }

    // Checks a single link
    //
    // Exactly one CheckResult comes out: a response of any status, or the
    // transport failure converted into a problem. There is no retry.
    pub async fn check_link(&self, link: &str) -> CheckResult {
        self.probe(link)
            .with_subscriber(self.dispatch.clone())
            .await
    }

    // The probe itself; logs to whatever dispatcher the caller has set up
    async fn probe(&self, link: &str) -> CheckResult {
        match self.client.head(link).send().await {
            Ok(response) => CheckResult::from_status(link.to_string(), response.status()),
            Err(error) => {
                trace!(link, error = ?error, "failed to retrieve link");
                let kind = classify_error(&error);
                CheckResult::from_failure(link.to_string(), kind, error.to_string())
            }
        }
    }
}

// Sorts a reqwest failure into a FailureKind
//
// reqwest errors can happen for many reasons:
// - The link is not a valid URL (builder error)
// - Network timeout
// - DNS resolution failure
// - Connection refused
// - SSL certificate issues
//
// Only the source chain is inspected: reqwest's own message carries the
// request URL, whose host or path may contain any of these words.
fn classify_error(error: &reqwest::Error) -> FailureKind {
    let error_string = source_chain(error).to_lowercase();
    let tls_related = error_string.contains("certificate")
        || error_string.contains("tls")
        || error_string.contains("ssl");

    if error.is_builder() {
        FailureKind::InvalidUrl
    } else if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_connect() {
        if error_string.contains("dns") || error_string.contains("resolve") {
            FailureKind::Dns
        } else if tls_related {
            FailureKind::Tls
        } else {
            FailureKind::Connect
        }
    } else if tls_related {
        FailureKind::Tls
    } else {
        FailureKind::Other
    }
}

// Messages of every underlying cause, joined with ": "
fn source_chain(error: &reqwest::Error) -> String {
    let mut causes = Vec::new();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = std::error::Error::source(cause);
    }
    causes.join(": ")
}
