// src/lib.rs
// =============================================================================
// link-audit: find the dead outbound links of an HTML page.
//
// Two pieces, used one after the other:
// 1. checker::LinkExtractor pulls the http(s) links out of a page
// 2. checker::LinkChecker probes them concurrently and reports one
//    CheckResult per link, in the order the links were given
//
// The binary (src/main.rs) is a thin CLI on top of this library.
// =============================================================================

pub mod checker;
pub mod config;
pub mod error;
pub mod fetch;

pub use checker::{
    extract_links, CheckResult, FailureKind, LinkChecker, LinkExtractor, Outcome, Summary,
};
pub use config::{CheckerConfig, LinkFilter};
pub use error::CheckerError;
