// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - html: Extracts link targets from HTML pages
// - http: Probes link targets concurrently with HEAD requests
// - result: The per-link CheckResult record and the batch Summary
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers write `checker::LinkChecker` instead of `checker::http::LinkChecker`.
// =============================================================================

mod html;
mod http;
mod result;

pub use html::{extract_links, LinkExtractor};
pub use http::LinkChecker;
pub use result::{CheckResult, FailureKind, Outcome, Summary};
