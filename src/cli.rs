// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is written as Rust structs and
// enums, and clap generates the parsing, --help and --version from them.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use link_audit::{CheckerConfig, LinkFilter};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "link-audit",
    version,
    about = "Find the dead links of an HTML page",
    long_about = "link-audit extracts the http(s) links of a page and checks each of them \
                  with a HEAD request. It exits with 1 when at least one link is broken, \
                  which makes it usable in CI pipelines."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v = info, -vv = trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a page and check every link on it
    ///
    /// Example: link-audit page https://example.com --json
    Page {
        /// Page URL (e.g., https://example.com)
        page_url: String,

        #[command(flatten)]
        options: CheckOptions,
    },

    /// Check every link of a local HTML file
    ///
    /// Example: link-audit file ./public/index.html
    File {
        /// Path to the HTML file
        path: PathBuf,

        /// URL the file is served from, used in log messages only
        #[arg(long)]
        page_url: Option<String>,

        #[command(flatten)]
        options: CheckOptions,
    },
}

// Flags shared by both subcommands
#[derive(Args, Debug)]
pub struct CheckOptions {
    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Maximum number of links checked at the same time
    #[arg(long, default_value_t = link_audit::config::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-link timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Only keep hrefs that parse as absolute http/https URLs
    /// (by default any href starting with "http" is checked)
    #[arg(long)]
    pub strict: bool,
}

impl CheckOptions {
    pub fn to_config(&self) -> CheckerConfig {
        let filter = if self.strict {
            LinkFilter::HttpScheme
        } else {
            LinkFilter::HttpPrefix
        };
        CheckerConfig::default()
            .with_concurrency(self.concurrency)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_filter(filter)
    }
}
