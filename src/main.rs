// src/main.rs
// =============================================================================
// This is the entry point of the link-audit CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Get the page HTML (download it or read a file)
// 3. Extract the links and check them all concurrently
// 4. Print the results as a table or JSON
// 5. Exit with proper code (0 = all healthy, 1 = broken links, 2 = error)
// =============================================================================

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{CheckOptions, Cli, Commands};
use link_audit::{fetch, CheckResult, LinkChecker, LinkExtractor, Summary};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err = unexpected error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Must happen before the extractor/checker are built: they capture the
    // default subscriber at construction
    init_logging(cli.verbose);

    match cli.command {
        Commands::Page { page_url, options } => {
            let config = options.to_config();
            let html = fetch::fetch_page(&config, &page_url).await?;
            audit(&page_url, &html, &options).await
        }
        Commands::File {
            path,
            page_url,
            options,
        } => {
            let html = fetch::read_page(&path).await?;
            let page_url = page_url.unwrap_or_else(|| path.display().to_string());
            audit(&page_url, &html, &options).await
        }
    }
}

// Logs go to stderr so `--json` output on stdout stays parseable
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Extracts and checks the links of one page, prints the report and picks
// the exit code
async fn audit(page_url: &str, html: &str, options: &CheckOptions) -> Result<i32> {
    let config = options.to_config();

    let links = LinkExtractor::new(config.filter).extract(page_url, html);
    info!(page = page_url, links = links.len(), "extracted links");

    if links.is_empty() && !options.json {
        println!("✅ No links found to check");
        return Ok(0);
    }

    if !options.json {
        println!("🌐 Checking {} link(s) from {}...\n", links.len(), page_url);
    }

    let checker = LinkChecker::new(config)?;

    // Ctrl-C cancels the batch; links still in flight are reported as cancelled
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling remaining checks");
            on_interrupt.cancel();
        }
    });

    let results = checker.check_links_with_cancel(links, cancel).await;

    print_results(&results, options.json)?;

    if Summary::from_results(&results).has_broken() {
        Ok(1) // Exit code 1 = broken links found
    } else {
        Ok(0) // Exit code 0 = all good
    }
}

// Shape of the `--json` output
#[derive(Serialize)]
struct Report<'a> {
    summary: Summary,
    results: &'a [CheckResult],
}

// Prints the results either as a table or JSON
fn print_results(results: &[CheckResult], json: bool) -> Result<()> {
    if json {
        let report = Report {
            summary: Summary::from_results(results),
            results,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(results);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(results: &[CheckResult]) {
    println!("{:<60} {:<12} {:<30}", "URL", "STATUS", "PROBLEM");
    println!("{}", "=".repeat(102));

    for result in results {
        let status_display = if result.exists() {
            "✅ OK"
        } else {
            "❌ BROKEN"
        };

        println!(
            "{:<60} {:<12} {:<30}",
            truncate(result.link(), 57),
            status_display,
            result.problem().unwrap_or("")
        );
    }

    println!();

    let summary = Summary::from_results(results);
    println!("📊 Summary:");
    println!("   ✅ OK: {}", summary.healthy);
    println!("   ❌ Broken: {}", summary.broken);
    println!("   📋 Total: {}", summary.total);
}

// Shortens long URLs for the table, on a char boundary
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
