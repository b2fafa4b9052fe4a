// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and build the Crawler from the global flags
// 3. Run the requested pipeline, or the interactive menu
// 4. Print the per-category report (table or JSON)
// 5. Exit with 0, or 1 if an error escaped (e.g. the category menu could not
//    be read at all)
// =============================================================================

mod assets;
mod cli;
mod config;
mod crawl;
mod error;
mod extract;
mod fetch;
mod html;
mod logging;
mod menu;
mod sink;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Action, Cli};
use crawl::{CategoryReport, CrawlSummary, Crawler};
use extract::BookExtractor;
use sink::CsvSink;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.build_config();
    let sink = Arc::new(CsvSink::new(config.single_book_dir()));
    let crawler = Crawler::new(config, Arc::new(BookExtractor), sink)
        .context("could not set up the HTTP client")?;

    match cli.command.as_ref().and_then(|command| command.action()) {
        Some(action) => run_action(&crawler, action, cli.json).await,
        None => menu::run_menu(&crawler, cli.json).await,
    }
}

// Runs one pipeline variant and prints its report.
//
// Shared by the subcommands and the interactive menu.
pub async fn run_action(crawler: &Crawler, action: Action, json: bool) -> Result<()> {
    match action {
        Action::Book(url) => {
            crawler
                .scrape_book(&url)
                .await
                .with_context(|| format!("could not scrape book {}", url))?;
        }
        Action::Category(url) => {
            let summary = crawler.scrape_category(&url).await;
            print_results(&summary, json)?;
        }
        Action::All => {
            let summary = crawler
                .scrape_all(false)
                .await
                .context("could not read the category list")?;
            print_results(&summary, json)?;
        }
        Action::AllWithImages => {
            let summary = crawler
                .scrape_all(true)
                .await
                .context("could not read the category list")?;
            print_results(&summary, json)?;
        }
    }
    Ok(())
}

// Prints the summary either as a table or JSON
fn print_results(summary: &CrawlSummary, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(summary)?;
        println!("{}", json_output);
    } else {
        print_table(summary);
    }
    Ok(())
}

fn print_table(summary: &CrawlSummary) {
    println!();
    println!("{:<4} {:<32} {:>6} {:>6} {:<40}", "#", "CATEGORY", "LINKS", "SAVED", "MESSAGE");
    println!("{}", "=".repeat(92));

    for report in &summary.categories {
        // Truncate long category names for display
        let name = if report.name.chars().count() > 30 {
            format!("{}...", report.name.chars().take(27).collect::<String>())
        } else {
            report.name.clone()
        };

        println!(
            "{:<4} {:<32} {:>6} {:>6} {:<40}",
            report.index,
            name,
            report.links,
            report.persisted,
            format_message(report)
        );
    }

    println!();

    let failed = summary.categories.iter().filter(|r| !r.is_ok()).count();
    println!("Summary:");
    println!("   Categories OK: {}", summary.categories.len() - failed);
    println!("   Categories failed: {}", failed);
    println!("   Books saved: {}", summary.persisted());
    println!("   Elapsed: {:.2} seconds", summary.elapsed_secs);
}

fn format_message(report: &CategoryReport) -> String {
    if let Some(error) = &report.error {
        return format!("ERROR: {}", error);
    }
    match &report.images {
        Some(images) => format!(
            "covers: {} new, {} kept, {} failed",
            images.downloaded, images.skipped, images.failed
        ),
        None if report.persisted == 0 => "nothing to save".to_string(),
        None => "OK".to_string(),
    }
}
