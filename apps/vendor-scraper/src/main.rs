//! Vendor Scraper
//!
//! One-off crawl of the vendor directory. Each listing page is parsed for
//! vendor cards, every card with a phone number is enriched from its detail
//! page, and the result is written as a pretty-printed JSON array.

use clap::Parser;
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::{Result, WrapErr};
use tracing::info;

mod cli;
mod client;
mod crawler;
mod error;
mod parser;

use cli::Cli;
use client::HttpPageSource;
use crawler::Crawler;
use parser::VendorParser;

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let cli = Cli::parse();
    info!("Scraping {} (up to {} pages)", cli.base_url, cli.max_pages);

    let crawler = Crawler::new(HttpPageSource::new()?, VendorParser::new()?, &cli.base_url);
    let providers = crawler.crawl(&cli).await?;

    let json = serde_json::to_string_pretty(&providers)?;
    tokio::fs::write(&cli.output, json)
        .await
        .wrap_err_with(|| format!("Failed to write {}", cli.output.display()))?;

    info!(
        "Data successfully written to {} ({} providers)",
        cli.output.display(),
        providers.len()
    );
    Ok(())
}
