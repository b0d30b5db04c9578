use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use shelfwatch::batch::{render_report, run_batch};
use shelfwatch::config::{SitesConfig, load_targets};
use shelfwatch::fetch::{DEFAULT_USER_AGENT, FetchConfig, PageFetcher};

/// Fetches configured product pages and prints one JSON record per
/// target with the extracted name, stock status and price.
#[derive(Parser, Debug)]
#[command(name = "shelfwatch", version, about)]
struct Cli {
    /// Path to the site configuration JSON file
    #[arg(long, default_value = "config/websites.json")]
    sites: PathBuf,

    /// Path to the target list JSON file
    #[arg(long, default_value = "config/products.json")]
    targets: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 20)]
    timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; diagnostics go to stderr, the JSON report to
    // stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shelfwatch=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let sites = SitesConfig::load(&cli.sites)?;
    let targets = load_targets(&cli.targets)?;
    info!(
        sites = sites.sites.len(),
        targets = targets.len(),
        "configuration loaded"
    );

    let fetcher = PageFetcher::new(&FetchConfig {
        user_agent: cli.user_agent,
        timeout_secs: cli.timeout_secs,
    })?;

    let results = run_batch(&sites, &targets, &fetcher).await?;
    println!("{}", render_report(&results)?);

    Ok(())
}
