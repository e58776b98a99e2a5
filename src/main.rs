use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use catalog_crawler::cli::Cli;
use catalog_crawler::crawling::{crawl_to_file, CrawlingOrchestrator, OrchestratorConfig};
use catalog_crawler::infrastructure::{
    init_logging_with_config, ConfigManager, HttpClient, HttpClientConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(cli.config.clone());
    let mut config = config_manager
        .load_config()
        .context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid command-line options")?;

    init_logging_with_config(&config.logging)?;
    info!(
        "Configuration loaded (file: {})",
        config_manager
            .config_path()
            .map_or_else(|| "none".to_string(), |p| p.display().to_string())
    );

    let client = HttpClient::with_config(HttpClientConfig::from_crawling_config(&config.crawling))?;
    let orchestrator = CrawlingOrchestrator::with_fetcher(
        Arc::new(client),
        &config.parsing,
        OrchestratorConfig::from(&config.crawling),
    )?;

    let report = crawl_to_file(&orchestrator, &cli.url, &config.crawling.output_path)
        .await
        .with_context(|| format!("Crawl of {} failed", cli.url))?;

    if !report.is_complete() {
        for failure in &report.failures {
            warn!("Failed: {} ({})", failure.url.url, failure.error);
        }
        bail!(
            "{} of {} product pages failed",
            report.failures.len(),
            report.discovered
        );
    }

    Ok(())
}
