//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

use crate::infrastructure::{AppConfig, FailurePolicy};

/// Crawl a product catalogue and write every product as JSON.
#[derive(Parser, Debug, Clone)]
#[command(name = "catalog-crawler", version, about)]
pub struct Cli {
    /// Catalogue base URL; listing pages are fetched from `{url}page/{n}/`
    pub url: String,

    /// Number of product pages fetched in parallel [default: 1]
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Output file [default: products.json]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep crawling past failed product pages and write what succeeded
    #[arg(long)]
    pub keep_going: bool,

    /// Configuration file layered over the built-in defaults
    #[arg(long, env = "CATALOG_CRAWLER_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Flags given on the command line win over every other source.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(concurrency) = self.concurrency {
            config.crawling.concurrency = concurrency;
        }
        if let Some(output) = &self.output {
            config.crawling.output_path = output.clone();
        }
        if self.keep_going {
            config.crawling.failure_policy = FailurePolicy::Isolate;
        }
    }
}
