//! # Crawling Orchestrator
//!
//! Runs the lister once, then dispatches the field extractor over every
//! discovered URL with a fixed pool of workers. Workers pull URLs from a
//! shared queue and send outcomes over a channel drained by the orchestrator
//! alone; the run returns after every worker has been joined.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::try_join_all;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{CrawlError, FieldExtractor, PageLister};
use crate::domain::{ProductDataSet, ProductRecord, ProductUrl};
use crate::infrastructure::parsing::{ParsingConfig, ProductDetailParser, ProductListParser};
use crate::infrastructure::{
    write_json_document, CrawlingConfig, FailurePolicy, OutputOrdering, PageFetcher,
};

/// Configuration for the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Number of workers, at least 1
    pub concurrency: usize,
    pub failure_policy: FailurePolicy,
    pub ordering: OutputOrdering,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::from(&CrawlingConfig::default())
    }
}

impl From<&CrawlingConfig> for OrchestratorConfig {
    fn from(crawling: &CrawlingConfig) -> Self {
        Self {
            concurrency: crawling.concurrency.max(1),
            failure_policy: crawling.failure_policy,
            ordering: crawling.ordering,
        }
    }
}

/// A product URL that could not be turned into a record
#[derive(Debug)]
pub struct FailedProduct {
    pub url: ProductUrl,
    pub error: CrawlError,
}

/// Outcome of a crawl run
#[derive(Debug, Default)]
pub struct CrawlReport {
    pub products: ProductDataSet,
    /// Always empty under [`FailurePolicy::Abort`]
    pub failures: Vec<FailedProduct>,
    pub discovered: usize,
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

type Outcome = (ProductUrl, Result<ProductRecord, CrawlError>);

pub struct CrawlingOrchestrator {
    lister: PageLister,
    extractor: Arc<FieldExtractor>,
    config: OrchestratorConfig,
}

impl CrawlingOrchestrator {
    pub fn new(lister: PageLister, extractor: FieldExtractor, config: OrchestratorConfig) -> Self {
        Self {
            lister,
            extractor: Arc::new(extractor),
            config,
        }
    }

    /// Build lister and extractor over one shared fetcher.
    pub fn with_fetcher(
        fetcher: Arc<dyn PageFetcher>,
        parsing: &ParsingConfig,
        config: OrchestratorConfig,
    ) -> Result<Self, CrawlError> {
        let lister = PageLister::new(
            Arc::clone(&fetcher),
            ProductListParser::with_config(&parsing.product_list_selectors)?,
        );
        let extractor = FieldExtractor::new(fetcher, ProductDetailParser::with_config(parsing)?);
        Ok(Self::new(lister, extractor, config))
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// List every product URL under `base_url`, then extract them all.
    pub async fn run(&self, base_url: &str) -> Result<CrawlReport, CrawlError> {
        let started = Instant::now();
        info!(
            "Starting crawl of {} with {} worker(s)",
            base_url, self.config.concurrency
        );

        let urls = self.lister.list_product_urls(base_url).await?;
        let mut report = self.extract_all(urls).await?;
        report.elapsed = started.elapsed();

        info!(
            "Crawl finished: {} URLs discovered, {} products extracted, {} failed in {:.2?}",
            report.discovered,
            report.products.len(),
            report.failures.len(),
            report.elapsed
        );
        Ok(report)
    }

    /// Extract every URL in `urls` on the worker pool.
    ///
    /// Under [`FailurePolicy::Abort`] the first failure cancels the remaining
    /// work and is returned once all workers have stopped.
    pub async fn extract_all(&self, urls: Vec<ProductUrl>) -> Result<CrawlReport, CrawlError> {
        let started = Instant::now();
        let discovered = urls.len();
        let queue = Arc::new(Mutex::new(VecDeque::from(urls)));
        let cancellation_token = CancellationToken::new();
        let (results_tx, mut results_rx) = mpsc::unbounded_channel::<Outcome>();

        let worker_count = self.config.concurrency.clamp(1, discovered.max(1));
        debug!("Spawning {} workers for {} URLs", worker_count, discovered);

        let workers: Vec<_> = (0..worker_count)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    Arc::clone(&queue),
                    Arc::clone(&self.extractor),
                    results_tx.clone(),
                    cancellation_token.clone(),
                ))
            })
            .collect();
        drop(results_tx);

        let mut collected = Vec::with_capacity(discovered);
        let mut failures = Vec::new();
        let mut abort_error = None;

        while let Some((product_url, result)) = results_rx.recv().await {
            match result {
                Ok(record) => collected.push((product_url, record)),
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::Abort => {
                        error!("Aborting crawl, {} failed: {}", product_url, e);
                        cancellation_token.cancel();
                        abort_error = Some(e);
                        break;
                    }
                    FailurePolicy::Isolate => {
                        warn!("Skipping {}: {}", product_url, e);
                        failures.push(FailedProduct {
                            url: product_url,
                            error: e,
                        });
                    }
                },
            }
        }

        // collection barrier: every worker has stopped past this point
        try_join_all(workers)
            .await
            .map_err(|e| CrawlError::Worker(e.to_string()))?;

        if let Some(e) = abort_error {
            return Err(e);
        }

        if self.config.ordering == OutputOrdering::UrlOrder {
            collected.sort_by_key(|(product_url, _)| product_url.position());
            failures.sort_by_key(|failure| failure.url.position());
        }

        Ok(CrawlReport {
            products: collected.into_iter().map(|(_, record)| record).collect(),
            failures,
            discovered,
            elapsed: started.elapsed(),
        })
    }
}

/// Crawl `base_url` and write the products to `output_path`.
///
/// The document is only written once the run has succeeded, so an aborted
/// crawl leaves `output_path` as it was. Under [`FailurePolicy::Isolate`] the
/// records that did succeed are written and the failures stay in the report.
pub async fn crawl_to_file(
    orchestrator: &CrawlingOrchestrator,
    base_url: &str,
    output_path: &Path,
) -> Result<CrawlReport, CrawlError> {
    let report = orchestrator.run(base_url).await?;

    write_json_document(output_path, &report.products)?;
    info!(
        "Saved {} products to {}",
        report.products.len(),
        output_path.display()
    );
    Ok(report)
}

async fn run_worker(
    worker_id: usize,
    queue: Arc<Mutex<VecDeque<ProductUrl>>>,
    extractor: Arc<FieldExtractor>,
    results: mpsc::UnboundedSender<Outcome>,
    cancellation_token: CancellationToken,
) {
    debug!("Worker {} started", worker_id);

    loop {
        if cancellation_token.is_cancelled() {
            debug!("Worker {} cancelled", worker_id);
            break;
        }

        let next = queue.lock().await.pop_front();
        let Some(product_url) = next else {
            break;
        };

        let result = tokio::select! {
            _ = cancellation_token.cancelled() => break,
            result = extractor.extract(&product_url) => result,
        };

        if results.send((product_url, result)).is_err() {
            break;
        }
    }

    debug!("Worker {} finished", worker_id);
}
