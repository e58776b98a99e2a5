//! Crawl pipeline
//!
//! The [`PageLister`] walks the catalogue listing pages sequentially, the
//! [`FieldExtractor`] turns one product URL into a record, and the
//! [`CrawlingOrchestrator`] fans the extractor out over a fixed worker pool.

use thiserror::Error;

use crate::infrastructure::{FetchError, OutputError, ParsingError};

pub mod field_extractor;
pub mod orchestrator;
pub mod page_lister;

pub use field_extractor::FieldExtractor;
pub use orchestrator::{crawl_to_file, CrawlReport, CrawlingOrchestrator, FailedProduct, OrchestratorConfig};
pub use page_lister::PageLister;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParsingError,
    },

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Parser setup failed: {0}")]
    ParserSetup(#[from] ParsingError),

    #[error("Worker failed: {0}")]
    Worker(String),

    #[error(transparent)]
    Output(#[from] OutputError),
}
