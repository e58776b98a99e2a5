//! Catalogue crawler
//!
//! Walks the paginated listing of a product catalogue, extracts a structured
//! record from every product page with a bounded worker pool, and writes the
//! collection as one JSON document.

pub mod cli;
pub mod crawling;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub mod test_utils;

pub use crawling::{CrawlError, CrawlReport, CrawlingOrchestrator, OrchestratorConfig};
pub use domain::{Packaging, ProductDataSet, ProductRecord, ProductUrl};
