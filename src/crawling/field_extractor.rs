//! One product URL in, one record out

use std::sync::Arc;

use tracing::debug;

use super::CrawlError;
use crate::domain::{ProductRecord, ProductUrl};
use crate::infrastructure::parsing::{DetailParseContext, ProductDetailParser};
use crate::infrastructure::PageFetcher;

pub struct FieldExtractor {
    fetcher: Arc<dyn PageFetcher>,
    parser: ProductDetailParser,
}

impl FieldExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>, parser: ProductDetailParser) -> Self {
        Self { fetcher, parser }
    }

    /// Fetch and parse one product page.
    ///
    /// Fails on transport errors, non-2xx responses, and pages without a
    /// product container, name or SKU.
    pub async fn extract(&self, product_url: &ProductUrl) -> Result<ProductRecord, CrawlError> {
        let page = self.fetcher.get(&product_url.url).await?.error_for_status()?;

        // the parsed document is not Send, keep it out of the async state
        let record = self
            .parser
            .parse_html(&page.body, &DetailParseContext::from(product_url))
            .map_err(|source| CrawlError::Parse {
                url: product_url.url.clone(),
                source,
            })?;

        debug!("Extracted {} from {}", record.id, product_url);
        Ok(record)
    }
}
