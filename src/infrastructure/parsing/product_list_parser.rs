//! Product list parser
//!
//! Collects product detail links from one catalogue listing page. Only the
//! first results body on the page is inspected; a page without one is the
//! end-of-catalogue signal and yields an empty list.

use super::config::ProductListSelectors;
use super::document::{ElementExt, Lookup};
use super::{compile_selector, ContextualParser, ParseContext, ParsingError, ParsingResult};
use crate::domain::ProductUrl;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Parser for extracting product links from listing pages
#[derive(Debug, Clone)]
pub struct ProductListParser {
    results_body: Selector,
    product_link: Selector,
}

impl ProductListParser {
    /// Create a new product list parser with default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ProductListSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ProductListSelectors) -> ParsingResult<Self> {
        Ok(Self {
            results_body: compile_selector(&selectors.results_body)?,
            product_link: compile_selector(&selectors.product_link)?,
        })
    }

    /// Parse a raw listing page body.
    pub fn parse_html(&self, body: &str, context: &ParseContext) -> ParsingResult<Vec<ProductUrl>> {
        let html = Html::parse_document(body);
        self.parse_with_context(&html, context)
    }

    /// Absolute hrefs are kept verbatim, relative ones are joined onto the page URL.
    fn resolve_href(href: &str, base: Option<&Url>) -> ParsingResult<String> {
        if Url::parse(href).is_ok() {
            return Ok(href.to_string());
        }

        let base = base.ok_or_else(|| ParsingError::UrlResolutionFailed {
            url: href.to_string(),
            reason: "page URL is not absolute".to_string(),
        })?;

        base.join(href)
            .map(String::from)
            .map_err(|e| ParsingError::UrlResolutionFailed {
                url: href.to_string(),
                reason: e.to_string(),
            })
    }
}

impl ContextualParser for ProductListParser {
    type Output = Vec<ProductUrl>;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let Some(results_body) = html.find_first(&self.results_body) else {
            debug!("No results body on page {} ({})", context.page_id, context.page_url);
            return Ok(Vec::new());
        };

        let base = Url::parse(&context.page_url).ok();
        let mut urls = Vec::new();

        for link in results_body.find_all(&self.product_link) {
            let Some(href) = link.attr_value("href") else {
                continue;
            };

            match Self::resolve_href(&href, base.as_ref()) {
                Ok(url) => {
                    let index = urls.len() as u32;
                    urls.push(ProductUrl::new(url, context.page_id, index));
                }
                Err(e) => warn!("Skipping link on page {}: {}", context.page_id, e),
            }
        }

        debug!("Found {} product links on page {}", urls.len(), context.page_id);
        Ok(urls)
    }
}
