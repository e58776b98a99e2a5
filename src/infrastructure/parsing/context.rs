//! Parsing context for HTML extraction

use crate::domain::ProductUrl;

/// Context for one listing page
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Listing page number (1-based)
    pub page_id: u32,

    /// URL the page was fetched from, used to resolve relative links
    pub page_url: String,
}

impl ParseContext {
    pub fn new(page_id: u32, page_url: impl Into<String>) -> Self {
        Self {
            page_id,
            page_url: page_url.into(),
        }
    }
}

/// Context for one product detail page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Product URL being parsed, copied into the record
    pub url: String,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl From<&ProductUrl> for DetailParseContext {
    fn from(product_url: &ProductUrl) -> Self {
        Self::new(product_url.url.clone())
    }
}
