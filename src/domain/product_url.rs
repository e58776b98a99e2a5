use serde::{Deserialize, Serialize};
use std::fmt;

/// Product detail page URL together with where it was discovered.
///
/// The position lets the orchestrator restore listing order after a
/// concurrent detail crawl. Identity is the URL string only; the same URL may
/// appear more than once if the site links it twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUrl {
    /// Product detail page URL
    pub url: String,
    /// Listing page number this link was found on (1-based)
    pub page_id: u32,
    /// Position within that listing page (0-based, document order)
    pub index_in_page: u32,
}

impl ProductUrl {
    pub fn new(url: impl Into<String>, page_id: u32, index_in_page: u32) -> Self {
        Self {
            url: url.into(),
            page_id,
            index_in_page,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Sort key reproducing discovery order: page order, then document order.
    pub fn position(&self) -> (u32, u32) {
        (self.page_id, self.index_in_page)
    }
}

impl From<ProductUrl> for String {
    fn from(product_url: ProductUrl) -> Self {
        product_url.url
    }
}

impl AsRef<str> for ProductUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ProductUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (page: {}, index: {})",
            self.url, self.page_id, self.index_in_page
        )
    }
}
