//! HTML parsing infrastructure
//!
//! Trait-based parsers for catalogue listing pages and product detail pages,
//! built on `scraper` with selectors and labels taken from [`ParsingConfig`].

pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod product_detail_parser;
pub mod product_list_parser;
pub mod quantity;

// Re-export public types
pub use config::ParsingConfig;
pub use context::{DetailParseContext, ParseContext};
pub use document::{ElementExt, Lookup};
pub use error::{ParsingError, ParsingResult};
pub use product_detail_parser::ProductDetailParser;
pub use product_list_parser::ProductListParser;
pub use quantity::{QuantityMatcher, QUANTITY_UNITS};

use scraper::{Html, Selector};

/// Parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}

/// Compile one CSS selector, mapping failures to [`ParsingError::InvalidSelector`].
pub(crate) fn compile_selector(css: &str) -> ParsingResult<Selector> {
    Selector::parse(css).map_err(|e| ParsingError::invalid_selector(css, &e.to_string()))
}
