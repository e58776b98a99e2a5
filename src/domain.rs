//! Domain module - crawl entities
//!
//! Product URLs discovered on listing pages and the structured records
//! extracted from product detail pages.

pub mod product;
pub mod product_url;

pub use product::{Packaging, ProductDataSet, ProductRecord};
pub use product_url::ProductUrl;
