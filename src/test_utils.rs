//! Test utilities
//!
//! An in-memory [`PageFetcher`] and HTML fixture builders shaped like the
//! catalogue's listing and product pages.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::infrastructure::{FetchError, FetchedPage, PageFetcher};

/// Serves canned pages and records every requested URL.
///
/// Unknown URLs get a 404 with a body that has no results table.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, (u16, String)>,
    network_errors: HashSet<String>,
    delay: Option<Duration>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, body: &str) -> Self {
        self.with_status(url, 200, body)
    }

    pub fn with_status(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages.insert(url.to_string(), (status, body.to_string()));
        self
    }

    pub fn with_network_error(mut self, url: &str) -> Self {
        self.network_errors.insert(url.to_string());
        self
    }

    /// Hold every response for `delay`, so requests overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Highest number of requests that were being served at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn get(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.network_errors.contains(url) {
            return Err(FetchError::Network {
                url: url.to_string(),
                message: "connection reset".to_string(),
            });
        }

        Ok(match self.pages.get(url) {
            Some((status, body)) => FetchedPage::new(url, *status, body.as_str()),
            None => FetchedPage::new(url, 404, "<html><body><h1>Page not found</h1></body></html>"),
        })
    }
}

/// Listing page with one results row per link; no links gives a page
/// without a results table.
pub fn listing_page(links: &[&str]) -> String {
    if links.is_empty() {
        return "<html><body><p>No products were found matching your selection.</p></body></html>".to_string();
    }

    let rows: String = links
        .iter()
        .map(|href| format!(r#"<tr><td><a href="{href}">Product</a></td><td>In stock</td></tr>"#))
        .collect();
    format!(r#"<html><body><table class="products"><tbody>{rows}</tbody></table></body></html>"#)
}

/// Product detail page fixture. Only the fields that are set get markup.
#[derive(Debug, Clone, Default)]
pub struct ProductPageBuilder {
    containers: Vec<(String, String)>,
    cas: Option<String>,
    synonyms: Option<String>,
    molecular_weight: Option<String>,
    packaging_rows: Vec<String>,
    image: Option<String>,
    smiles: Option<String>,
    description: Option<String>,
    safety_sheet: Option<String>,
}

impl ProductPageBuilder {
    pub fn new(name: &str, sku: &str) -> Self {
        Self {
            containers: vec![(name.to_string(), sku.to_string())],
            ..Self::default()
        }
    }

    /// Another product container after the existing ones
    pub fn extra_container(mut self, name: &str, sku: &str) -> Self {
        self.containers.push((name.to_string(), sku.to_string()));
        self
    }

    pub fn cas(mut self, value: &str) -> Self {
        self.cas = Some(value.to_string());
        self
    }

    /// Full block text, label included
    pub fn synonyms(mut self, text: &str) -> Self {
        self.synonyms = Some(text.to_string());
        self
    }

    pub fn molecular_weight(mut self, value: &str) -> Self {
        self.molecular_weight = Some(value.to_string());
        self
    }

    pub fn packaging_row(self, label: &str, quantity: &str, price: &str) -> Self {
        self.raw_packaging_row(&format!("<td>{label}</td><td>{quantity}</td><td>{price}</td>"))
    }

    /// Row with arbitrary cell markup
    pub fn raw_packaging_row(mut self, cells: &str) -> Self {
        self.packaging_rows.push(format!("<tr>{cells}</tr>"));
        self
    }

    pub fn image(mut self, src: &str) -> Self {
        self.image = Some(src.to_string());
        self
    }

    pub fn smiles(mut self, value: &str) -> Self {
        self.smiles = Some(value.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn safety_sheet(mut self, href: &str) -> Self {
        self.safety_sheet = Some(href.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut html = String::from("<html><body>");

        for (name, sku) in &self.containers {
            html.push_str(&format!(
                r#"<div class="product type-product"><h1>{name}</h1><div class="product_meta">SKU: <span class="sku">{sku}</span></div></div>"#
            ));
        }

        html.push_str(r#"<div class="product-props">"#);
        if let Some(cas) = &self.cas {
            html.push_str(&format!(r#"<div class="product-prop"><span>CAS number: </span>{cas}</div>"#));
        }
        if let Some(synonyms) = &self.synonyms {
            html.push_str(&format!(r#"<div class="product-prop product-prop-synonyms">{synonyms}</div>"#));
        }
        if let Some(weight) = &self.molecular_weight {
            html.push_str(&format!(r#"<div class="product-prop"><span>Molecular weight: </span>{weight}</div>"#));
        }
        html.push_str("</div>");

        if let Some(src) = &self.image {
            html.push_str(&format!(r#"<div class="prod-structure"><img src="{src}" alt="structure"></div>"#));
        }
        if let Some(smiles) = &self.smiles {
            html.push_str(&format!(
                r#"<div class="product-prop-wrap"><span class="prop-label">Smiles: </span>{smiles}</div>"#
            ));
        }
        if let Some(description) = &self.description {
            html.push_str(&format!(r#"<div class="product-description"><p>{description}</p></div>"#));
        }
        if !self.packaging_rows.is_empty() {
            html.push_str(&format!(
                r#"<table class="product-variations-table"><tbody>{}</tbody></table>"#,
                self.packaging_rows.concat()
            ));
        }
        if let Some(href) = &self.safety_sheet {
            html.push_str(&format!(r#"<p>Safety data sheet: <a href="{href}">Download</a></p>"#));
        }

        html.push_str("</body></html>");
        html
    }
}
