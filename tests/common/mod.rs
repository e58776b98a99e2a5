//! Offline catalogue served from memory

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use catalog_crawler::infrastructure::{FetchError, FetchedPage, PageFetcher};

pub const BASE_URL: &str = "https://catalogue.test/product-category/fatty-acids/";

#[derive(Default)]
pub struct MockCatalogue {
    pages: HashMap<String, String>,
    broken: Vec<String>,
    requests: Mutex<Vec<String>>,
}

impl MockCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listing page `n` under [`BASE_URL`] linking to `hrefs`
    pub fn listing(mut self, n: u32, hrefs: &[&str]) -> Self {
        let rows: String = hrefs
            .iter()
            .map(|href| format!(r#"<tr><td><a href="{href}">View</a></td></tr>"#))
            .collect();
        self.pages.insert(
            format!("{BASE_URL}page/{n}/"),
            format!("<html><body><table><tbody>{rows}</tbody></table></body></html>"),
        );
        self
    }

    pub fn product(mut self, url: &str, sku: &str, name: &str, quantities: &[(&str, &str)]) -> Self {
        let rows: String = quantities
            .iter()
            .map(|(quantity, price)| format!("<tr><td>{sku}</td><td>{quantity}</td><td>{price}</td></tr>"))
            .collect();
        self.pages.insert(
            url.to_string(),
            format!(
                r#"<html><body>
                <div class="product type-product"><h1>{name}</h1><span class="sku">{sku}</span></div>
                <div class="product-prop"><span>CAS number: </span>57-10-3</div>
                <div class="product-prop product-prop-synonyms">Synonyms: Palmitic acid, Hexadecanoic acid</div>
                <div class="product-prop"><span>Molecular weight: </span>256.42</div>
                <table class="product-variations-table"><tbody>{rows}</tbody></table>
                <div class="product-prop-wrap"><span class="prop-label">Smiles: </span>CCCCCCCCCCCCCCCC(=O)O</div>
                </body></html>"#
            ),
        );
        self
    }

    /// Answer `url` with a connection failure
    pub fn broken(mut self, url: &str) -> Self {
        self.broken.push(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockCatalogue {
    async fn get(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        if self.broken.iter().any(|broken| broken == url) {
            return Err(FetchError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }

        Ok(match self.pages.get(url) {
            Some(body) => FetchedPage::new(url, 200, body.as_str()),
            None => FetchedPage::new(url, 404, "<html><body>Not found</body></html>"),
        })
    }
}
