//! HTTP client for listing and product page fetches
//!
//! The crawler only needs `GET url -> (status, body)`. Retry, backoff and
//! rate limiting belong in a wrapper around [`PageFetcher`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use thiserror::Error;
use tracing::debug;

use crate::infrastructure::config::CrawlingConfig;

/// Failures of the fetch transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to create HTTP client: {0}")]
    ClientSetup(String),
}

/// Raw page as returned by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx page into [`FetchError::HttpStatus`].
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::HttpStatus {
                url: self.url,
                status: self.status,
            })
        }
    }
}

/// Transport seam used by the lister and the field extractor
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issue a GET and return the status with the decoded body.
    ///
    /// Only transport failures are errors here; status interpretation is left
    /// to the caller.
    async fn get(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Configuration for the reqwest-backed client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub user_agent: String,
    /// `None` waits indefinitely
    pub timeout: Option<Duration>,
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    pub fn from_crawling_config(crawling: &CrawlingConfig) -> Self {
        Self {
            user_agent: crawling.user_agent.clone(),
            timeout: (crawling.request_timeout_seconds > 0)
                .then(|| Duration::from_secs(crawling.request_timeout_seconds)),
            follow_redirects: true,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_crawling_config(&CrawlingConfig::default())
    }
}

/// [`PageFetcher`] over a shared reqwest connection pool
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn with_config(config: HttpClientConfig) -> Result<Self, FetchError> {
        let mut builder = ClientBuilder::new()
            .user_agent(&config.user_agent)
            .gzip(true)
            .brotli(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            });
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::ClientSetup(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn get(&self, url: &str) -> Result<FetchedPage, FetchError> {
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: format!("Failed to read response body: {e}"),
        })?;

        debug!("Fetched {} ({}, {} chars)", url, status, body.len());
        Ok(FetchedPage::new(url, status, body))
    }
}
