//! Listing page walk
//!
//! Fetches `{base}page/1/`, `{base}page/2/`, ... one after another and stops
//! at the first page that yields no product links. Page `n + 1` is only
//! requested once page `n` has been parsed.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use super::CrawlError;
use crate::domain::ProductUrl;
use crate::infrastructure::parsing::{ParseContext, ProductListParser};
use crate::infrastructure::PageFetcher;

pub struct PageLister {
    fetcher: Arc<dyn PageFetcher>,
    parser: ProductListParser,
}

impl PageLister {
    pub fn new(fetcher: Arc<dyn PageFetcher>, parser: ProductListParser) -> Self {
        Self { fetcher, parser }
    }

    /// Every product URL in the catalogue, in page order and then document
    /// order within a page. Duplicates are kept.
    ///
    /// A malformed listing page counts as empty and ends the walk; a fetch
    /// failure is returned as an error.
    pub async fn list_product_urls(&self, base_url: &str) -> Result<Vec<ProductUrl>, CrawlError> {
        let base = normalize_base_url(base_url)?;
        let mut product_urls = Vec::new();
        let mut page_id: u32 = 1;

        loop {
            let page_url = listing_page_url(&base, page_id)?;
            let page = self.fetcher.get(&page_url).await?;
            if !page.is_success() {
                debug!("Listing page {} returned status {}", page_url, page.status);
            }

            let links = self.parse_page(&page.body, ParseContext::new(page_id, page_url));
            if links.is_empty() {
                debug!("Listing page {} is empty, stopping", page_id);
                break;
            }

            product_urls.extend(links);
            page_id += 1;
        }

        info!(
            "Collected {} product URLs from {} listing pages",
            product_urls.len(),
            page_id - 1
        );
        Ok(product_urls)
    }

    fn parse_page(&self, body: &str, context: ParseContext) -> Vec<ProductUrl> {
        match self.parser.parse_html(body, &context) {
            Ok(links) => links,
            Err(e) => {
                warn!("Treating listing page {} as empty: {}", context.page_url, e);
                Vec::new()
            }
        }
    }
}

/// Parse the catalogue base URL and make sure its path ends with `/`, so
/// `page/{n}/` is appended rather than replacing the last segment.
pub fn normalize_base_url(base_url: &str) -> Result<Url, CrawlError> {
    let invalid = |reason: String| CrawlError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be a base".to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

pub fn listing_page_url(base: &Url, page_id: u32) -> Result<String, CrawlError> {
    base.join(&format!("page/{page_id}/"))
        .map(String::from)
        .map_err(|e| CrawlError::InvalidBaseUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::FetchError;
    use crate::test_utils::{listing_page, StaticFetcher};
    use proptest::prelude::*;

    const BASE: &str = "https://shop.test/product-category/lipids/";

    fn lister(fetcher: Arc<StaticFetcher>) -> PageLister {
        PageLister::new(fetcher, ProductListParser::new().unwrap())
    }

    fn page_url(n: u32) -> String {
        format!("{BASE}page/{n}/")
    }

    #[test]
    fn test_normalize_base_url_appends_slash() {
        let url = normalize_base_url("https://shop.test/product-category/lipids").unwrap();
        assert_eq!(listing_page_url(&url, 3).unwrap(), "https://shop.test/product-category/lipids/page/3/");
    }

    #[test]
    fn test_normalize_base_url_rejects_relative() {
        let result = normalize_base_url("product-category/lipids/");
        assert!(matches!(result, Err(CrawlError::InvalidBaseUrl { .. })));
    }

    #[tokio::test]
    async fn test_walk_stops_at_first_empty_page() {
        let fetcher = Arc::new(
            StaticFetcher::new()
                .with_page(&page_url(1), &listing_page(&["https://shop.test/product/a/", "https://shop.test/product/b/"]))
                .with_page(&page_url(2), &listing_page(&["https://shop.test/product/c/"]))
                .with_page(&page_url(3), &listing_page(&[]))
                .with_page(&page_url(4), &listing_page(&["https://shop.test/product/unreached/"])),
        );

        let urls = lister(Arc::clone(&fetcher)).list_product_urls(BASE).await.unwrap();

        let positions: Vec<_> = urls.iter().map(|u| (u.url.as_str(), u.position())).collect();
        assert_eq!(
            positions,
            vec![
                ("https://shop.test/product/a/", (1, 0)),
                ("https://shop.test/product/b/", (1, 1)),
                ("https://shop.test/product/c/", (2, 0)),
            ]
        );
        assert_eq!(fetcher.requests(), vec![page_url(1), page_url(2), page_url(3)]);
    }

    #[tokio::test]
    async fn test_empty_catalogue_issues_one_fetch() {
        let fetcher = Arc::new(StaticFetcher::new().with_page(&page_url(1), &listing_page(&[])));
        let urls = lister(Arc::clone(&fetcher)).list_product_urls(BASE).await.unwrap();

        assert!(urls.is_empty());
        assert_eq!(fetcher.request_count(), 1);
    }

    #[tokio::test]
    async fn test_not_found_page_ends_walk() {
        // StaticFetcher answers unknown URLs with 404 and an error page
        let fetcher = Arc::new(
            StaticFetcher::new().with_page(&page_url(1), &listing_page(&["https://shop.test/product/a/"])),
        );
        let urls = lister(Arc::clone(&fetcher)).list_product_urls(BASE).await.unwrap();

        assert_eq!(urls.len(), 1);
        assert_eq!(fetcher.request_count(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_links_are_kept() {
        let fetcher = Arc::new(
            StaticFetcher::new()
                .with_page(&page_url(1), &listing_page(&["https://shop.test/product/a/"]))
                .with_page(&page_url(2), &listing_page(&["https://shop.test/product/a/"])),
        );
        let urls = lister(fetcher).list_product_urls(BASE).await.unwrap();
        assert_eq!(urls.len(), 2);
    }

    #[tokio::test]
    async fn test_network_error_propagates() {
        let fetcher = Arc::new(
            StaticFetcher::new()
                .with_page(&page_url(1), &listing_page(&["https://shop.test/product/a/"]))
                .with_network_error(&page_url(2)),
        );
        let result = lister(fetcher).list_product_urls(BASE).await;
        assert!(matches!(result, Err(CrawlError::Fetch(FetchError::Network { .. }))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_walk_concatenates_pages(page_sizes in prop::collection::vec(1usize..5, 0..6)) {
            let mut fetcher = StaticFetcher::new();
            let mut expected = Vec::new();

            for (i, size) in page_sizes.iter().enumerate() {
                let page_id = i as u32 + 1;
                let links: Vec<String> = (0..*size)
                    .map(|j| format!("https://shop.test/product/{page_id}-{j}/"))
                    .collect();
                let refs: Vec<&str> = links.iter().map(String::as_str).collect();
                fetcher = fetcher.with_page(&page_url(page_id), &listing_page(&refs));
                expected.extend(links);
            }
            let k = page_sizes.len();
            fetcher = fetcher.with_page(&page_url(k as u32 + 1), &listing_page(&[]));

            let fetcher = Arc::new(fetcher);
            let urls = tokio_test::block_on(lister(Arc::clone(&fetcher)).list_product_urls(BASE)).unwrap();

            let collected: Vec<String> = urls.into_iter().map(String::from).collect();
            prop_assert_eq!(collected, expected);
            prop_assert_eq!(fetcher.request_count(), k + 1);
        }
    }
}
