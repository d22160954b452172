//! Sequential crawl over the paginated vendor listing.

use tracing::{debug, info, instrument};

use crate::cli::Cli;
use crate::client::PageSource;
use crate::error::ScrapeResult;
use crate::parser::{Provider, VendorDetails, VendorParser};

pub struct Crawler<S: PageSource> {
    source: S,
    parser: VendorParser,
    base_url: String,
}

impl<S: PageSource> Crawler<S> {
    pub fn new(source: S, parser: VendorParser, base_url: impl Into<String>) -> Self {
        Self {
            source,
            parser,
            base_url: base_url.into(),
        }
    }

    /// Visit pages `1..=max_pages`, stopping at the first page with no cards.
    #[instrument(skip(self, cli), fields(max_pages = cli.max_pages))]
    pub async fn crawl(&self, cli: &Cli) -> ScrapeResult<Vec<Provider>> {
        let mut providers = Vec::new();

        for page in 1..=cli.max_pages {
            let html = self.source.fetch(&cli.listing_url(page)).await?;
            if self.parser.count_cards(&html) == 0 {
                info!(page, "Listing page is empty, stopping");
                break;
            }

            for card in self.parser.parse_listing(&html) {
                info!("Scraping provider: {}", card.name);
                let details = match &card.detail_href {
                    Some(href) => self.details(href).await?,
                    None => VendorDetails::default(),
                };
                providers.push(Provider::new(card, details));
            }
        }

        Ok(providers)
    }

    async fn details(&self, href: &str) -> ScrapeResult<VendorDetails> {
        let html = self.source.fetch(&format!("{}{}", self.base_url, href)).await?;
        let details = self.parser.parse_details(&html);
        for image in &details.gallery {
            debug!("Found gallery image: {}", image);
        }
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use async_trait::async_trait;
    use clap::Parser;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const BASE: &str = "http://vendors.test";

    /// Serves canned pages and records every URL requested.
    struct FakeSite {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeSite {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageSource for FakeSite {
        async fn fetch(&self, url: &str) -> ScrapeResult<String> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(self
                .pages
                .get(url)
                .cloned()
                .unwrap_or_else(|| "<html><body></body></html>".to_string()))
        }
    }

    struct BrokenSite;

    #[async_trait]
    impl PageSource for BrokenSite {
        async fn fetch(&self, url: &str) -> ScrapeResult<String> {
            Err(ScrapeError::Status {
                url: url.to_string(),
                status: 503,
            })
        }
    }

    fn card(name: &str, href: &str, phone: Option<&str>) -> String {
        let phone = phone
            .map(|p| {
                format!(r#"<div class="bizExtraDetails"><meta itemprop="telephone" content="{p}"></div>"#)
            })
            .unwrap_or_default();
        format!(
            r#"<a href="{href}"><div class="bizLinkDiv"><div class="bizName"><h3>{name}</h3></div>{phone}</div></a>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body>{}</body></html>", cards.concat())
    }

    fn cli(max_pages: &str) -> Cli {
        Cli::parse_from([
            "vendor-scraper",
            "--base-url",
            BASE,
            "--category-path",
            "/list?page=",
            "--max-pages",
            max_pages,
        ])
    }

    #[tokio::test]
    async fn test_crawl_stops_at_empty_page() {
        let page1 = page(&[
            card("Or", "/biz/or", Some("050-1")),
            card("Mute", "/biz/mute", None),
        ]);
        let page2 = page(&[card("Lens", "/biz/lens", Some("050-2"))]);
        let details = r#"<div class="prettyParagraph"><p class="bizDescriptionText">Best light</p></div>"#;
        let site = FakeSite::new(&[
            ("http://vendors.test/list?page=1", page1.as_str()),
            ("http://vendors.test/list?page=2", page2.as_str()),
            ("http://vendors.test/biz/or", details),
        ]);

        let crawler = Crawler::new(site, VendorParser::new().unwrap(), BASE);
        let providers = crawler.crawl(&cli("15")).await.unwrap();

        let names: Vec<_> = providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Or", "Lens"]);
        assert_eq!(providers[0].description, "Best light");
        assert_eq!(providers[1].description, "");

        let requested = crawler.source.requested.lock().unwrap().clone();
        assert_eq!(
            requested,
            vec![
                "http://vendors.test/list?page=1",
                "http://vendors.test/biz/or",
                "http://vendors.test/list?page=2",
                "http://vendors.test/biz/lens",
                "http://vendors.test/list?page=3",
            ]
        );
    }

    #[tokio::test]
    async fn test_crawl_honours_max_pages() {
        let listing = page(&[card("Or", "/biz/or", Some("050-1"))]);
        let site = FakeSite::new(&[
            ("http://vendors.test/list?page=1", listing.as_str()),
            ("http://vendors.test/list?page=2", listing.as_str()),
        ]);

        let crawler = Crawler::new(site, VendorParser::new().unwrap(), BASE);
        let providers = crawler.crawl(&cli("1")).await.unwrap();

        assert_eq!(providers.len(), 1);
        let requested = crawler.source.requested.lock().unwrap();
        assert!(!requested.iter().any(|u| u.ends_with("page=2")));
    }

    #[tokio::test]
    async fn test_page_where_no_card_has_a_phone_does_not_stop_the_crawl() {
        let silent = page(&[card("Mute", "/biz/mute", None)]);
        let listed = page(&[card("Lens", "/biz/lens", Some("050-2"))]);
        let site = FakeSite::new(&[
            ("http://vendors.test/list?page=1", silent.as_str()),
            ("http://vendors.test/list?page=2", listed.as_str()),
        ]);

        let crawler = Crawler::new(site, VendorParser::new().unwrap(), BASE);
        let providers = crawler.crawl(&cli("5")).await.unwrap();

        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].name, "Lens");
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_the_run() {
        let crawler = Crawler::new(BrokenSite, VendorParser::new().unwrap(), BASE);
        let err = crawler.crawl(&cli("3")).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Status { status: 503, .. }));
        assert!(err.to_string().contains("page=1"));
    }
}
