use async_trait::async_trait;
use std::time::Duration;

use crate::error::{ScrapeError, ScrapeResult};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; VendorScraper/1.0)";

/// Source of raw HTML pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> ScrapeResult<String>;
}

/// Plain HTTP fetcher. No retries: a failed page aborts the run.
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new() -> ScrapeResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|source| ScrapeError::Fetch {
                url: "client initialization".to_string(),
                source,
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> ScrapeResult<String> {
        let with_url = |source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(with_url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(with_url)
    }
}
