use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Article, MISSING_PUBLISHED};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; NewsSentiment/0.1)";

/// Anything that can answer a headline search for a recency window.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, query: &str, days: u32) -> Result<Vec<Article>>;
}

/// Google News RSS search.
pub struct GoogleNewsFeed {
    client: Client,
    base_url: String,
}

impl GoogleNewsFeed {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.feed_base_url.clone(), config.fetch_timeout)
    }

    pub fn search_url(&self, query: &str, days: u32) -> String {
        build_search_url(&self.base_url, query, days)
    }
}

#[async_trait]
impl FeedSource for GoogleNewsFeed {
    async fn fetch(&self, query: &str, days: u32) -> Result<Vec<Article>> {
        let url = self.search_url(query, days);
        debug!(%url, "fetching feed");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::FetchError(format!("Feed returned status {}", status)));
        }

        let body = response.bytes().await?;
        parse_feed(&body)
    }
}

/// `<base>?q=<query when:Nd>` with the whole expression URL-encoded.
pub fn build_search_url(base_url: &str, query: &str, days: u32) -> String {
    let expression = format!("{} when:{}d", query, days);
    format!("{}?q={}", base_url, urlencoding::encode(&expression))
}

/// Reads an RSS document into articles, one per `<item>`.
pub fn parse_feed(body: &[u8]) -> Result<Vec<Article>> {
    let channel = rss::Channel::read_from(body)?;

    Ok(channel
        .items()
        .iter()
        .map(|item| {
            Article::new(
                item.title().unwrap_or_default(),
                item.link().unwrap_or_default(),
                item.pub_date().unwrap_or(MISSING_PUBLISHED),
            )
        })
        .collect())
}
