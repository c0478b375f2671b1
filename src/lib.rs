pub mod aggregator;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod published;
pub mod report;
pub mod sentiment;

use std::sync::Arc;
use aggregator::Aggregator;
use cache::CachedFeed;
use config::Config;
use error::Result;
use feed::GoogleNewsFeed;
use sentiment::Classifier;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub aggregator: Arc<Aggregator>,
}

impl AppState {
    pub fn new(config: Config, aggregator: Aggregator) -> Self {
        Self {
            config: Arc::new(config),
            aggregator: Arc::new(aggregator),
        }
    }

    /// Google News behind the fetch cache, scored with VADER.
    pub fn from_config(config: Config) -> Result<Self> {
        let feed = CachedFeed::new(GoogleNewsFeed::from_config(&config)?, config.cache_ttl);
        let aggregator = Aggregator::new(Arc::new(feed), Classifier::vader());
        Ok(Self::new(config, aggregator))
    }
}
