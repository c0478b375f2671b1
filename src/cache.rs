//! Time-boxed memoization of feed searches.
//!
//! Entries are keyed by `(query, days)` and expire after a fixed TTL. Only
//! successful fetches are stored.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

use crate::error::Result;
use crate::feed::FeedSource;
use crate::models::Article;

pub const DEFAULT_TTL_SECS: i64 = 30 * 60;

type CacheKey = (String, u32);

#[derive(Debug, Clone)]
struct CacheEntry {
    articles: Vec<Article>,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

pub struct CachedFeed<S> {
    inner: S,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl<S: FeedSource> CachedFeed<S> {
    pub fn new(inner: S, ttl: std::time::Duration) -> Self {
        let ttl = Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(DEFAULT_TTL_SECS));
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn with_default_ttl(inner: S) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(DEFAULT_TTL_SECS),
        }
    }

    /// Live entries only.
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries.read().values().filter(|e| !e.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &CacheKey) -> Option<Vec<Article>> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| !entry.is_expired(Utc::now()))
            .map(|entry| entry.articles.clone())
    }

    fn store(&self, key: CacheKey, articles: Vec<Article>) {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut entries = self.entries.write();
        entries.retain(|_, entry| !entry.is_expired(now));
        entries.insert(
            key,
            CacheEntry {
                articles,
                expires_at,
            },
        );
    }
}

#[async_trait]
impl<S: FeedSource> FeedSource for CachedFeed<S> {
    async fn fetch(&self, query: &str, days: u32) -> Result<Vec<Article>> {
        let key = (query.to_string(), days);
        if let Some(articles) = self.lookup(&key) {
            debug!(query, days, "feed cache hit");
            return Ok(articles);
        }

        let articles = self.inner.fetch(query, days).await?;
        self.store(key, articles.clone());
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingFeed {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl FeedSource for CountingFeed {
        async fn fetch(&self, query: &str, days: u32) -> Result<Vec<Article>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::FetchError("connection refused".to_string()));
            }
            Ok(vec![Article::new(
                format!("{} {} #{}", query, days, n),
                "https://news.example.com",
                "N/A",
            )])
        }
    }

    #[tokio::test]
    async fn repeated_fetch_is_served_from_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CachedFeed::with_default_ttl(CountingFeed { calls: calls.clone(), fail: false });

        let first = cache.fetch("Tesla news", 7).await.unwrap();
        let second = cache.fetch("Tesla news", 7).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn key_includes_days() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CachedFeed::with_default_ttl(CountingFeed { calls: calls.clone(), fail: false });

        cache.fetch("Tesla news", 7).await.unwrap();
        cache.fetch("Tesla news", 14).await.unwrap();
        cache.fetch("Tesla price", 7).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn expired_entries_are_refetched() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CachedFeed::new(
            CountingFeed { calls: calls.clone(), fail: false },
            std::time::Duration::ZERO,
        );

        let first = cache.fetch("Tesla news", 7).await.unwrap();
        let second = cache.fetch("Tesla news", 7).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn oversized_ttl_saturates_instead_of_overflowing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CachedFeed::new(
            CountingFeed { calls: calls.clone(), fail: false },
            std::time::Duration::from_secs(9_000_000_000_000),
        );

        let first = cache.fetch("Tesla news", 7).await.unwrap();
        let second = cache.fetch("Tesla news", 7).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = CachedFeed::with_default_ttl(CountingFeed { calls: calls.clone(), fail: true });

        assert!(cache.fetch("Tesla news", 7).await.is_err());
        assert!(cache.fetch("Tesla news", 7).await.is_err());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }
}
