//! Multi-query headline aggregation.
//!
//! One subject expands into a fixed set of search variants. Results are
//! merged in variant order, deduplicated on `(title, link)` with the first
//! occurrence kept, then classified into sentiment buckets.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::feed::FeedSource;
use crate::models::{Article, QueryWindow, Sentiment};
use crate::published;
use crate::sentiment::Classifier;

pub const QUERY_SUFFIXES: [&str; 6] = ["market", "price", "news", "trends", "analysis", "forecast"];

/// Emitted while an aggregation runs so a front end can show progress.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Fetching { query: String, index: usize, total: usize },
    Fetched { query: String, fetched: usize, added: usize },
    FetchFailed { query: String, reason: String },
    Classifying { articles: usize },
    Finished { total: usize },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Discards every event.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Writes events to the log.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Fetching { query, index, total } => {
                info!("Fetching ({}/{}): {}", index + 1, total, query)
            }
            ProgressEvent::Fetched { query, fetched, added } => {
                info!(%query, fetched, added, "feed merged")
            }
            ProgressEvent::FetchFailed { query, reason } => {
                debug!(%query, %reason, "feed skipped")
            }
            ProgressEvent::Classifying { articles } => info!("Analyzing sentiment of {} articles", articles),
            ProgressEvent::Finished { total } => info!(total, "aggregation finished"),
        }
    }
}

/// Articles partitioned by sentiment. Each article lives in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedArticles {
    pub positive: Vec<Article>,
    pub neutral: Vec<Article>,
    pub negative: Vec<Article>,
}

impl GroupedArticles {
    pub fn push(&mut self, sentiment: Sentiment, article: Article) {
        self.bucket_mut(sentiment).push(article);
    }

    pub fn bucket(&self, sentiment: Sentiment) -> &[Article] {
        match sentiment {
            Sentiment::Positive => &self.positive,
            Sentiment::Neutral => &self.neutral,
            Sentiment::Negative => &self.negative,
        }
    }

    fn bucket_mut(&mut self, sentiment: Sentiment) -> &mut Vec<Article> {
        match sentiment {
            Sentiment::Positive => &mut self.positive,
            Sentiment::Neutral => &mut self.neutral,
            Sentiment::Negative => &mut self.negative,
        }
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        self.bucket(sentiment).len()
    }

    pub fn total(&self) -> usize {
        self.positive.len() + self.neutral.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Sorts every bucket newest first.
    pub fn sorted(self) -> Self {
        Self {
            positive: sort_bucket(self.positive),
            neutral: sort_bucket(self.neutral),
            negative: sort_bucket(self.negative),
        }
    }
}

/// Result of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub groups: GroupedArticles,
    /// Articles received across all variants, duplicates included.
    pub fetched: usize,
}

impl Aggregation {
    pub fn total(&self) -> usize {
        self.groups.total()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Clone)]
pub struct Aggregator {
    source: Arc<dyn FeedSource>,
    classifier: Classifier,
}

impl Aggregator {
    pub fn new(source: Arc<dyn FeedSource>, classifier: Classifier) -> Self {
        Self { source, classifier }
    }

    pub async fn aggregate(&self, window: &QueryWindow, progress: &dyn ProgressSink) -> Aggregation {
        let queries = query_variants(window.subject());
        let total_queries = queries.len();

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut merged: Vec<Article> = Vec::new();
        let mut fetched = 0;

        for (index, query) in queries.into_iter().enumerate() {
            progress.emit(ProgressEvent::Fetching {
                query: query.clone(),
                index,
                total: total_queries,
            });

            let articles = match self.source.fetch(&query, window.days()).await {
                Ok(articles) => articles,
                Err(err) => {
                    warn!(%query, error = %err, "fetch failed, continuing with remaining queries");
                    progress.emit(ProgressEvent::FetchFailed {
                        query,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let received = articles.len();
            fetched += received;
            let added = merge_unique(&mut seen, &mut merged, articles);
            progress.emit(ProgressEvent::Fetched {
                query,
                fetched: received,
                added,
            });
        }

        progress.emit(ProgressEvent::Classifying { articles: merged.len() });
        let groups = self.classify_all(merged);
        progress.emit(ProgressEvent::Finished { total: groups.total() });

        Aggregation { groups, fetched }
    }

    pub fn classify_all(&self, articles: Vec<Article>) -> GroupedArticles {
        let mut groups = GroupedArticles::default();
        for article in articles {
            let sentiment = self.classifier.classify(&article.title);
            groups.push(sentiment, article);
        }
        groups
    }
}

pub fn query_variants(subject: &str) -> Vec<String> {
    QUERY_SUFFIXES
        .iter()
        .map(|suffix| format!("{} {}", subject, suffix))
        .collect()
}

/// Appends articles whose `(title, link)` has not been seen yet. Returns how many were added.
pub fn merge_unique(
    seen: &mut HashSet<(String, String)>,
    merged: &mut Vec<Article>,
    articles: Vec<Article>,
) -> usize {
    let before = merged.len();
    for article in articles {
        let (title, link) = article.key();
        if seen.insert((title.to_string(), link.to_string())) {
            merged.push(article);
        }
    }
    merged.len() - before
}

/// Newest first. Unparseable dates sink to the end; ties keep their input order.
pub fn sort_bucket(articles: Vec<Article>) -> Vec<Article> {
    let mut keyed: Vec<_> = articles
        .into_iter()
        .map(|article| (published::sort_key(&article.published), article))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| b.cmp(a));
    keyed.into_iter().map(|(_, article)| article).collect()
}
