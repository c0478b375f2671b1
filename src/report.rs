use serde::Serialize;

use crate::aggregator::{Aggregation, Aggregator, ProgressSink};
use crate::models::{Article, QueryWindow, Sentiment};
use crate::published;

pub const NO_DATA_MESSAGE: &str = "No news articles found. Try a different name or increase days.";

/// Outcome of a full analysis. `NoData` is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    NoData,
    Report(SentimentReport),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleView {
    pub title: String,
    pub link: String,
    pub published: String,
    pub published_display: String,
}

impl From<Article> for ArticleView {
    fn from(article: Article) -> Self {
        let published_display = published::to_display_time(&article.published);
        Self {
            title: article.title,
            link: article.link,
            published: article.published,
            published_display,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSummary {
    pub sentiment: Sentiment,
    pub count: usize,
    pub percentage: f64,
    pub articles: Vec<ArticleView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentReport {
    pub subject: String,
    pub days: u32,
    pub total: usize,
    pub fetched: usize,
    pub buckets: Vec<BucketSummary>,
}

impl SentimentReport {
    pub fn bucket(&self, sentiment: Sentiment) -> Option<&BucketSummary> {
        self.buckets.iter().find(|b| b.sentiment == sentiment)
    }
}

/// Runs the whole pipeline for one window: aggregate, sort, render.
pub async fn analyze(aggregator: &Aggregator, window: &QueryWindow, progress: &dyn ProgressSink) -> Analysis {
    let aggregation = aggregator.aggregate(window, progress).await;
    build_analysis(window, aggregation)
}

pub fn build_analysis(window: &QueryWindow, aggregation: Aggregation) -> Analysis {
    if aggregation.is_empty() {
        return Analysis::NoData;
    }

    let total = aggregation.total();
    let groups = aggregation.groups.sorted();
    let buckets = Sentiment::ALL
        .iter()
        .map(|&sentiment| {
            let articles: Vec<ArticleView> = groups
                .bucket(sentiment)
                .iter()
                .cloned()
                .map(ArticleView::from)
                .collect();
            BucketSummary {
                sentiment,
                count: articles.len(),
                percentage: percentage(articles.len(), total),
                articles,
            }
        })
        .collect();

    Analysis::Report(SentimentReport {
        subject: window.subject().to_string(),
        days: window.days(),
        total,
        fetched: aggregation.fetched,
        buckets,
    })
}

/// Share of `total`, rounded to one decimal place.
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}
