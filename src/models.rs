use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, Result};

/// Placeholder stored in `published` when a feed item carries no date.
pub const MISSING_PUBLISHED: &str = "N/A";

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 30;
pub const DEFAULT_DAYS: u32 = 7;

/// A single headline as returned by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub published: String,
}

impl Article {
    pub fn new(title: impl Into<String>, link: impl Into<String>, published: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published: published.into(),
        }
    }

    /// Identity used for deduplication.
    pub fn key(&self) -> (&str, &str) {
        (&self.title, &self.link)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated search parameters: a trimmed, non-empty subject and a day range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWindow {
    subject: String,
    days: u32,
}

impl QueryWindow {
    pub fn new(subject: &str, days: u32) -> Result<Self> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(AppError::InvalidInput("Please enter a stock or company name".to_string()));
        }
        if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
            return Err(AppError::InvalidInput(format!(
                "days must be between {} and {}, got {}",
                MIN_DAYS, MAX_DAYS, days
            )));
        }

        Ok(Self {
            subject: subject.to_string(),
            days,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn days(&self) -> u32 {
        self.days
    }
}
