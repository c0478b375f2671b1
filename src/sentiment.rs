//! Headline polarity scoring and labelling.

use once_cell::sync::Lazy;
use std::sync::Arc;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::models::Sentiment;

pub const POSITIVE_THRESHOLD: f64 = 0.05;
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

// Lexicon tables are loaded once per process.
static ANALYZER: Lazy<SentimentIntensityAnalyzer<'static>> = Lazy::new(SentimentIntensityAnalyzer::new);

/// Maps text to a compound polarity score in `[-1.0, 1.0]`.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

/// VADER compound score.
#[derive(Debug, Default, Clone, Copy)]
pub struct VaderScorer;

impl SentimentScorer for VaderScorer {
    fn score(&self, text: &str) -> f64 {
        ANALYZER.polarity_scores(text)["compound"]
    }
}

pub fn label_for_score(score: f64) -> Sentiment {
    if score >= POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if score <= NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[derive(Clone)]
pub struct Classifier {
    scorer: Arc<dyn SentimentScorer>,
}

impl Classifier {
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }

    pub fn vader() -> Self {
        Self::new(Arc::new(VaderScorer))
    }

    /// Blank text is Neutral and never reaches the scorer.
    pub fn classify(&self, text: &str) -> Sentiment {
        if text.trim().is_empty() {
            return Sentiment::Neutral;
        }
        label_for_score(self.scorer.score(text))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::vader()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedScorer {
        score: f64,
        calls: AtomicUsize,
    }

    impl FixedScorer {
        fn new(score: f64) -> Arc<Self> {
            Arc::new(Self {
                score,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl SentimentScorer for FixedScorer {
        fn score(&self, _text: &str) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.score
        }
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(label_for_score(0.05), Sentiment::Positive);
        assert_eq!(label_for_score(-0.05), Sentiment::Negative);
        assert_eq!(label_for_score(0.0), Sentiment::Neutral);
        assert_eq!(label_for_score(0.0499), Sentiment::Neutral);
        assert_eq!(label_for_score(-0.0499), Sentiment::Neutral);
        assert_eq!(label_for_score(1.0), Sentiment::Positive);
        assert_eq!(label_for_score(-1.0), Sentiment::Negative);
    }

    #[test]
    fn blank_text_skips_the_scorer() {
        let scorer = FixedScorer::new(0.9);
        let classifier = Classifier::new(scorer.clone());

        assert_eq!(classifier.classify(""), Sentiment::Neutral);
        assert_eq!(classifier.classify("   "), Sentiment::Neutral);
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);

        assert_eq!(classifier.classify("Shares jump"), Sentiment::Positive);
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn vader_labels_are_deterministic() {
        let classifier = Classifier::vader();
        let text = "Tesla stock surges after great earnings";
        assert_eq!(classifier.classify(text), classifier.classify(text));
    }

    #[test]
    fn vader_scores_obvious_headlines() {
        let classifier = Classifier::vader();
        assert_eq!(classifier.classify("Company reports great, excellent results"), Sentiment::Positive);
        assert_eq!(classifier.classify("Terrible losses and awful fraud scandal"), Sentiment::Negative);
        assert_eq!(classifier.classify("The 2024 annual report"), Sentiment::Neutral);
    }

    #[test]
    fn vader_score_is_bounded() {
        let score = VaderScorer.score("best best best amazing wonderful great love");
        assert!((-1.0..=1.0).contains(&score));
    }
}
