use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::models::DEFAULT_DAYS;
use crate::report::SentimentReport;

fn default_days() -> u32 {
    DEFAULT_DAYS
}

#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    pub subject: String,
    #[serde(default = "default_days")]
    pub days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Ok,
    NoData,
}

#[derive(Serialize)]
pub struct SentimentResponse {
    pub status: AnalysisStatus,
    pub subject: String,
    pub days: u32,
    pub analyzed_at: DateTime<Utc>,
    pub message: Option<String>,
    pub report: Option<SentimentReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_default_to_a_week() {
        let req: SentimentRequest = serde_json::from_str(r#"{"subject":"Tesla"}"#).unwrap();
        assert_eq!(req.subject, "Tesla");
        assert_eq!(req.days, 7);
    }

    #[test]
    fn status_is_snake_case() {
        assert_eq!(serde_json::to_string(&AnalysisStatus::NoData).unwrap(), "\"no_data\"");
    }
}
