use serde::Serialize;
use std::path::Path;

use crate::error::{DashboardError, Result};
use crate::model::{Record, Sentiment};
use crate::operators::{AirlineSentimentCounts, SentimentCounts, TermWeight};

/// Every view of the dashboard for one parameter set.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub name: String,
    pub source: String,
    pub total_records: usize,
    pub random_post: RandomPost,
    pub sentiment_counts: SentimentCounts,
    pub hour_window: HourWindowReport,
    pub airline_breakdown: Option<AirlineBreakdownReport>,
    pub word_cloud: WordCloudReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RandomPost {
    Found {
        sentiment: Sentiment,
        id: String,
        text: String,
    },
    NoData {
        sentiment: Sentiment,
        message: String,
    },
}

impl RandomPost {
    /// An empty selection becomes a `NoData` state rather than an error.
    pub fn from_sample(sentiment: Sentiment, sample: Result<&Record>) -> Self {
        match sample {
            Ok(record) => RandomPost::Found {
                sentiment,
                id: record.id.clone(),
                text: record.text.clone(),
            },
            Err(DashboardError::EmptySelection(_)) => RandomPost::NoData {
                sentiment,
                message: format!("No {} tweets to show", sentiment),
            },
            Err(e) => RandomPost::NoData {
                sentiment,
                message: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourWindowReport {
    pub hour: u32,
    pub label: String,
    pub count: usize,
    pub points: Vec<MapPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<Record>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AirlineBreakdownReport {
    pub airlines: Vec<String>,
    pub counts: AirlineSentimentCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct WordCloudReport {
    pub sentiment: Sentiment,
    pub distinct_terms: usize,
    pub words: Vec<TermWeight>,
}

impl DashboardReport {
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        crate::io::write_json(self, path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_post_states_serialize_with_status_tag() {
        let record = Record {
            id: "7".to_string(),
            text: "on time".to_string(),
            sentiment: Sentiment::Positive,
            airline: "Delta".to_string(),
            created_at: None,
            latitude: None,
            longitude: None,
        };
        let found = RandomPost::from_sample(Sentiment::Positive, Ok(&record));
        let expected = serde_json::json!({
            "status": "found",
            "sentiment": "positive",
            "id": "7",
            "text": "on time"
        });
        assert_eq!(serde_json::to_value(&found).unwrap(), expected);

        let empty = RandomPost::from_sample(
            Sentiment::Neutral,
            Err(DashboardError::EmptySelection("x".to_string())),
        );
        assert_eq!(
            empty,
            RandomPost::NoData {
                sentiment: Sentiment::Neutral,
                message: "No neutral tweets to show".to_string()
            }
        );
    }
}
