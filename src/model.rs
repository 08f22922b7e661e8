use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentiment label attached to every post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(format!(
                "expected one of positive, neutral, negative; got '{}'",
                other
            )),
        }
    }
}

/// One labelled post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    pub text: String,
    pub sentiment: Sentiment,
    pub airline: String,
    /// Local wall-clock time as stored in the source, no timezone conversion.
    pub created_at: Option<NaiveDateTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Record {
    pub fn hour(&self) -> Option<u32> {
        self.created_at.map(|ts| ts.hour())
    }

    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// The immutable, once-loaded dataset.
///
/// Shared read-only (usually behind an `Arc`) between every view computation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    source: String,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(source: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }

    /// Identity of the input this set was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct airline names in first-seen order.
    pub fn airlines(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.airline.as_str()) {
                seen.push(record.airline.as_str());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(airline: &str, hour: Option<u32>) -> Record {
        Record {
            id: "1".to_string(),
            text: "hello".to_string(),
            sentiment: Sentiment::Neutral,
            airline: airline.to_string(),
            created_at: hour.map(|h| {
                NaiveDate::from_ymd_opt(2015, 2, 24)
                    .unwrap()
                    .and_hms_opt(h, 15, 0)
                    .unwrap()
            }),
            latitude: Some(40.7),
            longitude: None,
        }
    }

    #[test]
    fn test_sentiment_parse_and_display() {
        for sentiment in Sentiment::ALL {
            assert_eq!(sentiment.to_string().parse::<Sentiment>(), Ok(sentiment));
        }
        assert!("Positive".parse::<Sentiment>().is_err());
        assert!("".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_record_hour_and_partial_location() {
        let rec = record("United", Some(23));
        assert_eq!(rec.hour(), Some(23));
        // A latitude without a longitude is not a usable location
        assert_eq!(rec.location(), None);
        assert_eq!(record("United", None).hour(), None);
    }

    #[test]
    fn test_airlines_first_seen_order() {
        let set = RecordSet::new(
            "mem",
            vec![
                record("Delta", None),
                record("United", None),
                record("Delta", None),
            ],
        );
        assert_eq!(set.airlines(), vec!["Delta", "United"]);
        assert_eq!(set.len(), 3);
    }
}
