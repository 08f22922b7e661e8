use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::model::{Record, RecordSet, Sentiment};
use crate::operators::{
    count_by_airline_sentiment, count_by_sentiment, sample_one, AirlineSentimentCounts, Selection,
    SentimentCounts, TermFrequencyPipeline, TermFrequencyTable,
};

mod report;
pub use report::{
    AirlineBreakdownReport, DashboardReport, HourWindowReport, MapPoint, RandomPost,
    WordCloudReport,
};

/// The parameter set chosen by the caller for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewRequest {
    pub random_sentiment: Sentiment,
    pub hour: u32,
    pub airlines: Vec<String>,
    pub cloud_sentiment: Sentiment,
    pub show_raw: bool,
    /// Overrides the configured word-cloud size
    pub top_words: Option<usize>,
}

impl Default for ViewRequest {
    fn default() -> Self {
        Self {
            random_sentiment: Sentiment::Positive,
            hour: 0,
            airlines: Vec::new(),
            cloud_sentiment: Sentiment::Positive,
            show_raw: false,
            top_words: None,
        }
    }
}

/// Records created within one hour of the day.
#[derive(Debug, Clone)]
pub struct HourWindow<'a> {
    pub hour: u32,
    pub selection: Selection<'a>,
}

impl HourWindow<'_> {
    pub fn count(&self) -> usize {
        self.selection.len()
    }

    /// Hour the window closes at, wrapping past midnight.
    pub fn end_hour(&self) -> u32 {
        (self.hour % 24 + 1) % 24
    }

    pub fn label(&self) -> String {
        format!(
            "{} tweets between {}:00 and {}:00",
            self.count(),
            self.hour,
            self.end_hour()
        )
    }

    /// Locations of the records that have one.
    pub fn points(&self) -> Vec<MapPoint> {
        self.selection
            .iter()
            .filter_map(Record::location)
            .map(|(latitude, longitude)| MapPoint {
                latitude,
                longitude,
            })
            .collect()
    }

    pub fn report(&self, show_raw: bool) -> HourWindowReport {
        HourWindowReport {
            hour: self.hour,
            label: self.label(),
            count: self.count(),
            points: self.points(),
            records: show_raw.then(|| self.selection.iter().cloned().collect()),
        }
    }
}

/// Read-only analytics over one loaded dataset.
///
/// Every view is computed from scratch on each call; only the record set is
/// shared, so a `Dashboard` can serve concurrent callers.
pub struct Dashboard {
    name: String,
    records: Arc<RecordSet>,
    pipeline: TermFrequencyPipeline,
    known_airlines: Vec<String>,
    max_words: usize,
}

impl Dashboard {
    pub fn new(records: Arc<RecordSet>, config: &DashboardConfig) -> Self {
        Self {
            name: config.name.clone(),
            records,
            pipeline: TermFrequencyPipeline::from_config(&config.word_cloud),
            known_airlines: config.airlines.clone(),
            max_words: config.word_cloud.max_words,
        }
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn known_airlines(&self) -> &[String] {
        &self.known_airlines
    }

    pub fn selection(&self) -> Selection<'_> {
        Selection::all(&self.records)
    }

    pub fn sentiment_counts(&self) -> SentimentCounts {
        count_by_sentiment(&self.selection())
    }

    pub fn random_post<R>(&self, sentiment: Sentiment, rng: &mut R) -> Result<&Record>
    where
        R: Rng + ?Sized,
    {
        let subset = self.selection().by_sentiment(sentiment);
        sample_one(&subset, rng).map_err(|e| match e {
            DashboardError::EmptySelection(_) => {
                DashboardError::EmptySelection(format!("sentiment = {}", sentiment))
            }
            other => other,
        })
    }

    pub fn hour_window(&self, hour: u32) -> HourWindow<'_> {
        HourWindow {
            hour,
            selection: self.selection().by_hour(hour),
        }
    }

    /// `None` when no airline is picked, there is nothing to break down.
    pub fn airline_breakdown<S: AsRef<str>>(
        &self,
        airlines: &[S],
    ) -> Option<AirlineSentimentCounts> {
        if airlines.is_empty() {
            return None;
        }

        for airline in airlines {
            let airline = airline.as_ref();
            if !self.known_airlines.iter().any(|known| known == airline) {
                warn!("Airline '{}' is not a configured airline", airline);
            }
        }

        let picked = self.selection().by_airlines(airlines);
        Some(count_by_airline_sentiment(&picked))
    }

    pub fn word_cloud(&self, sentiment: Sentiment) -> TermFrequencyTable {
        let subset = self.selection().by_sentiment(sentiment);
        self.pipeline.compute(&subset)
    }

    /// Top terms for rendering, capped at `top` or the configured maximum.
    pub fn word_cloud_report(&self, sentiment: Sentiment, top: Option<usize>) -> WordCloudReport {
        let table = self.word_cloud(sentiment);
        debug!("{} word cloud: {} distinct terms", sentiment, table.len());
        WordCloudReport {
            sentiment,
            distinct_terms: table.len(),
            words: table.top(top.unwrap_or(self.max_words)),
        }
    }

    pub fn render<R>(&self, request: &ViewRequest, rng: &mut R) -> DashboardReport
    where
        R: Rng + ?Sized,
    {
        debug!("Rendering {} with {:?}", self.name, request);

        let random_post = RandomPost::from_sample(
            request.random_sentiment,
            self.random_post(request.random_sentiment, rng),
        );

        let hour_window = self.hour_window(request.hour).report(request.show_raw);
        debug!("{}", hour_window.label);

        let airline_breakdown = self
            .airline_breakdown(&request.airlines)
            .map(|counts| AirlineBreakdownReport {
                airlines: request.airlines.clone(),
                counts,
            });

        let word_cloud = self.word_cloud_report(request.cloud_sentiment, request.top_words);

        DashboardReport {
            name: self.name.clone(),
            source: self.records.source().to_string(),
            total_records: self.records.len(),
            random_post,
            sentiment_counts: self.sentiment_counts(),
            hour_window,
            airline_breakdown,
            word_cloud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::rng_from_seed;
    use chrono::NaiveDate;

    fn record(id: &str, text: &str, sentiment: Sentiment, airline: &str, hour: u32) -> Record {
        Record {
            id: id.to_string(),
            text: text.to_string(),
            sentiment,
            airline: airline.to_string(),
            created_at: NaiveDate::from_ymd_opt(2015, 2, 24)
                .and_then(|d| d.and_hms_opt(hour, 10, 0)),
            latitude: (hour == 23).then_some(40.7),
            longitude: (hour == 23).then_some(-74.0),
        }
    }

    fn dashboard() -> Dashboard {
        let records = RecordSet::new(
            "mem",
            vec![
                record("a", "Great flight!", Sentiment::Positive, "United", 9),
                record("b", "RT delayed again", Sentiment::Negative, "Delta", 23),
                record("c", "delayed bags", Sentiment::Negative, "United", 23),
            ],
        );
        Dashboard::new(Arc::new(records), &DashboardConfig::for_path("mem"))
    }

    #[test]
    fn test_hour_window_label_wraps_midnight() {
        let dash = dashboard();
        let window = dash.hour_window(23);
        assert_eq!(window.label(), "2 tweets between 23:00 and 0:00");
        assert_eq!(window.points().len(), 2);
        assert_eq!(dash.hour_window(9).points(), Vec::new());
    }

    #[test]
    fn test_out_of_range_hour_is_an_empty_window() {
        let dash = dashboard();
        let window = dash.hour_window(u32::MAX);
        assert_eq!(window.count(), 0);
        assert_eq!(window.end_hour(), 16);
        assert_eq!(window.label(), "0 tweets between 4294967295:00 and 16:00");
        assert_eq!(dash.hour_window(24).end_hour(), 1);
    }

    #[test]
    fn test_random_post_empty_selection() {
        let dash = dashboard();
        let err = dash
            .random_post(Sentiment::Neutral, &mut rng_from_seed(Some(1)))
            .unwrap_err();
        assert_eq!(err.to_string(), "no records match sentiment = neutral");
    }

    #[test]
    fn test_airline_breakdown_needs_a_pick() {
        let dash = dashboard();
        let none: Vec<String> = Vec::new();
        assert!(dash.airline_breakdown(&none).is_none());

        let counts = dash.airline_breakdown(&["United"]).unwrap();
        assert_eq!(counts.total(), 2);
        assert!(dash.airline_breakdown(&["Alaska"]).unwrap().is_empty());
    }

    #[test]
    fn test_render_full_report() {
        let dash = dashboard();
        let request = ViewRequest {
            random_sentiment: Sentiment::Neutral,
            hour: 23,
            airlines: vec!["Delta".to_string()],
            cloud_sentiment: Sentiment::Negative,
            show_raw: true,
            top_words: Some(1),
        };
        let report = dash.render(&request, &mut rng_from_seed(Some(5)));

        assert_eq!(report.total_records, 3);
        assert!(matches!(report.random_post, RandomPost::NoData { .. }));
        assert_eq!(report.sentiment_counts.total(), 3);
        assert_eq!(report.hour_window.count, 2);
        assert_eq!(report.hour_window.records.as_ref().map(Vec::len), Some(2));
        let breakdown = report.airline_breakdown.unwrap();
        assert_eq!(breakdown.counts.get("Delta", Sentiment::Negative), 1);
        assert_eq!(report.word_cloud.distinct_terms, 2);
        assert_eq!(report.word_cloud.words[0].term, "delayed");
        assert_eq!(report.word_cloud.words.len(), 1);
    }
}
