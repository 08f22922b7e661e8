use serde::Serialize;
use std::collections::BTreeMap;

use super::filter::Selection;
use crate::model::Sentiment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentCount {
    pub sentiment: Sentiment,
    pub count: usize,
}

/// Sentiment totals, one row per sentiment present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SentimentCounts {
    rows: Vec<SentimentCount>,
}

impl SentimentCounts {
    pub fn rows(&self) -> &[SentimentCount] {
        &self.rows
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        self.rows
            .iter()
            .find(|row| row.sentiment == sentiment)
            .map_or(0, |row| row.count)
    }

    pub fn total(&self) -> usize {
        self.rows.iter().map(|row| row.count).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirlineSentimentCount {
    pub airline: String,
    pub sentiment: Sentiment,
    pub count: usize,
}

/// Counts per (airline, sentiment) pair, zero pairs omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AirlineSentimentCounts {
    rows: Vec<AirlineSentimentCount>,
}

impl AirlineSentimentCounts {
    pub fn rows(&self) -> &[AirlineSentimentCount] {
        &self.rows
    }

    pub fn get(&self, airline: &str, sentiment: Sentiment) -> usize {
        self.rows
            .iter()
            .find(|row| row.airline == airline && row.sentiment == sentiment)
            .map_or(0, |row| row.count)
    }

    pub fn total(&self) -> usize {
        self.rows.iter().map(|row| row.count).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows come out by descending count, ties in sentiment order.
pub fn count_by_sentiment(selection: &Selection<'_>) -> SentimentCounts {
    let mut counts: BTreeMap<Sentiment, usize> = BTreeMap::new();
    for record in selection.iter() {
        *counts.entry(record.sentiment).or_insert(0) += 1;
    }

    let mut rows: Vec<SentimentCount> = counts
        .into_iter()
        .map(|(sentiment, count)| SentimentCount { sentiment, count })
        .collect();
    // Stable sort keeps the BTreeMap's sentiment order for ties
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    SentimentCounts { rows }
}

/// Expects a selection already narrowed to the airlines of interest.
/// Rows are ordered by airline name, then sentiment.
pub fn count_by_airline_sentiment(selection: &Selection<'_>) -> AirlineSentimentCounts {
    let mut counts: BTreeMap<(&str, Sentiment), usize> = BTreeMap::new();
    for record in selection.iter() {
        *counts
            .entry((record.airline.as_str(), record.sentiment))
            .or_insert(0) += 1;
    }

    let rows = counts
        .into_iter()
        .map(|((airline, sentiment), count)| AirlineSentimentCount {
            airline: airline.to_string(),
            sentiment,
            count,
        })
        .collect();
    AirlineSentimentCounts { rows }
}
