use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use super::filter::Selection;
use super::stopwords::Stopwords;
use crate::config::WordCloudConfig;

/// Links, user mentions and the bare reshare marker.
///
/// Matching is case-sensitive and intentionally broad: any token containing
/// `http` counts as a link.
pub fn is_noise_token(token: &str) -> bool {
    token.contains("http") || token.starts_with('@') || token == "RT"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermWeight {
    pub term: String,
    pub count: usize,
}

/// Token -> occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequencyTable {
    counts: HashMap<String, usize>,
}

impl TermFrequencyTable {
    pub fn get(&self, term: &str) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts
            .iter()
            .map(|(term, count)| (term.as_str(), *count))
    }

    /// Descending count, ties broken alphabetically.
    pub fn ranked(&self) -> Vec<TermWeight> {
        let mut weights: Vec<TermWeight> = self
            .counts
            .iter()
            .map(|(term, count)| TermWeight {
                term: term.clone(),
                count: *count,
            })
            .collect();
        weights.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
        weights
    }

    pub fn top(&self, n: usize) -> Vec<TermWeight> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

impl FromIterator<(String, usize)> for TermFrequencyTable {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut counts = HashMap::new();
        for (term, count) in iter {
            *counts.entry(term).or_insert(0) += count;
        }
        Self { counts }
    }
}

/// Turns the text of a selection into word-cloud weights.
///
/// Tokens are whitespace-separated runs; punctuation stays attached to the
/// word and casing is preserved.
#[derive(Debug, Clone, Default)]
pub struct TermFrequencyPipeline {
    stopwords: Stopwords,
}

impl TermFrequencyPipeline {
    pub fn new(stopwords: Stopwords) -> Self {
        Self { stopwords }
    }

    pub fn from_config(config: &WordCloudConfig) -> Self {
        let mut stopwords = Stopwords::new(
            super::stopwords::STANDARD_STOPWORDS.iter().copied(),
            config.stopwords_case_insensitive,
        );
        stopwords.extend(&config.extra_stopwords);
        Self::new(stopwords)
    }

    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    /// Surviving tokens of one text, in order.
    pub fn tokens<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        text.split_whitespace()
            .filter(move |token| !is_noise_token(token) && !self.stopwords.contains(token))
    }

    pub fn compute(&self, selection: &Selection<'_>) -> TermFrequencyTable {
        let counts = selection
            .records()
            .par_iter()
            .fold(HashMap::new, |mut acc: HashMap<String, usize>, record| {
                for token in self.tokens(&record.text) {
                    *acc.entry(token.to_string()).or_insert(0) += 1;
                }
                acc
            })
            .reduce(HashMap::new, |mut merged, partial| {
                for (term, count) in partial {
                    *merged.entry(term).or_insert(0) += count;
                }
                merged
            });

        TermFrequencyTable { counts }
    }
}
