use std::collections::HashSet;
use std::fmt;

use crate::model::{Record, RecordSet, Sentiment};

/// A single filter condition over records.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Sentiment(Sentiment),
    /// Hour of day of `created_at`, half-open `[h:00, h+1:00)`
    Hour(u32),
    /// Airline membership. An empty set matches everything.
    Airlines(HashSet<String>),
}

impl Predicate {
    pub fn airlines<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::Airlines(names.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::Sentiment(s) => record.sentiment == *s,
            Predicate::Hour(h) => record.hour() == Some(*h),
            Predicate::Airlines(set) => set.is_empty() || set.contains(&record.airline),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Sentiment(s) => write!(f, "sentiment = {}", s),
            Predicate::Hour(h) => write!(f, "hour = {}", h),
            Predicate::Airlines(set) => {
                let mut names: Vec<&str> = set.iter().map(String::as_str).collect();
                names.sort_unstable();
                write!(f, "airline in [{}]", names.join(", "))
            }
        }
    }
}

/// A borrowed subset of a [`RecordSet`], in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection<'a> {
    records: Vec<&'a Record>,
}

impl<'a> Selection<'a> {
    pub fn all(set: &'a RecordSet) -> Self {
        set.records().iter().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn filter(&self, predicate: &Predicate) -> Selection<'a> {
        self.iter().filter(|r| predicate.matches(r)).collect()
    }

    pub fn by_sentiment(&self, sentiment: Sentiment) -> Selection<'a> {
        self.filter(&Predicate::Sentiment(sentiment))
    }

    /// Records without a timestamp never match.
    pub fn by_hour(&self, hour: u32) -> Selection<'a> {
        self.filter(&Predicate::Hour(hour))
    }

    /// An empty airline list performs no filtering.
    pub fn by_airlines<S: AsRef<str>>(&self, airlines: &[S]) -> Selection<'a> {
        self.filter(&Predicate::airlines(airlines.iter().map(|a| a.as_ref())))
    }
}

impl<'a> FromIterator<&'a Record> for Selection<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for Selection<'a> {
    type Item = &'a Record;
    type IntoIter = std::vec::IntoIter<&'a Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: usize, sentiment: Sentiment, airline: &str, hour: Option<(u32, u32)>) -> Record {
        Record {
            id: id.to_string(),
            text: format!("post {}", id),
            sentiment,
            airline: airline.to_string(),
            created_at: hour.map(|(h, m)| {
                NaiveDate::from_ymd_opt(2015, 2, 24)
                    .unwrap()
                    .and_hms_opt(h, m, 0)
                    .unwrap()
            }),
            latitude: None,
            longitude: None,
        }
    }

    fn sample_set() -> RecordSet {
        RecordSet::new(
            "mem",
            vec![
                record(0, Sentiment::Positive, "United", Some((9, 0))),
                record(1, Sentiment::Negative, "Delta", Some((9, 59))),
                record(2, Sentiment::Negative, "United", Some((10, 0))),
                record(3, Sentiment::Neutral, "American", None),
                record(4, Sentiment::Negative, "Southwest", Some((23, 30))),
            ],
        )
    }

    fn ids(selection: &Selection<'_>) -> Vec<String> {
        selection.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_sentiment_partition() {
        let set = sample_set();
        let all = Selection::all(&set);
        let total: usize = Sentiment::ALL
            .iter()
            .map(|s| {
                let subset = all.by_sentiment(*s);
                assert!(subset.iter().all(|r| r.sentiment == *s));
                subset.len()
            })
            .sum();
        assert_eq!(total, set.len());
        let negatives = all.by_sentiment(Sentiment::Negative);
        assert_eq!(ids(&negatives), vec!["1", "2", "4"]);
    }

    #[test]
    fn test_sentiment_without_matches_is_empty() {
        let set = RecordSet::new("mem", vec![record(0, Sentiment::Positive, "United", None)]);
        let neutral = Selection::all(&set).by_sentiment(Sentiment::Neutral);
        assert!(neutral.is_empty());
    }

    #[test]
    fn test_hour_window_is_half_open() {
        let set = sample_set();
        let all = Selection::all(&set);
        assert_eq!(ids(&all.by_hour(9)), vec!["0", "1"]);
        assert_eq!(ids(&all.by_hour(10)), vec!["2"]);
        assert_eq!(ids(&all.by_hour(23)), vec!["4"]);
        assert!(all.by_hour(0).is_empty());
        assert!(all.by_hour(24).is_empty());
    }

    #[test]
    fn test_hour_filter_is_idempotent() {
        let set = sample_set();
        let once = Selection::all(&set).by_hour(9);
        assert_eq!(once.by_hour(9), once);
    }

    #[test]
    fn test_airline_membership() {
        let set = sample_set();
        let all = Selection::all(&set);
        let picked = all.by_airlines(&["United", "Delta"]);
        assert_eq!(ids(&picked), vec!["0", "1", "2"]);
        assert!(all.by_airlines(&["Alaska"]).is_empty());
    }

    #[test]
    fn test_empty_airline_selection_is_a_no_op() {
        let set = sample_set();
        let all = Selection::all(&set);
        let none: [&str; 0] = [];
        assert_eq!(all.by_airlines(&none), all);
    }

    #[test]
    fn test_combined_predicates() {
        let set = sample_set();
        let subset = Selection::all(&set)
            .by_airlines(&["United"])
            .filter(&Predicate::Sentiment(Sentiment::Negative));
        assert_eq!(ids(&subset), vec!["2"]);
    }

    #[test]
    fn test_predicate_display() {
        assert_eq!(Predicate::Hour(7).to_string(), "hour = 7");
        assert_eq!(
            Predicate::airlines(["United", "Delta"]).to_string(),
            "airline in [Delta, United]"
        );
    }
}
