use chrono::{DateTime, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use log::{info, warn};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::config::ColumnMapping;
use crate::error::{DashboardError, Result};
use crate::model::{Record, RecordSet, Sentiment};

/// Offset-aware formats. The wall-clock time in the stored offset is kept.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M:%S%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Resolved header positions for one source.
struct ColumnIndex {
    text: usize,
    sentiment: usize,
    airline: usize,
    created_at: usize,
    id: Option<usize>,
    coordinates: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
}

/// Parses a CSV source into a validated [`RecordSet`].
pub struct DatasetLoader {
    columns: ColumnMapping,
    coordinate_pattern: Regex,
}

impl DatasetLoader {
    pub fn new(columns: ColumnMapping) -> Result<Self> {
        let coordinate_pattern =
            Regex::new(r"^\[\s*([-+]?[0-9]*\.?[0-9]+)\s*,\s*([-+]?[0-9]*\.?[0-9]+)\s*\]$")?;
        Ok(Self {
            columns,
            coordinate_pattern,
        })
    }

    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<RecordSet> {
        let source_name = path.as_ref().display().to_string();
        let file = File::open(path.as_ref()).map_err(|e| DashboardError::Load {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;
        self.load_reader(&source_name, file)
    }

    pub fn load_reader<R: Read>(&self, source_name: &str, reader: R) -> Result<RecordSet> {
        let load_error = |e: csv::Error| DashboardError::Load {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        };

        let mut reader = ReaderBuilder::new().from_reader(reader);
        let headers = reader.headers().map_err(load_error)?.clone();
        let index = self.resolve_columns(source_name, &headers)?;

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let row = result.map_err(load_error)?;
            records.push(self.parse_row(&index, row_idx, &row)?);
        }

        info!("Loaded {} records from {}", records.len(), source_name);
        Ok(RecordSet::new(source_name, records))
    }

    fn resolve_columns(&self, source_name: &str, headers: &StringRecord) -> Result<ColumnIndex> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| DashboardError::MissingColumn {
                source_name: source_name.to_string(),
                column: name.to_string(),
            })
        };

        Ok(ColumnIndex {
            text: require(self.columns.text.as_str())?,
            sentiment: require(self.columns.sentiment.as_str())?,
            airline: require(self.columns.airline.as_str())?,
            created_at: require(self.columns.created_at.as_str())?,
            id: find(self.columns.id.as_str()),
            coordinates: find(self.columns.coordinates.as_str()),
            latitude: find(self.columns.latitude.as_str()),
            longitude: find(self.columns.longitude.as_str()),
        })
    }

    fn parse_row(
        &self,
        index: &ColumnIndex,
        row_idx: usize,
        row: &StringRecord,
    ) -> Result<Record> {
        let line = row.position().map_or(row_idx as u64 + 2, |p| p.line());
        let field = |idx: usize| row.get(idx).unwrap_or("");
        let parse_error = |column: &str, value: &str, reason: String| DashboardError::Parse {
            line,
            column: column.to_string(),
            value: value.to_string(),
            reason,
        };

        let raw_sentiment = field(index.sentiment);
        let sentiment = Sentiment::from_str(raw_sentiment)
            .map_err(|reason| parse_error(&self.columns.sentiment, raw_sentiment, reason))?;

        let raw_created = field(index.created_at);
        let created_at = parse_timestamp(raw_created)
            .map_err(|reason| parse_error(&self.columns.created_at, raw_created, reason))?;

        let id = index
            .id
            .map(field)
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| row_idx.to_string());

        let (latitude, longitude) = match self.parse_location(index, row, line) {
            Some((lat, lon)) => (Some(lat), Some(lon)),
            None => (None, None),
        };

        Ok(Record {
            id,
            text: field(index.text).to_string(),
            sentiment,
            airline: field(index.airline).trim().to_string(),
            created_at,
            latitude,
            longitude,
        })
    }

    /// Combined coordinate column wins over separate latitude/longitude columns.
    fn parse_location(
        &self,
        index: &ColumnIndex,
        row: &StringRecord,
        line: u64,
    ) -> Option<(f64, f64)> {
        if let Some(raw) = index.coordinates.and_then(|idx| row.get(idx)) {
            let raw = raw.trim();
            if !raw.is_empty() {
                let parsed = self.parse_coordinates(raw);
                if parsed.is_none() {
                    warn!("line {}: ignoring unparseable coordinates '{}'", line, raw);
                }
                return parsed;
            }
        }

        let number = |idx: Option<usize>| {
            let raw = row.get(idx?)?.trim();
            if raw.is_empty() {
                return None;
            }
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => {
                    warn!("line {}: ignoring unparseable coordinate '{}'", line, raw);
                    None
                }
            }
        };
        Some((number(index.latitude)?, number(index.longitude)?))
    }

    /// `"[lat, lon]"` as written by the tweet export.
    fn parse_coordinates(&self, raw: &str) -> Option<(f64, f64)> {
        let caps = self.coordinate_pattern.captures(raw)?;
        let lat = caps.get(1)?.as_str().parse::<f64>().ok()?;
        let lon = caps.get(2)?.as_str().parse::<f64>().ok()?;
        Some((lat, lon))
    }
}

/// Parse a timestamp cell. An empty cell means "no timestamp".
pub fn parse_timestamp(raw: &str) -> std::result::Result<Option<NaiveDateTime>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    for format in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Ok(Some(ts.naive_local()));
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.naive_local()));
    }
    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(ts));
        }
    }

    Err("not a recognised timestamp".to_string())
}
