use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::DashboardError;
use crate::runtime::ViewRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub source: DataSourceConfig,
    #[serde(default = "default_airlines")]
    pub airlines: Vec<String>,
    #[serde(default)]
    pub word_cloud: WordCloudConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub view: ViewRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceConfig {
    pub path: String,
    #[serde(default)]
    pub columns: ColumnMapping,
}

/// Header names of the input table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub text: String,
    pub sentiment: String,
    pub airline: String,
    pub created_at: String,
    /// Combined `"[lat, lon]"` column
    pub coordinates: String,
    pub latitude: String,
    pub longitude: String,
    pub id: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            text: "text".to_string(),
            sentiment: "airline_sentiment".to_string(),
            airline: "airline".to_string(),
            created_at: "tweet_created".to_string(),
            coordinates: "tweet_coord".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
            id: "tweet_id".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCloudConfig {
    pub extra_stopwords: Vec<String>,
    pub stopwords_case_insensitive: bool,
    pub max_words: usize,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            extra_stopwords: Vec::new(),
            stopwords_case_insensitive: true,
            max_words: 200,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub seed: Option<u64>,
}

fn default_name() -> String {
    "airline-tweets".to_string()
}

fn default_airlines() -> Vec<String> {
    [
        "US Airways",
        "United",
        "American",
        "Southwest",
        "Delta",
        "Virgin America",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl DashboardConfig {
    /// Config with defaults for everything but the data path.
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            source: DataSourceConfig {
                path: path.into(),
                columns: ColumnMapping::default(),
            },
            airlines: default_airlines(),
            word_cloud: WordCloudConfig::default(),
            sampler: SamplerConfig::default(),
            view: ViewRequest::default(),
        }
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: DashboardConfig =
            serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        let invalid = |msg: String| Err(DashboardError::Config(msg));

        if self.source.path.trim().is_empty() {
            return invalid("source.path must not be empty".to_string());
        }

        if self.word_cloud.max_words == 0 {
            return invalid("word_cloud.max_words must be greater than zero".to_string());
        }

        let hour = self.view.hour;
        if hour > 23 {
            return invalid(format!("view.hour must be below 24, got {}", hour));
        }

        let mut airline_names = HashSet::new();
        for airline in &self.airlines {
            if !airline_names.insert(airline) {
                return invalid(format!("Duplicate airline: {}", airline));
            }
        }

        Ok(())
    }
}
