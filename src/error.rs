use thiserror::Error;

/// Error type for dataset loading, parsing, configuration and sampling failures.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("data source '{source_name}' could not be read: {reason}")]
    Load { source_name: String, reason: String },
    #[error("data source '{source_name}' is missing required column '{column}'")]
    MissingColumn { source_name: String, column: String },
    #[error("line {line}: cannot parse {column} value '{value}': {reason}")]
    Parse {
        line: u64,
        column: String,
        value: String,
        reason: String,
    },
    #[error("no records match {0}")]
    EmptySelection(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
