use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating or loading a dataset.
///
/// All of these are load-time structural problems. Once a dataset is loaded,
/// filtering and aggregation cannot fail.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("malformed JSON dataset: {0}")]
    MalformedJson(String),

    #[error("missing column '{column}' (found: {})", .available.join(", "))]
    MissingColumn {
        column: &'static str,
        available: Vec<String>,
    },

    #[error("row {row}: column '{column}' is empty")]
    NullValue { row: usize, column: &'static str },

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("no dataset found in {}", .0.display())]
    NoDatasetFound(PathBuf),
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }
}
