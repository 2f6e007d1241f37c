use std::path::PathBuf;
use thiserror::Error;

/// Reasons the sales dataset could not be loaded.
///
/// Every variant is fatal to the session: no partial dataset is ever served.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The configured data file does not exist.
    #[error("Data file not found: {0}")]
    DataPathNotFound(PathBuf),

    /// The data file exists but could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer rejected the input (bad quoting, uneven rows, bad UTF-8).
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// One or more of the required schema columns is absent from the header.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// An `order_date` value did not match any recognised format.
    #[error("Invalid timestamp on row {row}: {value}")]
    TimestampParse { row: usize, value: String },

    /// A numeric column held a non-numeric, negative or out-of-range value.
    #[error("Invalid {column} on row {row}: {value}")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// All errors produced by the dashboard crates.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The dataset could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be produced or parsed.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashboardError {
    /// `true` when the error came from loading the dataset.
    pub fn is_load_error(&self) -> bool {
        matches!(self, DashboardError::Load(_))
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
