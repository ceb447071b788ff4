//! Custom error types for the progress viewer
//!
//! Fatal startup failures (`DataSource`, `Config`) and recoverable lookup
//! failures (`NotFound`, `ApartmentOutOfRange`) share one enum so the
//! request boundary can decide what to do with each.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the progress viewer
#[derive(Error, Debug)]
pub enum ProgressError {
    /// Spreadsheet could not be turned into a dataset
    #[error("Data source error: {0}")]
    DataSource(#[from] DataSourceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Requested apartment has no row in the dataset
    #[error("Apartment {0} not found in data.")]
    NotFound(u32),

    /// Requested apartment lies outside the observed numbering
    #[error("Apartment {apartment} is outside the available range {min}..={max}")]
    ApartmentOutOfRange { apartment: i64, min: u32, max: u32 },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl ProgressError {
    /// Lookup failures are rendered as messages; everything else aborts.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProgressError::NotFound(_) | ProgressError::ApartmentOutOfRange { .. }
        )
    }
}

/// Failures while reading the spreadsheet
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Failed to open workbook {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    #[error("Sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetMissing {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Failed to read sheet '{sheet}': {reason}")]
    SheetUnreadable { sheet: String, reason: String },

    #[error("No header row containing '{column}' found in sheet '{sheet}'")]
    HeaderNotFound { sheet: String, column: String },

    #[error("Required column '{column}' missing from sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Sheet '{sheet}' contains no rows with a numeric apartment number")]
    NoApartments { sheet: String },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to load configuration file {}: {reason}", .path.display())]
    LoadFailed { path: PathBuf, reason: String },

    #[error("Failed to save configuration file: {0}")]
    SaveFailed(String),

    #[error("Configuration file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("At least one activity must be configured")]
    NoActivities,

    #[error("Activity name must not be empty")]
    EmptyActivityName,

    #[error("Activity '{0}' is configured more than once")]
    DuplicateActivity(String),

    #[error("Invalid weight for '{name}': {weight}. Must be between 0 and 1")]
    InvalidWeight { name: String, weight: f64 },

    #[error("Invalid column setting for {field}: '{value}'")]
    InvalidColumn { field: &'static str, value: String },
}

/// Result type alias for the progress viewer
pub type Result<T> = std::result::Result<T, ProgressError>;
