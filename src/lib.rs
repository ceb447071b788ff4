//! Apartment construction-progress viewer
//!
//! Loads a progress spreadsheet once, then answers "how far along is this
//! apartment compared with the whole building?" as weighted percentages.

pub mod config;
pub mod context;
pub mod error;
pub mod interactive;
pub mod loader;
pub mod logging;
pub mod model;
pub mod progress;
pub mod report;

pub use config::Config;
pub use context::AppContext;
pub use error::{ConfigError, DataSourceError, ProgressError, Result};
pub use loader::{DatasetCache, LoadSummary, LoadedDataset};
pub use model::{ActivityRecord, ActivityWeight, Dataset, WeightTable};
pub use progress::ProgressReport;
