//! Startup context shared by every surface

use std::sync::Arc;

use crate::config::Config;
use crate::error::{ProgressError, Result};
use crate::loader::{DatasetCache, LoadSummary, LoadedDataset, Schema};
use crate::model::{Dataset, WeightTable};
use crate::progress::{self, ApartmentOverview, ProgressReport, TowerSummary};

/// Configuration, weights and the loaded dataset, built once and passed by reference
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    weights: WeightTable,
    loaded: Arc<LoadedDataset>,
}

impl AppContext {
    /// Validate `config` and load its data source through `cache`
    pub fn open(config: Config, cache: &mut DatasetCache) -> Result<Self> {
        config.validate()?;

        let schema = Schema::from_config(&config);
        let loaded = cache.get_or_load(&config.data_file, &config.sheet_name, &schema)?;

        let summary = &loaded.summary;
        if summary.rows_dropped > 0 {
            tracing::info!(
                dropped = summary.rows_dropped,
                "Ignored rows without a numeric apartment number"
            );
        }
        if !summary.mixed_scale_columns.is_empty() {
            tracing::warn!(
                columns = ?summary.mixed_scale_columns,
                "Some columns mix 0-1 and 0-100 values and were rescaled as percentages"
            );
        }

        Ok(Self {
            weights: config.weight_table(),
            config,
            loaded,
        })
    }

    /// Build a context around an already-loaded dataset
    #[cfg(test)]
    pub(crate) fn from_parts(config: Config, loaded: LoadedDataset) -> Self {
        Self {
            weights: config.weight_table(),
            config,
            loaded: Arc::new(loaded),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.loaded.dataset
    }

    pub fn summary(&self) -> &LoadSummary {
        &self.loaded.summary
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Observed apartment numbering; a loaded dataset is never empty
    pub fn apartment_range(&self) -> (u32, u32) {
        self.dataset().apartment_range().unwrap_or((0, 0))
    }

    /// Range-checked lookup used by the non-interactive commands
    pub fn report_for(&self, apartment: i64) -> Result<ProgressReport> {
        let (min, max) = self.apartment_range();
        if apartment < i64::from(min) || apartment > i64::from(max) {
            return Err(ProgressError::ApartmentOutOfRange { apartment, min, max });
        }
        // The range check above guarantees `apartment` fits in u32
        progress::compute_progress(self.dataset(), &self.weights, apartment as u32)
    }

    pub fn tower_summary(&self) -> TowerSummary {
        progress::tower_summary(self.dataset(), &self.weights)
    }

    pub fn overviews(&self) -> Vec<ApartmentOverview> {
        progress::apartment_overviews(self.dataset(), &self.weights)
    }
}

/// Two apartments (101 and 103) with the reference weights; 101 is the 38% worked example
#[cfg(test)]
pub(crate) fn sample_context() -> AppContext {
    use crate::loader::{build_dataset, Cell};
    use std::path::Path;

    let config = Config::default();
    let schema = Schema::from_config(&config);

    let mut header = vec![
        Cell::Text(config.apartment_column.clone()),
        Cell::Text(config.floor_column.clone()),
    ];
    header.extend(schema.activities.iter().cloned().map(Cell::Text));

    let row = |apartment: f64, floor: &str, first_four: [f64; 4]| {
        let mut row = vec![Cell::Number(apartment), Cell::Text(floor.to_string())];
        row.extend(first_four.iter().map(|&v| Cell::Number(v)));
        row.extend((4..schema.activities.len()).map(|_| Cell::Number(0.0)));
        row
    };

    let rows = vec![
        header,
        row(101.0, "1", [0.5, 1.0, 0.8, 0.2]),
        row(103.0, "1", [1.0, 1.0, 1.0, 1.0]),
    ];
    let loaded = build_dataset(Path::new("inline.xlsx"), &config.sheet_name, &rows, &schema)
        .unwrap();
    AppContext::from_parts(config, loaded)
}
