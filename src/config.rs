use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::model::{reference_activities, ActivityWeight, WeightTable};

pub const DEFAULT_DATA_FILE: &str =
    "Apartment_Progress_Weighted-Progress_App_ITowerAvg_AppView_v5.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Apartment Progress";

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Deployment settings: where the data lives and how it is weighted
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_file: PathBuf,
    pub sheet_name: String,
    pub apartment_column: String,
    pub floor_column: String,
    pub title: String,
    pub building_label: String,
    pub activities: Vec<ActivityWeight>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            apartment_column: "Apartment No".to_string(),
            floor_column: "Floor".to_string(),
            title: "I-Tower Apartment Progress Viewer".to_string(),
            building_label: "I-Tower".to_string(),
            activities: reference_activities(),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "itower", "aptprogress")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    /// Explicit path, then the default location, then the built-in reference.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                tracing::debug!("No config file found, using reference configuration");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config_data = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Config =
            serde_json::from_str(&config_data).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ConfigError::SaveFailed(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let config_data = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        fs::write(path, config_data)
            .map_err(|e| ConfigError::SaveFailed(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Check the weight table and column settings.
    ///
    /// A weight sum other than 1 is accepted and only logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.activities.is_empty() {
            return Err(ConfigError::NoActivities);
        }

        let mut seen = HashSet::new();
        for activity in &self.activities {
            if activity.name.trim().is_empty() {
                return Err(ConfigError::EmptyActivityName);
            }
            if !seen.insert(activity.name.as_str()) {
                return Err(ConfigError::DuplicateActivity(activity.name.clone()));
            }
            if !activity.weight.is_finite() || !(0.0..=1.0).contains(&activity.weight) {
                return Err(ConfigError::InvalidWeight {
                    name: activity.name.clone(),
                    weight: activity.weight,
                });
            }
        }

        for (field, value) in [
            ("apartment_column", &self.apartment_column),
            ("floor_column", &self.floor_column),
        ] {
            if value.trim().is_empty() || seen.contains(value.as_str()) {
                return Err(ConfigError::InvalidColumn {
                    field,
                    value: value.clone(),
                });
            }
        }
        if self.apartment_column == self.floor_column {
            return Err(ConfigError::InvalidColumn {
                field: "floor_column",
                value: self.floor_column.clone(),
            });
        }

        let sum = self.weight_table().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            tracing::warn!(sum, "Activity weights do not sum to 1; overall progress can exceed 100%");
        }

        Ok(())
    }

    pub fn weight_table(&self) -> WeightTable {
        WeightTable::new(self.activities.clone())
    }
}
