//! Core data types: activity weights, apartment records and the loaded dataset

use serde::{Deserialize, Serialize};

/// One activity and its contribution to overall progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityWeight {
    pub name: String,
    pub weight: f64,
}

impl ActivityWeight {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Ordered mapping from activity name to weight.
///
/// The order is the display order of every activity table and the column
/// order of [`ActivityRecord::values`]. Weights are not required to sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    entries: Vec<ActivityWeight>,
}

impl WeightTable {
    pub fn new(entries: Vec<ActivityWeight>) -> Self {
        Self { entries }
    }

    /// The I-Tower weights
    pub fn reference() -> Self {
        Self::new(reference_activities())
    }

    pub fn entries(&self) -> &[ActivityWeight] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn weight_of(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.weight)
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|a| a.weight).sum()
    }
}

/// Reference activities in display order
pub fn reference_activities() -> Vec<ActivityWeight> {
    vec![
        ActivityWeight::new("MEP Work", 0.10),
        ActivityWeight::new("Ceiling", 0.15),
        ActivityWeight::new("Tile Work", 0.20),
        ActivityWeight::new("Paint Work", 0.10),
        ActivityWeight::new("Aluminum Work", 0.10),
        ActivityWeight::new("Wood Work", 0.20),
        ActivityWeight::new("MEP Fixtures", 0.05),
        ActivityWeight::new("MS Work", 0.02),
        ActivityWeight::new("External Plaster", 0.03),
        ActivityWeight::new("External Travertine", 0.02),
        ActivityWeight::new("External Paint", 0.03),
        ActivityWeight::new("Cleaning", 0.02),
    ]
}

/// One apartment row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    pub apartment: u32,
    pub floor: String,
    /// Normalized progress per activity, aligned with the dataset's
    /// activity order. `None` means the cell was empty or not numeric.
    pub values: Vec<Option<f64>>,
}

impl ActivityRecord {
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }
}

/// Apartments in source row order, immutable once loaded
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    activities: Vec<String>,
    records: Vec<ActivityRecord>,
}

impl Dataset {
    /// Build a dataset from already-normalized records.
    ///
    /// Every record must carry one value slot per activity.
    pub fn new(activities: Vec<String>, records: Vec<ActivityRecord>) -> Self {
        debug_assert!(records.iter().all(|r| r.values.len() == activities.len()));
        Self {
            activities,
            records,
        }
    }

    pub fn activities(&self) -> &[String] {
        &self.activities
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn activity_index(&self, name: &str) -> Option<usize> {
        self.activities.iter().position(|a| a == name)
    }

    /// First record whose apartment number equals `apartment`
    pub fn find(&self, apartment: u32) -> Option<&ActivityRecord> {
        self.records.iter().find(|r| r.apartment == apartment)
    }

    /// Smallest and largest apartment number, `None` for an empty dataset
    pub fn apartment_range(&self) -> Option<(u32, u32)> {
        let min = self.records.iter().map(|r| r.apartment).min()?;
        let max = self.records.iter().map(|r| r.apartment).max()?;
        Some((min, max))
    }

    /// Nearest existing apartment number strictly above `apartment`
    pub fn next_apartment(&self, apartment: u32) -> Option<u32> {
        self.records
            .iter()
            .map(|r| r.apartment)
            .filter(|&a| a > apartment)
            .min()
    }

    /// Nearest existing apartment number strictly below `apartment`
    pub fn previous_apartment(&self, apartment: u32) -> Option<u32> {
        self.records
            .iter()
            .map(|r| r.apartment)
            .filter(|&a| a < apartment)
            .max()
    }
}
