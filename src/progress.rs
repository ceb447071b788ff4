//! Weighted progress calculation
//!
//! Pure functions over a [`Dataset`] and a [`WeightTable`]. Nothing here is
//! cached; building averages are recomputed from the dataset on every call.

use serde::Serialize;

use crate::error::{ProgressError, Result};
use crate::model::{ActivityRecord, Dataset, WeightTable};

/// One row of the activity comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityComparison {
    pub name: String,
    pub weight: f64,
    /// `None` when the apartment's cell was empty
    pub apartment_value: Option<f64>,
    pub dataset_mean: f64,
}

/// Progress of one apartment compared with the whole building
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub apartment: u32,
    pub floor: String,
    pub apartment_overall: f64,
    pub dataset_overall: f64,
    pub activities: Vec<ActivityComparison>,
}

/// Building averages without a selected apartment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TowerSummary {
    pub apartments: usize,
    pub dataset_overall: f64,
    pub activities: Vec<ActivityMean>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityMean {
    pub name: String,
    pub weight: f64,
    pub mean: f64,
}

/// One line of the apartment listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApartmentOverview {
    pub apartment: u32,
    pub floor: String,
    pub overall: f64,
}

/// Σ value × weight; missing values contribute nothing
pub fn weighted_sum<I>(values: I, weights: &WeightTable) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values
        .into_iter()
        .zip(weights.entries())
        .map(|(value, activity)| value.unwrap_or(0.0) * activity.weight)
        .sum()
}

/// Arithmetic mean of the present values; 0 when there are none
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Apartment values for each weighted activity, in weight-table order
fn aligned_values<'a>(
    dataset: &'a Dataset,
    weights: &'a WeightTable,
    record: &'a ActivityRecord,
) -> impl Iterator<Item = Option<f64>> + 'a {
    weights.names().map(move |name| {
        dataset
            .activity_index(name)
            .and_then(|idx| record.value(idx))
    })
}

/// Building-wide mean for every weighted activity, in weight-table order
pub fn activity_means(dataset: &Dataset, weights: &WeightTable) -> Vec<f64> {
    weights
        .names()
        .map(|name| match dataset.activity_index(name) {
            Some(idx) => mean(dataset.records().iter().map(|r| r.value(idx))),
            None => 0.0,
        })
        .collect()
}

/// Compare one apartment against the building average
pub fn compute_progress(
    dataset: &Dataset,
    weights: &WeightTable,
    apartment: u32,
) -> Result<ProgressReport> {
    let record = dataset
        .find(apartment)
        .ok_or(ProgressError::NotFound(apartment))?;

    let values: Vec<Option<f64>> = aligned_values(dataset, weights, record).collect();
    let means = activity_means(dataset, weights);

    let apartment_overall = weighted_sum(values.iter().copied(), weights);
    let dataset_overall = weighted_sum(means.iter().copied().map(Some), weights);

    let activities = weights
        .entries()
        .iter()
        .zip(values)
        .zip(means)
        .map(|((activity, apartment_value), dataset_mean)| ActivityComparison {
            name: activity.name.clone(),
            weight: activity.weight,
            apartment_value,
            dataset_mean,
        })
        .collect();

    Ok(ProgressReport {
        apartment: record.apartment,
        floor: record.floor.clone(),
        apartment_overall,
        dataset_overall,
        activities,
    })
}

/// Per-activity building averages and the weighted building total
pub fn tower_summary(dataset: &Dataset, weights: &WeightTable) -> TowerSummary {
    let means = activity_means(dataset, weights);
    let dataset_overall = weighted_sum(means.iter().copied().map(Some), weights);

    TowerSummary {
        apartments: dataset.len(),
        dataset_overall,
        activities: weights
            .entries()
            .iter()
            .zip(means)
            .map(|(activity, mean)| ActivityMean {
                name: activity.name.clone(),
                weight: activity.weight,
                mean,
            })
            .collect(),
    }
}

/// Overall progress of every apartment, in source order
pub fn apartment_overviews(dataset: &Dataset, weights: &WeightTable) -> Vec<ApartmentOverview> {
    dataset
        .records()
        .iter()
        .map(|record| ApartmentOverview {
            apartment: record.apartment,
            floor: record.floor.clone(),
            overall: weighted_sum(aligned_values(dataset, weights, record), weights),
        })
        .collect()
}
