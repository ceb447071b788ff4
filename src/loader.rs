//! Spreadsheet loading and normalization
//!
//! Reads one worksheet with calamine, keeps the rows whose apartment cell is
//! numeric and rescales percentage columns to 0–1. Everything that is
//! silently dropped or rescaled is counted in [`LoadSummary`] and logged.

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::error::DataSourceError;
use crate::model::{ActivityRecord, Dataset};

/// Spreadsheet cell reduced to what the loader cares about
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Numeric value of the cell; numeric text counts, like `pd.to_numeric`
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Display text; whole numbers print without a fractional part
    pub fn display_text(&self) -> String {
        match self {
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Empty => String::new(),
        }
    }

    fn is_header(&self, name: &str) -> bool {
        matches!(self, Cell::Text(s) if s.trim() == name)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::Text(s.clone()),
            Data::Empty => Cell::Empty,
            other => Cell::Text(other.to_string()),
        }
    }
}

/// Columns the loader expects to find
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schema {
    pub apartment_column: String,
    pub floor_column: String,
    pub activities: Vec<String>,
}

impl Schema {
    pub fn from_config(config: &Config) -> Self {
        Self {
            apartment_column: config.apartment_column.clone(),
            floor_column: config.floor_column.clone(),
            activities: config.activities.iter().map(|a| a.name.clone()).collect(),
        }
    }
}

/// How the scale heuristic treated one activity column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnScale {
    /// Every value was already at most 1
    Fraction,
    /// Some value exceeded 1, so the whole column was divided by 100
    Percent {
        /// The column also held non-zero values of at most 1, which were
        /// divided as well
        mixed: bool,
    },
}

/// Divide the whole column by 100 if any value exceeds 1.
///
/// This is a per-column decision. A column mixing both scales is rescaled
/// wholesale and reported as `mixed` rather than corrected cell by cell.
pub fn normalize_column(values: &mut [Option<f64>]) -> ColumnScale {
    let present = || values.iter().flatten();
    if !present().any(|&v| v > 1.0) {
        return ColumnScale::Fraction;
    }

    let mixed = present().any(|&v| v > 0.0 && v <= 1.0);
    for v in values.iter_mut().flatten() {
        *v /= 100.0;
    }
    ColumnScale::Percent { mixed }
}

/// Number of present values outside 0–1
pub fn count_out_of_range(values: &[Option<f64>]) -> usize {
    values
        .iter()
        .flatten()
        .filter(|v| !(0.0..=1.0).contains(*v))
        .count()
}

/// What happened while loading
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub source: PathBuf,
    pub sheet: String,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
    pub duplicate_apartments: Vec<u32>,
    pub rescaled_columns: Vec<String>,
    pub mixed_scale_columns: Vec<String>,
    /// Columns still holding values outside 0–1 after rescaling
    pub out_of_range_columns: Vec<String>,
    pub loaded_at: DateTime<Local>,
}

/// A dataset together with its load summary
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub summary: LoadSummary,
}

/// Read `sheet` from the workbook at `path` and build a dataset
pub fn load_dataset(
    path: &Path,
    sheet: &str,
    schema: &Schema,
) -> Result<LoadedDataset, DataSourceError> {
    tracing::debug!(path = %path.display(), sheet, "Reading workbook");
    let rows = read_sheet(path, sheet)?;
    build_dataset(path, sheet, &rows, schema)
}

fn read_sheet(path: &Path, sheet: &str) -> Result<Vec<Vec<Cell>>, DataSourceError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| DataSourceError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let available = workbook.sheet_names();
    if !available.iter().any(|s| s == sheet) {
        return Err(DataSourceError::SheetMissing {
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| DataSourceError::SheetUnreadable {
            sheet: sheet.to_string(),
            reason: e.to_string(),
        })?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect())
        .collect())
}

fn column_index(header: &[Cell], sheet: &str, column: &str) -> Result<usize, DataSourceError> {
    header
        .iter()
        .position(|c| c.is_header(column))
        .ok_or_else(|| DataSourceError::MissingColumn {
            sheet: sheet.to_string(),
            column: column.to_string(),
        })
}

fn apartment_number(cell: &Cell) -> Option<u32> {
    let n = cell.as_number()?.trunc();
    if n >= 1.0 && n <= f64::from(u32::MAX) {
        Some(n as u32)
    } else {
        None
    }
}

/// Turn raw sheet rows into a normalized dataset.
///
/// The header is the first row holding the apartment column name.
pub fn build_dataset(
    source: &Path,
    sheet: &str,
    rows: &[Vec<Cell>],
    schema: &Schema,
) -> Result<LoadedDataset, DataSourceError> {
    let header_pos = rows
        .iter()
        .position(|row| row.iter().any(|c| c.is_header(&schema.apartment_column)))
        .ok_or_else(|| DataSourceError::HeaderNotFound {
            sheet: sheet.to_string(),
            column: schema.apartment_column.clone(),
        })?;
    let header = &rows[header_pos];

    let apartment_idx = column_index(header, sheet, &schema.apartment_column)?;
    let floor_idx = column_index(header, sheet, &schema.floor_column)?;
    let activity_idx = schema
        .activities
        .iter()
        .map(|name| column_index(header, sheet, name))
        .collect::<Result<Vec<_>, _>>()?;

    let empty = Cell::Empty;
    let data_rows = &rows[header_pos + 1..];
    let mut seen = HashSet::new();
    let mut duplicate_apartments = Vec::new();
    let mut rows_dropped = 0;
    let mut apartments = Vec::new();
    let mut floors = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); activity_idx.len()];

    for (offset, row) in data_rows.iter().enumerate() {
        let cell = |idx: usize| row.get(idx).unwrap_or(&empty);

        let Some(apartment) = apartment_number(cell(apartment_idx)) else {
            rows_dropped += 1;
            tracing::debug!(
                row = header_pos + offset + 2,
                value = %cell(apartment_idx).display_text(),
                "Skipping row without a numeric apartment number"
            );
            continue;
        };

        if !seen.insert(apartment) {
            tracing::warn!(apartment, "Duplicate apartment number; keeping the first row");
            duplicate_apartments.push(apartment);
            continue;
        }

        apartments.push(apartment);
        floors.push(cell(floor_idx).display_text());
        for (column, &idx) in columns.iter_mut().zip(&activity_idx) {
            column.push(cell(idx).as_number());
        }
    }

    if apartments.is_empty() {
        return Err(DataSourceError::NoApartments {
            sheet: sheet.to_string(),
        });
    }

    let mut rescaled_columns = Vec::new();
    let mut mixed_scale_columns = Vec::new();
    let mut out_of_range_columns = Vec::new();
    for (name, column) in schema.activities.iter().zip(columns.iter_mut()) {
        if let ColumnScale::Percent { mixed } = normalize_column(column) {
            tracing::debug!(column = %name, "Rescaled percentage column to 0-1");
            rescaled_columns.push(name.clone());
            if mixed {
                tracing::warn!(
                    column = %name,
                    "Column mixes 0-1 and 0-100 values; the whole column was divided by 100"
                );
                mixed_scale_columns.push(name.clone());
            }
        }

        let outside = count_out_of_range(column);
        if outside > 0 {
            tracing::warn!(
                column = %name,
                cells = outside,
                "Column has values outside 0-1 after rescaling; kept as read"
            );
            out_of_range_columns.push(name.clone());
        }
    }

    let records: Vec<ActivityRecord> = apartments
        .into_iter()
        .zip(floors)
        .enumerate()
        .map(|(i, (apartment, floor))| ActivityRecord {
            apartment,
            floor,
            values: columns.iter().map(|c| c[i]).collect(),
        })
        .collect();

    let summary = LoadSummary {
        source: source.to_path_buf(),
        sheet: sheet.to_string(),
        rows_read: data_rows.len(),
        rows_kept: records.len(),
        rows_dropped,
        duplicate_apartments,
        rescaled_columns,
        mixed_scale_columns,
        out_of_range_columns,
        loaded_at: Local::now(),
    };

    tracing::info!(
        source = %source.display(),
        sheet,
        kept = summary.rows_kept,
        dropped = summary.rows_dropped,
        "Loaded apartment progress"
    );

    Ok(LoadedDataset {
        dataset: Dataset::new(schema.activities.clone(), records),
        summary,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourceKey {
    path: PathBuf,
    sheet: String,
    schema: Schema,
}

/// Memoizes loads so each distinct source is read at most once
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<SourceKey, Arc<LoadedDataset>>,
    reads: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(
        &mut self,
        path: &Path,
        sheet: &str,
        schema: &Schema,
    ) -> Result<Arc<LoadedDataset>, DataSourceError> {
        let key = SourceKey {
            path: path.canonicalize().unwrap_or_else(|_| path.to_path_buf()),
            sheet: sheet.to_string(),
            schema: schema.clone(),
        };

        if let Some(hit) = self.entries.get(&key) {
            tracing::debug!(path = %path.display(), sheet, "Dataset cache hit");
            return Ok(Arc::clone(hit));
        }

        let loaded = Arc::new(load_dataset(path, sheet, schema)?);
        self.reads += 1;
        self.entries.insert(key, Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Number of times a workbook was actually read
    pub fn reads(&self) -> usize {
        self.reads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn num(n: f64) -> Cell {
        Cell::Number(n)
    }

    fn schema() -> Schema {
        Schema {
            apartment_column: "Apartment No".to_string(),
            floor_column: "Floor".to_string(),
            activities: vec!["Ceiling".to_string(), "Tile Work".to_string()],
        }
    }

    fn build(rows: &[Vec<Cell>]) -> Result<LoadedDataset, DataSourceError> {
        build_dataset(Path::new("inline.xlsx"), "Apartment Progress", rows, &schema())
    }

    #[test]
    fn test_mixed_scale_column_divided_wholesale() {
        let mut column = vec![Some(50.0), Some(80.0), Some(0.9)];
        assert_eq!(
            normalize_column(&mut column),
            ColumnScale::Percent { mixed: true }
        );
        let expected = [0.5, 0.8, 0.009];
        for (got, want) in column.iter().zip(expected) {
            let got = got.unwrap();
            assert!((got - want).abs() < 1e-12, "{got} != {want}");
        }
    }

    #[test]
    fn test_values_outside_unit_range_are_reported() {
        let rows = vec![
            vec![text("Apartment No"), text("Floor"), text("Ceiling"), text("Tile Work")],
            vec![num(101.0), text("1"), num(120.0), num(-0.5)],
            vec![num(102.0), text("1"), num(50.0), num(0.5)],
        ];
        let loaded = build(&rows).unwrap();

        // Kept as read, but flagged
        let r = loaded.dataset.find(101).unwrap();
        assert!((r.values[0].unwrap() - 1.2).abs() < 1e-12);
        assert_eq!(r.values[1], Some(-0.5));
        assert_eq!(loaded.summary.rescaled_columns, vec!["Ceiling".to_string()]);
        assert_eq!(
            loaded.summary.out_of_range_columns,
            vec!["Ceiling".to_string(), "Tile Work".to_string()]
        );
        assert!(loaded.summary.mixed_scale_columns.is_empty());

        for record in loaded.dataset.records() {
            for (name, v) in loaded.dataset.activities().iter().zip(&record.values) {
                if let Some(v) = v {
                    assert!(
                        (0.0..=1.0).contains(v)
                            || loaded.summary.out_of_range_columns.contains(name)
                    );
                }
            }
        }
    }

    #[test]
    fn test_count_out_of_range() {
        assert_eq!(count_out_of_range(&[Some(0.0), Some(1.0), None]), 0);
        assert_eq!(count_out_of_range(&[Some(1.01), Some(-0.1), Some(0.5)]), 2);
    }

    #[test]
    fn test_fraction_column_untouched() {
        let mut column = vec![Some(0.0), Some(1.0), None, Some(0.5)];
        assert_eq!(normalize_column(&mut column), ColumnScale::Fraction);
        assert_eq!(column, vec![Some(0.0), Some(1.0), None, Some(0.5)]);
    }

    #[test]
    fn test_percent_column_without_fractions_is_not_mixed() {
        let mut column = vec![Some(0.0), Some(100.0), None, Some(40.0)];
        assert_eq!(
            normalize_column(&mut column),
            ColumnScale::Percent { mixed: false }
        );
        assert_eq!(column, vec![Some(0.0), Some(1.0), None, Some(0.4)]);
    }

    #[test]
    fn test_cell_parsing() {
        assert_eq!(num(101.0).as_number(), Some(101.0));
        assert_eq!(text(" 102 ").as_number(), Some(102.0));
        assert_eq!(text("Total").as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
        assert_eq!(num(f64::NAN).as_number(), None);
        assert_eq!(num(3.0).display_text(), "3");
        assert_eq!(num(2.5).display_text(), "2.5");
        assert_eq!(text(" Ground ").display_text(), "Ground");
    }

    #[test]
    fn test_non_numeric_rows_dropped_and_counted() {
        let rows = vec![
            vec![text("Apartment No"), text("Floor"), text("Ceiling"), text("Tile Work")],
            vec![text("Weights"), Cell::Empty, num(0.15), num(0.20)],
            vec![num(101.0), num(1.0), num(100.0), num(50.0)],
            vec![text("102"), num(1.0), num(0.0), num(25.0)],
            vec![text("I-Tower"), Cell::Empty, num(50.0), num(37.5)],
            vec![num(0.0), num(0.0), num(10.0), num(10.0)],
        ];
        let loaded = build(&rows).unwrap();

        let ids: Vec<u32> = loaded.dataset.records().iter().map(|r| r.apartment).collect();
        assert_eq!(ids, vec![101, 102]);
        assert_eq!(loaded.summary.rows_read, 5);
        assert_eq!(loaded.summary.rows_kept, 2);
        assert_eq!(loaded.summary.rows_dropped, 3);
        assert_eq!(
            loaded.summary.rescaled_columns,
            vec!["Ceiling".to_string(), "Tile Work".to_string()]
        );
        assert!(loaded.summary.mixed_scale_columns.is_empty());

        let r = loaded.dataset.find(101).unwrap();
        assert_eq!(r.floor, "1");
        assert_eq!(r.values, vec![Some(1.0), Some(0.5)]);
    }

    #[test]
    fn test_values_within_unit_interval() {
        let rows = vec![
            vec![text("Apartment No"), text("Floor"), text("Ceiling"), text("Tile Work")],
            vec![num(101.0), text("1"), num(100.0), num(0.3)],
            vec![num(102.0), text("1"), num(35.0), num(1.0)],
            vec![num(201.0), text("2"), num(0.0), Cell::Empty],
        ];
        let loaded = build(&rows).unwrap();
        for record in loaded.dataset.records() {
            for v in record.values.iter().flatten() {
                assert!((0.0..=1.0).contains(v), "value {v} out of range");
            }
        }
        assert_eq!(loaded.dataset.find(201).unwrap().values[1], None);
    }

    #[test]
    fn test_identifier_truncated_to_integer() {
        let rows = vec![
            vec![text("Apartment No"), text("Floor"), text("Ceiling"), text("Tile Work")],
            vec![num(101.7), text("1"), num(0.5), num(0.5)],
        ];
        let loaded = build(&rows).unwrap();
        assert!(loaded.dataset.find(101).is_some());
    }

    #[test]
    fn test_duplicates_keep_first() {
        let rows = vec![
            vec![text("Apartment No"), text("Floor"), text("Ceiling"), text("Tile Work")],
            vec![num(101.0), text("1"), num(0.2), num(0.2)],
            vec![num(101.0), text("1"), num(0.9), num(0.9)],
        ];
        let loaded = build(&rows).unwrap();
        assert_eq!(loaded.dataset.len(), 1);
        assert_eq!(loaded.summary.duplicate_apartments, vec![101]);
        assert_eq!(loaded.dataset.find(101).unwrap().values[0], Some(0.2));
    }

    #[test]
    fn test_header_found_below_title_rows() {
        let rows = vec![
            vec![text("I-Tower progress"), Cell::Empty],
            vec![],
            vec![text("Floor"), text("Apartment No"), text("Tile Work"), text("Ceiling")],
            vec![text("3"), num(301.0), num(0.5)],
        ];
        let loaded = build(&rows).unwrap();
        let r = loaded.dataset.find(301).unwrap();
        assert_eq!(r.floor, "3");
        // Short rows read as empty cells; values follow schema order
        assert_eq!(r.values, vec![None, Some(0.5)]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let rows = vec![
            vec![text("Apartment No"), text("Floor"), text("Ceiling")],
            vec![num(101.0), text("1"), num(0.5)],
        ];
        match build(&rows) {
            Err(DataSourceError::MissingColumn { column, .. }) => assert_eq!(column, "Tile Work"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_header_and_no_apartments() {
        let rows = vec![vec![text("Unit"), text("Floor")], vec![num(1.0), num(1.0)]];
        assert!(matches!(
            build(&rows),
            Err(DataSourceError::HeaderNotFound { .. })
        ));

        let rows = vec![
            vec![text("Apartment No"), text("Floor"), text("Ceiling"), text("Tile Work")],
            vec![text("Total"), Cell::Empty, num(1.0), num(1.0)],
        ];
        assert!(matches!(
            build(&rows),
            Err(DataSourceError::NoApartments { .. })
        ));
    }

    #[test]
    fn test_unreadable_file_is_data_source_error() {
        let mut cache = DatasetCache::new();
        let result = cache.get_or_load(
            Path::new("/definitely/not/here.xlsx"),
            "Apartment Progress",
            &schema(),
        );
        assert!(matches!(result, Err(DataSourceError::Open { .. })));
        assert_eq!(cache.reads(), 0);
    }
}
