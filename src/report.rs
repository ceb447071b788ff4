//! Plain-text rendering for the non-interactive commands

use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

use crate::loader::LoadSummary;
use crate::progress::{ApartmentOverview, ProgressReport, TowerSummary};

/// Shown in place of a missing apartment value
pub const MISSING: &str = "—";

/// `0.38` -> `"38.0%"`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn format_optional_percent(value: Option<f64>) -> String {
    value.map(format_percent).unwrap_or_else(|| MISSING.to_string())
}

/// Pad to `width` terminal columns, counting wide characters correctly
pub fn pad_right(s: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(used)))
}

pub fn pad_left(s: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(s);
    format!("{}{}", " ".repeat(width.saturating_sub(used)), s)
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells
        .map(UnicodeWidthStr::width)
        .chain(std::iter::once(UnicodeWidthStr::width(header)))
        .max()
        .unwrap_or(0)
}

/// Summary metrics followed by the activity comparison table
pub fn render_report(report: &ProgressReport, building_label: &str) -> String {
    let mut out = String::new();
    let avg_header = format!("{} Avg", building_label);

    let _ = writeln!(out, "Apartment No: {}", report.apartment);
    let _ = writeln!(out, "Floor: {}", report.floor);
    let _ = writeln!(
        out,
        "Apartment Total Progress: {}",
        format_percent(report.apartment_overall)
    );
    let _ = writeln!(
        out,
        "{} Overall Progress: {}",
        building_label,
        format_percent(report.dataset_overall)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Activity-wise Comparison");

    let rows: Vec<(String, String, String)> = report
        .activities
        .iter()
        .map(|a| {
            (
                a.name.clone(),
                format_optional_percent(a.apartment_value),
                format_percent(a.dataset_mean),
            )
        })
        .collect();

    let w_name = column_width("Activity", rows.iter().map(|r| r.0.as_str()));
    let w_apt = column_width("Apartment Progress", rows.iter().map(|r| r.1.as_str()));
    let w_avg = column_width(&avg_header, rows.iter().map(|r| r.2.as_str()));

    let _ = writeln!(
        out,
        "{}  {}  {}",
        pad_right("Activity", w_name),
        pad_left("Apartment Progress", w_apt),
        pad_left(&avg_header, w_avg)
    );
    let _ = writeln!(out, "{}", "-".repeat(w_name + w_apt + w_avg + 4));
    for (name, apt, avg) in &rows {
        let _ = writeln!(
            out,
            "{}  {}  {}",
            pad_right(name, w_name),
            pad_left(apt, w_apt),
            pad_left(avg, w_avg)
        );
    }

    out
}

/// One line per apartment
pub fn render_overviews(overviews: &[ApartmentOverview]) -> String {
    let mut out = String::new();
    let floors: Vec<&str> = overviews.iter().map(|o| o.floor.as_str()).collect();
    let w_floor = column_width("Floor", floors.iter().copied());

    let _ = writeln!(
        out,
        "{:<12} {}  {:>8}",
        "Apartment No",
        pad_right("Floor", w_floor),
        "Progress"
    );
    let _ = writeln!(out, "{}", "-".repeat(12 + 1 + w_floor + 2 + 8));
    for o in overviews {
        let _ = writeln!(
            out,
            "{:<12} {}  {:>8}",
            o.apartment,
            pad_right(&o.floor, w_floor),
            format_percent(o.overall)
        );
    }
    out
}

/// Building averages per activity
pub fn render_summary(summary: &TowerSummary, building_label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} Overall Progress: {} ({} apartments)",
        building_label,
        format_percent(summary.dataset_overall),
        summary.apartments
    );
    let _ = writeln!(out);

    let w_name = column_width("Activity", summary.activities.iter().map(|a| a.name.as_str()));
    let _ = writeln!(
        out,
        "{}  {:>6}  {:>8}",
        pad_right("Activity", w_name),
        "Weight",
        "Average"
    );
    let _ = writeln!(out, "{}", "-".repeat(w_name + 2 + 6 + 2 + 8));
    for a in &summary.activities {
        let _ = writeln!(
            out,
            "{}  {:>6.2}  {:>8}",
            pad_right(&a.name, w_name),
            a.weight,
            format_percent(a.mean)
        );
    }
    out
}

/// Short description of what the loader kept, dropped and rescaled
pub fn render_load_summary(summary: &LoadSummary) -> String {
    let mut out = format!(
        "{} [{}]: {} apartments, {} rows ignored",
        summary.source.display(),
        summary.sheet,
        summary.rows_kept,
        summary.rows_dropped
    );
    if !summary.duplicate_apartments.is_empty() {
        let _ = write!(
            out,
            ", {} duplicate apartment rows",
            summary.duplicate_apartments.len()
        );
    }
    if !summary.mixed_scale_columns.is_empty() {
        let _ = write!(
            out,
            "; mixed 0-1/0-100 columns: {}",
            summary.mixed_scale_columns.join(", ")
        );
    }
    if !summary.out_of_range_columns.is_empty() {
        let _ = write!(
            out,
            "; values outside 0-100% in: {}",
            summary.out_of_range_columns.join(", ")
        );
    }
    out
}
