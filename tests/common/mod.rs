// Shared fixtures: small progress workbooks written with rust_xlsxwriter

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use aptprogress::Config;

pub const SHEET: &str = "Apartment Progress";

/// Spreadsheet cell for fixtures
pub enum Value {
    Num(f64),
    Text(&'static str),
    Blank,
}

pub use Value::{Blank, Num, Text};

pub fn write_workbook(path: &Path, sheet: &str, rows: &[Vec<Value>]) {
    let mut workbook = Workbook::new();
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                match value {
                    Num(n) => {
                        worksheet.write_number(r as u32, c as u16, *n).unwrap();
                    }
                    Text(s) => {
                        worksheet.write_string(r as u32, c as u16, *s).unwrap();
                    }
                    Blank => {}
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

fn header() -> Vec<Value> {
    let mut row = vec![Text("Apartment No"), Text("Floor")];
    row.extend(
        [
            "MEP Work",
            "Ceiling",
            "Tile Work",
            "Paint Work",
            "Aluminum Work",
            "Wood Work",
            "MEP Fixtures",
            "MS Work",
            "External Plaster",
            "External Travertine",
            "External Paint",
            "Cleaning",
        ]
        .into_iter()
        .map(Text),
    );
    row
}

fn apartment(id: f64, floor: f64, first_four: [f64; 4]) -> Vec<Value> {
    let mut row = vec![Num(id), Num(floor)];
    row.extend(first_four.into_iter().map(Num));
    row.extend((0..8).map(|_| Num(0.0)));
    row
}

/// Tower with a weights row, a gap at 102 and a totals row.
///
/// Ceiling is stored as 0–100 and MS Work mixes scales; everything else is 0–1.
pub fn tower_rows() -> Vec<Vec<Value>> {
    let mut weights = vec![Text("Weights"), Blank];
    weights.extend(
        [0.10, 0.15, 0.20, 0.10, 0.10, 0.20, 0.05, 0.02, 0.03, 0.02, 0.03, 0.02]
            .into_iter()
            .map(Num),
    );

    let mut mixed = apartment(201.0, 2.0, [0.0, 0.0, 0.0, 0.0]);
    mixed[9] = Num(50.0); // MS Work
    let mut r103 = apartment(103.0, 1.0, [1.0, 100.0, 1.0, 1.0]);
    r103[9] = Num(80.0);
    let mut r101 = apartment(101.0, 1.0, [0.5, 100.0, 0.8, 0.2]);
    r101[9] = Num(0.9);

    let mut totals = vec![Text("I-Tower"), Blank];
    totals.extend((0..12).map(|_| Num(0.5)));

    vec![header(), weights, r101, r103, mixed, totals]
}

pub struct Fixture {
    pub dir: TempDir,
    pub workbook: PathBuf,
    pub config: PathBuf,
}

/// Workbook plus a config file pointing at it
pub fn tower_fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("tower.xlsx");
    write_workbook(&workbook, SHEET, &tower_rows());

    let mut config = Config::default();
    config.data_file = workbook.clone();
    let config_path = dir.path().join("config.json");
    config.save_to(&config_path).unwrap();

    Fixture {
        dir,
        workbook,
        config: config_path,
    }
}
