// Command-line behaviour of the aptprogress binary

mod common;

use std::path::Path;
use std::process::{Command, Output};

use common::tower_fixture;

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aptprogress"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to run aptprogress")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_show_prints_weighted_progress() {
    let fixture = tower_fixture();
    let output = run(&fixture.config, &["show", "101"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Apartment No: 101"));
    assert!(text.contains("Apartment Total Progress: 38.0%"));
    assert!(text.contains("I-Tower Overall Progress: 31.9%"));
    assert!(text.lines().any(|l| l.starts_with("Tile Work") && l.contains("80.0%")));
}

#[test]
fn test_show_json() {
    let fixture = tower_fixture();
    let output = run(&fixture.config, &["show", "103", "--json"]);
    assert_eq!(output.status.code(), Some(0));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["apartment"], 103);
    assert_eq!(value["floor"], "1");
    assert_eq!(value["activities"].as_array().unwrap().len(), 12);
    assert_eq!(value["activities"][0]["name"], "MEP Work");
}

#[test]
fn test_gap_in_numbering_reports_not_found() {
    let fixture = tower_fixture();
    let output = run(&fixture.config, &["show", "102"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Apartment 102 not found in data."));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_out_of_range_is_rejected() {
    let fixture = tower_fixture();
    let output = run(&fixture.config, &["show", "999"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("outside the available range 101..=201"));
}

#[test]
fn test_missing_sheet_is_fatal() {
    let fixture = tower_fixture();
    let output = run(&fixture.config, &["--sheet", "Tower B", "list"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Error:"));
    assert!(err.contains("Sheet 'Tower B' not found"));
}

#[test]
fn test_list_and_summary() {
    let fixture = tower_fixture();

    let output = run(&fixture.config, &["list", "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let ids: Vec<u64> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["apartment"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![101, 103, 201]);

    let output = run(&fixture.config, &["summary"]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.starts_with("I-Tower Overall Progress: 31.9% (3 apartments)"));
    assert!(text.lines().any(|l| l.starts_with("Ceiling") && l.contains("66.7%")));
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let fixture = tower_fixture();
    let target = fixture.dir.path().join("fresh.json");

    let output = run(&target, &["config", "init"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(target.exists());

    let output = run(&target, &["config", "init"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("already exists"));

    let output = run(&target, &["config", "init", "--force"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_config_show_reflects_overrides() {
    let fixture = tower_fixture();
    let output = run(&fixture.config, &["--sheet", "Tower B", "config", "show"]);
    assert_eq!(output.status.code(), Some(0));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["sheet_name"], "Tower B");
    assert_eq!(value["activities"].as_array().unwrap().len(), 12);
}
