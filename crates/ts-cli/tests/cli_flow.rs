//! End-to-end tests driving the `ts` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn ts_binary() -> String {
    env!("CARGO_BIN_EXE_ts").to_string()
}

/// Write a matters file and a config pointing at it.
fn setup(temp: &Path) -> PathBuf {
    let matters = temp.join("matters.json");
    std::fs::write(
        &matters,
        r#"[
            {"id": "1", "name": "General", "external_id": "0001"},
            {"id": "2", "name": "MOU Review", "external_id": "1404"},
            {"id": "4", "name": "GSC Matter", "external_id": "2000"},
            {"id": "5", "name": "DOW Chemical Rebate"}
        ]"#,
    )
    .unwrap();

    let config = temp.join("config.toml");
    std::fs::write(
        &config,
        format!("matters_path = {:?}\n", matters.display().to_string()),
    )
    .unwrap();
    config
}

fn ts(temp: &Path, config: &Path, args: &[&str]) -> Output {
    Command::new(ts_binary())
        .env("HOME", temp)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("failed to run ts")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "ts should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_parse_resolves_matter_duration_and_date() {
    let temp = TempDir::new().unwrap();
    let config = setup(temp.path());

    let output = ts(
        temp.path(),
        &config,
        &["parse", "Worked on GSC Matter - draft email 1h 30m on 16 Feb 2026"],
    );
    let out = stdout(&output);

    assert!(out.contains("Matter: GSC Matter [2000]"), "{out}");
    assert!(out.contains("Duration: 90 minutes (15 units)"), "{out}");
    assert!(out.contains("Date: 2026-02-16"), "{out}");
    assert!(out.contains("Description: draft email 1h 30m on 16 Feb 2026"), "{out}");
}

#[test]
fn test_parse_json_uses_fallback_date() {
    let temp = TempDir::new().unwrap();
    let config = setup(temp.path());

    let output = ts(
        temp.path(),
        &config,
        &["parse", "Matter 1404 MOU for 2 hours", "--date", "2026-02-15", "--json"],
    );
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();

    assert_eq!(value["decision"], "resolved");
    assert_eq!(value["matter"]["name"], "MOU Review");
    assert_eq!(value["stage"], "external_id");
    assert_eq!(value["minutes"], 120);
    assert_eq!(value["units"], 20);
    assert_eq!(value["date"], "2026-02-15");
}

#[test]
fn test_parse_without_duration_fails() {
    let temp = TempDir::new().unwrap();
    let config = setup(temp.path());

    let output = ts(temp.path(), &config, &["parse", "Worked on GSC Matter"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not extract duration"), "{stderr}");
}

#[test]
fn test_match_reports_fuzzy_score() {
    let temp = TempDir::new().unwrap();
    let config = setup(temp.path());

    let output = ts(temp.path(), &config, &["match", "DOW Chemical"]);
    let out = stdout(&output);

    assert_eq!(
        out,
        "Matched by fuzzy:\n- 5: DOW Chemical Rebate (score 100)\n"
    );
}

#[test]
fn test_units_rounds_up() {
    let temp = TempDir::new().unwrap();
    let config = setup(temp.path());

    let output = ts(temp.path(), &config, &["units", "13"]);
    assert_eq!(stdout(&output), "13 minutes = 3 units (6 minutes each)\n");
}

#[test]
fn test_matters_lists_candidates() {
    let temp = TempDir::new().unwrap();
    let config = setup(temp.path());

    let output = ts(temp.path(), &config, &["matters", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();

    assert_eq!(value.as_array().unwrap().len(), 4);
    assert_eq!(value[3]["name"], "DOW Chemical Rebate");
}
