//! Integration tests for the CLI interface
//!
//! Each test points the binary at a CSV export in a temporary directory.

mod common;

use assert_cmd::Command;
use common::CsvFixture;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("campus-insights").unwrap();
    cmd.current_dir(dir.path());
    for var in [
        "CAMPUS_LOG_LEVEL",
        "CAMPUS_DATABASE_URL",
        "CAMPUS_DATABASE_PASSWORD",
        "CAMPUS_DATABASE_TABLE",
        "CAMPUS_SERVER_HOST",
        "CAMPUS_SERVER_PORT",
        "CAMPUS_CSV_PATH",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_cli_help_flag() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_views_lists_navigation() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("views")
        .assert()
        .success()
        .stdout(predicate::str::contains("basic-statistics"))
        .stdout(predicate::str::contains("Province, Faculty, and School Distribution"))
        .stdout(predicate::str::contains("Student Registration Date"));
}

#[test]
fn test_view_as_markdown() {
    let fixture = CsvFixture::sample().unwrap();
    cli(&fixture.dir)
        .arg("--csv")
        .arg(&fixture.path)
        .args(["view", "province-summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Province Summary"))
        .stdout(predicate::str::contains("Songkhla"))
        .stdout(predicate::str::contains("| 6 |"));
}

#[test]
fn test_view_accepts_title_and_json() {
    let fixture = CsvFixture::sample().unwrap();
    let output = cli(&fixture.dir)
        .arg("--csv")
        .arg(&fixture.path)
        .args(["view", "Basic Statistics", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let page: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["slug"], "basic-statistics");
    assert_eq!(page["sections"][0]["type"], "id_list");
    assert_eq!(page["sections"][0]["ids"], serde_json::json!(["6403", "6407"]));
    assert_eq!(page["sections"][1]["value"], 10);
}

#[test]
fn test_view_as_csv() {
    let fixture = CsvFixture::sample().unwrap();
    cli(&fixture.dir)
        .arg("--csv")
        .arg(&fixture.path)
        .args(["view", "top-provinces-and-faculties", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("chart,"))
        .stdout(predicate::str::contains("total_students"))
        .stdout(predicate::str::contains("Engineering"));
}

#[test]
fn test_unknown_view_is_rejected() {
    let fixture = CsvFixture::sample().unwrap();
    cli(&fixture.dir)
        .arg("--csv")
        .arg(&fixture.path)
        .args(["view", "campus-map"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown view 'campus-map'"));
}

#[test]
fn test_missing_defaults_to_school() {
    let fixture = CsvFixture::sample().unwrap();
    cli(&fixture.dir)
        .arg("--csv")
        .arg(&fixture.path)
        .arg("missing")
        .assert()
        .success()
        .stdout("6403\n6407\n");
}

#[test]
fn test_missing_with_unknown_field() {
    let fixture = CsvFixture::sample().unwrap();
    cli(&fixture.dir)
        .arg("--csv")
        .arg(&fixture.path)
        .args(["missing", "--field", "dormitory"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dormitory"));
}

#[test]
fn test_missing_csv_file_exits_with_storage_code() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--csv", "absent.csv", "missing"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Error: [E2001]"));
}

#[test]
fn test_csv_without_expected_columns() {
    let fixture = CsvFixture::new("id,province\n1,Satun\n").unwrap();
    cli(&fixture.dir)
        .arg("--csv")
        .arg(&fixture.path)
        .args(["view", "province-summary"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("[E2002]"));
}

#[test]
fn test_config_is_redacted() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("campus-insights.toml"),
        r#"
[database]
url = "mysql://analyst@db.internal:3306/student_list"
password = "hunter2"

[server]
port = 9000
"#,
    )
    .unwrap();

    cli(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("port = 9000"))
        .stdout(predicate::str::contains("***"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_invalid_config_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("settings.toml"),
        "[views]\ntop_n = 0\nother_threshold_pct = 250.0\n",
    )
    .unwrap();

    cli(&dir)
        .args(["-c", "settings.toml", "config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("[E1003]"));
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--config", "nowhere.toml", "views"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("[E1001]"));
}
