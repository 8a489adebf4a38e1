use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use chrono::{Local, Timelike};
use predicates::prelude::*;
use tempfile::tempdir;

fn valid_prefs_json() -> &'static str {
    r#"
{
  "theme": "ocean",
  "timeFormat": "24h",
  "alarms": "[{\"hours\":6,\"minutes\":30,\"active\":true},{\"hour\":7,\"minute\":0,\"active\":false}]"
}
"#
}

#[test]
fn diagnostics_succeeds_with_valid_prefs_file() {
    let dir = tempdir().expect("tempdir");
    let prefs = dir.path().join("preferences.json");
    fs::write(&prefs, valid_prefs_json()).expect("write json");

    let mut cmd = cargo_bin_cmd!("deskclock");
    cmd.arg("--diagnostics")
        .arg("--diagnostics-seconds")
        .arg("1")
        .arg("--prefs")
        .arg(prefs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Tick summary"))
        .stdout(predicate::str::contains("Theme: ocean, format: 24h, alarms: 2 (1 active)"))
        .stdout(predicate::str::contains("Stopwatch drift"));
}

#[test]
fn diagnostics_uses_defaults_when_prefs_file_missing() {
    let dir = tempdir().expect("tempdir");
    let prefs = dir.path().join("missing.json");

    let mut cmd = cargo_bin_cmd!("deskclock");
    cmd.arg("--diagnostics")
        .arg("--diagnostics-seconds")
        .arg("1")
        .arg("--prefs")
        .arg(&prefs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: default, format: 12h, alarms: 0"))
        .stdout(predicate::str::contains("LOCAL_WALL_CLOCK"));
    assert!(!prefs.exists(), "read-only run should not create the file");
}

#[test]
fn diagnostics_do_not_consume_alarm_due_now() {
    let dir = tempdir().expect("tempdir");
    let prefs = dir.path().join("preferences.json");
    let now = Local::now();
    let content = format!(
        "{{\"alarms\": \"[{{\\\"hours\\\":{},\\\"minutes\\\":{},\\\"active\\\":true}}]\"}}\n",
        now.hour(),
        now.minute()
    );
    fs::write(&prefs, &content).expect("write json");

    let mut cmd = cargo_bin_cmd!("deskclock");
    cmd.arg("--diagnostics")
        .arg("--diagnostics-seconds")
        .arg("2")
        .arg("--prefs")
        .arg(&prefs)
        .assert()
        .success()
        .stdout(predicate::str::contains("(read-only)"));
    assert_eq!(fs::read_to_string(&prefs).expect("read back"), content);
}

#[test]
fn malformed_json_fails_with_clear_error() {
    let dir = tempdir().expect("tempdir");
    let prefs = dir.path().join("preferences.json");
    fs::write(&prefs, "{ not-valid-json ").expect("write invalid json");

    let mut cmd = cargo_bin_cmd!("deskclock");
    cmd.arg("--diagnostics")
        .arg("--prefs")
        .arg(prefs)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn malformed_alarm_list_is_ignored_with_warning() {
    let dir = tempdir().expect("tempdir");
    let prefs = dir.path().join("preferences.json");
    fs::write(&prefs, r#"{"theme":"sunset","alarms":"[{oops"}"#).expect("write json");

    let mut cmd = cargo_bin_cmd!("deskclock");
    cmd.arg("--diagnostics")
        .arg("--diagnostics-seconds")
        .arg("1")
        .arg("--prefs")
        .arg(prefs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: sunset, format: 12h, alarms: 0"))
        .stderr(predicate::str::contains("ignoring stored alarms"));
}

#[test]
fn zero_diagnostics_seconds_is_rejected() {
    let mut cmd = cargo_bin_cmd!("deskclock");
    cmd.arg("--diagnostics")
        .arg("--diagnostics-seconds")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "--diagnostics-seconds must be greater than zero",
        ));
}
