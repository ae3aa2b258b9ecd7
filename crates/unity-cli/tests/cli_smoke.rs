//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `unity` binary to verify that
//! argument parsing, output and error handling work end-to-end.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("unity").unwrap()
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("format"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unity"));
}

// ---------------------------------------------------------------------------
// convert
// ---------------------------------------------------------------------------

#[test]
fn convert_scalar() {
    cmd()
        .args(["convert", "5", "--from", "km", "--to", "m"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5000.0 m\n"));
}

#[test]
fn convert_array_with_negative_values() {
    cmd()
        .args(["convert", "-1", "2", "--from", "m", "--to", "cm"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[-100.0, 200.0] cm\n"));
}

#[test]
fn convert_incompatible_fails() {
    cmd()
        .args(["convert", "1", "--from", "kg", "--to", "m"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incompatible units"));
}

#[test]
fn convert_requires_units() {
    cmd().args(["convert", "1"]).assert().failure();
}

// ---------------------------------------------------------------------------
// check / invert / parse
// ---------------------------------------------------------------------------

#[test]
fn check_compatible_and_not() {
    cmd()
        .args(["check", "N", "kg m s-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("are compatible"));
    cmd()
        .args(["check", "foo", "bar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not compatible"));
}

#[test]
fn invert_expression() {
    cmd()
        .args(["invert", "kg m s-2"])
        .assert()
        .success()
        .stdout(predicate::str::diff("kg-1 m-1 s2\n"));
}

#[test]
fn invert_malformed_fails() {
    cmd()
        .args(["invert", "2m"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid unit token"));
}

#[test]
fn parse_shows_dimensions() {
    cmd()
        .args(["parse", "kPa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("{L: -1, M: 1, T: -2}"));
}

// ---------------------------------------------------------------------------
// format / units / config
// ---------------------------------------------------------------------------

#[test]
fn format_typst() {
    cmd()
        .args(["format", "0.05", "--unit", "kg m s-2"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "$ 5.00E-02 \\u{22C5} kg \\u{22C5} m \\u{22C5} s#super[-2] $\n",
        ));
}

#[test]
fn format_with_override() {
    cmd()
        .args(["format", "1", "2", "--unit", "m", "--number-format", ".1f"])
        .assert()
        .success()
        .stdout(predicate::str::diff("$ [1.0, 2.0] \\u{22C5} m $\n"));
}

#[test]
fn format_with_bad_override_fails() {
    cmd()
        .args(["format", "1", "--number-format", "%d"])
        .assert()
        .failure();
}

#[test]
fn format_with_oversized_precision_fails_cleanly() {
    cmd()
        .args(["format", "1", "--number-format", ".70000f"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid number format").and(predicate::str::contains("panicked").not()));
}

#[test]
fn units_lists_builtin_table() {
    cmd()
        .args(["units", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kPa\""))
        .stdout(predicate::str::contains("\"scale\""));
}

#[test]
fn custom_unit_table_extends_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("extra.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"symbol,scale,dims\nyd,0.9144,L\n").unwrap();

    cmd()
        .args(["convert", "1", "--from", "yd", "--to", "ft", "--units"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("3.0"));

    cmd()
        .args(["check", "yd", "kg", "--replace-builtin", "--units"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("not compatible"));
}

#[test]
fn config_prints_defaults() {
    cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"unit_table\""))
        .stdout(predicate::str::contains("\"extend_builtin\": true"));
}

#[test]
fn nonexistent_config_errors() {
    cmd()
        .args(["config", "--config", "/nonexistent/unity.json"])
        .assert()
        .failure();
}
