use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn write_input(dir: &std::path::Path) -> std::path::PathBuf {
    let p = dir.join("data.csv");
    fs::write(&p, "state,value\nCA,100\nTX,200\nNY,300\nCA,999\n").unwrap();
    p
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("usmap").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("usmap"));
}

#[test]
fn plot_writes_html() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("map.html");
    let mut cmd = Command::cargo_bin("usmap").unwrap();
    cmd.arg("plot")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--title", "Sales", "--color-scheme", "Viridis", "--stats"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("States with data: 3/51"));
    assert!(fs::read_to_string(&out).unwrap().contains("<title>Sales</title>"));
}

#[test]
fn stats_reports_duplicates() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path());
    let mut cmd = Command::cargo_bin("usmap").unwrap();
    cmd.arg("stats").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("US MAP DATA SUMMARY"))
        .stdout(predicate::str::contains("duplicate code:"));
}

#[test]
fn export_pdf_map_fails_with_hint() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path());
    let mut cmd = Command::cargo_bin("usmap").unwrap();
    cmd.arg("plot")
        .arg(&input)
        .arg("--out")
        .arg(dir.path().join("map.pdf"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot export .pdf"));
}

#[test]
fn export_writes_clean_table() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("clean.csv");
    let mut cmd = Command::cargo_bin("usmap").unwrap();
    cmd.arg("export").arg(&input).arg("--out").arg(&out);
    cmd.assert().success();
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "code,name,value\nCA,California,100.0\nTX,Texas,200.0\nNY,New York,300.0\n"
    );
}
