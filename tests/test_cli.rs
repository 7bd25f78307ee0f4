#![cfg(feature = "cli")]

mod common;

use assert_cmd::prelude::*;
use common::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn virlog_dump() -> Command {
    Command::new(assert_cmd::cargo_bin!("virlog_dump"))
}

#[test]
fn it_prints_header_and_records() {
    let d = tempdir().unwrap();
    let path = d.path().join("virlog.dat");
    fs::write(&path, sample_log()).unwrap();

    let output = virlog_dump().arg(&path).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches('\n').count(), 3);
    assert!(stdout.starts_with("ID;Timestamp;VirusDB"));
    assert!(stdout.contains("@Teststring.Eicar"));
    assert!(stdout.contains(EICAR_HASH_HEX));
    assert!(output.stderr.is_empty());
}

#[test]
fn it_fails_on_missing_file() {
    let d = tempdir().unwrap();

    virlog_dump()
        .arg(d.path().join("missing.dat"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn it_requires_a_path() {
    virlog_dump().assert().failure();
}

#[test]
fn it_reports_diagnostics_on_stderr() {
    let d = tempdir().unwrap();
    let path = d.path().join("virlog.dat");
    let data = RecordBuilder::new(0).second_id(5).build_delimited();
    fs::write(&path, data).unwrap();

    virlog_dump()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Info").not())
        .stderr(predicate::str::contains("Warning: unexpected bytes in field ID"))
        .stderr(predicate::str::contains("Info: field not found: FirstSeen"));
}

#[test]
fn it_suppresses_diagnostics_when_quiet() {
    let d = tempdir().unwrap();
    let path = d.path().join("virlog.dat");
    fs::write(&path, RecordBuilder::new(0).build_delimited()).unwrap();

    virlog_dump()
        .args(["--quiet", path.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn it_writes_to_output_file() {
    let d = tempdir().unwrap();
    let path = d.path().join("virlog.dat");
    let out = d.path().join("virlog.csv");
    fs::write(&path, sample_log()).unwrap();

    let output = virlog_dump()
        .args(["-o", out.to_str().unwrap(), path.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(fs::read_to_string(&out).unwrap().lines().count(), 3);
}

#[test]
fn it_parses_indexed_layout() {
    let d = tempdir().unwrap();
    let path = d.path().join("virlog.dat");
    fs::write(&path, sample_indexed_log()).unwrap();

    virlog_dump()
        .args(["--layout", "indexed", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ID;VirusDB;"))
        .stdout(predicate::str::contains("@Teststring.Eicar"));
}

#[cfg(feature = "serde")]
#[test]
fn it_writes_json_lines() {
    let d = tempdir().unwrap();
    let path = d.path().join("virlog.dat");
    fs::write(&path, sample_log()).unwrap();

    let output = virlog_dump()
        .args(["--format", "json", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["Infiltration"], "@Teststring.Eicar");
    assert_eq!(lines[1]["ID"], "1");
}
