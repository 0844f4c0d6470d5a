use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn script_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[allow(deprecated)]
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("circbuf").unwrap();
    cmd.arg("--help").assert().success();
}

#[allow(deprecated)]
#[test]
fn test_cli_runs_script_file() {
    let file = script_file("3\nA 2\nx y\nL\nR 1\nL\nQ\n");
    let mut cmd = Command::cargo_bin("circbuf").unwrap();
    cmd.arg(file.path())
        .assert()
        .success()
        .stdout("x\ny\ny\n");
}

#[allow(deprecated)]
#[test]
fn test_cli_reads_stdin() {
    let mut cmd = Command::cargo_bin("circbuf").unwrap();
    cmd.arg("-")
        .write_stdin("2 A 2 a b R 1 A 1 c L Q")
        .assert()
        .success()
        .stdout("b\nc\n");
}

#[allow(deprecated)]
#[test]
fn test_cli_buffer_full_fails() {
    let mut cmd = Command::cargo_bin("circbuf").unwrap();
    cmd.write_stdin("1 A 2 a b Q")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Buffer Full"));
}

#[allow(deprecated)]
#[test]
fn test_cli_bad_command_fails() {
    let file = script_file("2\nA 1 x\nP\nQ\n");
    let mut cmd = Command::cargo_bin("circbuf").unwrap();
    cmd.arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input File Fault"));
}

#[allow(deprecated)]
#[test]
fn test_cli_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("circbuf").unwrap();
    cmd.arg(dir.path().join("nope.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot open file"));
}

#[allow(deprecated)]
#[test]
fn test_cli_reports_fault_once() {
    let mut cmd = Command::cargo_bin("circbuf").unwrap();
    cmd.env_remove("RUST_LOG")
        .write_stdin("1 A 2 a b Q")
        .assert()
        .code(1)
        .stderr("Status is Buffer Full --- Buffer is full and cannot append any element\n");
}

#[allow(deprecated)]
#[test]
fn test_cli_stops_reading_at_quit() {
    let mut cmd = Command::cargo_bin("circbuf").unwrap();
    cmd.write_stdin(&b"2 A 1 x L Q \xff\xfe garbage"[..])
        .assert()
        .success()
        .stdout("x\n");
}
