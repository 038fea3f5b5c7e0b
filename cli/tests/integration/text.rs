//! Text read/write integration tests for fsc CLI.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

#[rstest]
#[case::blocking(false)]
#[case::non_blocking(true)]
fn test_write_append_read(#[case] use_async: bool) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logs/today.txt");

    let write = |text: &str, append: bool| {
        let mut cmd = cargo_bin_cmd!("fsc");
        cmd.arg("write").arg(&path).arg(text);
        if append {
            cmd.arg("--append");
        }
        if use_async {
            cmd.arg("--async");
        }
        cmd.assert().success();
    };
    write("first", false);
    write("second", true);

    assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");

    cargo_bin_cmd!("fsc")
        .arg("read")
        .arg(&path)
        .assert()
        .success()
        .stdout("first\nsecond\n");
}

#[test]
fn test_write_blank_text_is_noop() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blank.txt");

    cargo_bin_cmd!("fsc")
        .arg("write")
        .arg(&path)
        .arg("   ")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to write"));

    assert!(!path.exists());
}

#[test]
fn test_read_missing_file_prints_nothing() {
    let dir = TempDir::new().unwrap();

    cargo_bin_cmd!("fsc")
        .arg("read")
        .arg(dir.path().join("missing.txt"))
        .assert()
        .success()
        .stdout("");
}
