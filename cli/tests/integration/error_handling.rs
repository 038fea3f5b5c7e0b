//! Error handling integration tests for fsc CLI.
//!
//! These tests verify proper error handling behaviors:
//! - Files cannot overwrite directories (prevents data loss)
//! - Source validation happens before anything is written
//! - Failures abort by default and are recorded with --continue-on-error

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, parse_json};
use predicates::prelude::*;
use std::fs;

/// A source file must never replace a destination directory.
#[test]
fn test_file_never_replaces_directory() {
    let fixture = TestFixture::new();
    fixture.write_src("testdir", "file content");
    fixture.write_dst("out/testdir/inside.txt", "inside content");

    cargo_bin_cmd!("fsc")
        .arg("copy")
        .arg(fixture.src.path())
        .arg(fixture.dst.path().join("out"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to copy"));

    assert!(fixture.dst.path().join("out/testdir").is_dir());
    fixture.assert_file_content(
        &fixture.dst.path().join("out/testdir/inside.txt"),
        "inside content",
    );
}

/// With --continue-on-error the other files still land and the failure is
/// reported with a non-zero exit.
#[test]
fn test_continue_on_error_records_failure() {
    let fixture = TestFixture::new();
    fixture.write_src("a.txt", "A");
    fixture.write_src("blocked", "B");
    fixture.write_src("c.txt", "C");
    fs::create_dir_all(fixture.dst.path().join("out/blocked")).unwrap();

    let output = cargo_bin_cmd!("fsc")
        .args(["copy", "--continue-on-error", "--output", "json"])
        .arg(fixture.src.path())
        .arg(fixture.dst.path().join("out"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value = parse_json(&output.stdout);
    assert_eq!(value["summary"]["files_copied"], 2);
    assert_eq!(value["summary"]["files_failed"], 1);
    assert_eq!(value["items"][1]["outcome"], "failed");
    assert_eq!(value["items"][1]["error_code"], "io_error");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to copy 1 of 3 files"));
    fixture.assert_file_content(&fixture.dst.path().join("out/c.txt"), "C");
}

#[test]
fn test_source_not_found() {
    let fixture = TestFixture::new();
    let dest = fixture.dst.path().join("dest");

    cargo_bin_cmd!("fsc")
        .arg("copy")
        .arg("/nonexistent/directory")
        .arg(&dest)
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("error[source_not_found]")
                .and(predicate::str::contains("does not exist")),
        );

    assert!(!dest.exists());
}

#[test]
fn test_source_is_a_file() {
    let fixture = TestFixture::new();
    fixture.write_src("file.txt", "x");

    cargo_bin_cmd!("fsc")
        .arg("copy")
        .arg(fixture.src.path().join("file.txt"))
        .arg(fixture.dst.path().join("dest"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[not_a_directory]"));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    cargo_bin_cmd!("fsc").assert().failure().code(2);
}
