//! Skeleton cloning integration tests for fsc CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, count_files_recursive, parse_json};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_skeleton_copies_directories_only() {
    let fixture = TestFixture::new();
    fixture.create_nested_structure(3, 2);
    fs::create_dir_all(fixture.src.path().join("empty/inner")).unwrap();

    let dest = fixture.dst.path().join("mirror");
    cargo_bin_cmd!("fsc")
        .arg("skeleton")
        .arg(fixture.src.path())
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 6 directories"));

    assert!(dest.join("level0/level1/level2").is_dir());
    assert!(dest.join("empty/inner").is_dir());
    assert_eq!(count_files_recursive(&dest), 0);
}

#[test]
fn test_skeleton_json() {
    let fixture = TestFixture::new();
    fs::create_dir_all(fixture.src.path().join("a/b")).unwrap();

    let output = cargo_bin_cmd!("fsc")
        .args(["skeleton", "--output", "json"])
        .arg(fixture.src.path())
        .arg(fixture.dst.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = parse_json(&output.stdout);
    assert_eq!(value["mode"], "skeleton");
    assert_eq!(value["dirs_created"], 2);
}

#[test]
fn test_skeleton_missing_source() {
    let fixture = TestFixture::new();
    let dest = fixture.dst.path().join("mirror");

    cargo_bin_cmd!("fsc")
        .arg("skeleton")
        .arg(fixture.src.path().join("missing"))
        .arg(&dest)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[source_not_found]"));

    assert!(!dest.exists());
}
