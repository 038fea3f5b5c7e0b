//! Modified-file and phrase search integration tests for fsc CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, parse_json};
use predicates::prelude::*;
use std::fs::File;
use std::time::{Duration, SystemTime};

fn age(path: &std::path::Path, days: u64) {
    let when = SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(when)
        .unwrap();
}

#[test]
fn test_modified_includes_root_files() {
    let fixture = TestFixture::new();
    fixture.write_src("root.txt", "r");
    fixture.write_src("sub/nested.txt", "n");
    fixture.write_src("sub/stale.txt", "s");
    age(&fixture.src.path().join("sub/stale.txt"), 30);

    cargo_bin_cmd!("fsc")
        .args(["modified", "--days", "2"])
        .arg(fixture.src.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("root.txt")
                .and(predicate::str::contains("nested.txt"))
                .and(predicate::str::contains("stale.txt").not()),
        );
}

#[test]
fn test_modified_json_and_since() {
    let fixture = TestFixture::new();
    fixture.write_src("old.txt", "o");
    age(&fixture.src.path().join("old.txt"), 400);

    let output = cargo_bin_cmd!("fsc")
        .args(["modified", "--output", "json", "--since", "2000-01-01T00:00:00Z"])
        .arg(fixture.src.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = parse_json(&output.stdout);
    assert_eq!(value["mode"], "modified");
    assert_eq!(value["files"].as_array().unwrap().len(), 1);
}

#[test]
fn test_modified_html_empty() {
    let fixture = TestFixture::new();
    fixture.write_src("stale.txt", "s");
    age(&fixture.src.path().join("stale.txt"), 10);

    cargo_bin_cmd!("fsc")
        .args(["modified", "--html", "-d", "1"])
        .arg(fixture.src.path())
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("<h1>Files modified since 1 days under")
                .and(predicate::str::contains("No files found")),
        );
}

#[test]
fn test_modified_invalid_timestamp() {
    let fixture = TestFixture::new();

    cargo_bin_cmd!("fsc")
        .args(["modified", "--since", "yesterday"])
        .arg(fixture.src.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid timestamp"));
}

#[test]
fn test_find_phrases() {
    let fixture = TestFixture::new();
    fixture.write_src("notes.txt", "Remember the Milk");
    fixture.write_src("docs/readme.md", "milk and honey");

    cargo_bin_cmd!("fsc")
        .args(["find", "-i"])
        .arg(fixture.src.path())
        .arg("milk, honey")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Phrase = milk")
                .and(predicate::str::contains("notes.txt"))
                .and(predicate::str::contains("Phrase = honey")),
        );
}

#[test]
fn test_find_with_pattern_json() {
    let fixture = TestFixture::new();
    fixture.write_src("notes.txt", "milk");
    fixture.write_src("docs/readme.md", "milk");

    let output = cargo_bin_cmd!("fsc")
        .args(["find", "-p", "*.md", "--output", "json"])
        .arg(fixture.src.path())
        .arg("milk")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = parse_json(&output.stdout);
    let files = value["results"][0]["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].as_str().unwrap().ends_with("readme.md"));
}

#[test]
fn test_find_html_no_matches() {
    let fixture = TestFixture::new();
    fixture.write_src("notes.txt", "nothing here");

    cargo_bin_cmd!("fsc")
        .args(["find", "--html"])
        .arg(fixture.src.path())
        .arg("absent")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("<h2>Phrase = absent</h2>")
                .and(predicate::str::contains("<p>No matches found</p>")),
        );
}

#[test]
fn test_find_invalid_pattern() {
    let fixture = TestFixture::new();

    cargo_bin_cmd!("fsc")
        .args(["find", "-p", "[oops"])
        .arg(fixture.src.path())
        .arg("x")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error[invalid_input]"));
}
