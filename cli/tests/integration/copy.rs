//! Directory replication integration tests for fsc CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, parse_json};
use predicates::prelude::*;
use rstest::rstest;

fn copy_cmd(fixture: &TestFixture, dest: &str, use_async: bool) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("fsc");
    cmd.arg("copy")
        .arg("-q")
        .arg(fixture.src.path())
        .arg(fixture.dst.path().join(dest));
    if use_async {
        cmd.arg("--async");
    }
    cmd
}

#[rstest]
#[case::blocking(false)]
#[case::non_blocking(true)]
fn test_top_level_only_by_default(#[case] use_async: bool) {
    let fixture = TestFixture::new();
    fixture.write_src("a.txt", "A");
    fixture.write_src("sub/b.txt", "B");

    copy_cmd(&fixture, "out", use_async)
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied 1 files"));

    fixture.assert_file_content(&fixture.dst.path().join("out/a.txt"), "A");
    assert!(!fixture.dst.path().join("out/sub").exists());
}

#[rstest]
#[case::blocking(false)]
#[case::non_blocking(true)]
fn test_recursive_copy(#[case] use_async: bool) {
    let fixture = TestFixture::new();
    fixture.create_nested_structure(3, 2);

    copy_cmd(&fixture, "out", use_async)
        .arg("-r")
        .assert()
        .success();

    let out = fixture.dst.path().join("out");
    assert_eq!(fixture.count_files_recursive(&out), 6);
    fixture.assert_file_content(
        &out.join("level0/level1/level2/file1.txt"),
        "content at level 2",
    );
}

#[rstest]
#[case::blocking(false)]
#[case::non_blocking(true)]
fn test_skip_existing_keeps_destination(#[case] use_async: bool) {
    let fixture = TestFixture::new();
    fixture.write_src("sub/x.txt", "v2");
    fixture.write_dst("out/sub/x.txt", "v1");

    copy_cmd(&fixture, "out", use_async)
        .args(["-r", "--skip-existing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to copy (1 files already exist)"));

    fixture.assert_file_content(&fixture.dst.path().join("out/sub/x.txt"), "v1");
}

#[test]
fn test_overwrite_by_default() {
    let fixture = TestFixture::new();
    fixture.write_src("x.txt", "v2");
    fixture.write_dst("out/x.txt", "v1");

    copy_cmd(&fixture, "out", false).assert().success();

    fixture.assert_file_content(&fixture.dst.path().join("out/x.txt"), "v2");
}

#[test]
fn test_json_output_lists_outcomes() {
    let fixture = TestFixture::new();
    fixture.write_src("new.txt", "hello");
    fixture.write_src("old.txt", "ignored");
    fixture.write_dst("out/old.txt", "kept");

    let output = copy_cmd(&fixture, "out", false)
        .args(["--skip-existing", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = parse_json(&output.stdout);
    assert_eq!(value["mode"], "copy");
    assert_eq!(value["summary"]["files_copied"], 1);
    assert_eq!(value["summary"]["files_skipped"], 1);
    assert_eq!(value["summary"]["bytes_copied"], 5);

    let items = value["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["outcome"], "copied");
    assert_eq!(items[0]["bytes_copied"], 5);
    assert_eq!(items[1]["outcome"], "skipped");
}

#[test]
fn test_verbose_lists_each_file() {
    let fixture = TestFixture::new();
    fixture.write_src("a.txt", "A");

    copy_cmd(&fixture, "out", false)
        .arg("-v")
        .assert()
        .success()
        .stderr(predicate::str::contains("copied").and(predicate::str::contains("a.txt")))
        .stdout(predicate::str::contains("Files copied:   1"));
}

#[test]
fn test_second_run_is_idempotent() {
    let fixture = TestFixture::new();
    fixture.create_nested_structure(2, 3);

    copy_cmd(&fixture, "out", false).arg("-r").assert().success();
    copy_cmd(&fixture, "out", false)
        .args(["-r", "-n", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"files_copied\":0"));

    assert_eq!(
        fixture.count_files_recursive(&fixture.dst.path().join("out")),
        6
    );
}
