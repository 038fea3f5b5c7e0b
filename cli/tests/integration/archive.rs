//! Zip archive integration tests for fsc CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, parse_json};
use predicates::prelude::*;
use std::fs::File;
use std::io::Write;

#[test]
fn test_zip_then_unzip() {
    let fixture = TestFixture::new();
    fixture.write_src("top.txt", "top");
    fixture.write_src("docs/guide.md", "# guide");
    let archive = fixture.dst.path().join("bundle.zip");

    cargo_bin_cmd!("fsc")
        .arg("zip")
        .arg(fixture.src.path())
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("zip: 2 files, 1 directories"));

    let out = fixture.dst.path().join("out");
    cargo_bin_cmd!("fsc")
        .arg("unzip")
        .arg(&archive)
        .arg(&out)
        .assert()
        .success();

    fixture.assert_file_content(&out.join("top.txt"), "top");
    fixture.assert_file_content(&out.join("docs/guide.md"), "# guide");
}

#[test]
fn test_zip_include_base_dir_json() {
    let fixture = TestFixture::new();
    fixture.write_src("a.txt", "a");
    let archive = fixture.dst.path().join("bundle.zip");

    let output = cargo_bin_cmd!("fsc")
        .args(["zip", "--include-base-dir", "--output", "json"])
        .arg(fixture.src.path())
        .arg(&archive)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = parse_json(&output.stdout);
    assert_eq!(value["files"], 1);
    assert_eq!(value["dirs"], 1);

    let out = fixture.dst.path().join("out");
    cargo_bin_cmd!("fsc")
        .arg("unzip")
        .arg(&archive)
        .arg(&out)
        .assert()
        .success();

    let base = fixture.src.path().file_name().unwrap();
    fixture.assert_file_content(&out.join(base).join("a.txt"), "a");
}

#[test]
fn test_unzip_refuses_existing_without_overwrite() {
    let fixture = TestFixture::new();
    fixture.write_src("a.txt", "from zip");
    let archive = fixture.dst.path().join("bundle.zip");
    cargo_bin_cmd!("fsc")
        .arg("zip")
        .arg(fixture.src.path())
        .arg(&archive)
        .assert()
        .success();

    fixture.write_dst("out/a.txt", "local");
    let out = fixture.dst.path().join("out");

    cargo_bin_cmd!("fsc")
        .arg("unzip")
        .arg(&archive)
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[already_exists]"));
    fixture.assert_file_content(&out.join("a.txt"), "local");

    cargo_bin_cmd!("fsc")
        .args(["unzip", "--overwrite"])
        .arg(&archive)
        .arg(&out)
        .assert()
        .success();
    fixture.assert_file_content(&out.join("a.txt"), "from zip");
}

#[test]
fn test_zip_refuses_existing_archive() {
    let fixture = TestFixture::new();
    fixture.write_src("a.txt", "a");
    fixture.write_dst("bundle.zip", "not a zip");

    cargo_bin_cmd!("fsc")
        .arg("zip")
        .arg(fixture.src.path())
        .arg(fixture.dst.path().join("bundle.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[already_exists]"));
}

#[test]
fn test_unzip_rejects_path_traversal() {
    let fixture = TestFixture::new();
    let archive = fixture.dst.path().join("evil.zip");
    {
        let mut writer = zip::ZipWriter::new(File::create(&archive).unwrap());
        writer
            .start_file("../../escaped.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"gotcha").unwrap();
        writer.finish().unwrap();
    }

    let out = fixture.dst.path().join("out/inner");
    cargo_bin_cmd!("fsc")
        .args(["unzip", "--overwrite"])
        .arg(&archive)
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[archive_error]"));

    assert!(!fixture.dst.path().join("escaped.txt").exists());
    assert!(!fixture.dst.path().join("out/inner").exists());
}
