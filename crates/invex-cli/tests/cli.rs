//! Integration tests for the invex CLI.
//!
//! None of these tests require pdftoppm or tesseract to be installed;
//! every scenario fails (or finishes) before an external tool is spawned.

use assert_cmd::Command;
use predicates::prelude::*;

fn invex() -> Command {
    Command::cargo_bin("invex").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    invex()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("tools"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_extract_missing_input_fails() {
    invex()
        .args(["extract", "does-not-exist.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_extract_rejects_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "plain text").unwrap();

    invex()
        .arg("extract")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type"));
}

#[test]
fn test_extract_rejects_oversized_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.pdf");
    std::fs::write(&path, vec![0u8; 6 * 1024 * 1024]).unwrap();

    invex()
        .arg("extract")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds"));
}

#[test]
fn test_extract_rejects_malformed_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"not a pdf at all").unwrap();

    invex()
        .arg("extract")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse PDF"));
}

#[test]
fn test_batch_fails_on_empty_directory() {
    let dir = tempfile::tempdir().unwrap();

    invex()
        .arg("batch")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching invoice files"));
}

#[test]
fn test_batch_continue_on_error_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.pdf"), b"not a pdf").unwrap();
    let summary = dir.path().join("summary.csv");

    invex()
        .arg("batch")
        .arg(dir.path())
        .arg("--continue-on-error")
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 failed"));

    let content = std::fs::read_to_string(&summary).unwrap();
    assert!(content.starts_with("filename,status"));
    assert!(content.contains("broken.pdf,error"));
}

#[test]
fn test_config_show_prints_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("absent.json");

    invex()
        .args(["config", "show", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No config file found"))
        .stdout(predicate::str::contains("tesseract"));
}

#[test]
fn test_config_init_set_get_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    let config_arg = config_path.to_str().unwrap();

    invex()
        .args(["config", "init", "--config", config_arg])
        .assert()
        .success();
    assert!(config_path.exists());

    invex()
        .args(["config", "set", "raster.dpi", "300", "--config", config_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("raster.dpi"));

    invex()
        .args(["config", "get", "raster.dpi", "--config", config_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("300"));
}

#[test]
fn test_config_get_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("absent.json");

    invex()
        .args(["config", "get", "no.such.key", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
