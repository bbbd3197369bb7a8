//! E2E тесты для CLI инструмента `cnab-remessa`.

use std::fs;

use assert_cmd::Command;
use e2e_tests::fixture;
use predicates::prelude::*;
use tempfile::tempdir;

/// Команда `cnab-remessa`. Бинарник собирается в соседнем крейте
/// воркспейса, поэтому нужен устаревший `cargo_bin`.
#[expect(deprecated)]
fn remessa() -> Command {
    Command::cargo_bin("cnab-remessa").unwrap()
}

#[test]
fn test_job_to_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("COB0007.REM");

    remessa()
        .args([
            "--input",
            fixture("sicoob_job.json").to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote 14 line(s)"));

    let content = fs::read_to_string(&output).unwrap();
    // line_ending: crlf
    assert_eq!(content.matches("\r\n").count(), 14);

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 14);
    assert!(lines.iter().all(|l| l.len() == 240 && l.starts_with("756")));
    assert_eq!(&lines[0][157..163], "000007");
    assert_eq!(&lines[13][23..29], "000014");
}

#[test]
fn test_stdin_to_stdout() {
    let job = fs::read(fixture("sicoob_job.json")).unwrap();

    let output = remessa().write_stdin(job).assert().success().get_output().stdout.clone();

    let content = String::from_utf8(output).unwrap();
    assert_eq!(content.lines().count(), 14);
    assert!(content.lines().nth(1).unwrap().contains("PAGAVEL ATE O VENCIMENTO"));
}

#[test]
fn test_segments_per_payment() {
    let output = remessa()
        .args(["-i", fixture("sicoob_job.json").to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let content = String::from_utf8(output).unwrap();

    let segments: String = content
        .lines()
        .filter(|l| &l[7..8] == "3")
        .map(|l| &l[13..14])
        .collect();
    // second payment has no interest or fine
    assert_eq!(segments, "PQRPQPQR");
}

#[test]
fn test_invalid_job_writes_nothing() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("bad.rem");

    remessa()
        .args([
            "--input",
            fixture("invalid_job.json").to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"))
        .stderr(predicate::str::contains("company_name"))
        .stderr(predicate::str::contains("batches[0].payments[1].payer.address.zip_code"));

    assert!(!output.exists());
}

#[test]
fn test_missing_input_file() {
    remessa()
        .args(["--input", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open input file"));
}

#[test]
fn test_malformed_job() {
    remessa()
        .write_stdin(r#"{ "bank": { "code": "sicoob" } }"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse job"));
}
