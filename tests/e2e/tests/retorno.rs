//! E2E тесты для CLI инструмента `cnab-retorno`.

use std::fs;

use assert_cmd::Command;
use e2e_tests::fixture;
use predicates::prelude::*;
use tempfile::tempdir;

#[expect(deprecated)]
fn retorno() -> Command {
    Command::cargo_bin("cnab-retorno").unwrap()
}

fn ret_file() -> String {
    fixture("CNAB400BANCONORDESTE.RET").to_str().unwrap().to_string()
}

#[test]
fn test_retorno_to_csv() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.csv");

    retorno()
        .args([
            "--input",
            &ret_file(),
            "--layout",
            "banco-nordeste",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Parsed 2 record(s)"));

    let content = fs::read_to_string(&output).unwrap();
    let mut lines = content.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("codigo_registro,documento_empresa,agencia,"));
    assert!(header.ends_with(",data_credito,sequencial"));

    let first = lines.next().unwrap();
    assert!(first.contains(",00000116,"));
    assert!(first.ends_with(",201114,000002"));
    assert_eq!(lines.count(), 1);
}

#[test]
fn test_retorno_to_json() {
    let output = retorno()
        .args(["-i", &ret_file(), "--layout", "banco-nordeste", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let records: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 2);

    let raw = fs::read_to_string(fixture("CNAB400BANCONORDESTE.RET")).unwrap();
    let first_detail = raw.lines().nth(1).unwrap();
    assert_eq!(records[0]["nosso_numero"], first_detail[62..70]);
    assert_eq!(records[0]["sequencial"], "000002");
    assert_eq!(records[1]["nosso_numero"], "00000124");
    assert_eq!(records[1]["valor_recebido"], "0000000032000");
}

#[test]
fn test_stdin_input() {
    let input = fs::read(fixture("CNAB400BANCONORDESTE.RET")).unwrap();

    retorno()
        .args(["--layout", "banco-nordeste"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("00000124"))
        .stderr(predicate::str::contains("Parsed 2 record(s)"));
}

#[test]
fn test_unknown_layout() {
    retorno()
        .args(["-i", &ret_file(), "--layout", "itau"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_truncated_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("short.ret");
    let raw = fs::read_to_string(fixture("CNAB400BANCONORDESTE.RET")).unwrap();
    let truncated: Vec<&str> = raw.lines().map(|l| &l[..l.len().min(300)]).collect();
    fs::write(&input, truncated.join("\n")).unwrap();

    retorno()
        .args(["-i", input.to_str().unwrap(), "--layout", "banco-nordeste"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line 2 is too short"));
}

#[test]
fn test_failed_parse_keeps_previous_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("short.ret");
    let output = dir.path().join("out.csv");
    fs::write(&input, format!("0\n1{}\n", "0".repeat(100))).unwrap();
    fs::write(&output, "previous run\n").unwrap();

    retorno()
        .args([
            "-i",
            input.to_str().unwrap(),
            "--layout",
            "banco-nordeste",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse retorno"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "previous run\n");
}
