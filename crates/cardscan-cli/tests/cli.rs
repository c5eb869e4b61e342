use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cardscan() -> Command {
    Command::cargo_bin("cardscan").unwrap()
}

const TRANSCRIPT: &str = "BANK OF NOWHERE\n\n4111 1111 1111 1111\nJOHN SMITH\n\nVALID THRU\n09/27\n\nSIGNATURE\n";

#[test]
fn scan_text_transcript_masks_by_default() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("card.txt");
    let config = dir.path().join("config.json");
    fs::write(&input, TRANSCRIPT).unwrap();

    cardscan()
        .args(["--config", config.to_str().unwrap(), "scan", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("•••• •••• •••• 1111"))
        .stdout(predicate::str::contains("09 / 27"));
}

#[test]
fn scan_json_transcript_reveal() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("card.json");
    let config = dir.path().join("config.json");
    fs::write(
        &input,
        r#"[["4111111111111111"], ["12/25"], ["JOHN SMITH"]]"#,
    )
    .unwrap();

    cardscan()
        .args(["--config", config.to_str().unwrap(), "scan", "--reveal"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""card_number": "4111111111111111""#))
        .stdout(predicate::str::contains(r#""expiry_date": "1225""#));
}

#[test]
fn scan_missing_file_fails() {
    cardscan()
        .args(["scan", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_writes_summary() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    let out = dir.path().join("out");
    fs::write(dir.path().join("a.txt"), TRANSCRIPT).unwrap();
    fs::write(dir.path().join("b.txt"), "NOTHING HERE\n").unwrap();

    let pattern = dir.path().join("*.txt");
    cardscan()
        .args(["--config", config.to_str().unwrap(), "batch", "--summary", "--output-dir"])
        .arg(&out)
        .arg(pattern.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 recognized"));

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("source,recognized,card_number"));
    assert_eq!(summary.lines().count(), 3);
    assert!(out.join("a.json").exists());
}

#[test]
fn format_card_number() {
    cardscan()
        .args(["format", "card", "4111111111111111"])
        .assert()
        .success()
        .stdout("4111 1111 1111 1111\n");
}

#[test]
fn format_masked_card_number() {
    cardscan()
        .args(["format", "card", "4111 1111 1111 1234", "--mask"])
        .assert()
        .success()
        .stdout("•••• •••• •••• 1234\n");

    cardscan()
        .args(["format", "card", "4111111111111234", "--mask", "--strip"])
        .assert()
        .success()
        .stdout("••••••••••••1234\n");
}

#[test]
fn scan_with_absent_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("card.txt");
    fs::write(&input, TRANSCRIPT).unwrap();

    cardscan()
        .arg("--config")
        .arg(dir.path().join("missing.json"))
        .args(["scan", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("true,•••• •••• •••• 1111,0927"));
}

#[test]
fn format_partial_expiry_keeps_separator() {
    cardscan()
        .args(["format", "expiry", "09"])
        .assert()
        .success()
        .stdout("09 / \n");
}

#[test]
fn type_with_backspace() {
    cardscan()
        .args(["type", "--json", "card", "4111", "1", "<", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""display": "4111 2""#))
        .stdout(predicate::str::contains(r#""canonical": "41112""#));
}

#[test]
fn config_init_set_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.json");
    let path = config.to_str().unwrap();

    cardscan()
        .args(["--config", path, "config", "init"])
        .assert()
        .success();

    cardscan()
        .args(["--config", path, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cardscan()
        .args(["--config", path, "config", "set", "output.format", "csv"])
        .assert()
        .success();

    cardscan()
        .args(["--config", path, "config", "get", "output.format"])
        .assert()
        .success()
        .stdout("\"csv\"\n");

    cardscan()
        .args(["--config", path, "config", "set", "scan.bogus", "1"])
        .assert()
        .failure();
}
