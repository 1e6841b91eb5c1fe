use assert_cmd::Command;
use predicates::prelude::*;

const STREAM: &str = "\
Date: Dec 2023
DEC 05 DEC 07 COFFEE SHOP $4.50
PAYMENT THANK YOU
JAN 02 JAN 03 BOOKSTORE -$12.00
Date: Jan 2024
DEC 30 JAN 02 HOTEL $1,210.00
";

fn ledgerline() -> Command {
    Command::cargo_bin("ledgerline").unwrap()
}

#[test]
fn test_parse_stream_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("stream.txt");
    std::fs::write(&input, STREAM).unwrap();

    ledgerline()
        .arg("parse")
        .arg(&input)
        .assert()
        .success()
        .stdout(
            "Jan 02 2024;Jan 03 2024;BOOKSTORE;-12.00\n\
             Dec 30 2023;Jan 02 2023;HOTEL;1210.00\n\
             Dec 05 2023;Dec 07 2023;COFFEE SHOP;4.50\n",
        );
}

#[test]
fn test_parse_stdin_csv_with_summary() {
    ledgerline()
        .args(["parse", "-", "--format", "csv", "--summary"])
        .write_stdin(STREAM)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "transaction_date,posting_date,description,amount\n",
        ))
        .stdout(predicate::str::contains("Dec 30 2023,Jan 02 2023,HOTEL,1210.00"))
        .stderr(predicate::str::contains("3 transactions, total $1,202.50"));
}

#[test]
fn test_parse_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("stream.txt");
    let output = dir.path().join("out").join("ledger.json");
    std::fs::write(&input, STREAM).unwrap();

    ledgerline()
        .arg("parse")
        .arg(&input)
        .args(["--format", "json", "--output"])
        .arg(&output)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[test]
fn test_parse_missing_file() {
    ledgerline()
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_extract_without_pdfs_fails() {
    let dir = tempfile::tempdir().unwrap();

    ledgerline()
        .arg("extract")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No statement PDFs found"));
}

#[test]
fn test_extract_unreadable_pdf_names_file() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("Statement_Card_1234_Acct_Visa_Dec_15-2023.pdf");
    std::fs::write(&pdf, b"not really a pdf").unwrap();

    ledgerline()
        .arg("extract")
        .arg(&pdf)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Statement_Card_1234_Acct_Visa_Dec_15-2023.pdf"));
}

#[test]
fn test_config_init_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    ledgerline()
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .success();
    assert!(config.exists());

    ledgerline()
        .args(["config", "get", "layout.keyword", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout("\"TRANSACTION\"\n");

    ledgerline()
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
