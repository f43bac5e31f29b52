//! Tests that drive the `pgdoc` binary.

use std::process::{Command, Output};

use crate::common::{TestWorkspace, parse_jsonl};

fn pgdoc(ws: &TestWorkspace, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pgdoc"))
        .arg("--config")
        .arg(ws.config())
        .args(args)
        .env_remove("AZURE_OPENAI_MODEL")
        .env_remove("DOCUMENT_NAME")
        .env_remove("PGDOC_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run pgdoc")
}

#[test]
fn test_chunk_jsonl_to_stdout() {
    let ws = TestWorkspace::with_docs();
    let dir = ws.sgml_dir();

    let output = pgdoc(&ws, &["chunk", dir.to_str().unwrap(), "--format", "jsonl"]);
    assert!(output.status.success());

    let records = parse_jsonl(&String::from_utf8(output.stdout).unwrap());
    assert_eq!(records.len(), 5);
    assert_eq!(records[4]["id"], "vacuum-0");
}

#[test]
fn test_document_name_from_environment() {
    let ws = TestWorkspace::with_docs();
    let file = ws.path("sgml/ref/vacuum.sgml");

    let output = Command::new(env!("CARGO_BIN_EXE_pgdoc"))
        .arg("--config")
        .arg(ws.config())
        .args(["chunk", file.to_str().unwrap(), "--format", "jsonl"])
        .env("DOCUMENT_NAME", "PG Docs")
        .env_remove("PGDOC_CONFIG")
        .output()
        .expect("failed to run pgdoc");
    assert!(output.status.success());

    let records = parse_jsonl(&String::from_utf8(output.stdout).unwrap());
    assert_eq!(records[0]["document"], "PG Docs");
}

#[test]
fn test_missing_path_exits_with_usage_code() {
    let ws = TestWorkspace::with_docs();
    let missing = ws.path("nowhere");

    let output = pgdoc(&ws, &["chunk", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not found"));
}

#[test]
fn test_bad_argument_exits_with_usage_code() {
    let ws = TestWorkspace::with_docs();
    let output = pgdoc(&ws, &["chunk", "x.sgml", "--format", "yaml"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_directories_matching_pattern_are_skipped() {
    let ws = TestWorkspace::with_docs();
    std::fs::create_dir_all(ws.path("sgml/odd.sgml")).unwrap();
    let dir = ws.sgml_dir();

    let output = pgdoc(&ws, &["chunk", dir.to_str().unwrap(), "--format", "jsonl"]);
    assert!(output.status.success());
    assert_eq!(
        parse_jsonl(&String::from_utf8(output.stdout).unwrap()).len(),
        5
    );
}

#[test]
fn test_huggingface_without_path_exits_with_usage_code() {
    let ws = TestWorkspace::with_docs();
    let file = ws.path("sgml/backup.sgml");

    let output = pgdoc(
        &ws,
        &["chunk", file.to_str().unwrap(), "--tokenizer", "huggingface"],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("tokenizer.path"));
}

#[test]
fn test_config_get_prints_value() {
    let ws = TestWorkspace::with_docs();
    let output = pgdoc(&ws, &["config", "get", "tokenizer.kind"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "chars\n");
}
