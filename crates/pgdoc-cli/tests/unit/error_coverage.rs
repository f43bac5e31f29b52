//! Error conversion and exit-code coverage.

use std::path::PathBuf;

use pgdoc_cli::CliError;
use pgdoc_cli::error::{EXIT_FAILURE, EXIT_USAGE};

#[tokio::test]
async fn test_join_error_is_failure() {
    let handle = tokio::spawn(std::future::pending::<()>());
    handle.abort();
    let err = CliError::from(handle.await.unwrap_err());
    assert!(err.to_string().starts_with("Worker task failed"));
    assert_eq!(err.exit_code(), EXIT_FAILURE);
}

#[test]
fn test_json_error_is_failure() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = CliError::from(json_err);
    assert!(err.to_string().starts_with("JSON error"));
    assert_eq!(err.exit_code(), EXIT_FAILURE);
}

#[test]
fn test_document_error_names_path() {
    let err = CliError::Document {
        path: PathBuf::from("doc/src/sgml/wal.sgml"),
        source: pgdoc_core::Error::tokenizer("vocabulary missing"),
    };
    let message = err.to_string();
    assert!(message.contains("doc/src/sgml/wal.sgml"));
    assert!(message.contains("vocabulary missing"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_core_error_exit_codes() {
    let cases = [
        (pgdoc_core::Error::config("x"), EXIT_USAGE),
        (pgdoc_core::Error::not_found("x"), EXIT_USAGE),
        (pgdoc_core::Error::parse("x"), EXIT_FAILURE),
        (pgdoc_core::Error::tokenizer("x"), EXIT_FAILURE),
        (
            pgdoc_core::Error::io(std::io::Error::other("disk full")),
            EXIT_FAILURE,
        ),
    ];
    for (core, expected) in cases {
        assert_eq!(CliError::from(core).exit_code(), expected);
    }
}

#[test]
fn test_unknown_model_is_user_error() {
    let spec = pgdoc_content::TokenizerSpec::Tiktoken {
        model: "no-such-model".into(),
    };
    let err = CliError::from(spec.build().err().unwrap());
    assert_eq!(err.exit_code(), EXIT_USAGE);
}
