//! Integration tests for `pgdoc config`.

use pgdoc_cli::config_handlers::handle_config_command;
use pgdoc_cli::{ConfigAction, PgdocConfig};
use pgdoc_content::{PreprocessMode, TokenizerSpec};

use crate::common::TestWorkspace;

fn run(ws: &TestWorkspace, action: ConfigAction) -> pgdoc_core::Result<String> {
    let mut out = Vec::new();
    handle_config_command(Some(&ws.config()), action, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_init_set_get_round_trip() {
    let ws = TestWorkspace::new();

    let out = run(
        &ws,
        ConfigAction::Init {
            file: None,
            force: false,
        },
    )
    .unwrap();
    assert!(out.contains("config.toml"));

    run(
        &ws,
        ConfigAction::Set {
            key: "tokenizer.kind".into(),
            value: "chars".into(),
        },
    )
    .unwrap();
    run(
        &ws,
        ConfigAction::Set {
            key: "document.mode".into(),
            value: "plain".into(),
        },
    )
    .unwrap();
    run(
        &ws,
        ConfigAction::Set {
            key: "output.preview_chars".into(),
            value: "80".into(),
        },
    )
    .unwrap();

    let value = run(
        &ws,
        ConfigAction::Get {
            key: "document.mode".into(),
        },
    )
    .unwrap();
    assert_eq!(value, "plain\n");

    let config = PgdocConfig::load(Some(&ws.config())).unwrap();
    assert_eq!(config.document.mode, PreprocessMode::Plain);
    assert_eq!(config.output.preview_chars, Some(80));
    // the leftover tiktoken "model" key is ignored
    assert_eq!(config.tokenizer, TokenizerSpec::Chars);
}

#[test]
fn test_show_prints_effective_config() {
    let ws = TestWorkspace::with_docs();

    let out = run(&ws, ConfigAction::Show).unwrap();
    let shown: PgdocConfig = toml::from_str(&out).unwrap();
    assert_eq!(shown.tokenizer, TokenizerSpec::Chars);
    assert_eq!(shown.document.name, "PostgreSQL");
    assert_eq!(shown.discovery.jobs, 4);
}

#[test]
fn test_get_unknown_key() {
    let ws = TestWorkspace::with_docs();

    let err = run(
        &ws,
        ConfigAction::Get {
            key: "chunking.size".into(),
        },
    )
    .unwrap_err();
    assert!(err.is_user_error());
}

#[test]
fn test_set_unknown_key_rejected() {
    let ws = TestWorkspace::with_docs();
    let before = ws.read("config.toml");

    let err = run(
        &ws,
        ConfigAction::Set {
            key: "chunking.size".into(),
            value: "10".into(),
        },
    )
    .unwrap_err();
    assert!(err.is_user_error());
    assert_eq!(ws.read("config.toml"), before);
}

#[test]
fn test_path_prints_explicit_location() {
    let ws = TestWorkspace::new();
    let out = run(&ws, ConfigAction::Path).unwrap();
    assert_eq!(out.trim_end(), ws.config().display().to_string());
}
