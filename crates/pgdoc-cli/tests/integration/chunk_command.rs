//! Integration tests for `pgdoc chunk`.

use pgdoc_cli::cli::ModeArg;
use pgdoc_cli::commands::chunk;
use pgdoc_cli::output::{CHUNK_SEPARATOR, OutputFormat};
use pgdoc_cli::{ChunkArgs, CliError};

use crate::common::{CHARS_CONFIG, TestWorkspace, VACUUM_SGML, chunk_args, parse_jsonl};

async fn run_to_file(ws: &TestWorkspace, mut args: ChunkArgs) -> String {
    let out = ws.path("out.txt");
    args.output = Some(out.clone());
    chunk::run(Some(&ws.config()), &args)
        .await
        .expect("chunk command should succeed");
    ws.read("out.txt")
}

#[tokio::test]
async fn test_structured_jsonl_over_directory() {
    let ws = TestWorkspace::with_docs();
    let mut args = chunk_args(&[&ws.sgml_dir()]);
    args.format = Some(OutputFormat::Jsonl);

    let records = parse_jsonl(&run_to_file(&ws, args).await);

    let ids: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec!["backup-0", "backup-1", "backup-2", "backup-3", "vacuum-0"]
    );

    let levels: Vec<(Option<&str>, Option<&str>, Option<&str>)> = records
        .iter()
        .map(|r| {
            (
                r["chapter"].as_str(),
                r["sect1"].as_str(),
                r["sect2"].as_str(),
            )
        })
        .collect();
    assert_eq!(
        levels,
        vec![
            (Some("Backup and Restore"), None, None),
            (Some("Backup and Restore"), Some("SQL Dump"), None),
            (
                Some("Backup and Restore"),
                Some("SQL Dump"),
                Some("Restoring the Dump")
            ),
            (
                Some("Backup and Restore"),
                Some("File System Level Backup"),
                None
            ),
            (None, Some("Routine Vacuuming"), None),
        ]
    );

    for record in &records {
        assert_eq!(record["document"], "PostgreSQL");
        let text = record["text"].as_str().unwrap();
        assert!(text.starts_with("# PostgreSQL\n"));
        assert_eq!(
            record["tokens"].as_u64().unwrap() as usize,
            text.chars().count()
        );
    }

    assert!(records[2]["text"].as_str().unwrap().starts_with(
        "# PostgreSQL\n## Backup and Restore\n### SQL Dump\n#### Restoring the Dump\n"
    ));
}

#[tokio::test]
async fn test_same_stem_across_versions_gets_distinct_ids() {
    let ws = TestWorkspace::new();
    ws.write("config.toml", CHARS_CONFIG);
    ws.write("pg16/sgml/ref/vacuum.sgml", VACUUM_SGML);
    ws.write("pg17/sgml/ref/vacuum.sgml", VACUUM_SGML);
    let mut args = chunk_args(&[&ws.path("pg16/sgml"), &ws.path("pg17/sgml")]);
    args.format = Some(OutputFormat::Jsonl);

    let records = parse_jsonl(&run_to_file(&ws, args).await);

    let ids: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["vacuum-0", "vacuum-2-0"]);
    assert!(records[1]["source"].as_str().unwrap().contains("pg17"));
}

#[tokio::test]
async fn test_cross_references_become_link_targets() {
    let ws = TestWorkspace::with_docs();
    let mut args = chunk_args(&[&ws.path("sgml/backup.sgml")]);
    args.format = Some(OutputFormat::Jsonl);

    let records = parse_jsonl(&run_to_file(&ws, args).await);
    let text = records[1]["text"].as_str().unwrap();
    assert!(text.contains("See app-pgdump for details."));
    assert!(!text.contains("<xref"));
}

#[tokio::test]
async fn test_entities_decoded() {
    let ws = TestWorkspace::with_docs();
    let mut args = chunk_args(&[&ws.path("sgml/ref/vacuum.sgml")]);
    args.format = Some(OutputFormat::Jsonl);

    let records = parse_jsonl(&run_to_file(&ws, args).await);
    let text = records[0]["text"].as_str().unwrap();
    assert!(text.contains("vacuuming \u{2014} see\nsql-vacuum."));
}

#[tokio::test]
async fn test_plain_text_output_layout() {
    let ws = TestWorkspace::with_docs();
    let backup = ws.path("sgml/backup.sgml");
    let mut args = chunk_args(&[&backup]);
    args.mode = Some(ModeArg::Plain);
    args.target_tokens = Some(120);
    args.overlap_chars = Some(20);

    let out = run_to_file(&ws, args).await;
    let mut lines = out.lines();

    assert_eq!(
        lines.next().unwrap(),
        format!("Processing: {}", backup.display())
    );

    // one preview line per chunk, then the chunks themselves
    let previews: Vec<&str> = out
        .lines()
        .skip(1)
        .take_while(|line| {
            let mut parts = line.splitn(3, ':');
            matches!(
                (parts.next(), parts.next()),
                (Some(i), Some(t)) if i.parse::<usize>().is_ok() && t.parse::<usize>().is_ok()
            )
        })
        .collect();
    assert!(previews.len() > 1);
    for (i, preview) in previews.iter().enumerate() {
        assert!(preview.starts_with(&format!("{i}:")));
        let text = preview.splitn(3, ':').nth(2).unwrap();
        assert!(text.chars().count() <= 50);
    }

    let body_start = out
        .match_indices('\n')
        .nth(previews.len())
        .map(|(i, _)| i + 1)
        .unwrap();
    let body = &out[body_start..];
    assert_eq!(body.matches(CHUNK_SEPARATOR).count(), previews.len() - 1);
}

#[tokio::test]
async fn test_flags_override_config_file() {
    let ws = TestWorkspace::with_docs();
    let mut args = chunk_args(&[&ws.path("sgml/ref/vacuum.sgml")]);
    args.format = Some(OutputFormat::Json);
    args.document_name = Some("PostgreSQL 17 Documentation".into());

    let out = run_to_file(&ws, args).await;
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value[0]["document"], "PostgreSQL 17 Documentation");
}

#[tokio::test]
async fn test_config_file_selects_format_and_pattern() {
    let ws = TestWorkspace::with_docs();
    ws.write(
        "config.toml",
        "[tokenizer]\nkind = \"chars\"\n\n[output]\nformat = \"jsonl\"\n\n[discovery]\npattern = \"ref/*.sgml\"\n",
    );

    let records = parse_jsonl(&run_to_file(&ws, chunk_args(&[&ws.sgml_dir()])).await);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], "vacuum-0");
    assert_eq!(records[0]["document"], "Document");
}

#[tokio::test]
async fn test_small_target_splits_with_overlap() {
    let ws = TestWorkspace::with_docs();
    let mut args = chunk_args(&[&ws.path("sgml/backup.sgml")]);
    args.format = Some(OutputFormat::Jsonl);
    args.mode = Some(ModeArg::Plain);
    args.target_tokens = Some(80);
    args.overlap_chars = Some(20);
    args.max_chars_search = Some(30);

    let records = parse_jsonl(&run_to_file(&ws, args).await);
    assert!(records.len() > 3);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record["index"], i);
        assert!(record["chapter"].is_null());
    }
}

#[tokio::test]
async fn test_missing_input_is_user_error() {
    let ws = TestWorkspace::with_docs();
    let args = chunk_args(&[&ws.path("sgml/missing.sgml")]);

    let err = chunk::run(Some(&ws.config()), &args).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_missing_config_is_user_error() {
    let ws = TestWorkspace::with_docs();
    let args = chunk_args(&[&ws.sgml_dir()]);

    let err = chunk::run(Some(&ws.path("nope.toml")), &args)
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Core(pgdoc_core::Error::NotFound { .. })));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_invalid_override_is_user_error() {
    let ws = TestWorkspace::with_docs();
    let mut args = chunk_args(&[&ws.sgml_dir()]);
    args.jobs = Some(0);

    let err = chunk::run(Some(&ws.config()), &args).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_empty_directory_produces_empty_json() {
    let ws = TestWorkspace::new();
    ws.write("config.toml", crate::common::CHARS_CONFIG);
    std::fs::create_dir_all(ws.path("empty")).unwrap();

    let mut args = chunk_args(&[&ws.path("empty")]);
    args.format = Some(OutputFormat::Json);

    assert_eq!(run_to_file(&ws, args).await, "[]\n");
}
