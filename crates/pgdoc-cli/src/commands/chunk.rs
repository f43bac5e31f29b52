//! `pgdoc chunk`: preprocess documentation files into chunks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use pgdoc_content::{Preprocessor, TextSplitter, TokenizerSpec, preprocessor_for};
use pgdoc_core::Error;

use crate::cli::{ChunkArgs, TokenizerKind};
use crate::config::PgdocConfig;
use crate::discovery::discover_documents;
use crate::error::{CliError, Result};
use crate::output::{CountedChunk, DocumentChunks, render};

/// Run the chunk command.
pub async fn run(config_path: Option<&Path>, args: &ChunkArgs) -> Result<()> {
    let mut config = PgdocConfig::load(config_path)?;
    apply_overrides(&mut config, args);
    config.validate()?;

    let files = discover_documents(&args.paths, &config.discovery.pattern)?;
    if files.is_empty() {
        tracing::warn!(pattern = %config.discovery.pattern, "No documents found");
    }

    let preprocessor = build_preprocessor(&config)?;
    tracing::info!(
        files = files.len(),
        mode = %config.document.mode,
        tokenizer = preprocessor.counter().name(),
        "Chunking documents"
    );

    let documents = process_documents(preprocessor, files, config.discovery.jobs).await?;

    let total: usize = documents.iter().map(|d| d.chunks.len()).sum();
    tracing::info!(chunks = total, "Done");

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| Error::io_with_path(e, path))?;
            let mut out = BufWriter::new(file);
            write_output(&mut out, &documents, &config)
        }
        None => write_output(&mut std::io::stdout().lock(), &documents, &config),
    }
}

fn write_output(
    out: &mut impl Write,
    documents: &[DocumentChunks],
    config: &PgdocConfig,
) -> Result<()> {
    render(out, documents, config.output.format, config.preview_chars())?;
    out.flush()?;
    Ok(())
}

/// Layer command-line flags (and their environment fallbacks) over the
/// loaded configuration.
pub fn apply_overrides(config: &mut PgdocConfig, args: &ChunkArgs) {
    if let Some(mode) = args.mode {
        config.document.mode = mode.into();
    }
    if let Some(name) = &args.document_name {
        config.document.name = name.clone();
    }

    if let Some(kind) = args.tokenizer {
        config.tokenizer = match kind {
            TokenizerKind::Tiktoken => match &config.tokenizer {
                TokenizerSpec::Tiktoken { .. } => config.tokenizer.clone(),
                _ => TokenizerSpec::default(),
            },
            TokenizerKind::Chars => TokenizerSpec::Chars,
            TokenizerKind::Huggingface => TokenizerSpec::Huggingface {
                path: PathBuf::new(),
            },
        };
    }
    if let Some(model) = &args.model
        && let TokenizerSpec::Tiktoken { model: current } = &mut config.tokenizer
    {
        *current = model.clone();
    }
    if let Some(path) = &args.tokenizer_path
        && let TokenizerSpec::Huggingface { path: current } = &mut config.tokenizer
    {
        *current = path.clone();
    }

    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(preview_chars) = args.preview_chars {
        config.output.preview_chars = Some(preview_chars);
    }

    if let Some(target_tokens) = args.target_tokens {
        config.chunking.target_tokens = target_tokens;
    }
    if let Some(overlap_chars) = args.overlap_chars {
        config.chunking.overlap_chars = overlap_chars;
    }
    if let Some(max_chars_search) = args.max_chars_search {
        config.chunking.max_chars_search = max_chars_search;
    }

    if let Some(pattern) = &args.pattern {
        config.discovery.pattern = pattern.clone();
    }
    if let Some(jobs) = args.jobs {
        config.discovery.jobs = jobs;
    }
}

/// Build the preprocessor described by `config`.
pub fn build_preprocessor(config: &PgdocConfig) -> Result<Arc<dyn Preprocessor>> {
    let counter = config.tokenizer.build()?;
    let splitter = TextSplitter::new(config.chunking);
    Ok(Arc::from(preprocessor_for(
        config.document.mode,
        splitter,
        counter,
        &config.document.name,
    )))
}

/// Read, chunk, and count tokens for one file.
pub fn process_document(
    preprocessor: &dyn Preprocessor,
    path: &Path,
) -> pgdoc_core::Result<DocumentChunks> {
    let bytes = std::fs::read(path).map_err(|e| Error::io_with_path(e, path))?;
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("{} is not valid UTF-8, replacing invalid bytes", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    let chunks = preprocessor
        .create_chunks(&content)?
        .into_iter()
        .map(|chunk| {
            let tokens = preprocessor.counter().count(&chunk.text)?;
            Ok(CountedChunk { chunk, tokens })
        })
        .collect::<pgdoc_core::Result<Vec<_>>>()?;

    log::debug!("{}: {} chunks", path.display(), chunks.len());
    Ok(DocumentChunks {
        source: path.to_path_buf(),
        chunks,
    })
}

/// Process `files` on the blocking pool, at most `jobs` at a time.
///
/// Results come back in input order. The first failure stops the run.
pub async fn process_documents(
    preprocessor: Arc<dyn Preprocessor>,
    files: Vec<PathBuf>,
    jobs: usize,
) -> Result<Vec<DocumentChunks>> {
    stream::iter(files)
        .map(|path| {
            let preprocessor = Arc::clone(&preprocessor);
            tokio::task::spawn_blocking(move || {
                let result = process_document(preprocessor.as_ref(), &path);
                (path, result)
            })
        })
        .buffered(jobs.max(1))
        .map(|joined| -> Result<DocumentChunks> {
            let (path, result) = joined?;
            result.map_err(|source| CliError::Document { path, source })
        })
        .try_collect()
        .await
}
