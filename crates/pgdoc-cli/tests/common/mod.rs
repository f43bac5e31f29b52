//! Common fixtures and harness for pgdoc-cli tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use pgdoc_cli::ChunkArgs;
use tempfile::TempDir;

/// A chapter with an introduction, two sect1s, and a nested sect2.
pub const BACKUP_SGML: &str = r#"<!-- doc/src/sgml/backup.sgml -->

<chapter id="backup">
 <title>Backup and Restore</title>

 <indexterm zone="backup"><primary>backup</primary></indexterm>

 <para>
  As with everything that contains valuable data, <productname>PostgreSQL</productname>
  databases should be backed up regularly.
 </para>

 <sect1 id="backup-dump">
  <title><acronym>SQL</acronym> Dump</title>

  <para>
   The idea behind this dump method is to generate a file with SQL
   commands that, when fed back to the server, will recreate the
   database in the same state as it was at the time of the dump.
   See <xref linkend="app-pgdump"/> for details.
  </para>

  <sect2 id="backup-dump-restore">
   <title>Restoring the Dump</title>

   <para>
    Text files created by <application>pg_dump</application> are intended
    to be read in by the <application>psql</application> program.
   </para>
  </sect2>
 </sect1>

 <sect1 id="backup-file">
  <title>File System Level Backup</title>

  <para>
   An alternative backup strategy is to directly copy the files that
   <productname>PostgreSQL</productname> uses to store the data in the database.
  </para>
 </sect1>
</chapter>
"#;

/// A reference page that starts at sect1 level.
pub const VACUUM_SGML: &str = r#"<sect1 id="routine-vacuuming">
 <title>Routine Vacuuming</title>
 <para>
  <productname>PostgreSQL</productname> databases require periodic
  maintenance known as <firstterm>vacuuming</firstterm> &mdash; see
  <xref linkend="sql-vacuum"/>.
 </para>
</sect1>
"#;

/// Config file content that avoids loading a BPE vocabulary.
pub const CHARS_CONFIG: &str = r#"[tokenizer]
kind = "chars"

[document]
name = "PostgreSQL"
"#;

/// Temporary documentation tree plus a config file.
pub struct TestWorkspace {
    pub dir: TempDir,
}

impl TestWorkspace {
    /// Empty workspace.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Workspace with `sgml/backup.sgml`, `sgml/ref/vacuum.sgml`, a stray
    /// text file, and a chars-tokenizer `config.toml`.
    pub fn with_docs() -> Self {
        let ws = Self::new();
        ws.write("sgml/backup.sgml", BACKUP_SGML);
        ws.write("sgml/ref/vacuum.sgml", VACUUM_SGML);
        ws.write("sgml/README.txt", "not documentation");
        ws.write("config.toml", CHARS_CONFIG);
        ws
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn config(&self) -> PathBuf {
        self.path("config.toml")
    }

    pub fn sgml_dir(&self) -> PathBuf {
        self.path("sgml")
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Chunk arguments for `paths` with everything else from the config.
pub fn chunk_args(paths: &[&Path]) -> ChunkArgs {
    ChunkArgs {
        paths: paths.iter().map(|p| p.to_path_buf()).collect(),
        ..Default::default()
    }
}

/// Parse JSON Lines output.
pub fn parse_jsonl(text: &str) -> Vec<serde_json::Value> {
    text.lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
