//! Per-file processing
//!
//! Streams one file's lines through the row translator and the statement
//! executor, isolating failures per line: a rejected row or a failed
//! statement is logged and the loop continues. A file that cannot be read
//! marks the outcome `Error` and abandons its remaining lines.
//!
//! The archive step always runs: the processor captures the outcome tag
//! first, then moves the file into the group's backup directory under a
//! timestamped, outcome-suffixed name. The source directory is drained
//! every run and files are never double-processed on rerun.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use encoding_rs::Encoding;
use tpg_common::Result;
use tracing::{error, info, warn};

use crate::db::StatementExecutor;
use crate::models::{FileOutcome, FileStats, TableSchema};
use crate::sql;

/// Timestamp format embedded in archived filenames
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Processes the files of one group against one open connection
pub struct FileProcessor<'a> {
    table: &'a str,
    schema: &'a TableSchema,
    delimiter: char,
    encoding: &'static Encoding,
}

impl<'a> FileProcessor<'a> {
    pub fn new(
        table: &'a str,
        schema: &'a TableSchema,
        delimiter: char,
        encoding: &'static Encoding,
    ) -> Self {
        Self {
            table,
            schema,
            delimiter,
            encoding,
        }
    }

    /// Process one file, then archive it regardless of outcome
    ///
    /// Row-level failures never abort the file; the returned outcome only
    /// records file-level errors. A failed archive move escalates to the
    /// caller and aborts the group.
    pub async fn run<E: StatementExecutor>(
        &self,
        path: &Path,
        backup_dir: &Path,
        executor: &mut E,
    ) -> Result<(FileOutcome, FileStats)> {
        let (outcome, stats) = self.apply_lines(path, executor).await;

        let archived = archive_file(path, backup_dir, outcome, Local::now())?;
        info!(
            source = %path.display(),
            archived = %archived.display(),
            rows_applied = stats.rows_applied,
            rows_skipped = stats.rows_skipped,
            row_errors = stats.row_errors,
            "File processed"
        );

        Ok((outcome, stats))
    }

    async fn apply_lines<E: StatementExecutor>(
        &self,
        path: &Path,
        executor: &mut E,
    ) -> (FileOutcome, FileStats) {
        let mut stats = FileStats::default();

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, file = %path.display(), "Failed to read file");
                return (FileOutcome::Error, stats);
            },
        };

        let (text, _, had_errors) = self.encoding.decode(&bytes);
        if had_errors {
            warn!(
                file = %path.display(),
                encoding = self.encoding.name(),
                "Undecodable byte sequences replaced"
            );
        }

        for line in text.lines() {
            let tokens: Vec<&str> = line.split(self.delimiter).collect();

            let statement =
                match sql::build_statement(self.table, self.schema, &tokens, Local::now()) {
                    Ok(statement) => statement,
                    Err(e) => {
                        warn!(line = %line, error = %e, "Row rejected");
                        stats.rows_skipped += 1;
                        continue;
                    },
                };

            match executor.execute(&statement).await {
                Ok(_) => stats.rows_applied += 1,
                Err(e) => {
                    error!(error = %e, statement = %statement, "Statement execution failed");
                    stats.row_errors += 1;
                },
            }
        }

        (FileOutcome::Success, stats)
    }
}

/// Move a processed file into the backup directory
///
/// The archived name is `<stem>_<yyyyMMddHHmmss><outcome suffix><ext>`.
/// An existing file of that exact name is deleted first, then the source
/// is renamed into place.
pub fn archive_file(
    source: &Path,
    backup_dir: &Path,
    outcome: FileOutcome,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let destination = backup_dir.join(format!(
        "{}_{}{}{}",
        stem,
        now.format(ARCHIVE_TIMESTAMP_FORMAT),
        outcome.suffix(),
        extension
    ));

    if destination.exists() {
        fs::remove_file(&destination)?;
    }
    fs::rename(source, &destination)?;

    Ok(destination)
}
