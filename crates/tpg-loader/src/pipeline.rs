//! Batch runner
//!
//! Iterates the configured file groups in order. Each group gets one
//! database connection scoped to its file loop: schema parse, registry
//! lookup, and connect failures abort the group before any file is
//! touched, and the run continues with the next group.
//!
//! File discovery sorts by creation time ascending. The ordering is
//! load-bearing: it approximates arrival order for append-only audit
//! correctness.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use sqlx::Connection;
use tpg_common::{LoadError, Result};
use tracing::{error, info};

use crate::config::{FileGroup, TableRegistry};
use crate::db;
use crate::models::{GroupStats, RunStats};
use crate::processor::FileProcessor;
use crate::schema;

/// Runs every configured file group, sequentially
pub struct BatchRunner {
    groups: Vec<FileGroup>,
    registry: TableRegistry,
}

impl BatchRunner {
    pub fn new(groups: Vec<FileGroup>, registry: TableRegistry) -> Self {
        Self { groups, registry }
    }

    /// Run the whole batch
    ///
    /// A group failure is logged and counted; later groups still run.
    pub async fn run(&self) -> RunStats {
        let mut run_stats = RunStats::default();

        for group in &self.groups {
            match self.run_group(group).await {
                Ok(stats) => {
                    info!(
                        path = %group.path.display(),
                        table = %group.table,
                        "Group completed: {:?}",
                        stats
                    );
                    run_stats.groups_completed += 1;
                    run_stats.merge(stats);
                },
                Err(e) => {
                    error!(
                        error = %e,
                        path = %group.path.display(),
                        table = %group.table,
                        "Group aborted"
                    );
                    run_stats.groups_failed += 1;
                },
            }
        }

        run_stats
    }

    async fn run_group(&self, group: &FileGroup) -> Result<GroupStats> {
        info!(
            path = %group.path.display(),
            pattern = %group.search_pattern,
            "Processing group"
        );

        let table_schema = schema::parse_column_specs(&group.columns)?;
        let table = self.registry.lookup(&group.table)?;
        let delimiter = group.delimiter_char()?;
        let encoding = group.source_encoding()?;

        let backup_dir = group.backup_dir();
        if !backup_dir.exists() {
            fs::create_dir_all(&backup_dir)?;
        }

        // One connection for the whole group, not per file.
        let mut connection = db::connect(table).await?;

        let files = discover_files(&group.path, &group.search_pattern)?;
        let processor = FileProcessor::new(&group.table, &table_schema, delimiter, encoding);

        let mut stats = GroupStats::default();
        for file in &files {
            let (outcome, file_stats) = processor.run(file, &backup_dir, &mut connection).await?;
            stats.record(outcome, file_stats);
        }

        connection.close().await?;

        Ok(stats)
    }
}

/// List files in `dir` matching `pattern`, oldest creation time first
pub fn discover_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = glob::Pattern::new(pattern).map_err(|e| {
        LoadError::config(format!("Invalid search pattern '{}': {}", pattern, e))
    })?;

    let mut entries: Vec<(PathBuf, SystemTime)> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name();
        if !matcher.matches(&name.to_string_lossy()) {
            continue;
        }

        let metadata = entry.metadata()?;
        // Not every filesystem records a birth time; fall back to mtime.
        let created = metadata.created().or_else(|_| metadata.modified())?;
        entries.push((entry.path(), created));
    }

    sort_by_creation(&mut entries);

    Ok(entries.into_iter().map(|(path, _)| path).collect())
}

fn sort_by_creation(entries: &mut [(PathBuf, SystemTime)]) {
    entries.sort_by_key(|(_, created)| *created);
}
