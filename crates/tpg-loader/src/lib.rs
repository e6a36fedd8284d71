//! TPG Loader Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Batch delimited-text-to-PostgreSQL loader. Ingests delimited text
//! files from configured directories, maps each row to a table using
//! externally supplied column metadata, applies the row with
//! insert-or-upsert semantics, and archives each processed file into a
//! `backup files` subdirectory with a timestamped, outcome-tagged name.
//!
//! Values are inlined into statement text without escaping, matching the
//! legacy loader this replaces; run it only against trusted input.
//!
//! # Example
//!
//! ```no_run
//! use tpg_loader::config::{load_groups, TableRegistry};
//! use tpg_loader::pipeline::BatchRunner;
//!
//! #[tokio::main]
//! async fn main() -> tpg_common::Result<()> {
//!     let groups = load_groups("./groups.toml".as_ref())?;
//!     let registry = TableRegistry::load("./tables.toml".as_ref())?;
//!
//!     let stats = BatchRunner::new(groups, registry).run().await;
//!     println!("{:?}", stats);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod processor;
pub mod schema;
pub mod sql;

// Re-export commonly used types
pub use tpg_common::{LoadError, Result};
