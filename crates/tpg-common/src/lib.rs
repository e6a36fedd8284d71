//! TPG Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the TPG workspace.
//!
//! # Overview
//!
//! This crate provides the ambient concerns used by the loader:
//!
//! - **Error Handling**: The [`LoadError`] taxonomy and [`Result`] alias
//! - **Logging**: [`logging::LogConfig`] and [`logging::init_logging`]
//!
//! # Example
//!
//! ```no_run
//! use tpg_common::{LoadError, Result};
//!
//! fn resolve_table(name: &str) -> Result<()> {
//!     Err(LoadError::metadata_lookup(name))
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{LoadError, Result};
