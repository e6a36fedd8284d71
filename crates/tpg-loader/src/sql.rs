//! Row-to-SQL translation
//!
//! Builds one INSERT statement per row, augmented into an
//! INSERT-ON-CONFLICT-UPDATE upsert when the schema declares a unique key.
//! Construction is pure: the caller supplies the wall-clock timestamp used
//! for the synthetic `update` column, and all I/O happens in the caller.
//!
//! Values are inlined into the statement text, raw for non-text type tags
//! and single-quoted for tags starting with `char`. Embedded quote
//! characters are not escaped; a text value containing `'` produces a
//! statement that fails at execution and is handled as a row-level error.

use std::fmt::Write as _;

use chrono::{DateTime, Local};
use tpg_common::{LoadError, Result};

use crate::models::{ColumnSpec, TableSchema};

/// Name of the synthetic trailing audit-timestamp column
pub const UPDATE_COLUMN: &str = "update";

/// Format of the synthetic timestamp token (`YYYYMMDD HHMMSS`)
pub const SYNTHETIC_TIMESTAMP_FORMAT: &str = "%Y%m%d %H%M%S";

/// Build the SQL statement for one tokenized row
///
/// If the last declared column is named `update`, one synthetic token
/// formatted per [`SYNTHETIC_TIMESTAMP_FORMAT`] is appended before shape
/// validation, so a schema can declare a trailing audit column that does
/// not exist in the source file.
///
/// Fails with [`LoadError::RowShapeMismatch`] when the adjusted token
/// count does not equal the declared column count; no statement is
/// produced for such rows.
pub fn build_statement(
    table: &str,
    schema: &TableSchema,
    tokens: &[&str],
    now: DateTime<Local>,
) -> Result<String> {
    let stamp;
    let mut values: Vec<&str> = tokens.to_vec();

    if schema
        .columns
        .last()
        .is_some_and(|c| c.name == UPDATE_COLUMN)
    {
        stamp = now.format(SYNTHETIC_TIMESTAMP_FORMAT).to_string();
        values.push(&stamp);
    }

    if values.len() != schema.len() {
        return Err(LoadError::RowShapeMismatch {
            expected: schema.len(),
            actual: values.len(),
        });
    }

    let column_list = schema
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let value_list = schema
        .columns
        .iter()
        .zip(&values)
        .map(|(column, value)| render_value(column, value))
        .collect::<Vec<_>>()
        .join(",");

    let mut statement = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table, column_list, value_list
    );

    if schema.has_unique_key {
        let key_list = schema
            .unique_columns()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(",");

        // Unique columns are never reassigned; every other column is set,
        // in declaration order, with the same quoting rule as the insert.
        let assignments = schema
            .columns
            .iter()
            .zip(&values)
            .filter(|(column, _)| !column.is_unique_key)
            .map(|(column, value)| format!("{}={}", column.name, render_value(column, value)))
            .collect::<Vec<_>>()
            .join(",");

        let _ = write!(
            statement,
            " ON CONFLICT ({}) DO UPDATE SET {}",
            key_list, assignments
        );
    }

    Ok(statement)
}

fn render_value(column: &ColumnSpec, value: &str) -> String {
    if column.is_text() {
        format!("'{}'", value)
    } else {
        value.to_string()
    }
}
