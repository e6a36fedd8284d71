//! Database access
//!
//! The loader consumes the database through [`StatementExecutor`], a
//! minimal execute-statement interface: one SQL string in, an affected-row
//! count or an error out. The production implementation is a single
//! `sqlx` PostgreSQL connection; tests inject recording doubles.
//!
//! Statements carry inlined values, so execution uses no bind parameters.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tpg_common::{LoadError, Result};

use crate::config::TableConnection;

/// Minimal execute-statement interface
#[async_trait]
pub trait StatementExecutor: Send {
    /// Execute one SQL statement, returning the affected-row count
    async fn execute(&mut self, statement: &str) -> Result<u64>;
}

#[async_trait]
impl StatementExecutor for PgConnection {
    async fn execute(&mut self, statement: &str) -> Result<u64> {
        let result = sqlx::query(statement).execute(&mut *self).await?;
        Ok(result.rows_affected())
    }
}

/// Build connect options from a table registry entry
///
/// The registry's `command_timeout` becomes the connection's
/// `statement_timeout` server option, bounding each row's statement.
pub fn connect_options(table: &TableConnection) -> PgConnectOptions {
    let mut options = PgConnectOptions::new()
        .host(&table.server)
        .port(table.port)
        .username(&table.user_id)
        .password(&table.password)
        .database(&table.database);

    if let Some(secs) = table.command_timeout {
        options = options.options([("statement_timeout", format!("{}s", secs))]);
    }

    options
}

/// Open the single connection used for one group's files
///
/// The registry's `timeout` bounds the connect call; both a refused
/// connection and a timeout surface as [`LoadError::Connection`], which
/// aborts the group.
pub async fn connect(table: &TableConnection) -> Result<PgConnection> {
    let options = connect_options(table);
    let connecting = PgConnection::connect_with(&options);

    let connection = match table.timeout {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), connecting)
            .await
            .map_err(|_| {
                LoadError::connection(format!(
                    "Timed out connecting to {}:{} after {}s",
                    table.server, table.port, secs
                ))
            })?,
        None => connecting.await,
    };

    connection.map_err(|e| LoadError::connection(e.to_string()))
}
