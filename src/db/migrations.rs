//! Ordered schema migrations.
//!
//! Each step inspects the live schema and only acts when its change is
//! missing, so steps can be re-run at every startup. New attributes get a
//! new step appended to [`MIGRATIONS`]; existing steps are never edited.

use crate::db::schema::{EXPENSES_TABLE, table_columns};
use crate::errors::{Error, Result};
use rusqlite::Connection;
use tracing::{debug, info, instrument};

/// Currency assigned to rows recorded before expenses carried one.
pub const LEGACY_CURRENCY: &str = "EUR";

/// A named, idempotent schema change.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Stable name used in logs
    pub name: &'static str,
    /// Applies the change if needed; returns whether the schema changed
    pub apply: fn(&Connection) -> Result<bool>,
}

/// Every migration, in the order they must run.
pub const MIGRATIONS: &[Migration] = &[Migration {
    name: "add_currency_column",
    apply: add_currency_column,
}];

/// Runs [`MIGRATIONS`] in order and returns the names of the steps that
/// changed the schema.
#[instrument(skip(conn))]
pub(crate) fn run_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut applied = Vec::new();
    for migration in MIGRATIONS {
        if (migration.apply)(conn)? {
            info!("Applied migration '{}'.", migration.name);
            applied.push(migration.name);
        } else {
            debug!("Migration '{}' already applied.", migration.name);
        }
    }
    Ok(applied)
}

fn add_currency_column(conn: &Connection) -> Result<bool> {
    let columns = table_columns(conn, EXPENSES_TABLE)?;
    if columns.iter().any(|c| c == "currency") {
        return Ok(false);
    }
    conn.execute_batch(&format!(
        "ALTER TABLE {EXPENSES_TABLE} ADD COLUMN currency TEXT NOT NULL DEFAULT '{LEGACY_CURRENCY}'"
    ))
    .map_err(|e| Error::Database(format!("Failed to add currency column: {}", e)))?;
    Ok(true)
}
