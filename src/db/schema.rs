use crate::errors::{Error, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, instrument};

/// Name of the only table the tracker persists.
pub const EXPENSES_TABLE: &str = "expenses";

/// Creates the base `expenses` table if it does not exist.
///
/// The `currency` column is not part of the base table; it is added by the
/// `add_currency_column` migration so that fresh and legacy stores end up
/// with the same schema.
#[instrument(skip(conn))]
pub(crate) fn initialize(conn: &Connection) -> Result<()> {
    debug!("Executing CREATE TABLE statement if the table does not exist.");
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL
        );",
    )
    .map_err(|e| Error::Database(format!("Failed to create expenses table: {}", e)))?;
    Ok(())
}

/// Column names of `table`, in declaration order.
pub(crate) fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

/// The stored `CREATE TABLE` statement of `table`, if the table exists.
pub(crate) fn table_definition(conn: &Connection, table: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![table],
        |row| row.get(0),
    )
    .optional()
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_creates_base_columns() -> Result<()> {
        let conn = Connection::open_in_memory()?;
        initialize(&conn)?;
        assert_eq!(
            table_columns(&conn, EXPENSES_TABLE)?,
            vec!["id", "year", "month", "category", "amount"]
        );
        Ok(())
    }

    #[test]
    fn test_initialize_is_idempotent() -> Result<()> {
        let conn = Connection::open_in_memory()?;
        initialize(&conn)?;
        let first = table_definition(&conn, EXPENSES_TABLE)?;
        initialize(&conn)?;
        initialize(&conn)?;
        assert_eq!(table_definition(&conn, EXPENSES_TABLE)?, first);
        Ok(())
    }

    #[test]
    fn test_table_definition_missing_table() -> Result<()> {
        let conn = Connection::open_in_memory()?;
        assert!(table_definition(&conn, EXPENSES_TABLE)?.is_none());
        Ok(())
    }
}
