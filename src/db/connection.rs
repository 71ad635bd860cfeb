use crate::db::{migrations::run_migrations, schema::initialize};
use crate::errors::{Error, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Handle on the expenses database file.
///
/// The handle owns only the location of the store. Each operation opens its
/// own [`Connection`], performs one unit of work and drops it before
/// returning, so no connection outlives a call and error paths release the
/// file just like successful ones.
#[derive(Debug, Clone)]
pub struct ExpenseStore {
    path: PathBuf,
}

impl ExpenseStore {
    /// Opens (creating if needed) the store at `path`, then ensures the
    /// table exists and every migration has been applied.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.initialize()?;
        let applied = store.migrate()?;
        info!(
            "Expense store ready at {} ({} migration(s) applied).",
            store.path.display(),
            applied.len()
        );
        Ok(store)
    }

    /// Location of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the expenses table when absent. Safe on every startup.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.connect()?;
        initialize(&conn)
    }

    /// Applies every pending migration and returns the names of the steps
    /// that changed the schema. A second run returns an empty list.
    pub fn migrate(&self) -> Result<Vec<&'static str>> {
        let conn = self.connect()?;
        run_migrations(&conn)
    }

    /// Opens a fresh connection for a single unit of work.
    pub(crate) fn connect(&self) -> Result<Connection> {
        debug!("Opening database connection to: {}", self.path.display());
        Connection::open(&self.path).map_err(|e| {
            Error::Database(format!(
                "Failed to open database at {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_store};

    #[test]
    fn test_open_creates_file() -> Result<()> {
        init_test_tracing();
        let store = setup_test_store()?;
        assert!(store.path().exists());
        Ok(())
    }

    #[test]
    fn test_open_twice_is_harmless() -> Result<()> {
        let store = setup_test_store()?;
        let reopened = ExpenseStore::open(store.path())?;
        assert!(reopened.migrate()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_open_unreachable_path_fails() {
        let result = ExpenseStore::open("/nonexistent-dir/for/sure/expenses.db");
        assert!(matches!(result, Err(Error::Database(_))));
    }
}
