#![allow(dead_code)]
use crate::db::ExpenseStore;
use crate::errors::Result;
use crate::models::NewExpense;
use std::ops::Deref;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            // Default to TRACE for tests if RUST_LOG is not set
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer() // Crucial for `cargo test` output
        .try_init(); // Use try_init to avoid panic if already initialized
}

/// An [`ExpenseStore`] in its own temporary directory, removed on drop.
///
/// The store reopens its file for every operation, so an in-memory database
/// would lose its contents between calls; each test gets its own file.
pub(crate) struct TestStore {
    store: ExpenseStore,
    dir: TempDir,
}

impl TestStore {
    /// Directory holding the database; also a place for test output files.
    pub(crate) fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }
}

impl Deref for TestStore {
    type Target = ExpenseStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

// Fresh, initialized and migrated store for a single test.
pub(crate) fn setup_test_store() -> Result<TestStore> {
    let dir = tempfile::tempdir()?;
    let store = ExpenseStore::open(dir.path().join("expenses.db"))?;
    Ok(TestStore { store, dir })
}

pub(crate) fn new_expense(
    year: i32,
    month: u32,
    category: &str,
    amount: f64,
    currency: &str,
) -> NewExpense {
    NewExpense {
        year,
        month,
        category: category.to_string(),
        amount,
        currency: currency.to_string(),
    }
}
