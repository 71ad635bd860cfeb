//! Storage layer: the `SQLite` expenses table, its schema and migrations.

pub mod connection;
pub mod expenses;
pub mod migrations;
pub(crate) mod schema;
#[cfg(test)]
pub(crate) mod test_utils;

pub use connection::ExpenseStore;
pub use expenses::BatchDelete;
pub use migrations::{LEGACY_CURRENCY, MIGRATIONS, Migration};
