//! Delimited text export of every stored expense.
//!
//! The file follows the conventions of the configured locale: `;` between
//! fields, `,` as the decimal separator and month names instead of numbers.

use crate::{config::AppConfig, db::ExpenseStore, errors::Result, models::Expense};
use serde::Serialize;
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The store holds no expenses; no file was written
    Empty,
    /// The file was written
    Written {
        /// Destination file
        path: PathBuf,
        /// Number of data rows (header excluded)
        rows: usize,
    },
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: i64,
    year: i32,
    month: &'a str,
    category: &'a str,
    amount: String,
    currency: &'a str,
}

/// Renders an amount with two decimals and a comma separator: `50,00`.
#[must_use]
pub fn format_decimal_comma(amount: f64) -> String {
    format!("{amount:.2}").replace('.', ",")
}

/// Writes `rows` with a header line to `writer`.
pub fn write_csv<W: Write>(writer: W, rows: &[Expense], config: &AppConfig) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);
    for expense in rows {
        wtr.serialize(CsvRow {
            id: expense.id,
            year: expense.year,
            month: config.month_name(expense.month),
            category: &expense.category,
            amount: format_decimal_comma(expense.amount),
            currency: &expense.currency,
        })?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

/// Exports the full, unfiltered record set to `path`.
///
/// An empty store is not an error: nothing is written and
/// [`ExportOutcome::Empty`] is returned.
#[instrument(skip(store, config))]
pub fn export_csv(store: &ExpenseStore, config: &AppConfig, path: &Path) -> Result<ExportOutcome> {
    let rows = store.query_all()?;
    if rows.is_empty() {
        info!("Nothing to export.");
        return Ok(ExportOutcome::Empty);
    }
    let file = File::create(path)?;
    let written = write_csv(file, &rows, config)?;
    info!("Exported {} expenses to {}", written, path.display());
    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        rows: written,
    })
}
