use crate::db::ExpenseStore;
use crate::errors::{Error, Result};
use crate::models::{Expense, ExpenseFilter, NewExpense};
use rusqlite::types::Value;
use rusqlite::{Row, params, params_from_iter};
use tracing::{debug, info, instrument, warn};

const SELECT_EXPENSES: &str = "SELECT id, year, month, category, amount, currency FROM expenses";
const ORDER_MOST_RECENT_FIRST: &str = " ORDER BY year DESC, month DESC, id DESC";

/// Outcome of deleting a selection of expenses one by one.
///
/// Deletion is best-effort: each id is removed in its own unit of work, and
/// a failure on one id neither undoes earlier deletions nor stops later ones.
#[derive(Debug, Default)]
pub struct BatchDelete {
    /// Every id that was attempted, in selection order
    pub attempted: Vec<i64>,
    /// Ids whose deletion failed, with the error
    pub failures: Vec<(i64, Error)>,
}

impl BatchDelete {
    /// True when every attempted deletion succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of ids whose deletion went through (or was a no-op).
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.attempted.len() - self.failures.len()
    }
}

impl ExpenseStore {
    /// Appends a new expense. The id is assigned by the store and is only
    /// observable by querying again.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or the insert fails
    /// (file locked, disk full).
    #[instrument(skip(self))]
    pub fn insert(&self, expense: &NewExpense) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO expenses (year, month, category, amount, currency)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                expense.year,
                expense.month,
                expense.category,
                expense.amount,
                expense.currency,
            ],
        )?;
        info!(
            "Added expense: {}-{:02} '{}' {:.2} {}",
            expense.year, expense.month, expense.category, expense.amount, expense.currency
        );
        Ok(())
    }

    /// Removes the expense with `id`. Deleting an id that does not exist is
    /// a silent no-op.
    #[instrument(skip(self))]
    pub fn delete_by_id(&self, id: i64) -> Result<()> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        if removed == 0 {
            debug!("No expense with id {} to delete.", id);
        } else {
            info!("Deleted expense {}.", id);
        }
        Ok(())
    }

    /// Deletes every id of a selection independently. See [`BatchDelete`].
    #[instrument(skip(self))]
    pub fn delete_many(&self, ids: &[i64]) -> BatchDelete {
        let mut outcome = BatchDelete::default();
        for &id in ids {
            outcome.attempted.push(id);
            if let Err(e) = self.delete_by_id(id) {
                warn!("Failed to delete expense {}: {}", id, e);
                outcome.failures.push((id, e));
            }
        }
        outcome
    }

    /// Returns the expenses matching every constraint of `filter`, most
    /// recent first (year, month, then id, all descending).
    #[instrument(skip(self))]
    pub fn query(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let conn = self.connect()?;
        let (sql, values) = build_query(filter);
        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(params_from_iter(values.iter()), map_expense_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!("Fetched {} expenses.", expenses.len());
        Ok(expenses)
    }

    /// Every stored expense, most recent first.
    pub fn query_all(&self) -> Result<Vec<Expense>> {
        self.query(&ExpenseFilter::all())
    }
}

fn build_query(filter: &ExpenseFilter) -> (String, Vec<Value>) {
    let mut conditions = Vec::new();
    let mut values = Vec::new();

    if let Some(year) = filter.year {
        conditions.push("year = ?");
        values.push(Value::Integer(i64::from(year)));
    }
    if let Some(month) = filter.month {
        conditions.push("month = ?");
        values.push(Value::Integer(i64::from(month)));
    }
    if let Some(category) = &filter.category {
        conditions.push("category = ?");
        values.push(Value::Text(category.clone()));
    }
    if let Some(currency) = &filter.currency {
        conditions.push("currency = ?");
        values.push(Value::Text(currency.clone()));
    }

    let mut sql = SELECT_EXPENSES.to_string();
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(ORDER_MOST_RECENT_FIRST);
    (sql, values)
}

fn map_expense_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        year: row.get(1)?,
        month: row.get(2)?,
        category: row.get(3)?,
        amount: row.get(4)?,
        currency: row.get(5)?,
    })
}
