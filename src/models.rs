//! Records exchanged between the store and the rest of the tracker.

/// One persisted expense row of the `expenses` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Assigned by the store, never reused
    pub id: i64, // INTEGER PRIMARY KEY AUTOINCREMENT
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
    /// Category name as entered
    pub category: String,
    /// Always positive when written through the shell
    pub amount: f64,
    /// Currency code; `EUR` for rows older than the currency column
    pub currency: String,
}

/// An expense that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
    /// Category name
    pub category: String,
    /// Positive amount in `currency`
    pub amount: f64,
    /// Currency code
    pub currency: String,
}

/// Attribute-wise constraints for a query, combined with AND.
///
/// `None` leaves the attribute unconstrained.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Only this year
    pub year: Option<i32>,
    /// Only this month (1-12)
    pub month: Option<u32>,
    /// Only this category, matched exactly
    pub category: Option<String>,
    /// Only this currency code
    pub currency: Option<String>,
}

impl ExpenseFilter {
    /// A filter matching every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to one year.
    #[must_use]
    pub const fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Restricts to one month.
    #[must_use]
    pub const fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    /// Restricts to one category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts to one currency.
    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// True when no attribute is constrained.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.month.is_none()
            && self.category.is_none()
            && self.currency.is_none()
    }
}
