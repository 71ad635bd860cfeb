//! Aggregations over a view of expenses.
//!
//! Totals are only meaningful within one currency, so every aggregate that
//! feeds a chart or report is gated by [`check_single_currency`].

use crate::models::Expense;
use std::collections::{BTreeMap, BTreeSet};

/// The "total in view" shown under the expenses table.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewTotal {
    /// Nothing in view
    Empty,
    /// More than one currency in view; no meaningful sum
    MultipleCurrencies(Vec<String>),
    /// Sum of every amount in view
    Single {
        /// The only currency in view
        currency: String,
        /// Arithmetic sum of the amounts
        total: f64,
    },
}

/// Whether a view can be charted or reported on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportReadiness {
    /// Nothing to report
    Empty,
    /// Charts and reports need a single currency
    MixedCurrencies(Vec<String>),
    /// Exactly one currency in view
    Ready {
        /// The currency every row is denominated in
        currency: String,
    },
}

/// Total spent in one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub total: f64,
}

impl MonthlyTotal {
    /// `YYYY-MM` label used on chart axes.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Distinct currency codes in `rows`, sorted.
#[must_use]
pub fn currencies_in_view(rows: &[Expense]) -> Vec<String> {
    rows.iter()
        .map(|e| e.currency.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The precondition shared by every chart and report.
#[must_use]
pub fn check_single_currency(rows: &[Expense]) -> ReportReadiness {
    let mut currencies = currencies_in_view(rows);
    match currencies.len() {
        0 => ReportReadiness::Empty,
        1 => ReportReadiness::Ready {
            currency: currencies.remove(0),
        },
        _ => ReportReadiness::MixedCurrencies(currencies),
    }
}

#[must_use]
pub fn total_amount(rows: &[Expense]) -> f64 {
    rows.iter().map(|e| e.amount).sum()
}

#[must_use]
pub fn view_total(rows: &[Expense]) -> ViewTotal {
    match check_single_currency(rows) {
        ReportReadiness::Empty => ViewTotal::Empty,
        ReportReadiness::MixedCurrencies(codes) => ViewTotal::MultipleCurrencies(codes),
        ReportReadiness::Ready { currency } => ViewTotal::Single {
            currency,
            total: total_amount(rows),
        },
    }
}

/// Total per category, sorted by category name.
#[must_use]
pub fn spending_by_category(rows: &[Expense]) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in rows {
        *totals.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }
    totals
        .into_iter()
        .map(|(category, total)| (category.to_string(), total))
        .collect()
}

/// Total per calendar month from the earliest to the latest month in
/// `rows`, ascending. Months in between without expenses appear with a
/// zero total so the series has no holes.
#[must_use]
pub fn monthly_totals(rows: &[Expense]) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<i64, f64> = BTreeMap::new();
    for expense in rows {
        let index = i64::from(expense.year) * 12 + i64::from(expense.month) - 1;
        *totals.entry(index).or_insert(0.0) += expense.amount;
    }

    let (Some(&first), Some(&last)) = (totals.keys().next(), totals.keys().next_back()) else {
        return Vec::new();
    };

    (first..=last)
        .filter_map(|index| {
            let year = i32::try_from(index.div_euclid(12)).ok()?;
            let month = u32::try_from(index.rem_euclid(12) + 1).ok()?;
            Some(MonthlyTotal {
                year,
                month,
                total: totals.get(&index).copied().unwrap_or(0.0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    fn expense(
        id: i64,
        year: i32,
        month: u32,
        category: &str,
        amount: f64,
        currency: &str,
    ) -> Expense {
        Expense {
            id,
            year,
            month,
            category: category.to_string(),
            amount,
            currency: currency.to_string(),
        }
    }

    fn scenario() -> Vec<Expense> {
        vec![
            expense(3, 2024, 2, "Lazer", 10.0, "USD"),
            expense(2, 2024, 2, "Transporte", 30.0, "EUR"),
            expense(1, 2024, 1, "Transporte", 50.0, "EUR"),
        ]
    }

    #[test]
    fn test_mixed_currencies_are_not_ready() {
        assert_eq!(
            check_single_currency(&scenario()),
            ReportReadiness::MixedCurrencies(vec!["EUR".to_string(), "USD".to_string()])
        );
        assert!(matches!(
            view_total(&scenario()),
            ViewTotal::MultipleCurrencies(_)
        ));
    }

    #[test]
    fn test_single_currency_total() {
        let eur: Vec<Expense> = scenario()
            .into_iter()
            .filter(|e| e.currency == "EUR")
            .collect();

        assert_eq!(
            check_single_currency(&eur),
            ReportReadiness::Ready {
                currency: "EUR".to_string()
            }
        );
        assert_eq!(
            view_total(&eur),
            ViewTotal::Single {
                currency: "EUR".to_string(),
                total: 80.0
            }
        );
    }

    #[test]
    fn test_empty_view() {
        assert_eq!(check_single_currency(&[]), ReportReadiness::Empty);
        assert_eq!(view_total(&[]), ViewTotal::Empty);
        assert!(monthly_totals(&[]).is_empty());
        assert!(spending_by_category(&[]).is_empty());
    }

    #[test]
    fn test_spending_by_category_sums_and_sorts() {
        let rows = vec![
            expense(1, 2024, 1, "Transporte", 50.0, "EUR"),
            expense(2, 2024, 1, "Alimentação", 20.0, "EUR"),
            expense(3, 2024, 2, "Transporte", 30.0, "EUR"),
        ];
        assert_eq!(
            spending_by_category(&rows),
            vec![
                ("Alimentação".to_string(), 20.0),
                ("Transporte".to_string(), 80.0)
            ]
        );
    }

    #[test]
    fn test_monthly_totals_fill_gaps_across_years() {
        let rows = vec![
            expense(1, 2023, 11, "Lazer", 5.0, "EUR"),
            expense(2, 2024, 2, "Lazer", 7.0, "EUR"),
            expense(3, 2024, 2, "Lazer", 1.0, "EUR"),
        ];
        let totals = monthly_totals(&rows);

        let labels: Vec<String> = totals.iter().map(MonthlyTotal::label).collect();
        assert_eq!(labels, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
        assert_eq!(
            totals.iter().map(|t| t.total).collect::<Vec<_>>(),
            vec![5.0, 0.0, 0.0, 8.0]
        );
    }

    #[test]
    fn test_single_month_has_one_entry() {
        let rows = vec![
            expense(1, 2024, 5, "Lazer", 5.0, "EUR"),
            expense(2, 2024, 5, "Moradia", 6.0, "EUR"),
        ];
        assert_eq!(monthly_totals(&rows).len(), 1);
    }
}
