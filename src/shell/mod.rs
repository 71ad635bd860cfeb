//! Application shell - turns user commands into storage calls and renders
//! the results.
//!
//! [`App`] holds the storage handle, the configuration and the current view
//! filter. Its actions return `Result`s; the session layer decides how to
//! show outcomes and failures.

/// Command-line grammar
pub mod cli;
/// Dispatching commands and the interactive loop
pub mod session;
/// Terminal table rendering
pub mod table;

use crate::{
    config::AppConfig,
    core::{
        charts::{ChartRenderer, ChartSpec, TextChartRenderer},
        export::{ExportOutcome, export_csv},
        report::{ReportOutcome, write_text_report},
        summary::{ReportReadiness, check_single_currency, spending_by_category, view_total},
        validation::{ExpenseInput, validate_new_expense},
    },
    db::{BatchDelete, ExpenseStore},
    errors::Result,
    models::{Expense, ExpenseFilter, NewExpense},
};
use std::{io::Write, path::Path};
use tracing::{debug, info};

/// The running application.
pub struct App {
    store: ExpenseStore,
    config: AppConfig,
    charts: Box<dyn ChartRenderer>,
    view: ExpenseFilter,
}

impl App {
    /// An application showing every expense, drawing text charts.
    #[must_use]
    pub fn new(store: ExpenseStore, config: AppConfig) -> Self {
        Self {
            store,
            config,
            charts: Box::new(TextChartRenderer::default()),
            view: ExpenseFilter::all(),
        }
    }

    /// Replaces the chart renderer used for charts and reports.
    #[must_use]
    pub fn with_chart_renderer(mut self, charts: Box<dyn ChartRenderer>) -> Self {
        self.charts = charts;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &ExpenseStore {
        &self.store
    }

    /// Filters of the current view.
    #[must_use]
    pub const fn view(&self) -> &ExpenseFilter {
        &self.view
    }

    /// Validates and stores a new expense. Nothing is stored when
    /// validation fails.
    pub fn add_expense(&self, input: &ExpenseInput) -> Result<NewExpense> {
        let expense = validate_new_expense(input, &self.config)?;
        self.store.insert(&expense)?;
        Ok(expense)
    }

    /// Deletes a selection of expenses, best-effort.
    #[must_use]
    pub fn delete_expenses(&self, ids: &[i64]) -> BatchDelete {
        self.store.delete_many(ids)
    }

    /// Makes `filter` the current view.
    pub fn apply_filters(&mut self, filter: ExpenseFilter) {
        debug!("Applying view filter {:?}", filter);
        self.view = filter;
    }

    /// Back to the unfiltered view.
    pub fn reset_filters(&mut self) {
        self.view = ExpenseFilter::all();
    }

    /// Expenses matching the current view, most recent first.
    pub fn current_view(&self) -> Result<Vec<Expense>> {
        self.store.query(&self.view)
    }

    /// Writes the view description, the expenses table and the view total.
    pub fn render_view(&self, out: &mut dyn Write) -> Result<()> {
        let rows = self.current_view()?;
        writeln!(out, "{}", table::describe_filter(&self.view, &self.config))?;
        writeln!(out, "{}", table::expense_table(&rows, &self.config))?;
        writeln!(
            out,
            "{}",
            table::format_view_total(&view_total(&rows), &self.config)
        )?;
        Ok(())
    }

    /// Shows a bar chart of spending by category for the current view.
    ///
    /// Returns the view's readiness; the chart is only drawn when it is
    /// [`ReportReadiness::Ready`].
    pub fn show_chart(&self, out: &mut dyn Write) -> Result<ReportReadiness> {
        let rows = self.current_view()?;
        let readiness = check_single_currency(&rows);
        if let ReportReadiness::Ready { currency } = &readiness {
            let symbol = self.config.symbol_for(currency);
            let chart = ChartSpec::bar(
                "Spending by Category",
                "Category",
                &format!("Amount ({symbol})"),
                spending_by_category(&rows),
            );
            self.charts.display(&chart, out)?;
        }
        Ok(readiness)
    }

    /// Writes the printable report of the current view to `path`.
    pub fn export_report(&self, path: &Path) -> Result<ReportOutcome> {
        let rows = self.current_view()?;
        write_text_report(&self.config, self.charts.as_ref(), &rows, path)
    }

    /// Exports every stored expense, ignoring the view.
    pub fn export_csv(&self, path: &Path) -> Result<ExportOutcome> {
        let outcome = export_csv(&self.store, &self.config, path)?;
        info!("CSV export finished: {:?}", outcome);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::db::test_utils::{TestStore, setup_test_store};
    use crate::errors::Error;

    fn input(year: i32, month: &str, category: &str, amount: &str, currency: &str) -> ExpenseInput {
        ExpenseInput {
            year: Some(year),
            month: month.to_string(),
            category: category.to_string(),
            amount: amount.to_string(),
            currency: Some(currency.to_string()),
        }
    }

    fn scenario_app() -> Result<(TestStore, App)> {
        let store = setup_test_store()?;
        let app = App::new((*store).clone(), AppConfig::default());
        app.add_expense(&input(2024, "1", "Transporte", "50.00", "EUR"))?;
        app.add_expense(&input(2024, "2", "Transporte", "30.00", "EUR"))?;
        app.add_expense(&input(2024, "2", "Lazer", "10.00", "USD"))?;
        Ok((store, app))
    }

    #[test]
    fn test_invalid_amount_is_not_submitted() -> Result<()> {
        let store = setup_test_store()?;
        let app = App::new((*store).clone(), AppConfig::default());

        let result = app.add_expense(&input(2024, "1", "Lazer", "-3", "EUR"));

        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(app.current_view()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_scenario_unfiltered_view_refuses_report() -> Result<()> {
        let (store, app) = scenario_app()?;
        let out = store.dir().join("report.txt");

        assert_eq!(app.current_view()?.len(), 3);
        let outcome = app.export_report(&out)?;

        assert_eq!(
            outcome,
            ReportOutcome::MixedCurrencies(vec!["EUR".to_string(), "USD".to_string()])
        );
        assert!(!out.exists());
        Ok(())
    }

    #[test]
    fn test_scenario_eur_view_permits_report() -> Result<()> {
        let (store, mut app) = scenario_app()?;
        let out = store.dir().join("report.txt");

        app.apply_filters(ExpenseFilter::all().currency("EUR"));
        let rows = app.current_view()?;
        let outcome = app.export_report(&out)?;
        let written = out.exists();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows.iter().map(|e| e.amount).sum::<f64>(), 80.0);
        assert_eq!(outcome, ReportOutcome::Written { pages: 3 });
        assert!(written);
        Ok(())
    }

    #[test]
    fn test_render_view_shows_total() -> Result<()> {
        let (_store, mut app) = scenario_app()?;
        let mut out = Vec::new();

        app.render_view(&mut out)?;
        let mixed = String::from_utf8_lossy(&out).to_string();
        assert!(mixed.contains("View: all expenses"));
        assert!(mixed.contains("Total in view: Multiple currencies"));

        app.apply_filters(ExpenseFilter::all().currency("EUR"));
        out.clear();
        app.render_view(&mut out)?;
        let eur = String::from_utf8_lossy(&out).to_string();
        assert!(eur.contains("Total in view: € 80.00"));
        assert!(!eur.contains("Lazer"));
        Ok(())
    }

    #[test]
    fn test_show_chart_requires_single_currency() -> Result<()> {
        let (_store, mut app) = scenario_app()?;
        let mut out = Vec::new();

        let readiness = app.show_chart(&mut out)?;
        assert!(matches!(readiness, ReportReadiness::MixedCurrencies(_)));
        assert!(out.is_empty());

        app.apply_filters(ExpenseFilter::all().currency("USD"));
        let readiness = app.show_chart(&mut out)?;
        assert_eq!(
            readiness,
            ReportReadiness::Ready {
                currency: "USD".to_string()
            }
        );
        assert!(String::from_utf8_lossy(&out).contains("Lazer"));
        Ok(())
    }

    #[test]
    fn test_reset_filters_restores_full_view() -> Result<()> {
        let (_store, mut app) = scenario_app()?;
        app.apply_filters(ExpenseFilter::all().category("Lazer"));
        assert_eq!(app.current_view()?.len(), 1);

        app.reset_filters();

        assert!(app.view().is_empty());
        assert_eq!(app.current_view()?.len(), 3);
        Ok(())
    }

    #[test]
    fn test_delete_then_view_is_rebuilt() -> Result<()> {
        let (_store, app) = scenario_app()?;
        let ids: Vec<i64> = app.current_view()?.iter().map(|e| e.id).collect();

        let outcome = app.delete_expenses(&ids[..2]);

        assert!(outcome.is_complete());
        let remaining = app.current_view()?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].category, "Transporte");
        assert_eq!(remaining[0].month, 1);
        Ok(())
    }
}
