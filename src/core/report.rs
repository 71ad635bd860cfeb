//! Printable report generation.
//!
//! A report summarises a single-currency view over up to three pages:
//! a textual summary with spending by category, the category distribution
//! (only when something was spent) and the month-over-month trend (only
//! when the view spans more than one calendar month). Charts are
//! rasterized to scratch files, embedded, and the files removed again.

use crate::{
    config::AppConfig,
    core::{
        charts::{ChartRenderer, ChartSpec},
        document::{DocumentCanvas, FontStyle, INCH, TextDocument},
        summary::{
            ReportReadiness, check_single_currency, monthly_totals, spending_by_category,
            total_amount,
        },
    },
    errors::Result,
    models::Expense,
};
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::{debug, info, instrument, warn};

/// Result of a report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The view is empty; nothing was written
    Empty,
    /// The view mixes currencies; nothing was computed or written
    MixedCurrencies(Vec<String>),
    /// The document was saved
    Written {
        /// Number of pages in the document
        pages: usize,
    },
}

/// Lays out reports on a [`DocumentCanvas`] using a [`ChartRenderer`].
pub struct ReportGenerator<'a> {
    config: &'a AppConfig,
    charts: &'a dyn ChartRenderer,
    scratch_dir: PathBuf,
}

impl<'a> ReportGenerator<'a> {
    /// A generator writing scratch charts to the system temp directory.
    #[must_use]
    pub fn new(config: &'a AppConfig, charts: &'a dyn ChartRenderer) -> Self {
        Self {
            config,
            charts,
            scratch_dir: std::env::temp_dir(),
        }
    }

    /// Uses `dir` for scratch chart files instead of the temp directory.
    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Draws the report for `rows` onto `canvas` and saves it.
    ///
    /// Empty and mixed-currency views are refused before anything is drawn.
    #[instrument(skip(self, rows, canvas), fields(rows = rows.len()))]
    pub fn generate(
        &self,
        rows: &[Expense],
        canvas: &mut dyn DocumentCanvas,
    ) -> Result<ReportOutcome> {
        let currency = match check_single_currency(rows) {
            ReportReadiness::Empty => {
                info!("No expenses in view; report skipped.");
                return Ok(ReportOutcome::Empty);
            }
            ReportReadiness::MixedCurrencies(codes) => {
                warn!("Report refused: view mixes currencies {:?}", codes);
                return Ok(ReportOutcome::MixedCurrencies(codes));
            }
            ReportReadiness::Ready { currency } => currency,
        };
        let symbol = self.config.symbol_for(&currency);
        let amount_label = format!("Amount ({symbol})");
        let (width, height) = canvas.page_size();
        let total = total_amount(rows);
        let mut pages = 1;

        canvas.set_font(FontStyle::Bold, 18.0);
        canvas.draw_centred_string(width / 2.0, height - INCH, "Expense Report");
        canvas.set_font(FontStyle::Oblique, 10.0);
        canvas.draw_centred_string(
            width / 2.0,
            height - 1.25 * INCH,
            &format!("Report for currency: {currency} ({symbol})"),
        );

        canvas.set_font(FontStyle::Bold, 12.0);
        canvas.draw_string(INCH, height - 2.0 * INCH, "Summary");
        canvas.set_font(FontStyle::Regular, 11.0);
        canvas.draw_string(
            INCH,
            height - 2.25 * INCH,
            &format!("Total spent: {symbol} {total:.2}"),
        );
        canvas.draw_string(
            INCH,
            height - 2.5 * INCH,
            &format!("Number of transactions: {}", rows.len()),
        );

        canvas.set_font(FontStyle::Bold, 12.0);
        canvas.draw_string(INCH, height - 3.25 * INCH, "Spending by Category");
        let by_category = spending_by_category(rows);
        let bar = ChartSpec::bar("", "", &amount_label, by_category.clone());
        self.embed(
            canvas,
            &bar,
            "bar",
            (INCH, height - 7.0 * INCH, 6.5 * INCH, 3.5 * INCH),
        )?;

        if total > 0.0 {
            canvas.show_page();
            pages += 1;
            canvas.set_font(FontStyle::Bold, 18.0);
            canvas.draw_centred_string(width / 2.0, height - INCH, "Expense Distribution");
            let pie = ChartSpec::pie("", by_category);
            self.embed(
                canvas,
                &pie,
                "pie",
                (width / 2.0 - 2.5 * INCH, height - 6.5 * INCH, 5.0 * INCH, 4.5 * INCH),
            )?;
        }

        let monthly = monthly_totals(rows);
        if monthly.len() > 1 {
            canvas.show_page();
            pages += 1;
            canvas.set_font(FontStyle::Bold, 18.0);
            canvas.draw_centred_string(width / 2.0, height - INCH, "Monthly Spending Trend");
            let points = monthly.iter().map(|m| (m.label(), m.total)).collect();
            let line = ChartSpec::line("", "Month", &format!("Total spent ({symbol})"), points);
            self.embed(
                canvas,
                &line,
                "line",
                (INCH, height - 6.0 * INCH, 6.5 * INCH, 3.5 * INCH),
            )?;
        }

        canvas.save()?;
        info!("Report written: {} page(s), {} {:.2}", pages, currency, total);
        Ok(ReportOutcome::Written { pages })
    }

    fn embed(
        &self,
        canvas: &mut dyn DocumentCanvas,
        chart: &ChartSpec,
        name: &str,
        (x, y, width, height): (f64, f64, f64, f64),
    ) -> Result<()> {
        let prefix = format!("expense-report-{name}-");
        let suffix = format!(".{}", self.charts.file_extension());
        // Removed when `scratch` drops, also when embedding fails.
        let scratch = Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(&self.scratch_dir)?
            .into_temp_path();
        debug!("Rasterizing {} chart to {}", name, scratch.display());
        self.charts.rasterize(chart, &scratch)?;
        canvas.draw_image(&scratch, x, y, width, height)
    }
}

/// Writes the report for `rows` as a text document at `path`.
///
/// Nothing is created at `path` unless the outcome is
/// [`ReportOutcome::Written`].
pub fn write_text_report(
    config: &AppConfig,
    charts: &dyn ChartRenderer,
    rows: &[Expense],
    path: &Path,
) -> Result<ReportOutcome> {
    let mut document = TextDocument::new(path);
    ReportGenerator::new(config, charts).generate(rows, &mut document)
}
