//! Chart descriptions and the renderer seam.
//!
//! Report and view code only build [`ChartSpec`]s; turning them into
//! pictures is the job of a [`ChartRenderer`]. [`TextChartRenderer`] draws
//! fixed-width text charts so the terminal shell and the text report work
//! without any graphics backend.

use crate::errors::{Error, Result};
use std::{fs, io::Write, path::Path};

/// Shape of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// One bar per label
    Bar,
    /// Share of the whole per label
    Pie,
    /// Values along an ordered axis
    Line,
}

/// A small table plus axis and label hints.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Chart shape
    pub kind: ChartKind,
    /// Title drawn above the chart; may be empty
    pub title: String,
    /// Label of the category/period axis
    pub x_label: String,
    /// Label of the value axis
    pub y_label: String,
    /// `(label, value)` pairs in display order
    pub points: Vec<(String, f64)>,
}

impl ChartSpec {
    #[must_use]
    pub fn bar(title: &str, x_label: &str, y_label: &str, points: Vec<(String, f64)>) -> Self {
        Self::new(ChartKind::Bar, title, x_label, y_label, points)
    }

    #[must_use]
    pub fn pie(title: &str, points: Vec<(String, f64)>) -> Self {
        Self::new(ChartKind::Pie, title, "", "", points)
    }

    #[must_use]
    pub fn line(title: &str, x_label: &str, y_label: &str, points: Vec<(String, f64)>) -> Self {
        Self::new(ChartKind::Line, title, x_label, y_label, points)
    }

    fn new(
        kind: ChartKind,
        title: &str,
        x_label: &str,
        y_label: &str,
        points: Vec<(String, f64)>,
    ) -> Self {
        Self {
            kind,
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            points,
        }
    }
}

/// Something that can draw a [`ChartSpec`].
pub trait ChartRenderer {
    /// Writes a static image of `chart` to `path`.
    fn rasterize(&self, chart: &ChartSpec, path: &Path) -> Result<()>;

    /// Shows `chart` to the user through `out`.
    fn display(&self, chart: &ChartSpec, out: &mut dyn Write) -> Result<()>;

    /// File extension of the images produced by [`ChartRenderer::rasterize`].
    fn file_extension(&self) -> &'static str;
}

/// Renders charts as fixed-width text using block characters.
#[derive(Debug, Clone, Copy)]
pub struct TextChartRenderer {
    /// Maximum bar length in characters
    pub bar_width: usize,
}

impl Default for TextChartRenderer {
    fn default() -> Self {
        Self { bar_width: 40 }
    }
}

impl TextChartRenderer {
    /// Draws `chart` into a string.
    #[must_use]
    pub fn render(&self, chart: &ChartSpec) -> String {
        let mut lines = Vec::new();
        if !chart.title.is_empty() {
            lines.push(chart.title.clone());
            lines.push("=".repeat(chart.title.chars().count()));
        }
        if !chart.y_label.is_empty() {
            lines.push(format!("[{}]", chart.y_label));
        }

        if chart.points.is_empty() {
            lines.push("(no data)".to_string());
            return lines.join("\n") + "\n";
        }

        let label_width = chart
            .points
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        match chart.kind {
            ChartKind::Bar => {
                let max = max_value(&chart.points);
                for (label, value) in &chart.points {
                    let bar = "█".repeat(self.scaled(*value, max));
                    lines.push(format!("{label:<label_width$} │{bar} {value:.2}"));
                }
            }
            ChartKind::Pie => {
                let total: f64 = chart.points.iter().map(|(_, v)| v.max(0.0)).sum();
                for (label, value) in &chart.points {
                    let share = if total > 0.0 { value.max(0.0) / total } else { 0.0 };
                    let bar = "▒".repeat(self.scaled(share, 1.0));
                    let percent = share * 100.0;
                    lines.push(format!("{label:<label_width$} {percent:>5.1}% {bar}"));
                }
            }
            ChartKind::Line => {
                let max = max_value(&chart.points);
                for (label, value) in &chart.points {
                    let offset = " ".repeat(self.scaled(*value, max));
                    lines.push(format!("{label:<label_width$} ┤{offset}● {value:.2}"));
                }
            }
        }

        if !chart.x_label.is_empty() {
            lines.push(format!("({})", chart.x_label));
        }
        lines.join("\n") + "\n"
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn scaled(&self, value: f64, max: f64) -> usize {
        if max <= 0.0 || value <= 0.0 {
            return 0;
        }
        // Cast safety: the ratio is clamped to [0, 1] and bar_width is small.
        ((value / max).clamp(0.0, 1.0) * self.bar_width as f64).round() as usize
    }
}

fn max_value(points: &[(String, f64)]) -> f64 {
    points.iter().map(|(_, v)| *v).fold(0.0, f64::max)
}

impl ChartRenderer for TextChartRenderer {
    fn rasterize(&self, chart: &ChartSpec, path: &Path) -> Result<()> {
        fs::write(path, self.render(chart)).map_err(|e| Error::Chart {
            message: format!("Failed to write chart to {}: {e}", path.display()),
        })
    }

    fn display(&self, chart: &ChartSpec, out: &mut dyn Write) -> Result<()> {
        out.write_all(self.render(chart).as_bytes())?;
        Ok(())
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<(String, f64)> {
        vec![("Lazer".to_string(), 10.0), ("Transporte".to_string(), 30.0)]
    }

    #[test]
    fn test_bar_chart_scales_to_largest_value() {
        let renderer = TextChartRenderer { bar_width: 6 };
        let chart = ChartSpec::bar("Spending", "Category", "Amount (€)", points());
        let text = renderer.render(&chart);

        assert_eq!(
            text,
            "Spending\n========\n[Amount (€)]\nLazer      │██ 10.00\nTransporte │██████ 30.00\n(Category)\n"
        );
    }

    #[test]
    fn test_pie_chart_shows_shares() {
        let renderer = TextChartRenderer { bar_width: 4 };
        let text = renderer.render(&ChartSpec::pie("", points()));

        assert!(text.contains("Lazer       25.0% ▒"));
        assert!(text.contains("Transporte  75.0% ▒▒▒"));
    }

    #[test]
    fn test_line_chart_places_markers() {
        let renderer = TextChartRenderer { bar_width: 4 };
        let series = vec![("2024-01".to_string(), 50.0), ("2024-02".to_string(), 0.0)];
        let text = renderer.render(&ChartSpec::line("", "Month", "", series));

        assert!(text.contains("2024-01 ┤    ● 50.00"));
        assert!(text.contains("2024-02 ┤● 0.00"));
    }

    #[test]
    fn test_empty_chart() {
        let text = TextChartRenderer::default().render(&ChartSpec::bar("", "", "", Vec::new()));
        assert_eq!(text, "(no data)\n");
    }

    #[test]
    fn test_display_writes_render() -> Result<()> {
        let renderer = TextChartRenderer::default();
        let chart = ChartSpec::bar("", "", "", points());
        let mut out = Vec::new();
        renderer.display(&chart, &mut out)?;
        assert_eq!(String::from_utf8_lossy(&out), renderer.render(&chart));
        Ok(())
    }

    #[test]
    fn test_rasterize_into_missing_directory_fails() {
        let renderer = TextChartRenderer::default();
        let chart = ChartSpec::bar("", "", "", points());
        let result = renderer.rasterize(&chart, Path::new("/no/such/dir/chart.txt"));
        assert!(matches!(result, Err(Error::Chart { .. })));
    }
}
