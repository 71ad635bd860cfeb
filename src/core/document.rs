//! Page-drawing seam for printable reports.
//!
//! [`DocumentCanvas`] mirrors an absolute-coordinate page API: points as
//! units (72 per inch), origin at the bottom-left corner, one page at a
//! time. [`TextDocument`] implements it as a printable plain-text file.

use crate::errors::{Error, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Points per inch.
pub const INCH: f64 = 72.0;
/// US Letter page size in points.
pub const LETTER: (f64, f64) = (612.0, 792.0);

/// Font style used for subsequent text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Oblique,
}

/// Draws text and images at absolute positions across pages.
pub trait DocumentCanvas {
    /// `(width, height)` of every page in points.
    fn page_size(&self) -> (f64, f64);

    /// Selects the font for the following text.
    fn set_font(&mut self, style: FontStyle, size: f64);

    /// Draws `text` starting at `(x, y)`.
    fn draw_string(&mut self, x: f64, y: f64, text: &str);

    /// Draws `text` centred horizontally on `x`.
    fn draw_centred_string(&mut self, x: f64, y: f64, text: &str);

    /// Places the image stored at `path` with its bottom-left corner at
    /// `(x, y)`. The image is read immediately; the file may be removed
    /// afterwards.
    fn draw_image(&mut self, path: &Path, x: f64, y: f64, width: f64, height: f64) -> Result<()>;

    /// Ends the current page and starts a new one.
    fn show_page(&mut self);

    /// Finishes the document and writes it out.
    fn save(&mut self) -> Result<()>;
}

#[derive(Debug, Clone)]
enum Content {
    Text {
        text: String,
        centred: bool,
        style: FontStyle,
        size: f64,
    },
    Image(Vec<String>),
}

#[derive(Debug, Clone)]
struct Element {
    x: f64,
    y: f64,
    content: Content,
}

/// A [`DocumentCanvas`] that writes a plain-text document.
///
/// Elements of a page are laid out top to bottom by their `y` coordinate
/// and indented by their `x` coordinate; pages are separated by form feeds.
/// Images must be text files (such as those produced by
/// [`TextChartRenderer`](crate::core::charts::TextChartRenderer)).
#[derive(Debug)]
pub struct TextDocument {
    path: PathBuf,
    page_size: (f64, f64),
    columns: usize,
    style: FontStyle,
    size: f64,
    finished: Vec<Vec<Element>>,
    current: Vec<Element>,
}

impl TextDocument {
    /// A Letter-sized document rendered 80 columns wide.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            page_size: LETTER,
            columns: 80,
            style: FontStyle::Regular,
            size: 11.0,
            finished: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Pages finished so far, counting a non-empty current page.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.finished.len() + usize::from(!self.current.is_empty())
    }

    /// Renders every page without writing anything.
    #[must_use]
    pub fn render(&self) -> String {
        let mut pages: Vec<&[Element]> = self.finished.iter().map(Vec::as_slice).collect();
        if !self.current.is_empty() {
            pages.push(&self.current);
        }
        pages
            .into_iter()
            .map(|page| self.render_page(page))
            .collect::<Vec<_>>()
            .join("\u{c}\n")
    }

    fn render_page(&self, elements: &[Element]) -> String {
        let mut ordered: Vec<&Element> = elements.iter().collect();
        ordered.sort_by(|a, b| b.y.total_cmp(&a.y));

        let mut lines: Vec<String> = Vec::new();
        let mut previous_y: Option<f64> = None;
        for element in ordered {
            if previous_y.is_some_and(|y| y - element.y >= INCH / 2.0) {
                lines.push(String::new());
            }
            previous_y = Some(element.y);

            let column = self.column(element.x);
            match &element.content {
                Content::Text {
                    text,
                    centred,
                    style,
                    size,
                } => {
                    let width = text.chars().count();
                    let indent = if *centred {
                        column.saturating_sub(width / 2)
                    } else {
                        column
                    };
                    let pad = " ".repeat(indent);
                    lines.push(format!("{pad}{text}"));
                    if *style == FontStyle::Bold {
                        let rule = if *size >= 16.0 { "=" } else { "-" };
                        lines.push(format!("{pad}{}", rule.repeat(width)));
                    }
                }
                Content::Image(image_lines) => {
                    let pad = " ".repeat(column);
                    lines.extend(image_lines.iter().map(|line| format!("{pad}{line}")));
                }
            }
        }
        lines.join("\n") + "\n"
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn column(&self, x: f64) -> usize {
        // Cast safety: the ratio is clamped to [0, 1] and columns is small.
        ((x / self.page_size.0).clamp(0.0, 1.0) * self.columns as f64).round() as usize
    }

    fn push_text(&mut self, x: f64, y: f64, text: &str, centred: bool) {
        self.current.push(Element {
            x,
            y,
            content: Content::Text {
                text: text.to_string(),
                centred,
                style: self.style,
                size: self.size,
            },
        });
    }
}

impl DocumentCanvas for TextDocument {
    fn page_size(&self) -> (f64, f64) {
        self.page_size
    }

    fn set_font(&mut self, style: FontStyle, size: f64) {
        self.style = style;
        self.size = size;
    }

    fn draw_string(&mut self, x: f64, y: f64, text: &str) {
        self.push_text(x, y, text, false);
    }

    fn draw_centred_string(&mut self, x: f64, y: f64, text: &str) {
        self.push_text(x, y, text, true);
    }

    fn draw_image(&mut self, path: &Path, x: f64, y: f64, _width: f64, height: f64) -> Result<()> {
        let contents = fs::read_to_string(path).map_err(|e| Error::Report {
            message: format!("Failed to read image {}: {e}", path.display()),
        })?;
        // Anchor at the top edge so the image follows whatever precedes it.
        self.current.push(Element {
            x,
            y: y + height,
            content: Content::Image(contents.lines().map(ToString::to_string).collect()),
        });
        Ok(())
    }

    fn show_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
    }

    fn save(&mut self) -> Result<()> {
        let rendered = self.render();
        fs::write(&self.path, rendered)?;
        debug!(
            "Wrote {} page(s) to {}",
            self.page_count(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_elements_are_ordered_top_to_bottom() {
        let mut doc = TextDocument::new("unused.txt");
        let (width, height) = doc.page_size();
        doc.set_font(FontStyle::Regular, 11.0);
        doc.draw_string(0.0, height - 2.0 * INCH, "second");
        doc.set_font(FontStyle::Bold, 18.0);
        doc.draw_centred_string(width / 2.0, height - INCH, "Title");

        assert_eq!(
            doc.render(),
            format!(
                "{pad}Title\n{pad}=====\n\nsecond\n",
                pad = " ".repeat(38)
            )
        );
    }

    #[test]
    fn test_pages_are_separated_by_form_feed() {
        let mut doc = TextDocument::new("unused.txt");
        doc.draw_string(0.0, 700.0, "one");
        doc.show_page();
        doc.draw_string(0.0, 700.0, "two");

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.render(), "one\n\u{c}\ntwo\n");
    }

    #[test]
    fn test_image_is_inlined_and_file_may_go() -> Result<()> {
        let image = NamedTempFile::new()?;
        fs::write(image.path(), "██ 10.00\n")?;

        let mut doc = TextDocument::new("unused.txt");
        doc.draw_image(image.path(), INCH, 100.0, 6.5 * INCH, 3.5 * INCH)?;
        drop(image);

        assert_eq!(doc.render(), format!("{}██ 10.00\n", " ".repeat(9)));
        Ok(())
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let mut doc = TextDocument::new("unused.txt");
        let result = doc.draw_image(Path::new("/no/such/chart.txt"), 0.0, 0.0, 1.0, 1.0);
        assert!(matches!(result, Err(Error::Report { .. })));
    }

    #[test]
    fn test_save_writes_file() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("report.txt");
        let mut doc = TextDocument::new(&out);
        doc.draw_string(0.0, 10.0, "hello");
        doc.save()?;

        let text = fs::read_to_string(&out)?;
        assert_eq!(text, "hello\n");
        Ok(())
    }
}
