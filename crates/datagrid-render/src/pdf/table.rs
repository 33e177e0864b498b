//! Table printer for the PDF export.

use super::canvas::{Align, Cell, FontStyle, Orientation, PageSize, PdfCanvas};
use super::layout::{LayoutOptions, TableLayout};
use super::metrics::FontMetrics;
use crate::error::RenderError;

const BODY_FONT: &str = "Arial";
const TITLE_FONT: &str = "Times";
const BODY_SIZE: f64 = 7.0;
const ROW_HEIGHT: f64 = 6.0;
const HEADER_FILL: u8 = 225;
const ROW_FILL: u8 = 255;
const GRID_GRAY: u8 = 175;
const RULE_GRAY: u8 = 30;
const LINE_WIDTH: f64 = 0.1;
const LEFT_MARGIN: f64 = 10.0;

/// A titled table ready to print on a [`PdfCanvas`].
///
/// Each chunk of rows is printed once per column group, every page on
/// landscape Letter with the title block at the top and the page number
/// at the bottom.
///
/// # Example
///
/// ```rust
/// use datagrid_render::pdf::{PdfTable, RecordingCanvas};
///
/// let table = PdfTable::new(
///     vec!["Name".to_string(), "City".to_string()],
///     vec![vec!["Ada".to_string(), "London".to_string()]],
/// )
/// .title("People")
/// .subtitle("All records");
///
/// let mut canvas = RecordingCanvas::new();
/// table.print(&mut canvas).unwrap();
/// assert_eq!(canvas.page_text(1), vec!["People", "All records", "Name", "City", "Ada", "London", "Page 1"]);
/// ```
#[derive(Debug, Clone)]
pub struct PdfTable {
    title: String,
    subtitle: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    options: LayoutOptions,
}

impl PdfTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        PdfTable {
            title: String::new(),
            subtitle: String::new(),
            headers,
            rows,
            options: LayoutOptions::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    /// Column widths, groups and row chunks this table prints with.
    pub fn layout(&self) -> TableLayout {
        TableLayout::compute(
            &FontMetrics::helvetica_bold(BODY_SIZE),
            &self.headers,
            &self.rows,
            self.options,
        )
    }

    /// Draws every page onto `canvas`.
    pub fn print(&self, canvas: &mut dyn PdfCanvas) -> Result<(), RenderError> {
        let layout = self.layout();
        tracing::debug!(
            columns = layout.widths.len(),
            groups = layout.groups.len(),
            pages = layout.page_count(),
            "printing pdf table"
        );

        for chunk in &layout.chunks {
            for group in &layout.groups {
                if canvas.page_no() > 0 {
                    self.footer(canvas)?;
                }
                canvas.add_page(Orientation::Landscape, PageSize::Letter)?;
                tracing::trace!(page = canvas.page_no(), rows = chunk.len(), "pdf page");
                self.page_header(canvas)?;

                let header_cells = group.iter().map(|&c| (layout.widths[c], self.headers[c].as_str()));
                self.row(canvas, header_cells, FontStyle::Bold, HEADER_FILL, Align::Center)?;

                for row in &self.rows[chunk.clone()] {
                    let cells = group.iter().map(|&c| {
                        (layout.widths[c], row.get(c).map(String::as_str).unwrap_or(""))
                    });
                    self.row(canvas, cells, FontStyle::Regular, ROW_FILL, Align::Left)?;
                }
            }
        }

        if canvas.page_no() > 0 {
            self.footer(canvas)?;
        }
        Ok(())
    }

    /// Prints onto `canvas` and returns the finished document.
    pub fn render(&self, canvas: &mut dyn PdfCanvas) -> Result<Vec<u8>, RenderError> {
        self.print(canvas)?;
        canvas.finish()
    }

    fn page_header(&self, canvas: &mut dyn PdfCanvas) -> Result<(), RenderError> {
        let width = self.options.max_width;

        canvas.set_font(TITLE_FONT, FontStyle::Bold, 18.0);
        canvas.cell(Cell::new(width, 10.0, self.title.as_str()).align(Align::Center))?;
        canvas.ln(None);

        canvas.set_draw_gray(RULE_GRAY);
        canvas.set_line_width(LINE_WIDTH);
        let top = canvas.y() + 5.0;
        canvas.line(LEFT_MARGIN, top, width, top)?;
        canvas.ln(Some(10.0));

        canvas.set_font(TITLE_FONT, FontStyle::Bold, 14.0);
        canvas.cell(Cell::new(width, 10.0, self.subtitle.as_str()).align(Align::Center))?;
        canvas.ln(Some(15.0));
        Ok(())
    }

    fn row<'a>(
        &self,
        canvas: &mut dyn PdfCanvas,
        cells: impl Iterator<Item = (f64, &'a str)>,
        style: FontStyle,
        fill: u8,
        align: Align,
    ) -> Result<(), RenderError> {
        canvas.set_font(BODY_FONT, style, BODY_SIZE);
        canvas.set_fill_gray(fill);
        canvas.set_draw_gray(GRID_GRAY);
        canvas.set_line_width(LINE_WIDTH);
        for (width, text) in cells {
            canvas.cell(Cell::new(width, ROW_HEIGHT, text).bordered().filled().align(align))?;
        }
        canvas.ln(None);
        Ok(())
    }

    fn footer(&self, canvas: &mut dyn PdfCanvas) -> Result<(), RenderError> {
        canvas.set_y(-15.0);
        canvas.set_font(BODY_FONT, FontStyle::Italic, 8.0);
        let label = format!("Page {}", canvas.page_no());
        canvas.cell(Cell::new(0.0, 10.0, label).align(Align::Center))
    }
}
