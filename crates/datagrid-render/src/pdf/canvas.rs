//! Drawing surface abstraction for the PDF export.
//!
//! [`PdfCanvas`] is the small FPDF-like slice of a PDF library the table
//! printer needs: pages, fonts, colours, bordered cells and lines, plus a
//! vertical cursor. Units are millimetres, origin top left.
//!
//! The crate does not write PDF bytes itself. [`RecordingCanvas`] captures
//! every drawing call as a [`DrawOp`] display list, which is enough to test
//! layout and to hand off to a real PDF backend later.

use serde::Serialize;

use crate::error::RenderError;

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Paper size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    Letter,
    A4,
}

impl PageSize {
    /// Portrait `(width, height)` in millimetres.
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            PageSize::Letter => (215.9, 279.4),
            PageSize::A4 => (210.0, 297.0),
        }
    }
}

/// Font style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

/// Horizontal text alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// One rectangular text cell.
///
/// A `width` of zero extends the cell to the right margin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub border: bool,
    pub align: Align,
    pub fill: bool,
}

impl Cell {
    /// A borderless, unfilled, left-aligned cell.
    pub fn new(width: f64, height: f64, text: impl Into<String>) -> Self {
        Cell {
            width,
            height,
            text: text.into(),
            border: false,
            align: Align::Left,
            fill: false,
        }
    }

    pub fn bordered(mut self) -> Self {
        self.border = true;
        self
    }

    pub fn filled(mut self) -> Self {
        self.fill = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// An FPDF-like drawing surface.
///
/// Cells are placed at the cursor and advance it horizontally; [`ln`]
/// returns to the left margin and moves down.
///
/// [`ln`]: PdfCanvas::ln
pub trait PdfCanvas {
    /// Starts a new page and moves the cursor to the top-left margin.
    fn add_page(&mut self, orientation: Orientation, size: PageSize) -> Result<(), RenderError>;

    /// Selects the font for subsequent cells.
    fn set_font(&mut self, family: &str, style: FontStyle, size_pt: f64);

    /// Sets the colour used to fill cells, as a grey level.
    fn set_fill_gray(&mut self, level: u8);

    /// Sets the colour used for borders and lines, as a grey level.
    fn set_draw_gray(&mut self, level: u8);

    /// Sets the width of borders and lines.
    fn set_line_width(&mut self, width: f64);

    /// Draws a cell at the cursor.
    fn cell(&mut self, cell: Cell) -> Result<(), RenderError>;

    /// Draws a straight line between two points.
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), RenderError>;

    /// Line break. `None` moves down by the height of the last cell.
    fn ln(&mut self, height: Option<f64>);

    /// Vertical cursor position.
    fn y(&self) -> f64;

    /// Moves the cursor to the left margin at `y`. Negative values are
    /// measured from the bottom of the page.
    fn set_y(&mut self, y: f64);

    /// Number of the current page, starting at 1; 0 before the first page.
    fn page_no(&self) -> usize;

    /// Finalizes the document and returns its bytes.
    fn finish(&mut self) -> Result<Vec<u8>, RenderError>;

    /// Media type of the bytes [`finish`](PdfCanvas::finish) returns.
    fn content_type(&self) -> &str {
        "application/pdf"
    }
}

/// One captured drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    AddPage {
        orientation: Orientation,
        size: PageSize,
    },
    SetFont {
        family: String,
        style: FontStyle,
        size: f64,
    },
    SetFillGray {
        level: u8,
    },
    SetDrawGray {
        level: u8,
    },
    SetLineWidth {
        width: f64,
    },
    Cell {
        x: f64,
        y: f64,
        #[serde(flatten)]
        cell: Cell,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

const MARGIN: f64 = 10.0;

/// A [`PdfCanvas`] that records operations instead of drawing.
///
/// Tracks the cursor like FPDF does so recorded cells carry their
/// absolute position. [`finish`](PdfCanvas::finish) returns the display
/// list as JSON.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    page: usize,
    page_size: (f64, f64),
    x: f64,
    y: f64,
    last_height: f64,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded operations, in call order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text of every recorded cell on page `page` (1-based).
    pub fn page_text(&self, page: usize) -> Vec<&str> {
        let mut current = 0;
        let mut out = Vec::new();
        for op in &self.ops {
            match op {
                DrawOp::AddPage { .. } => current += 1,
                DrawOp::Cell { cell, .. } if current == page => out.push(cell.text.as_str()),
                _ => {}
            }
        }
        out
    }

    fn require_page(&self) -> Result<(), RenderError> {
        if self.page == 0 {
            return Err(RenderError::CanvasError("no page started".into()));
        }
        Ok(())
    }
}

impl PdfCanvas for RecordingCanvas {
    fn add_page(&mut self, orientation: Orientation, size: PageSize) -> Result<(), RenderError> {
        let (w, h) = size.dimensions();
        self.page_size = match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        };
        self.page += 1;
        self.x = MARGIN;
        self.y = MARGIN;
        self.last_height = 0.0;
        self.ops.push(DrawOp::AddPage { orientation, size });
        Ok(())
    }

    fn set_font(&mut self, family: &str, style: FontStyle, size_pt: f64) {
        self.ops.push(DrawOp::SetFont {
            family: family.to_string(),
            style,
            size: size_pt,
        });
    }

    fn set_fill_gray(&mut self, level: u8) {
        self.ops.push(DrawOp::SetFillGray { level });
    }

    fn set_draw_gray(&mut self, level: u8) {
        self.ops.push(DrawOp::SetDrawGray { level });
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::SetLineWidth { width });
    }

    fn cell(&mut self, mut cell: Cell) -> Result<(), RenderError> {
        self.require_page()?;
        if cell.width == 0.0 {
            cell.width = (self.page_size.0 - MARGIN - self.x).max(0.0);
        }
        let (x, y) = (self.x, self.y);
        self.x += cell.width;
        self.last_height = cell.height;
        self.ops.push(DrawOp::Cell { x, y, cell });
        Ok(())
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), RenderError> {
        self.require_page()?;
        self.ops.push(DrawOp::Line { x1, y1, x2, y2 });
        Ok(())
    }

    fn ln(&mut self, height: Option<f64>) {
        self.x = MARGIN;
        self.y += height.unwrap_or(self.last_height);
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn set_y(&mut self, y: f64) {
        self.x = MARGIN;
        self.y = if y >= 0.0 { y } else { self.page_size.1 + y };
    }

    fn page_no(&self) -> usize {
        self.page
    }

    fn finish(&mut self) -> Result<Vec<u8>, RenderError> {
        Ok(serde_json::to_vec_pretty(&self.ops)?)
    }

    /// The display list is JSON, not a PDF file.
    fn content_type(&self) -> &str {
        "application/json"
    }
}
