//! Font metrics for column sizing.
//!
//! Widths come from the Adobe core-font metrics (the same tables FPDF
//! ships), expressed in thousandths of an em. Results are in millimetres,
//! the user unit of the page layout.

/// Measures rendered text width in layout units.
pub trait TextMeasure {
    /// Width of `text` when drawn, in millimetres.
    fn string_width(&self, text: &str) -> f64;
}

const PT_TO_MM: f64 = 25.4 / 72.0;

/// Helvetica-Bold advance widths for `' '..='~'`.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, //
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, //
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, //
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for characters outside the table.
const FALLBACK_WIDTH: u16 = 556;

/// Metrics of one font face at one size.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    widths: &'static [u16; 95],
    size_pt: f64,
}

impl FontMetrics {
    /// Helvetica-Bold (FPDF's bold "Arial") at `size_pt` points.
    pub fn helvetica_bold(size_pt: f64) -> Self {
        FontMetrics {
            widths: &HELVETICA_BOLD,
            size_pt,
        }
    }

    /// Font size in points.
    pub fn size(&self) -> f64 {
        self.size_pt
    }

    fn char_width(&self, c: char) -> u16 {
        match c {
            ' '..='~' => self.widths[c as usize - 32],
            _ => FALLBACK_WIDTH,
        }
    }
}

impl TextMeasure for FontMetrics {
    fn string_width(&self, text: &str) -> f64 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        f64::from(units) * self.size_pt * PT_TO_MM / 1000.0
    }
}
