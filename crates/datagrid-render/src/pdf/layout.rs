//! Page layout for the PDF export.
//!
//! Rows are cut into fixed-size page chunks. Each column is as wide as its
//! widest rendered text (header or value) plus a margin, and columns are
//! packed left to right into groups that fit the printable width. A grid
//! wider than one page therefore prints as several page sets, one per
//! column group, instead of clipping columns.

use std::ops::Range;

use super::metrics::TextMeasure;

/// Printable width of a landscape Letter page, in millimetres.
pub const MAX_GROUP_WIDTH: f64 = 270.0;

/// Data rows per printed page.
pub const ROWS_PER_PAGE: usize = 24;

/// Multiplier applied to measured text width.
pub const WIDTH_MARGIN: f64 = 1.1;

/// Tunables for [`TableLayout::compute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Maximum cumulative width of one column group.
    pub max_width: f64,
    /// Data rows per page chunk; zero is treated as one.
    pub rows_per_page: usize,
    /// Multiplier applied to measured widths before rounding up.
    pub margin: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            max_width: MAX_GROUP_WIDTH,
            rows_per_page: ROWS_PER_PAGE,
            margin: WIDTH_MARGIN,
        }
    }
}

/// Column widths, column groups and row chunks of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    /// Width of each column, by column index.
    pub widths: Vec<f64>,
    /// Column indices printed together on one page.
    pub groups: Vec<Vec<usize>>,
    /// Row index ranges printed together on one page.
    pub chunks: Vec<Range<usize>>,
}

impl TableLayout {
    /// Lays out `headers` and `rows` with the given text measure.
    pub fn compute<M, H, S>(
        measure: &M,
        headers: &[H],
        rows: &[Vec<S>],
        options: LayoutOptions,
    ) -> TableLayout
    where
        M: TextMeasure + ?Sized,
        H: AsRef<str>,
        S: AsRef<str>,
    {
        let widths = column_widths(measure, headers, rows, options.margin);
        let groups = split_columns(&widths, options.max_width);
        let chunks = chunk_rows(rows.len(), options.rows_per_page);
        TableLayout {
            widths,
            groups,
            chunks,
        }
    }

    /// Number of pages the table prints on.
    pub fn page_count(&self) -> usize {
        self.groups.len() * self.chunks.len()
    }

    /// Total width of one column group.
    pub fn group_width(&self, group: usize) -> f64 {
        self.groups
            .get(group)
            .map(|cols| cols.iter().map(|&c| self.widths[c]).sum())
            .unwrap_or(0.0)
    }
}

/// Widest rendered text per column, scaled by `margin` and rounded up.
///
/// Cells beyond the header count are ignored.
pub fn column_widths<M, H, S>(measure: &M, headers: &[H], rows: &[Vec<S>], margin: f64) -> Vec<f64>
where
    M: TextMeasure + ?Sized,
    H: AsRef<str>,
    S: AsRef<str>,
{
    let fit = |text: &str| (measure.string_width(text) * margin).ceil();

    let mut widths: Vec<f64> = headers.iter().map(|h| fit(h.as_ref())).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = width.max(fit(cell.as_ref()));
        }
    }
    widths
}

/// Packs columns left to right into groups no wider than `max_width`.
///
/// A column that alone exceeds `max_width` gets a group of its own.
pub fn split_columns(widths: &[f64], max_width: f64) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut used = 0.0;

    for (idx, &width) in widths.iter().enumerate() {
        if !current.is_empty() && used + width > max_width {
            groups.push(std::mem::take(&mut current));
            used = 0.0;
        }
        current.push(idx);
        used += width;
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// Cuts `len` rows into consecutive ranges of `per_page` rows.
///
/// An empty table still yields one empty chunk so its header row prints.
pub fn chunk_rows(len: usize, per_page: usize) -> Vec<Range<usize>> {
    let per_page = per_page.max(1);
    if len == 0 {
        return vec![0..0];
    }
    (0..len)
        .step_by(per_page)
        .map(|start| start..(start + per_page).min(len))
        .collect()
}
