//! PDF export: font metrics, page layout and the table printer.
//!
//! The layout rules are fixed: 24 data rows per page, columns sized from
//! bold 7pt text with a 10% margin, and columns grouped so that no page
//! is wider than 270mm. Drawing goes through the [`PdfCanvas`] trait.

mod canvas;
mod layout;
mod metrics;
mod table;

pub use canvas::{Align, Cell, DrawOp, FontStyle, Orientation, PageSize, PdfCanvas, RecordingCanvas};
pub use layout::{
    chunk_rows, column_widths, split_columns, LayoutOptions, TableLayout, MAX_GROUP_WIDTH,
    ROWS_PER_PAGE, WIDTH_MARGIN,
};
pub use metrics::{FontMetrics, TextMeasure};
pub use table::PdfTable;
