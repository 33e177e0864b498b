//! CSV export view.

use datagrid_render::write_csv;
use datagrid_seeker::RecordQuery;

use super::{Disposition, GridResponse};
use crate::error::GridError;
use crate::grid::Grid;

pub(crate) const FILENAME: &str = "export.csv";

/// Writes every matching row; paging does not apply to exports.
pub(crate) fn render<Q: RecordQuery + ?Sized>(
    grid: &Grid,
    query: &mut Q,
) -> Result<GridResponse, GridError> {
    let rows = grid.rows(query)?;
    tracing::debug!(rows = rows.len(), "csv export");

    let body = write_csv(&grid.header_labels(), grid.display_rows(&rows)?)?;
    Ok(GridResponse::new(
        "application/octet-stream",
        body.into_bytes(),
        Disposition::Attachment {
            filename: FILENAME.to_string(),
        },
    )
    .with_header("Pragma", "private")
    .with_header("Expires", "0")
    .with_header("Cache-Control", "private, must-revalidate")
    .with_header("Content-Transfer-Encoding", "binary"))
}
