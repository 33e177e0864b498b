//! PDF export view.

use datagrid_render::pdf::{PdfCanvas, PdfTable};
use datagrid_seeker::RecordQuery;

use super::{Disposition, GridResponse};
use crate::error::GridError;
use crate::grid::Grid;

/// Prints every matching row onto `canvas` and returns its document,
/// labelled with the canvas's own content type.
pub(crate) fn render<Q: RecordQuery + ?Sized>(
    grid: &Grid,
    query: &mut Q,
    canvas: &mut dyn PdfCanvas,
) -> Result<GridResponse, GridError> {
    let rows = grid.rows(query)?;
    let config = grid.config();

    let table = PdfTable::new(grid.header_labels(), grid.display_rows(&rows)?)
        .title(config.title.as_str())
        .subtitle(config.subtitle.as_str());
    tracing::debug!(rows = rows.len(), pages = table.layout().page_count(), "pdf export");

    let body = table.render(canvas)?;
    Ok(GridResponse::new(canvas.content_type(), body, Disposition::Inline))
}
