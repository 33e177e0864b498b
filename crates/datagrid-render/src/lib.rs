//! # Datagrid Render - Output backends for tabular data
//!
//! `datagrid-render` holds the format-specific pieces a grid delegates to,
//! independent of how the grid gathers its rows:
//!
//! - [`template`]: the [`TemplateEngine`](template::TemplateEngine) seam for
//!   HTML output and its MiniJinja implementation
//! - [`write_csv`]: fully quoted, CRLF-separated CSV text
//! - [`serialize_to_xml`]: XML serialization of any `Serialize` document
//! - [`pdf`]: font metrics, column grouping, row chunking and a table
//!   printer drawing onto a [`PdfCanvas`](pdf::PdfCanvas)
//!
//! ## Quick Start
//!
//! ```rust
//! use datagrid_render::write_csv;
//!
//! let csv = write_csv(&["Name", "City"], vec![vec!["Ada", "London"]]).unwrap();
//! assert_eq!(csv, "\"Name\",\"City\"\r\n\"Ada\",\"London\"");
//! ```
//!
//! Every fallible operation returns [`RenderError`].

mod delimited;
mod error;
pub mod pdf;
pub mod template;
mod xml;

pub use delimited::write_csv;
pub use error::RenderError;
pub use xml::serialize_to_xml;
