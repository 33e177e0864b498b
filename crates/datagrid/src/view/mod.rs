//! Output formats and the response a grid produces.
//!
//! Each format has its own module: [`html`] renders a [`GridDocument`]
//! through a [`TemplateEngine`](datagrid_render::template::TemplateEngine),
//! `csv` writes a quoted export, `pdf` prints onto a
//! [`PdfCanvas`](datagrid_render::pdf::PdfCanvas).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

pub(crate) mod csv;
pub mod html;
mod pager;
pub(crate) mod pdf;
mod xml;

pub use html::{
    ExportLink, FilterDescriptor, FormParam, GridDocument, HeaderCell, Meta, RecordRow, UrlInfo,
};
pub use pager::{PageLink, PageRange, Pager};

/// Output format of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Csv,
    Pdf,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Csv => "csv",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = GridError;

    /// Parses a format name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "csv" => Ok(OutputFormat::Csv),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(GridError::UnknownFormat(s.to_string())),
        }
    }
}

/// How the client should present the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment { filename: String },
}

impl Disposition {
    /// Value for a `Content-Disposition` header.
    pub fn header_value(&self) -> String {
        match self {
            Disposition::Inline => "inline".to_string(),
            Disposition::Attachment { filename } => {
                format!("attachment; filename=\"{}\"", filename)
            }
        }
    }
}

/// A rendered grid ready to hand to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridResponse {
    pub content_type: String,
    /// Extra headers, in emission order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub disposition: Disposition,
}

impl GridResponse {
    pub(crate) fn new(content_type: &str, body: Vec<u8>, disposition: Disposition) -> Self {
        GridResponse {
            content_type: content_type.to_string(),
            headers: Vec::new(),
            body,
            disposition,
        }
    }

    pub(crate) fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// All response headers: content type, disposition, then the extras.
    pub fn header_lines(&self) -> Vec<(String, String)> {
        let mut lines = vec![
            ("Content-Type".to_string(), self.content_type.clone()),
            (
                "Content-Disposition".to_string(),
                self.disposition.header_value(),
            ),
        ];
        lines.extend(self.headers.iter().cloned());
        lines
    }

    /// First extra header named `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body as text, when it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}
