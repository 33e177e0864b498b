//! HTML view.
//!
//! The view counts the matching rows, pages the query, and builds a
//! [`GridDocument`]: meta information (key, URL, pager, export links, filter
//! controls, result count), the column headers, and the displayed records.
//! The document is rendered through a [`TemplateEngine`]; callers with their
//! own templating layer can take the document itself from
//! [`Grid::document`](crate::Grid::document), or its XML form from
//! [`GridDocument::to_xml`].

use datagrid_render::template::TemplateEngine;
use datagrid_seeker::{compare_scalars, Dir, Record, RecordQuery, Scalar};
use serde::Serialize;

use super::pager::Pager;
use super::{Disposition, GridResponse};
use crate::error::GridError;
use crate::filter::{PAIR_SEPARATOR, SECTION_SEPARATOR};
use crate::grid::Grid;
use crate::mapper::FilterControl;

/// Everything a grid template needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridDocument {
    pub meta: Meta,
    pub headers: Vec<HeaderCell>,
    pub records: Vec<RecordRow>,
}

/// Grid-level information.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meta {
    pub key: String,
    pub url: UrlInfo,
    /// Ready-made pager markup.
    pub pager: String,
    /// The same pager as data.
    pub pages: Pager,
    pub exports: Vec<ExportLink>,
    pub filters: Vec<FilterDescriptor>,
    /// Total matching rows before paging.
    pub numresults: usize,
    /// Link resetting sort, filters and page.
    pub clear_href: String,
    /// Hidden inputs a filter form must carry.
    pub filter_form: Vec<FormParam>,
}

/// Path and query of the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlInfo {
    pub path: String,
    pub query_string: String,
}

/// An export link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportLink {
    #[serde(rename = "type")]
    pub format: String,
    pub href: String,
}

/// Filter control for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDescriptor {
    pub field: String,
    /// Current filter value, empty when unfiltered.
    pub display: String,
    /// Form input name carrying this field's value.
    pub input: String,
    #[serde(rename = "type")]
    pub control: FilterControl,
    /// Choices for `Select` controls.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// A hidden form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormParam {
    pub name: String,
    pub value: String,
}

/// One column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub field: String,
    pub display: String,
    pub allow_filter: bool,
    /// Direction when the grid is sorted on this column.
    pub sort: Option<Dir>,
    /// Link sorting on this column. Empty for computed columns, which the
    /// backend cannot order by.
    pub href: String,
}

/// Displayed values of one record, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRow {
    pub fields: Vec<String>,
}

impl GridDocument {
    /// The document as JSON template context.
    pub fn to_context(&self) -> Result<serde_json::Value, GridError> {
        Ok(serde_json::to_value(self)?)
    }

    /// The document as XML rooted at `<data>`.
    pub fn to_xml(&self) -> Result<String, GridError> {
        super::xml::to_xml(self)
    }
}

/// Renders the HTML view. Sort and filters are already applied.
pub(crate) fn render<Q: RecordQuery + ?Sized>(
    grid: &Grid,
    query: &mut Q,
    engine: &dyn TemplateEngine,
) -> Result<GridResponse, GridError> {
    let document = build_document(grid, query)?;
    let source = grid.config().template_source()?;
    let body = engine.render_template(&source, &document.to_context()?)?;
    Ok(GridResponse::new(
        "text/html; charset=utf-8",
        body.into_bytes(),
        Disposition::Inline,
    ))
}

/// Counts, pages and executes `query`, then assembles the document.
pub(crate) fn build_document<Q: RecordQuery + ?Sized>(
    grid: &Grid,
    query: &mut Q,
) -> Result<GridDocument, GridError> {
    let config = grid.config();
    let mapper = grid.mapper();
    let state = grid.state();

    let (numresults, rows) = match grid.results() {
        Some(rows) => (rows.len(), rows.to_vec()),
        None => {
            let total = query.count()?;
            let limit = config.page_limit;
            query.set_limit(limit);
            query.set_offset(state.page.saturating_sub(1).saturating_mul(limit));
            (total, query.execute()?)
        }
    };
    tracing::debug!(numresults, shown = rows.len(), page = state.page, "html grid");

    let pages = Pager::build(state.page, numresults, config.page_limit, |page| {
        grid.action_url("page", Some(&page.to_string()))
    })?;

    let exports = config
        .export_types
        .iter()
        .map(|format| {
            Ok(ExportLink {
                format: format.to_string(),
                href: grid.action_url("export", Some(format.as_str()))?,
            })
        })
        .collect::<Result<Vec<_>, GridError>>()?;

    let mut filters = Vec::with_capacity(mapper.len());
    let mut headers = Vec::with_capacity(mapper.len());
    for spec in mapper.fields() {
        let control = mapper.filter_control(&spec.key);
        let options = match control {
            FilterControl::Select => select_options(grid, query, &spec.key)?,
            _ => Vec::new(),
        };
        filters.push(FilterDescriptor {
            field: spec.key.clone(),
            display: state.filter_value(&spec.key).unwrap_or_default().to_string(),
            input: config.params.filter_input(&spec.key),
            control,
            options,
        });
        headers.push(HeaderCell {
            field: spec.key.clone(),
            display: spec.header.clone(),
            allow_filter: control != FilterControl::NA,
            sort: state.sorted_on(&spec.key),
            href: if spec.is_computed() {
                String::new()
            } else {
                grid.action_url("sort", Some(&spec.key))?
            },
        });
    }

    let records = grid
        .display_rows(&rows)?
        .into_iter()
        .map(|fields| RecordRow { fields })
        .collect();

    let request = grid.request();
    Ok(GridDocument {
        meta: Meta {
            key: grid.key().to_string(),
            url: UrlInfo {
                path: request.path().to_string(),
                query_string: request.query_string().to_string(),
            },
            pager: pages.to_html(),
            pages,
            exports,
            filters,
            numresults,
            clear_href: grid.action_url("clear", None)?,
            filter_form: filter_form(grid),
        },
        headers,
        records,
    })
}

/// Distinct values offered by a `Select` filter.
fn select_options<Q: RecordQuery + ?Sized>(
    grid: &Grid,
    query: &Q,
    key: &str,
) -> Result<Vec<String>, GridError> {
    let values: Vec<Scalar> = match grid.results() {
        Some(rows) => distinct_values(grid, rows, key)?,
        None => query.distinct(key)?,
    };
    Ok(values.iter().map(Scalar::to_string).collect())
}

fn distinct_values(grid: &Grid, rows: &[Record], key: &str) -> Result<Vec<Scalar>, GridError> {
    let mut values: Vec<Scalar> = Vec::new();
    for row in rows {
        let value = grid.mapper().value(row, key)?;
        if !value.is_null() && !values.contains(&value) {
            values.push(value);
        }
    }
    values.sort_by(compare_scalars);
    Ok(values)
}

/// Current parameters a filter form resubmits, plus the filter action.
fn filter_form(grid: &Grid) -> Vec<FormParam> {
    let params = &grid.config().params;
    let mut form: Vec<FormParam> = grid
        .request()
        .params()
        .iter()
        .filter(|(name, _)| {
            name != &params.action && name != &params.value && params.filter_field(name).is_none()
        })
        .map(|(name, value)| FormParam {
            name: name.clone(),
            value: value.clone(),
        })
        .collect();
    form.push(FormParam {
        name: params.action.clone(),
        value: "filter".to_string(),
    });
    form
}

/// `field,,value|` spec for the given filters, as a filter action expects.
pub fn filter_spec<'a>(filters: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    filters
        .into_iter()
        .map(|(field, value)| format!("{}{}{}{}", field, PAIR_SEPARATOR, value, SECTION_SEPARATOR))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_spec_format() {
        assert_eq!(
            filter_spec([("u.name", "Ada"), ("u.city", "London")]),
            "u.name,,Ada|u.city,,London|"
        );
        assert_eq!(filter_spec(std::iter::empty()), "");
    }
}
