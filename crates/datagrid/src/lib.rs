//! # Datagrid - Server-side data grids
//!
//! Datagrid turns a query over tabular records into a sortable, filterable,
//! paginated grid, and exports the same rows as CSV or PDF. All interaction
//! state lives in the URL, so the server stays stateless:
//!
//! - [`FilterState`]: sort column, direction, page and filters, encoded as a
//!   single JSON query parameter
//! - [`FieldMapper`]: the columns, their headers, how each one is filtered,
//!   and computed columns with a per-call cache
//! - [`Grid`]: the controller. It applies actions (`sort`, `filter`, `page`,
//!   `clear`, `export`) and answers with a [`Redirect`], or drives a
//!   [`RecordQuery`](datagrid_seeker::RecordQuery) and renders a
//!   [`GridResponse`]
//! - [`view`]: the HTML, CSV and PDF views and the [`GridDocument`] they
//!   share
//!
//! ## Quick Start
//!
//! ```rust
//! use datagrid::{Dispatch, FieldMapper, Grid, GridConfig, GridRequest};
//! use datagrid_seeker::{MemoryQuery, Record};
//!
//! let mut mapper = FieldMapper::new();
//! mapper
//!     .add_mapping("Name", "u.name", "contains")
//!     .add_mapping("City", "u.city", "select");
//!
//! let rows = vec![
//!     Record::new().with("u_name", "Ada").with("u_city", "London"),
//!     Record::new().with("u_name", "Grace").with("u_city", "New York"),
//! ];
//!
//! // An action is applied and the client is sent to the normalized URL.
//! let request = GridRequest::from_uri("/users?grid_action=sort&grid_value=u.name").unwrap();
//! let location = match Grid::from_request(GridConfig::new(), mapper, request).unwrap() {
//!     Dispatch::Redirect(redirect) => redirect.location().to_string(),
//!     Dispatch::Render(_) => unreachable!(),
//! };
//!
//! // Following the redirect renders the grid.
//! let mut mapper = FieldMapper::new();
//! mapper.add_mapping("Name", "u.name", "contains");
//! let request = GridRequest::from_uri(&location).unwrap();
//! let grid = match Grid::from_request(GridConfig::new(), mapper, request).unwrap() {
//!     Dispatch::Render(grid) => grid,
//!     Dispatch::Redirect(_) => unreachable!(),
//! };
//!
//! let response = grid.generate(&mut MemoryQuery::new(rows)).unwrap();
//! assert!(response.text().unwrap().contains("Grace"));
//! ```
//!
//! ## Configuration
//!
//! [`GridConfig`] is built in code or loaded from YAML:
//!
//! ```yaml
//! key: users
//! page_limit: 20
//! export_types: [csv, pdf]
//! title: Users
//! params:
//!   state: users
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` for actions, redirects and
//! view decisions, `trace` for per-column detail). Install a subscriber in
//! the host application to see them.

mod config;
mod error;
mod filter;
mod grid;
mod mapper;
mod request;
pub mod view;

pub use config::{ConfigError, GridConfig, ParamNames, DEFAULT_PAGE_LIMIT, DEFAULT_TEMPLATE};
pub use error::GridError;
pub use filter::{generate_key, FilterState, SortSpec, PAIR_SEPARATOR, SECTION_SEPARATOR};
pub use grid::{Action, Dispatch, Grid, Redirect};
pub use mapper::{
    computation_key, Computation, FieldMapper, FieldSpec, FilterControl, MapperError, MatchRule,
    SearchPattern, ValueSource,
};
pub use request::GridRequest;
pub use view::{
    Disposition, GridDocument, GridResponse, OutputFormat, PageLink, PageRange, Pager,
};
