//! The grid controller.
//!
//! A request moves through three states:
//!
//! ```text
//! Idle ──action param──▶ ActionApplied ──▶ Redirect
//!   │
//!   └──no action──▶ Render ──generate(query)──▶ GridResponse
//! ```
//!
//! Applying an action never renders. The mutated state is written back into
//! the URL and the client is redirected, so every rendered grid is described
//! completely by its URL.

use datagrid_render::pdf::{PdfCanvas, RecordingCanvas};
use datagrid_render::template::{MiniJinjaEngine, TemplateEngine};
use datagrid_seeker::{Record, RecordQuery};

use crate::config::GridConfig;
use crate::error::GridError;
use crate::filter::{generate_key, FilterState};
use crate::mapper::FieldMapper;
use crate::request::{build_url, replace_param, GridRequest};
use crate::view::html::filter_spec;
use crate::view::{self, GridDocument, GridResponse, OutputFormat};

/// A state mutation requested through the action parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Sort(String),
    /// Raw `field,,value|...` filter spec.
    Filter(String),
    Page(usize),
    Clear,
    Export(OutputFormat),
}

impl Action {
    /// Builds an action from its name and value parameter.
    pub fn parse(name: &str, value: Option<&str>) -> Result<Action, GridError> {
        let require = || value.ok_or_else(|| GridError::invalid_value(name, ""));
        match name {
            "sort" => {
                let field = require()?;
                if field.is_empty() {
                    return Err(GridError::invalid_value(name, field));
                }
                Ok(Action::Sort(field.to_string()))
            }
            "filter" => Ok(Action::Filter(value.unwrap_or_default().to_string())),
            "page" => {
                let raw = require()?;
                raw.trim()
                    .parse()
                    .map(Action::Page)
                    .map_err(|_| GridError::invalid_value(name, raw))
            }
            "clear" => Ok(Action::Clear),
            "export" => require()?.parse().map(Action::Export),
            other => Err(GridError::UnknownAction(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Sort(_) => "sort",
            Action::Filter(_) => "filter",
            Action::Page(_) => "page",
            Action::Clear => "clear",
            Action::Export(_) => "export",
        }
    }

    /// Applies the action to `state`. Export leaves the state unchanged.
    pub fn apply(&self, state: &mut FilterState) {
        match self {
            Action::Sort(field) => state.sort(field),
            Action::Filter(raw) => state.filter(raw),
            Action::Page(page) => state.page(*page),
            Action::Clear => state.clear(),
            Action::Export(_) => {}
        }
    }
}

/// Instruction to reload the current path with normalized parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    location: String,
    state: FilterState,
    format: Option<OutputFormat>,
}

impl Redirect {
    /// Value for the `Location` header.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The state encoded into the location.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Export format requested by the action, if any.
    pub fn format(&self) -> Option<OutputFormat> {
        self.format
    }
}

/// Outcome of reading a request.
#[derive(Debug)]
pub enum Dispatch {
    /// An action was applied; send the client here.
    Redirect(Redirect),
    /// No action pending; the grid is ready to generate output.
    Render(Grid),
}

/// A grid bound to one request.
///
/// # Example
///
/// ```
/// use datagrid::{Dispatch, FieldMapper, Grid, GridConfig, GridRequest};
/// use datagrid_seeker::{MemoryQuery, Record};
///
/// let mut mapper = FieldMapper::new();
/// mapper.add_mapping("Name", "u.name", "contains");
///
/// let request = GridRequest::from_uri("/users?type=csv").unwrap();
/// let grid = match Grid::from_request(GridConfig::new(), mapper, request).unwrap() {
///     Dispatch::Render(grid) => grid,
///     Dispatch::Redirect(_) => unreachable!(),
/// };
///
/// let mut query = MemoryQuery::new(vec![Record::new().with("u_name", "Ada")]);
/// let response = grid.generate(&mut query).unwrap();
/// assert_eq!(response.text(), Some("\"Name\"\r\n\"Ada\""));
/// ```
#[derive(Debug)]
pub struct Grid {
    config: GridConfig,
    mapper: FieldMapper,
    request: GridRequest,
    state: FilterState,
    format: OutputFormat,
    key: String,
    results: Option<Vec<Record>>,
}

impl Grid {
    /// Reads the state and action parameters of `request`.
    ///
    /// Returns [`Dispatch::Redirect`] when an action was applied and
    /// [`Dispatch::Render`] otherwise.
    pub fn from_request(
        config: GridConfig,
        mapper: FieldMapper,
        request: GridRequest,
    ) -> Result<Dispatch, GridError> {
        config.validate()?;
        let params = &config.params;

        let mut state = match request.get(&params.state) {
            Some(encoded) => FilterState::decode(encoded).map_err(GridError::InvalidState)?,
            None => FilterState::new(),
        };

        if let Some(name) = request.get(&params.action) {
            let value = match (name, request.get(&params.value)) {
                ("filter", None) => Some(collect_filter_inputs(&config, &request)),
                (_, value) => value.map(str::to_string),
            };
            let action = Action::parse(name, value.as_deref())?;
            tracing::debug!(action = action.name(), value = ?value, "applying grid action");
            action.apply(&mut state);
            return redirect(&config, &request, state, &action).map(Dispatch::Redirect);
        }

        let format = match request.get(&params.format) {
            Some(name) => name.parse()?,
            None => OutputFormat::default(),
        };
        let key = config
            .key
            .clone()
            .unwrap_or_else(|| generate_key(request.path()));

        Ok(Dispatch::Render(Grid {
            config,
            mapper,
            request,
            state,
            format,
            key,
            results: None,
        }))
    }

    /// Supplies the rows directly; views no longer execute the query.
    ///
    /// Pre-supplied rows are shown as they are: sorting, filtering and
    /// paging apply to the query only.
    pub fn with_results(mut self, rows: Vec<Record>) -> Self {
        self.results = Some(rows);
        self
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn mapper(&self) -> &FieldMapper {
        &self.mapper
    }

    pub fn request(&self) -> &GridRequest {
        &self.request
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Key identifying this grid among others.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn results(&self) -> Option<&[Record]> {
        self.results.as_deref()
    }

    /// Generates output with the built-in template engine and canvas.
    pub fn generate<Q: RecordQuery + ?Sized>(&self, query: &mut Q) -> Result<GridResponse, GridError> {
        let engine = MiniJinjaEngine::new();
        let mut canvas = RecordingCanvas::new();
        self.generate_with(query, &engine, &mut canvas)
    }

    /// Applies sort and filters to `query`, then renders the requested
    /// format with the given collaborators.
    pub fn generate_with<Q: RecordQuery + ?Sized>(
        &self,
        query: &mut Q,
        engine: &dyn TemplateEngine,
        canvas: &mut dyn PdfCanvas,
    ) -> Result<GridResponse, GridError> {
        self.apply_filters(query)?;
        tracing::debug!(format = %self.format, key = %self.key, "generating grid");
        match self.format {
            OutputFormat::Html => view::html::render(self, query, engine),
            OutputFormat::Csv => view::csv::render(self, query),
            OutputFormat::Pdf => view::pdf::render(self, query, canvas),
        }
    }

    /// Applies sort, filters and paging to `query` and returns the HTML
    /// view's document without rendering it.
    pub fn document<Q: RecordQuery + ?Sized>(&self, query: &mut Q) -> Result<GridDocument, GridError> {
        self.apply_filters(query)?;
        view::html::build_document(self, query)
    }

    fn apply_filters<Q: RecordQuery + ?Sized>(&self, query: &mut Q) -> Result<(), GridError> {
        if let Some(field) = self.state.sort.field.as_deref().filter(|f| !f.is_empty()) {
            tracing::debug!(field, dir = %self.state.sort.direction, "sort");
            query.add_order_by(field, self.state.sort.direction);
        }

        for (field, raw) in &self.state.filters {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            let pattern = self.mapper.search_pattern(field, value);
            match pattern.op {
                Some(op) => {
                    tracing::debug!(field = %field, op = %op, value = %pattern.value, "filter");
                    query.add_where(field, op, &pattern.value)?;
                }
                None => tracing::debug!(field = %field, "ignoring filter on unfilterable field"),
            }
        }
        Ok(())
    }

    /// Rows for the CSV and PDF views: pre-supplied or the full query.
    pub(crate) fn rows<Q: RecordQuery + ?Sized>(&self, query: &mut Q) -> Result<Vec<Record>, GridError> {
        match &self.results {
            Some(rows) => Ok(rows.clone()),
            None => Ok(query.execute()?),
        }
    }

    /// Display text of every column for each row, in mapper order.
    pub(crate) fn display_rows(&self, rows: &[Record]) -> Result<Vec<Vec<String>>, GridError> {
        rows.iter()
            .map(|row| {
                self.mapper
                    .keys()
                    .map(|key| self.mapper.display(row, key).map_err(GridError::from))
                    .collect()
            })
            .collect()
    }

    /// Header labels in mapper order.
    pub(crate) fn header_labels(&self) -> Vec<String> {
        self.mapper
            .headers()
            .into_iter()
            .map(|(_, header)| header.to_string())
            .collect()
    }

    /// URL that applies `action` with `value` to the current state.
    pub(crate) fn action_url(&self, action: &str, value: Option<&str>) -> Result<String, GridError> {
        let params = &self.config.params;
        let mut set = vec![(params.action.as_str(), action)];
        if let Some(value) = value {
            set.push((params.value.as_str(), value));
        }
        self.request.url_with(&[params.value.as_str()], &set)
    }
}

/// Builds a filter spec from per-field filter inputs.
fn collect_filter_inputs(config: &GridConfig, request: &GridRequest) -> String {
    filter_spec(request.params().iter().filter_map(|(name, value)| {
        config
            .params
            .filter_field(name)
            .map(|field| (field, value.as_str()))
    }))
}

fn redirect(
    config: &GridConfig,
    request: &GridRequest,
    state: FilterState,
    action: &Action,
) -> Result<Redirect, GridError> {
    let params = &config.params;
    let mut pairs: Vec<(String, String)> = request.params().to_vec();

    replace_param(&mut pairs, &params.state, &state.encode());
    pairs.retain(|(name, _)| {
        name != &params.format
            && name != &params.action
            && name != &params.value
            && params.filter_field(name).is_none()
    });

    let format = match action {
        Action::Export(format) => {
            pairs.push((params.format.clone(), format.as_str().to_string()));
            Some(*format)
        }
        _ => None,
    };

    let location = build_url(request.path(), &pairs)?;
    tracing::debug!(%location, "redirecting");
    Ok(Redirect {
        location,
        state,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagrid_seeker::{Dir, MemoryQuery, Op, Query};

    fn mapper() -> FieldMapper {
        let mut mapper = FieldMapper::new();
        mapper
            .add_mapping("Name", "u.name", "contains")
            .add_mapping("City", "u.city", "select")
            .add_mapping("Age", "u.age", ">=");
        mapper
    }

    fn dispatch(uri: &str) -> Result<Dispatch, GridError> {
        Grid::from_request(GridConfig::new(), mapper(), GridRequest::from_uri(uri).unwrap())
    }

    fn expect_redirect(uri: &str) -> Redirect {
        match dispatch(uri).unwrap() {
            Dispatch::Redirect(r) => r,
            Dispatch::Render(_) => panic!("expected redirect for {}", uri),
        }
    }

    fn expect_grid(uri: &str) -> Grid {
        match dispatch(uri).unwrap() {
            Dispatch::Render(g) => g,
            Dispatch::Redirect(r) => panic!("unexpected redirect to {}", r.location()),
        }
    }

    #[test]
    fn action_parsing() {
        assert_eq!(Action::parse("sort", Some("u.name")).unwrap(), Action::Sort("u.name".into()));
        assert_eq!(Action::parse("page", Some(" 3 ")).unwrap(), Action::Page(3));
        assert_eq!(Action::parse("filter", None).unwrap(), Action::Filter(String::new()));
        assert_eq!(Action::parse("clear", Some("ignored")).unwrap(), Action::Clear);
        assert_eq!(
            Action::parse("export", Some("PDF")).unwrap(),
            Action::Export(OutputFormat::Pdf)
        );
        assert!(matches!(
            Action::parse("page", Some("two")),
            Err(GridError::InvalidActionValue { .. })
        ));
        assert!(matches!(Action::parse("sort", None), Err(GridError::InvalidActionValue { .. })));
        assert!(matches!(Action::parse("export", Some("xls")), Err(GridError::UnknownFormat(_))));
        assert!(matches!(Action::parse("zoom", None), Err(GridError::UnknownAction(_))));
    }

    #[test]
    fn sort_action_redirects_with_state() {
        let redirect = expect_redirect("/users?x=1&grid_action=sort&grid_value=u.name&type=csv");
        assert_eq!(redirect.state().sort.field.as_deref(), Some("u.name"));
        assert_eq!(redirect.format(), None);

        let back = GridRequest::from_uri(redirect.location()).unwrap();
        assert_eq!(back.path(), "/users");
        assert_eq!(back.get("x"), Some("1"));
        assert_eq!(back.get("grid_action"), None);
        assert_eq!(back.get("grid_value"), None);
        assert_eq!(back.get("type"), None);
        let state = FilterState::decode(back.get("grid").unwrap()).unwrap();
        assert_eq!(&state, redirect.state());
    }

    #[test]
    fn export_action_sets_format() {
        let redirect = expect_redirect("/users?grid_action=export&grid_value=csv");
        assert_eq!(redirect.format(), Some(OutputFormat::Csv));
        let back = GridRequest::from_uri(redirect.location()).unwrap();
        assert_eq!(back.get("type"), Some("csv"));
        assert!(back.get("grid").is_some());
    }

    #[test]
    fn redirect_keeps_existing_state_position() {
        let mut state = FilterState::new();
        state.sort("u.name");
        let request = GridRequest::new("/u")
            .with_param("grid", state.encode())
            .with_param("tab", "2")
            .with_param("grid_action", "sort")
            .with_param("grid_value", "u.name");
        let redirect = match Grid::from_request(GridConfig::new(), mapper(), request).unwrap() {
            Dispatch::Redirect(r) => r,
            Dispatch::Render(_) => panic!("expected redirect"),
        };
        assert_eq!(redirect.state().sort.direction, Dir::Desc);
        let back = GridRequest::from_uri(redirect.location()).unwrap();
        assert_eq!(back.params()[0].0, "grid");
        assert_eq!(back.params()[1], ("tab".to_string(), "2".to_string()));
    }

    #[test]
    fn filter_inputs_without_value_param() {
        let redirect =
            expect_redirect("/u?grid_action=filter&grid_value%3Au.name=Ada&grid_value%3Au.city=");
        assert_eq!(redirect.state().filter_value("u.name"), Some("Ada"));
        assert_eq!(redirect.state().filters.len(), 1);
        let back = GridRequest::from_uri(redirect.location()).unwrap();
        assert!(back.params().iter().all(|(n, _)| !n.starts_with("grid_value")));
    }

    #[test]
    fn errors_surface() {
        assert!(matches!(dispatch("/u?grid=nope"), Err(GridError::InvalidState(_))));
        assert!(matches!(dispatch("/u?grid_action=zoom"), Err(GridError::UnknownAction(_))));
        assert!(matches!(
            dispatch("/u?grid_action=page&grid_value=x"),
            Err(GridError::InvalidActionValue { .. })
        ));
        assert!(matches!(dispatch("/u?type=xls"), Err(GridError::UnknownFormat(_))));
        assert!(matches!(
            Grid::from_request(GridConfig::new().page_limit(0), mapper(), GridRequest::new("/")),
            Err(GridError::Config(_))
        ));
    }

    #[test]
    fn render_reads_format_and_key() {
        let grid = expect_grid("/users?type=PDF");
        assert_eq!(grid.format(), OutputFormat::Pdf);
        assert_eq!(grid.key(), generate_key("/users"));

        let grid = Grid::from_request(
            GridConfig::new().key("people"),
            mapper(),
            GridRequest::new("/users"),
        )
        .unwrap();
        match grid {
            Dispatch::Render(grid) => assert_eq!(grid.key(), "people"),
            Dispatch::Redirect(_) => panic!("unexpected redirect"),
        }
    }

    #[test]
    fn filters_become_where_clauses() {
        let mut state = FilterState::new();
        state.sort("u.age");
        state.add_filter("u.name", " da ");
        state.add_filter("u.age", "40");
        state.add_filter("u.notes", "x");
        state.add_filter("u.city", "   ");
        let request = GridRequest::new("/u").with_param("grid", state.encode());
        let grid = match Grid::from_request(GridConfig::new(), mapper(), request).unwrap() {
            Dispatch::Render(g) => g,
            Dispatch::Redirect(_) => panic!("unexpected redirect"),
        };

        let mut query = MemoryQuery::new(Vec::new());
        grid.apply_filters(&mut query).unwrap();
        let expected = Query::new()
            .and("u.age", Op::Gte, "40")
            .and_then(|q| q.and_like("u.name", "%da%"))
            .unwrap()
            .order_by("u.age", Dir::Asc);

        let clauses: Vec<(&str, Op, &str)> = query
            .query()
            .clauses()
            .iter()
            .map(|c| (c.field.as_str(), c.op, c.value.as_str()))
            .collect();
        let expected_clauses: Vec<(&str, Op, &str)> = expected
            .clauses()
            .iter()
            .map(|c| (c.field.as_str(), c.op, c.value.as_str()))
            .collect();
        assert_eq!(clauses, expected_clauses);
        assert_eq!(query.query().orderings(), expected.orderings());
    }

    #[test]
    fn action_urls_carry_current_params() {
        let grid = expect_grid("/users?tab=2&grid_value=stale");
        let url = grid.action_url("page", Some("3")).unwrap();
        let back = GridRequest::from_uri(&url).unwrap();
        assert_eq!(back.get("tab"), Some("2"));
        assert_eq!(back.get("grid_action"), Some("page"));
        assert_eq!(back.get("grid_value"), Some("3"));

        let url = grid.action_url("clear", None).unwrap();
        assert_eq!(url, "/users?tab=2&grid_action=clear");
    }
}
