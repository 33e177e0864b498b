//! End-to-end request handling against the in-memory backend.

use std::io::Write;

use datagrid::{
    Computation, Disposition, Dispatch, FieldMapper, FilterControl, FilterState, Grid,
    GridConfig, GridError, GridRequest, OutputFormat, Redirect,
};
use datagrid_render::pdf::{DrawOp, RecordingCanvas};
use datagrid_render::template::MiniJinjaEngine;
use datagrid_seeker::{MemoryQuery, Record, Scalar};

fn people() -> Vec<Record> {
    [
        ("Ada", "London", 36i64),
        ("Alan", "London", 41),
        ("Barbara", "Boston", 79),
        ("Edsger", "Austin", 72),
        ("Grace", "New York", 85),
        ("Ken", "Berkeley", 80),
        ("Linus", "Portland", 54),
    ]
    .into_iter()
    .map(|(name, city, age)| {
        Record::new()
            .with("u_name", name)
            .with("u_city", city)
            .with("u_age", age)
    })
    .collect()
}

fn mapper() -> FieldMapper {
    let mut mapper = FieldMapper::new();
    mapper
        .add_mapping("Name", "u.name", "contains")
        .add_mapping("City", "u.city", "select")
        .add_mapping("Age", "u.age", ">=");
    mapper
}

fn config() -> GridConfig {
    GridConfig::new()
        .export(OutputFormat::Csv)
        .export(OutputFormat::Pdf)
        .title("Users")
}

fn dispatch(request: GridRequest) -> Dispatch {
    Grid::from_request(config(), mapper(), request).unwrap()
}

fn redirect(uri: &str) -> Redirect {
    match dispatch(GridRequest::from_uri(uri).unwrap()) {
        Dispatch::Redirect(r) => r,
        Dispatch::Render(_) => panic!("expected a redirect for {}", uri),
    }
}

fn grid(uri: &str) -> Grid {
    match dispatch(GridRequest::from_uri(uri).unwrap()) {
        Dispatch::Render(g) => g,
        Dispatch::Redirect(r) => panic!("unexpected redirect to {}", r.location()),
    }
}

fn names(grid: &Grid) -> Vec<String> {
    let doc = grid.document(&mut MemoryQuery::new(people())).unwrap();
    doc.records.into_iter().map(|r| r.fields[0].clone()).collect()
}

#[test]
fn html_first_page_shows_page_limit_rows() {
    let response = grid("/users").generate(&mut MemoryQuery::new(people())).unwrap();
    assert_eq!(response.content_type, "text/html; charset=utf-8");
    assert_eq!(response.disposition, Disposition::Inline);

    let html = response.text().unwrap();
    for name in ["Ada", "Alan", "Barbara", "Edsger", "Grace"] {
        assert!(html.contains(&format!("<td>{}</td>", name)), "missing {}", name);
    }
    assert!(!html.contains("<td>Ken</td>"));
    assert!(!html.contains("<td>Linus</td>"));
    assert!(html.contains("<div class='pagination'>Page:"));
    assert!(html.contains("class='current'>1</a>"));
    assert!(html.contains("(7 results)"));
}

#[test]
fn page_action_moves_the_window() {
    let r = redirect("/users?grid_action=page&grid_value=2");
    assert_eq!(r.state().page, 2);

    let grid = grid(r.location());
    assert_eq!(names(&grid), vec!["Ken", "Linus"]);
}

#[test]
fn page_past_the_end_is_empty_but_counted() {
    let mut state = FilterState::new();
    state.page(9);
    let request = GridRequest::new("/users").with_param("grid", state.encode());
    let grid = match dispatch(request) {
        Dispatch::Render(g) => g,
        Dispatch::Redirect(_) => panic!("unexpected redirect"),
    };
    let doc = grid.document(&mut MemoryQuery::new(people())).unwrap();
    assert!(doc.records.is_empty());
    assert_eq!(doc.meta.numresults, 7);
}

#[test]
fn largest_page_number_is_empty_but_counted() {
    let state = format!(r#"{{"page":{}}}"#, usize::MAX);
    let request = GridRequest::new("/users").with_param("grid", state);
    let grid = match dispatch(request) {
        Dispatch::Render(g) => g,
        Dispatch::Redirect(_) => panic!("unexpected redirect"),
    };
    assert_eq!(grid.state().page, usize::MAX);

    let doc = grid.document(&mut MemoryQuery::new(people())).unwrap();
    assert!(doc.records.is_empty());
    assert_eq!(doc.meta.numresults, 7);
    assert!(doc.meta.pages.links.is_empty());

    let html = grid.generate(&mut MemoryQuery::new(people())).unwrap();
    assert!(html.text().unwrap().contains("(7 results)"));
}

#[test]
fn sort_twice_reverses() {
    let first = redirect("/users?grid_action=sort&grid_value=u.age");
    assert_eq!(names(&grid(first.location())), vec!["Ada", "Alan", "Linus", "Edsger", "Barbara"]);

    let again = format!("{}&grid_action=sort&grid_value=u.age", first.location());
    let second = redirect(&again);
    assert_eq!(names(&grid(second.location())), vec!["Grace", "Ken", "Barbara", "Edsger", "Linus"]);
}

#[test]
fn header_cells_reflect_sort() {
    let r = redirect("/users?grid_action=sort&grid_value=u.name");
    let doc = grid(r.location()).document(&mut MemoryQuery::new(people())).unwrap();
    let sorts: Vec<_> = doc.headers.iter().map(|h| h.sort.map(|d| d.as_str())).collect();
    assert_eq!(sorts, vec![Some("asc"), None, None]);
    assert!(doc.headers.iter().all(|h| h.allow_filter));

    let href = GridRequest::from_uri(&doc.headers[1].href).unwrap();
    assert_eq!(href.get("grid_action"), Some("sort"));
    assert_eq!(href.get("grid_value"), Some("u.city"));
}

#[test]
fn filter_form_inputs_filter_the_grid() {
    let r = redirect("/users?grid_action=filter&grid_value%3Au.city=London&grid_value%3Au.name=");
    let grid = grid(r.location());
    let doc = grid.document(&mut MemoryQuery::new(people())).unwrap();

    assert_eq!(doc.meta.numresults, 2);
    let city = doc.meta.filters.iter().find(|f| f.field == "u.city").unwrap();
    assert_eq!(city.display, "London");
    assert_eq!(city.control, FilterControl::Select);
    assert_eq!(city.input, "grid_value:u.city");

    let form: Vec<(&str, &str)> = doc
        .meta
        .filter_form
        .iter()
        .map(|p| (p.name.as_str(), p.value.as_str()))
        .collect();
    assert!(form.contains(&("grid_action", "filter")));
    assert!(form.iter().any(|(name, _)| *name == "grid"));
}

#[test]
fn filter_action_value_spec() {
    let r = redirect("/users?grid_action=filter&grid_value=u.age%2C%2C80%7C");
    assert_eq!(r.state().filter_value("u.age"), Some("80"));
    assert_eq!(names(&grid(r.location())), vec!["Grace", "Ken"]);
}

#[test]
fn select_options_are_distinct_and_sorted() {
    let doc = grid("/users").document(&mut MemoryQuery::new(people())).unwrap();
    let city = doc.meta.filters.iter().find(|f| f.field == "u.city").unwrap();
    assert_eq!(
        city.options,
        vec!["Austin", "Berkeley", "Boston", "London", "New York", "Portland"]
    );
    let name = doc.meta.filters.iter().find(|f| f.field == "u.name").unwrap();
    assert_eq!(name.control, FilterControl::Input);
    assert!(name.options.is_empty());
}

#[test]
fn clear_resets_everything() {
    let sorted = redirect("/users?grid_action=sort&grid_value=u.name");
    let cleared = redirect(&format!("{}&grid_action=clear", sorted.location()));
    assert_eq!(cleared.state(), &FilterState::new());
}

#[test]
fn csv_export_flow() {
    let r = redirect("/users?grid_action=export&grid_value=csv");
    assert_eq!(r.format(), Some(OutputFormat::Csv));

    let response = grid(r.location()).generate(&mut MemoryQuery::new(people())).unwrap();
    let lines = response.header_lines();
    assert_eq!(lines[0], ("Content-Type".to_string(), "application/octet-stream".to_string()));
    assert_eq!(
        lines[1],
        (
            "Content-Disposition".to_string(),
            "attachment; filename=\"export.csv\"".to_string()
        )
    );
    assert_eq!(response.header("cache-control"), Some("private, must-revalidate"));
    assert_eq!(response.header("Content-Transfer-Encoding"), Some("binary"));

    let body = response.text().unwrap();
    let rows: Vec<&str> = body.split("\r\n").collect();
    assert_eq!(rows.len(), 8, "all rows, no paging");
    assert_eq!(rows[0], "\"Name\",\"City\",\"Age\"");
    assert_eq!(rows[1], "\"Ada\",\"London\",\"36\"");
}

#[test]
fn pdf_export_prints_title_rows_and_footer() {
    let grid = grid("/users?type=pdf");
    let mut canvas = RecordingCanvas::new();
    let response = grid
        .generate_with(&mut MemoryQuery::new(people()), &MiniJinjaEngine::new(), &mut canvas)
        .unwrap();
    assert_eq!(response.content_type, "application/json");
    assert_eq!(response.disposition, Disposition::Inline);

    let pages = canvas
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::AddPage { .. }))
        .count();
    assert_eq!(pages, 1);

    let text = canvas.page_text(1);
    assert_eq!(&text[..5], &["Users", "", "Name", "City", "Age"]);
    assert_eq!(text.last(), Some(&"Page 1"));
    assert_eq!(text.len(), 2 + 3 + 7 * 3 + 1);

    let json: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(json[0]["op"], "add_page");
}

#[test]
fn xml_document() {
    let doc = grid("/users").document(&mut MemoryQuery::new(people())).unwrap();
    let xml = doc.to_xml().unwrap();
    assert!(xml.starts_with("<data><meta>"));
    assert!(xml.contains(r#"<header display="Name" field="u.name" allow_filter="Yes"/>"#));
    assert!(xml.contains(r#"<export type="csv"/>"#));
    assert!(xml.contains("<numresults>7</numresults>"));
    assert!(xml.contains(r#"<field display="Ada"/>"#));
}

#[test]
fn export_links_and_clear_href() {
    let doc = grid("/users?tab=3").document(&mut MemoryQuery::new(people())).unwrap();
    let formats: Vec<&str> = doc.meta.exports.iter().map(|e| e.format.as_str()).collect();
    assert_eq!(formats, vec!["csv", "pdf"]);

    let link = GridRequest::from_uri(&doc.meta.exports[1].href).unwrap();
    assert_eq!(link.get("tab"), Some("3"));
    assert_eq!(link.get("grid_action"), Some("export"));
    assert_eq!(link.get("grid_value"), Some("pdf"));

    assert_eq!(doc.meta.clear_href, "/users?tab=3&grid_action=clear");
}

#[test]
fn supplied_results_skip_paging() {
    let grid = grid("/users").with_results(people());
    let doc = grid.document(&mut MemoryQuery::new(Vec::new())).unwrap();
    assert_eq!(doc.records.len(), 7);
    assert_eq!(doc.meta.numresults, 7);
    let city = doc.meta.filters.iter().find(|f| f.field == "u.city").unwrap();
    assert_eq!(city.options.len(), 6);
}

#[test]
fn computed_column_is_cached_per_arguments() {
    let mut mapper = mapper();
    let shout = Computation::new("shout", |args| {
        Scalar::from(args[0].to_string().to_uppercase())
    });
    mapper.add_mapping_method("Loud city", shout, vec![Scalar::from("u.city")]);

    let grid = match Grid::from_request(
        GridConfig::new().page_limit(10),
        mapper,
        GridRequest::new("/users"),
    )
    .unwrap()
    {
        Dispatch::Render(g) => g,
        Dispatch::Redirect(_) => panic!("unexpected redirect"),
    };

    let doc = grid.document(&mut MemoryQuery::new(people())).unwrap();
    assert_eq!(doc.records[0].fields[3], "LONDON");
    assert_eq!(doc.records[1].fields[3], "LONDON");
    assert_eq!(grid.mapper().computed_calls(), 6);
    assert!(!doc.headers[3].allow_filter);
    assert!(doc.headers[3].href.is_empty());
    assert!(!doc.headers[0].href.is_empty());

    let html = grid.generate(&mut MemoryQuery::new(people())).unwrap();
    assert!(html.text().unwrap().contains("<th>Loud city</th>"));
}

#[test]
fn config_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "key: people\npage_limit: 2\nexport_types: [csv]\ntemplate: \"{{{{ meta.numresults }}}}/{{{{ records | length }}}}\"\nparams:\n  state: people"
    )
    .unwrap();

    let config = GridConfig::from_file(file.path()).unwrap();
    assert_eq!(config.page_limit, 2);
    assert_eq!(config.params.state, "people");

    let mut state = FilterState::new();
    state.add_filter("u.city", "London");
    let request = GridRequest::new("/users").with_param("people", state.encode());
    let grid = match Grid::from_request(config, mapper(), request).unwrap() {
        Dispatch::Render(g) => g,
        Dispatch::Redirect(_) => panic!("unexpected redirect"),
    };
    assert_eq!(grid.key(), "people");

    let response = grid.generate(&mut MemoryQuery::new(people())).unwrap();
    assert_eq!(response.text(), Some("2/2"));
}

#[test]
fn template_file_is_read_at_render_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.j2");
    std::fs::write(&path, "{% for h in headers %}[{{ h.display }}]{% endfor %}").unwrap();

    let config = GridConfig::new().template_file(&path);
    let grid = match Grid::from_request(config, mapper(), GridRequest::new("/u")).unwrap() {
        Dispatch::Render(g) => g,
        Dispatch::Redirect(_) => panic!("unexpected redirect"),
    };
    let response = grid.generate(&mut MemoryQuery::new(people())).unwrap();
    assert_eq!(response.text(), Some("[Name][City][Age]"));

    std::fs::remove_file(&path).unwrap();
    assert!(matches!(
        grid.generate(&mut MemoryQuery::new(people())),
        Err(GridError::Config(_))
    ));
}

#[test]
fn html_escapes_record_values() {
    let rows = vec![Record::new().with("u_name", "<script>").with("u_city", "A&B")];
    let response = grid("/users").generate(&mut MemoryQuery::new(rows)).unwrap();
    let html = response.text().unwrap();
    assert!(html.contains("<td>&lt;script&gt;</td>"));
    assert!(!html.contains("<td><script></td>"));
}
