//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait which lets the HTML view
//! hand its document to any templating backend. The default implementation
//! is [`MiniJinjaEngine`].

use minijinja::{AutoEscape, Environment, Value};

use crate::error::RenderError;

/// A template engine that can render templates with data.
///
/// Implement this to plug a caller-chosen templating layer into the grid.
pub trait TemplateEngine {
    /// Renders a template string with the given data.
    ///
    /// This compiles and renders the template in one step. For repeated
    /// rendering of the same template, use [`add_template`](Self::add_template)
    /// and [`render_named`](Self::render_named).
    fn render_template(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError>;

    /// Adds a named template to the engine.
    fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError>;

    /// Renders a previously registered template.
    fn render_named(&self, name: &str, data: &serde_json::Value) -> Result<String, RenderError>;

    /// Checks if a template with the given name exists.
    fn has_template(&self, name: &str) -> bool;
}

/// MiniJinja-based template engine.
///
/// Output is HTML-escaped by default; mark trusted markup with `|safe`.
///
/// # Example
///
/// ```rust
/// use datagrid_render::template::{MiniJinjaEngine, TemplateEngine};
/// use serde_json::json;
///
/// let engine = MiniJinjaEngine::new();
/// let output = engine
///     .render_template("<td>{{ name }}</td>", &json!({ "name": "R&D" }))
///     .unwrap();
/// assert_eq!(output, "<td>R&amp;D</td>");
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates an HTML-escaping engine with the grid filters registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        register_filters(&mut env);
        Self { env }
    }

    /// Creates an engine that does not escape output.
    pub fn plain() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        register_filters(&mut env);
        Self { env }
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// This allows callers to register custom filters or functions.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render_template(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        let value = Value::from_serialize(data);
        Ok(self.env.render_str(template, value)?)
    }

    fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())?;
        Ok(())
    }

    fn render_named(&self, name: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        let tmpl = self.env.get_template(name)?;
        let value = Value::from_serialize(data);
        Ok(tmpl.render(value)?)
    }

    fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }
}

/// Registers the grid filters with a MiniJinja environment.
///
/// - `sort_marker`: `"asc"` / `"desc"` to an arrow, anything else to `""`
/// - `results`: a count to `"1 result"` / `"N results"`
pub fn register_filters(env: &mut Environment<'static>) {
    env.add_filter("sort_marker", |direction: Option<String>| -> String {
        match direction.as_deref() {
            Some("asc") => "\u{25b2}".to_string(),
            Some("desc") => "\u{25bc}".to_string(),
            _ => String::new(),
        }
    });

    env.add_filter("results", |count: u64| -> String {
        if count == 1 {
            "1 result".to_string()
        } else {
            format!("{} results", count)
        }
    });
}
