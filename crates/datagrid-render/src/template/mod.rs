//! Template rendering.
//!
//! The HTML view renders its document through a [`TemplateEngine`]. The
//! default [`MiniJinjaEngine`] escapes HTML and registers the grid filters
//! (see [`register_filters`]).

mod engine;

pub use engine::{register_filters, MiniJinjaEngine, TemplateEngine};
