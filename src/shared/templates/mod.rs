//! HTML page templates.
//!
//! Pages are Jinja2 templates under `templates/`, compiled into the binary
//! and rendered with minijinja. Names ending in `.html` are auto-escaped.

pub mod engine;

pub use engine::{render_template, TemplateError};
