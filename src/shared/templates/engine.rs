//! Template engine for HTML pages using Jinja2 syntax.

use minijinja::{Environment, Value};
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Page templates, embedded at compile time
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../../templates/base.html")),
    ("index.html", include_str!("../../../templates/index.html")),
    ("login.html", include_str!("../../../templates/login.html")),
    ("register.html", include_str!("../../../templates/register.html")),
    (
        "admin_dashboard.html",
        include_str!("../../../templates/admin_dashboard.html"),
    ),
    (
        "user_dashboard.html",
        include_str!("../../../templates/user_dashboard.html"),
    ),
    ("upload.html", include_str!("../../../templates/upload.html")),
    (
        "appointment.html",
        include_str!("../../../templates/appointment.html"),
    ),
    (
        "doctor_appointments.html",
        include_str!("../../../templates/doctor_appointments.html"),
    ),
    ("chatbot.html", include_str!("../../../templates/chatbot.html")),
    ("pharmacy.html", include_str!("../../../templates/pharmacy.html")),
    ("error.html", include_str!("../../../templates/error.html")),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

/// Get the global template environment
fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a page template with the given context.
///
/// # Example
/// ```ignore
/// use minijinja::context;
///
/// let html = render_template("login.html", context! { messages => vec!["Invalid credentials"] })?;
/// ```
pub fn render_template(template_name: &str, ctx: Value) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_missing_template() {
        let result = render_template("nonexistent.html", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_all_pages_render_with_empty_context() {
        for (name, _) in TEMPLATES {
            let result = render_template(name, context! {});
            assert!(result.is_ok(), "{} failed: {:?}", name, result.err());
        }
    }

    #[test]
    fn test_messages_are_escaped() {
        let html = render_template(
            "login.html",
            context! { messages => vec!["<script>alert(1)</script>"] },
        )
        .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert(1)</script>"));
    }
}
