use axum::response::Html;
use serde::Serialize;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedAccount;
use crate::shared::templates::render_template;

/// Layout variables every page receives
#[derive(Debug, Default, Serialize)]
pub struct PageLayout {
    /// Present when a visitor is logged in; drives the navigation bar
    pub account_email: Option<String>,
    /// Flash messages to show once
    pub messages: Vec<String>,
}

impl PageLayout {
    pub fn anonymous(messages: Vec<String>) -> Self {
        Self {
            account_email: None,
            messages,
        }
    }

    pub fn for_account(account: &AuthenticatedAccount, messages: Vec<String>) -> Self {
        Self {
            account_email: Some(account.email.clone()),
            messages,
        }
    }
}

/// Page body for templates that need nothing beyond the layout
#[derive(Debug, Serialize)]
pub struct NoData {}

#[derive(Serialize)]
struct Page<'a, T: Serialize> {
    #[serde(flatten)]
    layout: &'a PageLayout,
    #[serde(flatten)]
    data: &'a T,
}

/// Render a page template with the layout merged into its data
pub fn render_page<T: Serialize>(template: &str, layout: PageLayout, data: T) -> Result<Html<String>> {
    let page = Page {
        layout: &layout,
        data: &data,
    };
    let html = render_template(template, minijinja::Value::from_serialize(&page))?;
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_page_merges_layout_and_data() {
        let layout = PageLayout {
            account_email: Some("doc@example.com".to_string()),
            messages: vec!["Welcome back".to_string()],
        };
        let Html(html) = render_page("index.html", layout, NoData {}).unwrap();
        assert!(html.contains("doc@example.com"));
        assert!(html.contains("Welcome back"));
        assert!(html.contains("/logout"));
    }

    #[test]
    fn test_anonymous_layout_shows_login_links() {
        let Html(html) =
            render_page("index.html", PageLayout::anonymous(vec![]), NoData {}).unwrap();
        assert!(html.contains("/register"));
        assert!(!html.contains("/logout"));
    }
}
