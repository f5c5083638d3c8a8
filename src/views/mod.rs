//! Renderable views selected by the route table.
//!
//! Views are opaque to routing: the table only hands a view its bound
//! parameters. Each view renders the markup mounted under the app's mount
//! point; page content itself is fetched by the browser from the content API.

use std::fmt::Debug;

use crate::routing::Params;

/// A renderable unit selected by route resolution.
pub trait View: Send + Sync + Debug {
    /// Stable identifier, also used as the `data-view` attribute.
    fn id(&self) -> &'static str;

    /// Document title for the page.
    fn title(&self, params: &Params) -> String;

    /// Markup for the view root.
    fn render(&self, params: &Params) -> String {
        let encoded = serde_json::to_string(params).unwrap_or_else(|_| "{}".to_string());
        format!(
            r#"<main data-view="{}" data-params="{}"><h1>{}</h1></main>"#,
            self.id(),
            escape_html(&encoded),
            escape_html(&self.title(params)),
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HomeView;

impl View for HomeView {
    fn id(&self) -> &'static str {
        "home"
    }

    fn title(&self, _params: &Params) -> String {
        "Home".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AboutView;

impl View for AboutView {
    fn id(&self) -> &'static str {
        "about"
    }

    fn title(&self, _params: &Params) -> String {
        "About".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectsView;

impl View for ProjectsView {
    fn id(&self) -> &'static str {
        "projects"
    }

    fn title(&self, _params: &Params) -> String {
        "Projects".to_string()
    }
}

/// A single project, looked up by `slug`.
#[derive(Debug, Clone, Copy)]
pub struct ProjectDetailView;

impl View for ProjectDetailView {
    fn id(&self) -> &'static str {
        "project-detail"
    }

    fn title(&self, params: &Params) -> String {
        slug_title("Project", params)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BlogView;

impl View for BlogView {
    fn id(&self) -> &'static str {
        "blog"
    }

    fn title(&self, _params: &Params) -> String {
        "Blog".to_string()
    }
}

/// A single blog article, looked up by `slug`.
#[derive(Debug, Clone, Copy)]
pub struct ArticleDetailView;

impl View for ArticleDetailView {
    fn id(&self) -> &'static str {
        "article-detail"
    }

    fn title(&self, params: &Params) -> String {
        slug_title("Article", params)
    }
}

fn slug_title(kind: &str, params: &Params) -> String {
    match params.get("slug") {
        Some(slug) => format!("{kind}: {slug}"),
        None => kind.to_string(),
    }
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
