//! Startup orchestration.
//!
//! # Responsibilities
//! - Configure the content API client from validated config
//! - Compile the route table
//! - Build the application root and mount it on the page mount point
//!
//! # Design Decisions
//! - Fail fast: a malformed base address or route table is fatal
//! - API client is configured before routes so a bad address stops startup
//!   before anything else is built
//! - The mounted app is immutable and shared by the server via `Arc`

use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::config::SiteConfig;
use crate::routing::{self, Params, RouteError, RouteTable};
use crate::views::escape_html;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("API client configuration failed: {0}")]
    Api(#[from] ApiError),

    #[error("Route table is invalid: {0}")]
    Routes(#[from] RouteError),

    #[error("Invalid mount point '{0}': expected an element id selector like '#app'")]
    InvalidMountPoint(String),
}

/// The application root: configuration, API client and route table.
#[derive(Debug, Clone)]
pub struct App {
    config: SiteConfig,
    api: ApiClient,
    routes: Arc<RouteTable>,
}

impl App {
    pub fn new(config: SiteConfig) -> Result<Self, StartupError> {
        let api = ApiClient::configure(&config.api.base_url, &config.api.headers)?;
        let routes = routing::site_routes(&config.router.base_path)?;

        tracing::info!(
            routes = routes.len(),
            base_path = %routes.base_path(),
            "Route table installed"
        );

        Ok(Self {
            config,
            api,
            routes: Arc::new(routes),
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Attach the app to a page mount point such as `#app`.
    pub fn mount(self, mount_point: &str) -> Result<MountedApp, StartupError> {
        let mount_id = mount_point
            .strip_prefix('#')
            .filter(|id| !id.is_empty() && !id.contains(char::is_whitespace))
            .ok_or_else(|| StartupError::InvalidMountPoint(mount_point.to_string()))?
            .to_string();

        tracing::info!(mount_point = %mount_point, "App mounted");
        Ok(MountedApp { app: self, mount_id })
    }
}

/// A rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Identifier of the selected view, `None` for the not-found page.
    pub view: Option<&'static str>,
    pub title: String,
    pub html: String,
}

impl Page {
    pub fn is_not_found(&self) -> bool {
        self.view.is_none()
    }
}

/// An app attached to its mount point, ready to serve navigations.
#[derive(Debug, Clone)]
pub struct MountedApp {
    app: App,
    mount_id: String,
}

impl MountedApp {
    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }

    /// Resolve a path and render the page shell for the selected view.
    pub fn render(&self, path: &str) -> Page {
        match self.app.routes.resolve(path) {
            Ok(resolved) => {
                let title = resolved.view.title(&resolved.params);
                let body = resolved.view.render(&resolved.params);
                tracing::debug!(path = %path, route = %resolved.name, "Route resolved");
                Page {
                    view: Some(resolved.view.id()),
                    html: self.shell(&title, &body),
                    title,
                }
            }
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "No route matched");
                let title = "Not Found".to_string();
                let body = format!(
                    r#"<main data-view="not-found"><h1>Not Found</h1><p><a href="{}">Home</a></p></main>"#,
                    escape_html(&self.link("home", &Params::new()).unwrap_or_default())
                );
                Page {
                    view: None,
                    html: self.shell(&title, &body),
                    title,
                }
            }
        }
    }

    /// Build a link to a named route. Failures are programmer errors and
    /// are logged before being returned.
    pub fn link(&self, name: &str, params: &Params) -> Result<String, RouteError> {
        self.app.routes.navigate(name, params).inspect_err(|e| {
            tracing::error!(route = %name, error = %e, "Navigation to route failed");
        })
    }

    fn shell(&self, title: &str, body: &str) -> String {
        format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html lang=\"en\">\n",
                "<head>\n",
                "<meta charset=\"utf-8\">\n",
                "<meta name=\"api-base\" content=\"{api}\">\n",
                "<title>{title}</title>\n",
                "</head>\n",
                "<body>\n",
                "<div id=\"{mount}\">{body}</div>\n",
                "</body>\n",
                "</html>\n"
            ),
            api = escape_html(self.app.api.config().base_url().as_str()),
            title = escape_html(title),
            mount = escape_html(&self.mount_id),
            body = body,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted() -> MountedApp {
        App::new(SiteConfig::default()).unwrap().mount("#app").unwrap()
    }

    #[test]
    fn test_render_found() {
        let page = mounted().render("/projects/my-slug");
        assert_eq!(page.view, Some("project-detail"));
        assert_eq!(page.title, "Project: my-slug");
        assert!(page.html.contains(r#"<div id="app"><main data-view="project-detail""#));
        assert!(page
            .html
            .contains(r#"<meta name="api-base" content="http://localhost:1337/api/">"#));
    }

    #[test]
    fn test_render_not_found() {
        let page = mounted().render("/nonexistent");
        assert!(page.is_not_found());
        assert!(page.html.contains(r#"<a href="/">Home</a>"#));
    }

    #[test]
    fn test_mount_point_validation() {
        let app = App::new(SiteConfig::default()).unwrap();
        assert!(matches!(
            app.clone().mount("app"),
            Err(StartupError::InvalidMountPoint(_))
        ));
        assert!(app.clone().mount("#").is_err());
        assert_eq!(app.mount("#root").unwrap().mount_id(), "root");
    }

    #[test]
    fn test_bad_base_url_is_fatal() {
        let mut config = SiteConfig::default();
        config.api.base_url = "localhost".into();
        assert!(matches!(App::new(config), Err(StartupError::Api(_))));
    }

    #[test]
    fn test_config_headers_last_write_wins_across_case() {
        let config = crate::config::parse_config(
            "[api.headers]\n\"content-type\" = \"text/plain\"\n\"Content-Type\" = \"application/json\"\n",
        )
        .unwrap();

        let app = App::new(config).unwrap();
        let headers = app.api().config().default_headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["content-type"], "application/json");
    }

    #[test]
    fn test_link_reports_errors() {
        let app = mounted();
        let mut params = Params::new();
        params.insert("slug".into(), "x".into());
        assert_eq!(app.link("project-detail", &params).unwrap(), "/projects/x");
        assert!(matches!(
            app.link("project-detail", &Params::new()),
            Err(RouteError::MissingParameter { .. })
        ));
    }
}
