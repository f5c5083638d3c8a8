//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the page handler as fallback
//! - Wire up middleware (tracing, request timeout)
//! - Bind server to listener
//! - Dispatch every GET path to the route table

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::lifecycle::{shutdown_signal, MountedApp};

/// HTTP server for the site.
pub struct SiteServer {
    router: Router,
}

impl SiteServer {
    /// Create a new HTTP server serving the mounted app.
    pub fn new(app: MountedApp) -> Self {
        let timeout = Duration::from_secs(app.app().config().server.request_timeout_secs);
        let router = build_router(Arc::new(app), timeout);
        Self { router }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(app: Arc<MountedApp>, request_timeout: Duration) -> Router {
    Router::new()
        .fallback(page_handler)
        .with_state(app)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

/// Resolve the request path and answer with the page for its view.
async fn page_handler(
    State(app): State<Arc<MountedApp>>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
        )
            .into_response();
    }

    let page = app.render(uri.path());
    if page.is_not_found() {
        tracing::warn!(path = %uri.path(), "No route matched");
        return (StatusCode::NOT_FOUND, Html(page.html)).into_response();
    }

    (StatusCode::OK, Html(page.html)).into_response()
}
