//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path (/blog/my-post?ref=x)
//!     → router.rs (strip base path, scan entries)
//!     → matcher.rs (segment match, bind :params)
//!     → Return: Resolved { view, params } or NoMatch
//!
//! Route Compilation (at startup):
//!     (path, name, view) literals
//!     → Parse patterns into segments
//!     → Check unique names / unambiguous patterns
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always resolves to the same route
//! - Static segments win over parameters at the same position

pub mod matcher;
pub mod router;

use std::sync::Arc;

use thiserror::Error;

use crate::views;

pub use matcher::{Params, PathPattern, Segment};
pub use router::{Resolved, RouteEntry, RouteTable, RouteTableBuilder};

/// Errors raised while building or consulting the route table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No registered route matches the path.
    #[error("No route matches '{0}'")]
    NoMatch(String),

    /// Programmatic navigation named a route that does not exist.
    #[error("Unknown route '{0}'")]
    UnknownRoute(String),

    /// Programmatic navigation omitted a required parameter.
    #[error("Route '{route}' requires parameter '{param}'")]
    MissingParameter { route: String, param: String },

    /// Two routes share a name.
    #[error("Duplicate route name '{0}'")]
    DuplicateName(String),

    /// Two patterns would match exactly the same paths.
    #[error("Patterns '{first}' and '{second}' are ambiguous")]
    AmbiguousPattern { first: String, second: String },

    /// A pattern or base path is malformed.
    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// The site's route table: home, about, projects and the blog.
pub fn site_routes(base_path: &str) -> Result<RouteTable, RouteError> {
    RouteTable::builder()
        .base_path(base_path)
        .route("/", "home", Arc::new(views::HomeView))
        .route("/about", "about", Arc::new(views::AboutView))
        .route("/projects", "projects", Arc::new(views::ProjectsView))
        .route("/projects/:slug", "project-detail", Arc::new(views::ProjectDetailView))
        .route("/blog", "blog", Arc::new(views::BlogView))
        .route("/blog/:slug", "article-detail", Arc::new(views::ArticleDetailView))
        .build()
}
