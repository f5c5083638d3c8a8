//! Portfolio and blog site front.
//!
//! A fixed route table selecting views, a pre-configured content API client,
//! and an HTTP front that serves the page shell for the resolved view.

pub mod api;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod views;

pub use api::ApiClient;
pub use config::SiteConfig;
pub use http::SiteServer;
pub use lifecycle::App;
pub use routing::RouteTable;
