//! HTTP front subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → page_handler (method check)
//!     → MountedApp::render (route table resolve)
//!     → 200 page shell for the view, or 404 not-found page
//! ```

pub mod server;

pub use server::{build_router, SiteServer};
