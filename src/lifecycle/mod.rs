//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Configure API client → Build route table
//!     → App root → Mount on #app → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

pub mod shutdown;
pub mod startup;

pub use shutdown::shutdown_signal;
pub use startup::{App, MountedApp, Page, StartupError};
