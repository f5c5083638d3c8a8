//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing macros (structured log events with fields)
//!     → logging.rs (filter + fmt layer, pretty or JSON)
//!     → stdout
//! ```

pub mod logging;

pub use logging::init_logging;
