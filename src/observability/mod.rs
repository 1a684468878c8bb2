//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events on stderr)
//!
//! Consumers:
//!     → Terminal (pretty) or log aggregation (JSON lines)
//! ```
//!
//! # Design Decisions
//! - stdout is reserved for command results
//! - Log level configurable via config and RUST_LOG

pub mod logging;

pub use logging::{init_logging, LogFormat};
