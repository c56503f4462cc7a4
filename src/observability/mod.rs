//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems emit tracing events
//!     → logging.rs (EnvFilter + fmt layer on stderr)
//! ```
//!
//! # Design Decisions
//! - stderr only; stdout is reserved for command output
//! - Quiet by default (warn), `--debug` or RUST_LOG for more
//! - Private keys never appear in events

pub mod logging;

pub use logging::init_logging;
