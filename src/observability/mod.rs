//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! api / routing / storage
//!     → tracing events with structured fields
//!     → logging.rs (subscriber: env filter + fmt or JSON layer)
//!     → stderr
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of interpolated messages
//! - Token values are never logged, only whether one was found

pub mod logging;

pub use logging::init_logging;
