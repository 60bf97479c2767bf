//! Backend API client.
//!
//! # Data Flow
//! ```text
//! ApiConfig + local storage
//!     → client.rs (read token once, build default headers)
//!     → ApiClient (immutable, shared via Arc)
//!     → get_json / post_json / put_json / delete
//! ```

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
