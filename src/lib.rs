//! Client-side application shell: a preconfigured backend API client and the
//! application's route table.

pub mod api;
pub mod config;
pub mod observability;
pub mod routing;
pub mod storage;

pub use api::ApiClient;
pub use config::ShellConfig;
pub use routing::Router;
