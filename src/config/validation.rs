//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Base address must be an absolute http(s) URL
//! - Token key and content type must be usable as-is
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: ShellConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::ShellConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("api.base_url '{0}' is not a valid absolute URL")]
    InvalidBaseUrl(String),

    #[error("api.base_url scheme '{0}' is not http or https")]
    UnsupportedScheme(String),

    #[error("api.token_key must not be empty")]
    EmptyTokenKey,

    #[error("api.content_type must not be empty")]
    EmptyContentType,

    #[error("api.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("router.base '{0}' must start with '/'")]
    InvalidRouterBase(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ShellConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.base_url) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
        }
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::InvalidBaseUrl(config.api.base_url.clone())),
    }

    if config.api.token_key.trim().is_empty() {
        errors.push(ValidationError::EmptyTokenKey);
    }
    if config.api.content_type.trim().is_empty() {
        errors.push(ValidationError::EmptyContentType);
    }
    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if !config.router.base.starts_with('/') {
        errors.push(ValidationError::InvalidRouterBase(config.router.base.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
