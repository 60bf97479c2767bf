//! Path matching logic.
//!
//! # Responsibilities
//! - Normalize navigation paths (drop query/fragment, trailing slash)
//! - Match exact static paths (ASCII case-insensitive)
//! - Match the catch-all wildcard
//!
//! # Design Decisions
//! - No dynamic segments: a pattern is either a static path or a catch-all
//! - Catch-all syntax accepts `*`, `/*` and `/:name(.*)*`
//! - No regex to keep matching trivial and predictable

use crate::routing::RoutingError;

/// Trait for matching a normalized path against a route pattern.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this pattern.
    fn matches(&self, path: &str) -> bool;

    /// Catch-all matchers are only consulted after every specific matcher.
    fn is_catch_all(&self) -> bool {
        false
    }

    /// Key identifying the pattern, used to detect duplicates.
    fn key(&self) -> &str;
}

/// Matches one static path, ignoring ASCII case (`/3d` matches `/3D`).
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    path: String,
}

impl ExactMatcher {
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize_path(path).to_ascii_lowercase(),
        }
    }
}

impl Matcher for ExactMatcher {
    fn matches(&self, path: &str) -> bool {
        path.eq_ignore_ascii_case(&self.path)
    }

    fn key(&self) -> &str {
        &self.path
    }
}

/// Matches any path.
#[derive(Debug, Clone, Default)]
pub struct CatchAllMatcher;

impl Matcher for CatchAllMatcher {
    fn matches(&self, _path: &str) -> bool {
        true
    }

    fn is_catch_all(&self) -> bool {
        true
    }

    fn key(&self) -> &str {
        "*"
    }
}

/// Compile a route pattern into a matcher.
pub fn compile_pattern(pattern: &str) -> Result<Box<dyn Matcher>, RoutingError> {
    if is_catch_all_pattern(pattern) {
        return Ok(Box::new(CatchAllMatcher));
    }

    if pattern.is_empty() || pattern.contains([':', '*', '(', ')', '?', '#']) {
        return Err(RoutingError::InvalidPattern(pattern.to_string()));
    }

    Ok(Box::new(ExactMatcher::new(pattern)))
}

fn is_catch_all_pattern(pattern: &str) -> bool {
    if pattern == "*" || pattern == "/*" {
        return true;
    }

    // `/:pathMatch(.*)*` and `/:pathMatch(.*)`
    pattern
        .strip_prefix("/:")
        .and_then(|rest| rest.strip_suffix('*').or(Some(rest)))
        .and_then(|rest| rest.strip_suffix("(.*)"))
        .map(|name| !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(false)
}

/// Normalize a navigation path for matching.
///
/// Query string and fragment are dropped, a leading `/` is ensured and a
/// trailing `/` is removed (except for the root path).
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}
