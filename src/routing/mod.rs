//! Client-side routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation path (e.g. "/app/3D?x=1")
//!     → router.rs (strip history base, normalize)
//!     → matcher.rs (specific patterns first, then catch-all)
//!     → follow redirects
//!     → view.rs (eager component or one-shot lazy load)
//!     → Navigation or explicit error
//!
//! Route Compilation (at startup):
//!     RouteEntry[]
//!     → compile patterns, reject duplicates
//!     → freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Specific matches always win over a catch-all, whatever the declaration order
//! - Redirect chains are bounded; loops are reported, never spun on

pub mod matcher;
pub mod router;
pub mod table;
pub mod view;

use std::future::Future;

use thiserror::Error;

pub use router::{Navigation, Resolved, ResolvedView, Router};
pub use table::{app_router, app_routes};
pub use view::{Component, LazyComponent, LoadError};

/// Errors raised while compiling or resolving routes.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// No route matches and no catch-all is defined.
    #[error("no route matches '{0}'")]
    NoMatch(String),

    /// A redirect chain revisits a path or exceeds the hop limit.
    #[error("redirect loop detected: {}", .0.join(" -> "))]
    RedirectLoop(Vec<String>),

    /// Two routes share a path pattern or a name.
    #[error("duplicate route {0}")]
    Duplicate(String),

    /// The path pattern uses syntax the matcher does not support.
    #[error("invalid route pattern '{0}'")]
    InvalidPattern(String),

    /// A lazy component factory failed.
    #[error("failed to load view for '{path}': {source}")]
    LoadFailed {
        path: String,
        #[source]
        source: LoadError,
    },
}

pub type RoutingResult<T> = Result<T, RoutingError>;

/// What a route does when it matches.
#[derive(Debug, Clone)]
pub enum RouteTarget {
    /// Render a component that is available immediately.
    View(Component),
    /// Render a component loaded on first navigation.
    Lazy(LazyComponent),
    /// Navigate to another path instead.
    Redirect(String),
}

/// A single declarative route.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// Path pattern (static path or catch-all).
    pub path: String,

    /// Optional route name for lookups.
    pub name: Option<String>,

    pub target: RouteTarget,
}

impl RouteEntry {
    /// Named route rendering an eagerly available component.
    pub fn view(path: impl Into<String>, name: impl Into<String>, component: Component) -> Self {
        Self {
            path: path.into(),
            name: Some(name.into()),
            target: RouteTarget::View(component),
        }
    }

    /// Named route whose component comes from an async factory.
    pub fn lazy<F, Fut>(path: impl Into<String>, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Component, LoadError>> + Send + 'static,
    {
        Self {
            path: path.into(),
            name: Some(name.into()),
            target: RouteTarget::Lazy(LazyComponent::new(factory)),
        }
    }

    /// Unnamed route redirecting to `to`.
    pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            target: RouteTarget::Redirect(to.into()),
        }
    }
}
