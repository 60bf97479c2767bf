//! View references held by route entries.
//!
//! A `Component` only identifies a view; rendering belongs to the host
//! application. Lazy components are produced by an async factory the first
//! time they are needed and cached afterwards.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::sync::OnceCell;

/// Error produced by a lazy component factory.
pub type LoadError = Box<dyn std::error::Error + Send + Sync>;

type ComponentFactory = dyn Fn() -> BoxFuture<'static, Result<Component, LoadError>> + Send + Sync;

/// Identifier of a view the host application knows how to render.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    id: String,
}

impl Component {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A component fetched on demand.
///
/// Clones share the same cache, so the factory runs at most once per
/// successful load no matter how many navigations race for it. A failed load
/// leaves the cache empty and the next navigation tries again.
#[derive(Clone)]
pub struct LazyComponent {
    factory: Arc<ComponentFactory>,
    loaded: Arc<OnceCell<Component>>,
}

impl LazyComponent {
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Component, LoadError>> + Send + 'static,
    {
        Self {
            factory: Arc::new(move || factory().boxed()),
            loaded: Arc::new(OnceCell::new()),
        }
    }

    /// Load the component, running the factory only if it hasn't succeeded yet.
    pub async fn load(&self) -> Result<Component, LoadError> {
        self.loaded
            .get_or_try_init(|| (self.factory)())
            .await
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }
}

impl std::fmt::Debug for LazyComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyComponent")
            .field("loaded", &self.loaded.get())
            .finish_non_exhaustive()
    }
}
