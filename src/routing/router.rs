//! Route lookup and navigation.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Resolve a path to its final route, following redirects
//! - Load the matched view (lazily where configured)
//!
//! # Design Decisions
//! - Immutable after construction (shareable without locks)
//! - O(n) scan over specific routes, then the catch-all
//! - Explicit NoMatch rather than silent default

use std::collections::HashSet;

use crate::routing::matcher::{compile_pattern, normalize_path, Matcher};
use crate::routing::{Component, LazyComponent, RouteEntry, RouteTarget, RoutingError, RoutingResult};

/// Maximum number of redirects followed for one navigation.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug)]
struct CompiledRoute {
    entry: RouteEntry,
    matcher: Box<dyn Matcher>,
}

/// Outcome of matching a path, before any view is loaded.
#[derive(Debug)]
pub struct Resolved<'a> {
    /// Path as requested by the caller.
    pub requested: String,
    /// Normalized path of the final, non-redirect route.
    pub path: String,
    /// Name of the final route.
    pub name: Option<&'a str>,
    pub view: ResolvedView<'a>,
    /// First path of the redirect chain, if any redirect was followed.
    pub redirected_from: Option<String>,
}

/// View behind a resolved route. Redirects never reach this point.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedView<'a> {
    Eager(&'a Component),
    Lazy(&'a LazyComponent),
}

/// Outcome of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: String,
    pub path: String,
    pub name: Option<String>,
    pub component: Component,
    pub redirected_from: Option<String>,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        self.redirected_from.is_some()
    }
}

/// Compiled, immutable route table.
#[derive(Debug)]
pub struct Router {
    base: String,
    routes: Vec<CompiledRoute>,
}

impl Router {
    /// Compile a router from route entries.
    ///
    /// `base` is the history base stripped from every navigation path
    /// (`"/"` for none).
    pub fn new(base: &str, entries: Vec<RouteEntry>) -> RoutingResult<Self> {
        let mut patterns = HashSet::new();
        let mut names = HashSet::new();
        let mut routes = Vec::with_capacity(entries.len());

        for entry in entries {
            let matcher = compile_pattern(&entry.path)?;
            if !patterns.insert(matcher.key().to_string()) {
                return Err(RoutingError::Duplicate(format!("path '{}'", entry.path)));
            }
            if let Some(name) = &entry.name {
                if !names.insert(name.clone()) {
                    return Err(RoutingError::Duplicate(format!("name '{}'", name)));
                }
            }
            routes.push(CompiledRoute { entry, matcher });
        }

        let base = normalize_path(base);
        tracing::debug!(base = %base, routes = routes.len(), "Router compiled");

        Ok(Self { base, routes })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Route entries in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.iter().map(|r| &r.entry)
    }

    pub fn route_by_name(&self, name: &str) -> Option<&RouteEntry> {
        self.routes().find(|r| r.name.as_deref() == Some(name))
    }

    /// Full location (history base included) of a named route.
    pub fn href(&self, name: &str) -> Option<String> {
        let route = self.route_by_name(name)?;
        if self.base == "/" {
            Some(route.path.clone())
        } else {
            Some(format!("{}{}", self.base, route.path))
        }
    }

    /// Whether the lazy view behind a named route has been loaded.
    ///
    /// `None` if the route doesn't exist or isn't lazy.
    pub fn is_loaded(&self, name: &str) -> Option<bool> {
        match &self.route_by_name(name)?.target {
            RouteTarget::Lazy(lazy) => Some(lazy.is_loaded()),
            _ => None,
        }
    }

    fn strip_base(&self, path: &str) -> String {
        let path = normalize_path(path);
        if self.base == "/" {
            return path;
        }
        match path.strip_prefix(&self.base) {
            Some("") => "/".to_string(),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => path,
        }
    }

    fn match_path(&self, path: &str) -> RoutingResult<&RouteEntry> {
        self.routes
            .iter()
            .filter(|r| !r.matcher.is_catch_all())
            .chain(self.routes.iter().filter(|r| r.matcher.is_catch_all()))
            .find(|r| r.matcher.matches(path))
            .map(|r| &r.entry)
            .ok_or_else(|| RoutingError::NoMatch(path.to_string()))
    }

    /// Match `path` and follow redirects, without loading any view.
    pub fn resolve(&self, path: &str) -> RoutingResult<Resolved<'_>> {
        let mut current = self.strip_base(path);
        let mut chain: Vec<String> = Vec::new();

        loop {
            let route = self.match_path(&current)?;
            let view = match &route.target {
                RouteTarget::Redirect(to) => {
                    let next = normalize_path(to);
                    chain.push(current);
                    if chain.len() > MAX_REDIRECTS || chain.contains(&next) {
                        chain.push(next);
                        return Err(RoutingError::RedirectLoop(chain));
                    }
                    tracing::trace!(from = ?chain.last(), to = %next, "Following redirect");
                    current = next;
                    continue;
                }
                RouteTarget::View(component) => ResolvedView::Eager(component),
                RouteTarget::Lazy(lazy) => ResolvedView::Lazy(lazy),
            };

            return Ok(Resolved {
                requested: path.to_string(),
                path: current,
                name: route.name.as_deref(),
                view,
                redirected_from: chain.into_iter().next(),
            });
        }
    }

    /// Resolve `path` and load its view.
    ///
    /// Lazy views are fetched on the first navigation that reaches them and
    /// reused afterwards.
    pub async fn navigate(&self, path: &str) -> RoutingResult<Navigation> {
        let resolved = self.resolve(path)?;

        let component = match resolved.view {
            ResolvedView::Eager(component) => component.clone(),
            ResolvedView::Lazy(lazy) => {
                let first_load = !lazy.is_loaded();
                let component = lazy.load().await.map_err(|source| {
                    tracing::warn!(path = %resolved.path, error = %source, "Lazy view failed to load");
                    RoutingError::LoadFailed {
                        path: resolved.path.clone(),
                        source,
                    }
                })?;
                if first_load {
                    tracing::debug!(path = %resolved.path, component = component.id(), "Lazy view loaded");
                }
                component
            }
        };

        let navigation = Navigation {
            requested: resolved.requested,
            path: resolved.path,
            name: resolved.name.map(str::to_string),
            component,
            redirected_from: resolved.redirected_from,
        };

        tracing::debug!(
            requested = %navigation.requested,
            path = %navigation.path,
            component = navigation.component.id(),
            redirected = navigation.was_redirected(),
            "Navigation resolved"
        );

        Ok(navigation)
    }
}
