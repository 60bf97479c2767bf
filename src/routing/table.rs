//! The application's route table.

use crate::routing::{Component, LoadError, RouteEntry, Router, RoutingResult};

pub const LOGIN_VIEW: &str = "login";
pub const MODEL_VIEW: &str = "3d";

/// Route entries for the application, in declaration order.
///
/// The catch-all is declared before `/3D`; specific routes still win.
pub fn app_routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry::view("/login", "Login", Component::new(LOGIN_VIEW)),
        RouteEntry::redirect("/", "/login"),
        RouteEntry::redirect("/:pathMatch(.*)*", "/login"),
        RouteEntry::lazy("/3D", "3D", load_model_view),
    ]
}

/// Compile the application routes under the given history base.
pub fn app_router(base: &str) -> RoutingResult<Router> {
    Router::new(base, app_routes())
}

// Stands in for fetching the 3D view's chunk on demand.
async fn load_model_view() -> Result<Component, LoadError> {
    tokio::task::yield_now().await;
    Ok(Component::new(MODEL_VIEW))
}
