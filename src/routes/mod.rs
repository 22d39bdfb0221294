pub mod auth;
pub mod bulletins;
pub mod index;
pub mod inventory;
pub mod messages;
pub mod profile;

use std::sync::Arc;

use axum::Router;

use crate::AppState;

/// Assemble every route module into the application router.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(index::router(state.clone()))
        .merge(auth::router(state.clone()))
        .merge(profile::router(state.clone()))
        .merge(inventory::router(state.clone()))
        .merge(bulletins::router(state.clone()))
        .merge(messages::router(state))
}
