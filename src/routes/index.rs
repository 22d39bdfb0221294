use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::auth::gate::require_login;
use crate::models::item::Item;
use crate::AppState;

/// GET /splash - the unauthenticated landing page.
async fn splash() -> Html<&'static str> {
    Html(
        "<h1>Epulo</h1>\
         <p>Trade what you have for what you need.</p>\
         <a href=\"/auth/facebook\">Log in with Facebook</a>",
    )
}

/// GET / - the app shell; the client router takes over from here.
async fn home() -> Html<&'static str> {
    Html("<div id=\"app\"></div><script src=\"/js/app.js\"></script>")
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// GET /search?q= - search all inventories by item name.
async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Item>>, (StatusCode, String)> {
    let items = state
        .db
        .search_items(&params.q)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(items))
}

/// GET /search/typeahead?q= - item name suggestions. Ungated.
async fn search_typeahead(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    let names = state
        .db
        .item_names(&params.q, 10)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(names))
}

pub fn router(state: Arc<AppState>) -> Router {
    let gated = Router::new()
        .route("/", get(home))
        .route("/search", get(search))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    Router::new()
        .route("/splash", get(splash))
        .route("/search/typeahead", get(search_typeahead))
        .merge(gated)
        .with_state(state)
}
