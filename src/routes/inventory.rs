use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::put,
    Extension, Json, Router,
};

use crate::auth::gate::{require_login, CurrentUser};
use crate::db::StoreError;
use crate::models::item::{Item, NewItem};
use crate::AppState;

/// PUT /inventory - replace the caller's whole inventory.
///
/// This is the initialization flow brand-new users are routed into.
async fn setup(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(items): Json<Vec<NewItem>>,
) -> Result<Json<Vec<Item>>, (StatusCode, String)> {
    let created = state
        .db
        .replace_inventory(user.id, &items)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(created))
}

/// POST /inventory - add a single item.
async fn add_item(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(item): Json<NewItem>,
) -> Result<Json<Item>, (StatusCode, String)> {
    let created = state
        .db
        .add_item(user.id, &item)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(created))
}

/// PUT /inventory/:item_id - edit one of the caller's items.
async fn edit_item(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(item_id): Path<i64>,
    Json(item): Json<NewItem>,
) -> Result<Json<Item>, (StatusCode, String)> {
    let updated = state
        .db
        .update_item(user.id, item_id, &item)
        .map_err(|e| match e {
            StoreError::NotFound => (StatusCode::NOT_FOUND, "No such item".to_string()),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    Ok(Json(updated))
}

/// DELETE /inventory/:item_id - remove one of the caller's items.
async fn delete_item(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(item_id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .db
        .delete_item(user.id, item_id)
        .map_err(|e| match e {
            StoreError::NotFound => (StatusCode::NOT_FOUND, "No such item".to_string()),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/inventory", put(setup).post(add_item))
        .route("/inventory/:item_id", put(edit_item).delete(delete_item))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login))
        .with_state(state)
}
