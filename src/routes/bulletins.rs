use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};

use crate::auth::gate::{require_login, CurrentUser};
use crate::db::StoreError;
use crate::models::bulletin::{Bulletin, NewBulletin};
use crate::AppState;

/// GET /bulletins - the whole board, newest first.
async fn view(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Bulletin>>, (StatusCode, String)> {
    let bulletins = state
        .db
        .list_bulletins()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(bulletins))
}

/// GET /bulletins/me - the caller's own bulletins.
async fn mine(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<Bulletin>>, (StatusCode, String)> {
    let bulletins = state
        .db
        .bulletins_for_user(user.id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(bulletins))
}

/// GET /bulletins/:bulletin_id
async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(bulletin_id): Path<i64>,
) -> Result<Json<Bulletin>, (StatusCode, String)> {
    let bulletin = state
        .db
        .get_bulletin(bulletin_id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::NOT_FOUND, "No such bulletin".to_string()))?;

    Ok(Json(bulletin))
}

/// POST /bulletins
async fn add(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(bulletin): Json<NewBulletin>,
) -> Result<Json<Bulletin>, (StatusCode, String)> {
    let created = state
        .db
        .create_bulletin(user.id, &bulletin)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(created))
}

/// PUT /bulletins/:bulletin_id - edit, owner only.
async fn edit(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(bulletin_id): Path<i64>,
    Json(bulletin): Json<NewBulletin>,
) -> Result<Json<Bulletin>, (StatusCode, String)> {
    let updated = state
        .db
        .update_bulletin(user.id, bulletin_id, &bulletin)
        .map_err(|e| match e {
            StoreError::NotFound => (StatusCode::NOT_FOUND, "No such bulletin".to_string()),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    Ok(Json(updated))
}

/// DELETE /bulletins/:bulletin_id - owner only.
async fn remove(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(bulletin_id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .db
        .delete_bulletin(user.id, bulletin_id)
        .map_err(|e| match e {
            StoreError::NotFound => (StatusCode::NOT_FOUND, "No such bulletin".to_string()),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/bulletins", get(view).post(add))
        .route("/bulletins/me", get(mine))
        .route(
            "/bulletins/:bulletin_id",
            get(get_one).put(edit).delete(remove),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login))
        .with_state(state)
}
