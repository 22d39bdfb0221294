use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;

use crate::auth::gate::{require_login, CurrentUser};
use crate::models::user::{ProfileUpdate, User};
use crate::AppState;

#[derive(Debug, Serialize)]
struct ContactInfo {
    first_name: String,
    last_name: String,
    email: Option<String>,
}

/// Shape the compose-message client expects.
#[derive(Debug, Serialize)]
struct ContactResponse {
    recipient: ContactInfo,
}

/// GET /profile/me - the logged-in user's own record.
async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}

/// PUT /profile/me - update the logged-in user's profile fields.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>, (StatusCode, String)> {
    let updated = state
        .db
        .update_user_profile(user.id, &update)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    // The rehydration cache still holds the old record
    state.identity.invalidate(user.id).await;

    Ok(Json(updated))
}

/// GET /profile/:id - another user's public record.
async fn view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, (StatusCode, String)> {
    let user = state
        .db
        .find_user_by_id(id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::NOT_FOUND, "No such user".to_string()))?;

    Ok(Json(user))
}

/// GET /profile/contact/:id - contact card for the compose-message flow.
async fn contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ContactResponse>, (StatusCode, String)> {
    let user = state
        .db
        .find_user_by_id(id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::NOT_FOUND, "No such user".to_string()))?;

    Ok(Json(ContactResponse {
        recipient: ContactInfo {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        },
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/profile/me", get(me).put(update_me))
        .route("/profile/contact/:id", get(contact))
        .route("/profile/:id", get(view))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login))
        .with_state(state)
}
