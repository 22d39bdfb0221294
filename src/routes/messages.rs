use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::gate::{require_login, CurrentUser};
use crate::mailer::OutgoingEmail;
use crate::models::message::{Message, NewMessage};
use crate::AppState;

/// Payload the compose-message client posts to /email.
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub sender_email: String,
    pub recipient_email: String,
    #[serde(default)]
    pub is_offer: bool,
    #[serde(default)]
    pub item: Option<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Serialize)]
struct EmailResponse {
    status: &'static str,
}

/// GET /messages - offer history involving the caller.
async fn view(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<Message>>, (StatusCode, String)> {
    let messages = state
        .db
        .messages_for_user(user.id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(messages))
}

/// POST /messages - record an offer or request.
async fn add(
    State(state): State<Arc<AppState>>,
    Json(message): Json<NewMessage>,
) -> Result<Json<Message>, (StatusCode, String)> {
    let record = Message::new(message.offerer_id, message.requester_id, message.item);

    state
        .db
        .record_message(&record)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(record))
}

/// POST /email - relay a negotiation email between two users.
async fn email(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<EmailResponse>, (StatusCode, String)> {
    let outgoing = OutgoingEmail {
        from: request.sender_email,
        to: request.recipient_email,
        subject: request.subject,
        body: request.body,
    };

    state
        .mailer
        .send(&outgoing)
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?;

    tracing::info!(
        "Relayed {} email about {:?}",
        if request.is_offer { "offer" } else { "request" },
        request.item
    );

    Ok(Json(EmailResponse { status: "sent" }))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/messages", get(view).post(add))
        .route("/email", post(email))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login))
        .with_state(state)
}
