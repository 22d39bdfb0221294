//! Login and logout routes.
//!
//! `GET /auth/facebook` starts the OAuth dance, `GET /auth/facebook/callback`
//! finishes it (provisioning the user on first login), `GET /logout` destroys
//! the session. All three are ungated.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::auth::gate::{clear_session_cookie, session_cookie, LANDING_ROUTE, SESSION_COOKIE};
use crate::AppState;

/// Where a brand-new user lands after the first login.
const FIRST_LOGIN_ROUTE: &str = "/#/inventory/initialize";

/// Where a returning user lands.
const HOME_ROUTE: &str = "/#/";

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// GET /auth/facebook - redirect to the provider's login dialog.
async fn facebook_login(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::to(&state.facebook.authorize_url())
}

/// GET /auth/facebook/callback - finish the OAuth flow.
///
/// Any provider or directory failure sends the client back to the landing
/// route with no session; a brand-new user is routed into inventory
/// initialization, a returning one home.
async fn facebook_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    let code = match params.code {
        Some(code) => code,
        None => {
            tracing::warn!(
                "Facebook login denied: {}",
                params.error.as_deref().unwrap_or("no code")
            );
            return Redirect::to(LANDING_ROUTE).into_response();
        }
    };

    let profile = match state.facebook.exchange_code(&code).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Facebook code exchange failed: {}", e);
            return Redirect::to(LANDING_ROUTE).into_response();
        }
    };

    let outcome = match state.identity.on_external_login(&profile).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("User provisioning failed: {}", e);
            return Redirect::to(LANDING_ROUTE).into_response();
        }
    };

    let token = state.identity.session_token(&outcome.user);
    let session_id = state.sessions.create(token).await;
    let jar = jar.add(session_cookie(session_id));

    let destination = if outcome.was_created {
        FIRST_LOGIN_ROUTE
    } else {
        HOME_ROUTE
    };

    (jar, Redirect::to(destination)).into_response()
}

/// GET /logout - destroy the session and go back to the landing page.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Some(user_id) = state.sessions.remove(cookie.value()).await {
            state.identity.invalidate(user_id).await;
        }
    }

    let jar = jar.remove(clear_session_cookie());
    (jar, Redirect::to(LANDING_ROUTE)).into_response()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/facebook", get(facebook_login))
        .route("/auth/facebook/callback", get(facebook_callback))
        .route("/logout", get(logout))
        .with_state(state)
}
