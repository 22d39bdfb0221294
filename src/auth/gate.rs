use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::models::user::User;
use crate::AppState;

/// Cookie holding the session id.
pub const SESSION_COOKIE: &str = "epulo_session";

/// Where unauthenticated requests are sent.
pub const LANDING_ROUTE: &str = "/splash";

/// Request extension carrying the rehydrated user behind the gate.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Build the httpOnly session cookie set on login.
pub fn session_cookie(session_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Build the matching empty cookie used to clear the session on logout.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Middleware that admits a request only with a live, resolvable session.
///
/// On success the handler runs with `CurrentUser` in the request extensions;
/// on any failure the client is redirected to the landing route and the
/// handler is never invoked. A failed rehydration does not remove the
/// session entry, so a transient storage blip does not force a re-login.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let session_id = match jar.get(SESSION_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => return Redirect::to(LANDING_ROUTE).into_response(),
    };

    let user_id = match state.sessions.lookup(&session_id).await {
        Some(user_id) => user_id,
        None => return Redirect::to(LANDING_ROUTE).into_response(),
    };

    match state.identity.resolve(user_id).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!("Session rehydration failed for user {}: {}", user_id, e);
            Redirect::to(LANDING_ROUTE).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_is_http_only() {
        let cookie = session_cookie("abc123".to_string());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_clear_cookie_has_empty_value() {
        let cookie = clear_session_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
    }
}
