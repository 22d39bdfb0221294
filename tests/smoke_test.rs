use std::sync::Arc;

use axum::Router;
use http::{header, Method, StatusCode};
use tower::ServiceExt;

use epulo_backend::routes;
use epulo_backend::test_util::{create_test_state, test_config};

fn test_app() -> Router {
    let state = Arc::new(create_test_state(test_config()));
    routes::app_router(state)
}

async fn send_request(app: &Router, method: Method, uri: &str) -> http::Response<axum::body::Body> {
    let req = http::Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{}"))
        .unwrap();

    app.clone().oneshot(req).await.unwrap()
}

async fn assert_redirects_to_splash(app: &Router, method: Method, uri: &str) {
    let response = send_request(app, method, uri).await;
    assert_eq!(
        response.status(),
        StatusCode::SEE_OTHER,
        "{} {} should redirect",
        response.status(),
        uri
    );
    let location = response.headers().get(header::LOCATION).unwrap();
    assert_eq!(location, "/splash");
}

#[tokio::test]
async fn test_home_requires_auth() {
    let app = test_app();
    assert_redirects_to_splash(&app, Method::GET, "/").await;
}

#[tokio::test]
async fn test_search_requires_auth() {
    let app = test_app();
    assert_redirects_to_splash(&app, Method::GET, "/search?q=ladder").await;
}

#[tokio::test]
async fn test_profile_routes_require_auth() {
    let app = test_app();
    assert_redirects_to_splash(&app, Method::GET, "/profile/me").await;
    assert_redirects_to_splash(&app, Method::PUT, "/profile/me").await;
    assert_redirects_to_splash(&app, Method::GET, "/profile/1").await;
    assert_redirects_to_splash(&app, Method::GET, "/profile/contact/1").await;
}

#[tokio::test]
async fn test_inventory_routes_require_auth() {
    let app = test_app();
    assert_redirects_to_splash(&app, Method::PUT, "/inventory").await;
    assert_redirects_to_splash(&app, Method::POST, "/inventory").await;
    assert_redirects_to_splash(&app, Method::PUT, "/inventory/1").await;
    assert_redirects_to_splash(&app, Method::DELETE, "/inventory/1").await;
}

#[tokio::test]
async fn test_bulletin_routes_require_auth() {
    let app = test_app();
    assert_redirects_to_splash(&app, Method::GET, "/bulletins").await;
    assert_redirects_to_splash(&app, Method::GET, "/bulletins/me").await;
    assert_redirects_to_splash(&app, Method::GET, "/bulletins/1").await;
    assert_redirects_to_splash(&app, Method::POST, "/bulletins").await;
    assert_redirects_to_splash(&app, Method::PUT, "/bulletins/1").await;
    assert_redirects_to_splash(&app, Method::DELETE, "/bulletins/1").await;
}

#[tokio::test]
async fn test_message_routes_require_auth() {
    let app = test_app();
    assert_redirects_to_splash(&app, Method::GET, "/messages").await;
    assert_redirects_to_splash(&app, Method::POST, "/messages").await;
    assert_redirects_to_splash(&app, Method::POST, "/email").await;
}

#[tokio::test]
async fn test_splash_is_open() {
    let app = test_app();
    let response = send_request(&app, Method::GET, "/splash").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_typeahead_is_open() {
    let app = test_app();
    let response = send_request(&app, Method::GET, "/search/typeahead?q=la").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_redirects_to_provider() {
    let app = test_app();
    let response = send_request(&app, Method::GET, "/auth/facebook").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with("https://test-dialog/dialog/oauth"));
    assert!(location.contains("client_id=test-app"));
    assert!(location.contains("scope=email"));
}

#[tokio::test]
async fn test_stale_cookie_redirects_to_splash() {
    let app = test_app();

    let req = http::Request::builder()
        .method(Method::GET)
        .uri("/profile/me")
        .header(header::COOKIE, "epulo_session=deadbeef")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/splash");
}
