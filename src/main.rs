use std::sync::Arc;

use axum::middleware;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use epulo_backend::auth::{FacebookClient, IdentityManager, SessionStore};
use epulo_backend::config::Config;
use epulo_backend::db::Database;
use epulo_backend::mailer::MailerClient;
use epulo_backend::{logging, routes, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize tracing
    logging::init(&config.logging);

    tracing::info!("Starting Epulo backend");

    // Initialize components
    let facebook = FacebookClient::new(&config.facebook)?;
    let db = Arc::new(Database::new(&config.database.url)?);
    let identity = IdentityManager::new(db.clone(), &config.session);
    let sessions = SessionStore::new();
    let mailer = MailerClient::new(&config.mailer)?;

    let static_dir = config.server.static_dir.clone();
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = Arc::new(AppState {
        config,
        facebook,
        db,
        identity,
        sessions,
        mailer,
    });

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router; static assets are served ungated
    let app = routes::app_router(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logger));

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
