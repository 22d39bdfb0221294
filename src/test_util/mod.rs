pub mod mock_facebook;

use std::sync::Arc;

use crate::auth::{FacebookClient, FacebookProfile, IdentityManager, SessionStore};
use crate::config::{
    Config, CorsConfig, DatabaseConfig, FacebookConfig, LoggingConfig, MailerConfig, ServerConfig,
    SessionConfig,
};
use crate::db::Database;
use crate::mailer::MailerClient;
use crate::models::user::User;
use crate::AppState;

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: "./public".to_string(),
        },
        facebook: FacebookConfig {
            app_id: "test-app".to_string(),
            app_secret: "test-secret".to_string(),
            callback_url: "http://localhost:5000/auth/facebook/callback".to_string(),
            dialog_url: "https://test-dialog/dialog/oauth".to_string(),
            graph_url: "https://test-graph".to_string(),
            timeout_secs: 5,
        },
        session: SessionConfig {
            refresh_profile_on_login: false,
            cache_ttl_secs: 60,
        },
        database: DatabaseConfig {
            url: ":memory:".to_string(),
        },
        mailer: MailerConfig {
            base_url: "http://localhost:8025".to_string(),
            timeout_secs: 5,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        cors: CorsConfig {
            origins: "*".to_string(),
        },
    }
}

/// Build an `AppState` against an in-memory database.
pub fn create_test_state(config: Config) -> AppState {
    let facebook = FacebookClient::new(&config.facebook).unwrap();
    let db = Arc::new(Database::new(&config.database.url).unwrap());
    let identity = IdentityManager::new(db.clone(), &config.session);
    let sessions = SessionStore::new();
    let mailer = MailerClient::new(&config.mailer).unwrap();

    AppState {
        config,
        facebook,
        db,
        identity,
        sessions,
        mailer,
    }
}

pub fn test_profile(facebook_id: &str, first_name: &str, email: Option<&str>) -> FacebookProfile {
    FacebookProfile {
        id: facebook_id.to_string(),
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        email: email.map(String::from),
    }
}

/// Log a user in directly (no OAuth dance) and return it with a ready-made
/// `Cookie` header value.
pub async fn login_test_user(state: &AppState, profile: &FacebookProfile) -> (User, String) {
    let outcome = state.identity.on_external_login(profile).await.unwrap();
    let token = state.identity.session_token(&outcome.user);
    let session_id = state.sessions.create(token).await;
    let cookie = format!("{}={}", crate::auth::SESSION_COOKIE, session_id);
    (outcome.user, cookie)
}
