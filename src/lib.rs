pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod mailer;
pub mod models;
pub mod routes;
pub mod test_util;

pub use auth::{
    AuthError, CurrentUser, FacebookClient, FacebookProfile, IdentityManager, LoginOutcome,
    SessionStore,
};
pub use config::Config;
pub use db::{Database, StoreError};
pub use mailer::{MailerClient, OutgoingEmail};
pub use models::user::User;

use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub facebook: FacebookClient,
    pub db: Arc<Database>,
    pub identity: IdentityManager,
    pub sessions: SessionStore,
    pub mailer: MailerClient,
}
