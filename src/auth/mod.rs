pub mod facebook;
pub mod gate;
pub mod identity;
pub mod sessions;

pub use facebook::{FacebookClient, FacebookProfile, ProviderError};
pub use gate::{require_login, CurrentUser, LANDING_ROUTE, SESSION_COOKIE};
pub use identity::{AuthError, IdentityManager, LoginOutcome};
pub use sessions::SessionStore;
