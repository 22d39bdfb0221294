use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record created on first Facebook login.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Internal id assigned by the database at creation.
    pub id: i64,
    /// Facebook profile id, unique and immutable once set.
    pub facebook_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Email from the Facebook profile, if the user granted the scope.
    pub email: Option<String>,
    /// Free-form location, filled in by the user later.
    pub location: Option<String>,
    /// When the user first authenticated.
    pub created_at: DateTime<Utc>,
}

/// Fields persisted when provisioning a new user from a provider profile.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub facebook_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

/// Partial profile update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
}
