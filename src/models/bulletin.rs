use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bulletin posted to the shared board.
#[derive(Debug, Clone, Serialize)]
pub struct Bulletin {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Incoming bulletin payload for create and edit.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBulletin {
    pub title: String,
    #[serde(default)]
    pub body: String,
}
