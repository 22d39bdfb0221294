use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded offer or request between two users.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: String,
    pub offerer_id: i64,
    pub requester_id: i64,
    pub item: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(offerer_id: i64, requester_id: i64, item: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            offerer_id,
            requester_id,
            item,
            created_at: Utc::now(),
        }
    }
}

/// Incoming message payload from the compose flow.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMessage {
    pub offerer_id: i64,
    pub requester_id: i64,
    pub item: String,
}
