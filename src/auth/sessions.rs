use std::collections::HashMap;

use rand::Rng;
use tokio::sync::RwLock;

/// In-process session store: random session id -> session token (user id).
///
/// The cookie carries only the session id; the user id it maps to never
/// leaves the server.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, i64>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_id() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill(&mut bytes);
        hex::encode(bytes)
    }

    /// Create a session for a user and return its id.
    pub async fn create(&self, user_id: i64) -> String {
        let session_id = Self::mint_id();
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), user_id);
        session_id
    }

    pub async fn lookup(&self, session_id: &str) -> Option<i64> {
        self.sessions.read().await.get(session_id).copied()
    }

    /// Remove a session, returning the user id it belonged to.
    pub async fn remove(&self, session_id: &str) -> Option<i64> {
        self.sessions.write().await.remove(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = SessionStore::new();
        let sid = store.create(7).await;
        assert_eq!(store.lookup(&sid).await, Some(7));
    }

    #[tokio::test]
    async fn test_session_ids_are_unique() {
        let store = SessionStore::new();
        let a = store.create(1).await;
        let b = store.create(1).await;
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn test_remove_destroys_session() {
        let store = SessionStore::new();
        let sid = store.create(7).await;
        assert_eq!(store.remove(&sid).await, Some(7));
        assert_eq!(store.lookup(&sid).await, None);
        assert_eq!(store.remove(&sid).await, None);
    }

    #[tokio::test]
    async fn test_lookup_unknown_id() {
        let store = SessionStore::new();
        assert_eq!(store.lookup("deadbeef").await, None);
    }
}
