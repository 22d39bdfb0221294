//! Bridges a one-shot Facebook identity assertion and a multi-request session
//! to a stable local user: find-or-create on login, minimal token in the
//! session, full record rehydrated (and cached) on every request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::auth::facebook::FacebookProfile;
use crate::config::SessionConfig;
use crate::db::{Database, StoreError};
use crate::models::user::{NewUser, ProfileUpdate, User};

/// Result of a login: the resolved user, and whether this login created it.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub was_created: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Unknown user id: {0}")]
    UnknownUser(i64),
}

struct CacheEntry {
    user: User,
    cached_at: Instant,
}

/// Session identity manager: provisioning, token marshalling, rehydration.
pub struct IdentityManager {
    db: Arc<Database>,
    refresh_profile_on_login: bool,
    cache_ttl: Duration,
    cache: RwLock<HashMap<i64, CacheEntry>>,
}

impl IdentityManager {
    pub fn new(db: Arc<Database>, config: &SessionConfig) -> Self {
        Self {
            db,
            refresh_profile_on_login: config.refresh_profile_on_login,
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a verified external identity to a local user, creating one on
    /// first login.
    ///
    /// Find and create are separate critical sections, so two first logins
    /// for the same identity can interleave; the UNIQUE facebook id column
    /// turns the loser's insert into a conflict, which is re-read as "found".
    pub async fn on_external_login(
        &self,
        profile: &FacebookProfile,
    ) -> Result<LoginOutcome, AuthError> {
        let existing = self
            .db
            .find_user_by_facebook_id(&profile.id)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        if let Some(user) = existing {
            if self.refresh_profile_on_login {
                let user = self
                    .db
                    .update_user_profile(
                        user.id,
                        &ProfileUpdate {
                            first_name: Some(profile.first_name.clone()),
                            last_name: Some(profile.last_name.clone()),
                            email: profile.email.clone(),
                            location: None,
                        },
                    )
                    .map_err(|e| AuthError::Storage(e.to_string()))?;
                self.invalidate(user.id).await;
                return Ok(LoginOutcome {
                    user,
                    was_created: false,
                });
            }
            return Ok(LoginOutcome {
                user,
                was_created: false,
            });
        }

        match self.db.create_user(&NewUser {
            facebook_id: profile.id.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
        }) {
            Ok(user) => {
                tracing::info!("Provisioned user {} for facebook id {}", user.id, profile.id);
                Ok(LoginOutcome {
                    user,
                    was_created: true,
                })
            }
            Err(StoreError::Conflict) => {
                // Lost a concurrent first-login race; the row exists now.
                let user = self
                    .db
                    .find_user_by_facebook_id(&profile.id)
                    .map_err(|e| AuthError::Storage(e.to_string()))?
                    .ok_or_else(|| {
                        AuthError::Storage("user missing after insert conflict".to_string())
                    })?;
                Ok(LoginOutcome {
                    user,
                    was_created: false,
                })
            }
            Err(e) => Err(AuthError::Storage(e.to_string())),
        }
    }

    /// The durable session token for a user: its internal id. No I/O.
    pub fn session_token(&self, user: &User) -> i64 {
        user.id
    }

    /// Rehydrate the full user record for a stored token.
    ///
    /// Served from the TTL cache when fresh; otherwise a directory lookup,
    /// retried once on a storage error so a transient blip does not force a
    /// re-login.
    pub async fn resolve(&self, user_id: i64) -> Result<User, AuthError> {
        if !self.cache_ttl.is_zero() {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&user_id) {
                if entry.cached_at.elapsed() < self.cache_ttl {
                    return Ok(entry.user.clone());
                }
            }
        }

        let found = match self.db.find_user_by_id(user_id) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("User lookup failed, retrying once: {}", e);
                self.db
                    .find_user_by_id(user_id)
                    .map_err(|e| AuthError::Storage(e.to_string()))?
            }
        };

        let user = found.ok_or(AuthError::UnknownUser(user_id))?;

        if !self.cache_ttl.is_zero() {
            let mut cache = self.cache.write().await;
            cache.insert(
                user_id,
                CacheEntry {
                    user: user.clone(),
                    cached_at: Instant::now(),
                },
            );
        }

        Ok(user)
    }

    /// Evict a user from the rehydration cache (logout, profile change).
    pub async fn invalidate(&self, user_id: i64) {
        self.cache.write().await.remove(&user_id);
    }
}
