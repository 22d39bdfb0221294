use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::bulletin::{Bulletin, NewBulletin};
use crate::models::item::{Item, NewItem};
use crate::models::message::Message;
use crate::models::user::{NewUser, ProfileUpdate, User};

/// SQLite-backed store for users and the marketplace tables.
pub struct Database {
    conn: Mutex<Connection>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Record already exists")]
    Conflict,
    #[error("Record not found")]
    NotFound,
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(6)?;
    Ok(User {
        id: row.get(0)?,
        facebook_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        location: row.get(5)?,
        created_at: parse_timestamp(&created_at),
    })
}

fn item_from_row(row: &Row) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        quantity: row.get(4)?,
    })
}

fn bulletin_from_row(row: &Row) -> rusqlite::Result<Bulletin> {
    let created_at: String = row.get(4)?;
    Ok(Bulletin {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        created_at: parse_timestamp(&created_at),
    })
}

fn message_from_row(row: &Row) -> rusqlite::Result<Message> {
    let created_at: String = row.get(4)?;
    Ok(Message {
        id: row.get(0)?,
        offerer_id: row.get(1)?,
        requester_id: row.get(2)?,
        item: row.get(3)?,
        created_at: parse_timestamp(&created_at),
    })
}

const USER_COLUMNS: &str = "id, facebook_id, first_name, last_name, email, location, created_at";

impl Database {
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        // Parse sqlite: prefix if present
        let path = if database_url.starts_with("sqlite:") {
            &database_url[7..]
        } else {
            database_url
        };

        // Create parent directories if needed
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
            }
        }

        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                facebook_id TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                email TEXT,
                location TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                quantity INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS bulletins (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                offerer_id INTEGER NOT NULL,
                requester_id INTEGER NOT NULL,
                item TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (offerer_id) REFERENCES users(id),
                FOREIGN KEY (requester_id) REFERENCES users(id)
            )",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_items_user_id ON items(user_id)",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_bulletins_user_id ON bulletins(user_id)",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_messages_offerer_id ON messages(offerer_id)",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_messages_requester_id ON messages(requester_id)",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!("Database initialized: {}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // --- users ---

    pub fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    pub fn find_user_by_facebook_id(&self, facebook_id: &str) -> Result<Option<User>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.query_row(
            &format!("SELECT {} FROM users WHERE facebook_id = ?1", USER_COLUMNS),
            params![facebook_id],
            user_from_row,
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Insert a new user. A duplicate facebook id yields `StoreError::Conflict`.
    pub fn create_user(&self, new_user: &NewUser) -> Result<User, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let now = Utc::now();

        conn.execute(
            "INSERT INTO users (facebook_id, first_name, last_name, email, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new_user.facebook_id,
                new_user.first_name,
                new_user.last_name,
                new_user.email,
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Conflict
            }
            e => StoreError::Database(e.to_string()),
        })?;

        Ok(User {
            id: conn.last_insert_rowid(),
            facebook_id: new_user.facebook_id.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            email: new_user.email.clone(),
            location: None,
            created_at: now,
        })
    }

    /// Apply a partial profile update and return the fresh record.
    pub fn update_user_profile(&self, id: i64, update: &ProfileUpdate) -> Result<User, StoreError> {
        {
            let conn = self
                .conn
                .lock()
                .map_err(|e| StoreError::Database(e.to_string()))?;

            let changed = conn
                .execute(
                    "UPDATE users SET
                        first_name = COALESCE(?1, first_name),
                        last_name = COALESCE(?2, last_name),
                        email = COALESCE(?3, email),
                        location = COALESCE(?4, location)
                     WHERE id = ?5",
                    params![
                        update.first_name,
                        update.last_name,
                        update.email,
                        update.location,
                        id,
                    ],
                )
                .map_err(|e| StoreError::Database(e.to_string()))?;

            if changed == 0 {
                return Err(StoreError::NotFound);
            }
        }

        self.find_user_by_id(id)?.ok_or(StoreError::NotFound)
    }

    // --- items ---

    pub fn items_for_user(&self, user_id: i64) -> Result<Vec<Item>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, name, description, quantity FROM items
                 WHERE user_id = ?1 ORDER BY id",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let items = stmt
            .query_map(params![user_id], item_from_row)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(items)
    }

    pub fn add_item(&self, user_id: i64, item: &NewItem) -> Result<Item, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "INSERT INTO items (user_id, name, description, quantity) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, item.name, item.description, item.quantity],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Item {
            id: conn.last_insert_rowid(),
            user_id,
            name: item.name.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
        })
    }

    pub fn update_item(
        &self,
        user_id: i64,
        item_id: i64,
        item: &NewItem,
    ) -> Result<Item, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let changed = conn
            .execute(
                "UPDATE items SET name = ?1, description = ?2, quantity = ?3
                 WHERE id = ?4 AND user_id = ?5",
                params![item.name, item.description, item.quantity, item_id, user_id],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(Item {
            id: item_id,
            user_id,
            name: item.name.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
        })
    }

    pub fn delete_item(&self, user_id: i64, item_id: i64) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let changed = conn
            .execute(
                "DELETE FROM items WHERE id = ?1 AND user_id = ?2",
                params![item_id, user_id],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    /// Replace the user's whole inventory with the given items, atomically.
    pub fn replace_inventory(
        &self,
        user_id: i64,
        items: &[NewItem],
    ) -> Result<Vec<Item>, StoreError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tx.execute("DELETE FROM items WHERE user_id = ?1", params![user_id])
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            tx.execute(
                "INSERT INTO items (user_id, name, description, quantity) VALUES (?1, ?2, ?3, ?4)",
                params![user_id, item.name, item.description, item.quantity],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

            created.push(Item {
                id: tx.last_insert_rowid(),
                user_id,
                name: item.name.clone(),
                description: item.description.clone(),
                quantity: item.quantity,
            });
        }

        tx.commit().map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(created)
    }

    pub fn search_items(&self, query: &str) -> Result<Vec<Item>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, name, description, quantity FROM items
                 WHERE name LIKE ?1 ORDER BY name",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let pattern = format!("%{}%", query);
        let items = stmt
            .query_map(params![pattern], item_from_row)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(items)
    }

    /// Distinct item names starting with the given prefix, for typeahead.
    pub fn item_names(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT DISTINCT name FROM items WHERE name LIKE ?1 ORDER BY name LIMIT ?2",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let pattern = format!("{}%", prefix);
        let names = stmt
            .query_map(params![pattern, limit as i64], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(names)
    }

    // --- bulletins ---

    pub fn list_bulletins(&self) -> Result<Vec<Bulletin>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, title, body, created_at FROM bulletins
                 ORDER BY created_at DESC",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let bulletins = stmt
            .query_map([], bulletin_from_row)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(bulletins)
    }

    pub fn bulletins_for_user(&self, user_id: i64) -> Result<Vec<Bulletin>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, title, body, created_at FROM bulletins
                 WHERE user_id = ?1 ORDER BY created_at DESC",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let bulletins = stmt
            .query_map(params![user_id], bulletin_from_row)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(bulletins)
    }

    pub fn get_bulletin(&self, id: i64) -> Result<Option<Bulletin>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.query_row(
            "SELECT id, user_id, title, body, created_at FROM bulletins WHERE id = ?1",
            params![id],
            bulletin_from_row,
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    pub fn create_bulletin(
        &self,
        user_id: i64,
        bulletin: &NewBulletin,
    ) -> Result<Bulletin, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let now = Utc::now();

        conn.execute(
            "INSERT INTO bulletins (user_id, title, body, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, bulletin.title, bulletin.body, now.to_rfc3339()],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Bulletin {
            id: conn.last_insert_rowid(),
            user_id,
            title: bulletin.title.clone(),
            body: bulletin.body.clone(),
            created_at: now,
        })
    }

    /// Edit a bulletin; only the owner's rows match, so a non-owner gets
    /// `StoreError::NotFound` and nothing changes.
    pub fn update_bulletin(
        &self,
        user_id: i64,
        id: i64,
        bulletin: &NewBulletin,
    ) -> Result<Bulletin, StoreError> {
        {
            let conn = self
                .conn
                .lock()
                .map_err(|e| StoreError::Database(e.to_string()))?;

            let changed = conn
                .execute(
                    "UPDATE bulletins SET title = ?1, body = ?2 WHERE id = ?3 AND user_id = ?4",
                    params![bulletin.title, bulletin.body, id, user_id],
                )
                .map_err(|e| StoreError::Database(e.to_string()))?;

            if changed == 0 {
                return Err(StoreError::NotFound);
            }
        }

        self.get_bulletin(id)?.ok_or(StoreError::NotFound)
    }

    pub fn delete_bulletin(&self, user_id: i64, id: i64) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let changed = conn
            .execute(
                "DELETE FROM bulletins WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    // --- messages ---

    pub fn record_message(&self, message: &Message) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "INSERT INTO messages (id, offerer_id, requester_id, item, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.id,
                message.offerer_id,
                message.requester_id,
                message.item,
                message.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!("Recorded message: {}", message.id);
        Ok(())
    }

    pub fn messages_for_user(&self, user_id: i64) -> Result<Vec<Message>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, offerer_id, requester_id, item, created_at FROM messages
                 WHERE offerer_id = ?1 OR requester_id = ?1 ORDER BY created_at DESC",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let messages = stmt
            .query_map(params![user_id], message_from_row)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::new(":memory:").unwrap()
    }

    fn ann() -> NewUser {
        NewUser {
            facebook_id: "fb123".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Archer".to_string(),
            email: Some("ann@x.com".to_string()),
        }
    }

    #[test]
    fn test_create_and_find_user() {
        let db = test_db();
        let user = db.create_user(&ann()).unwrap();
        assert!(user.id > 0);

        let by_id = db.find_user_by_id(user.id).unwrap().unwrap();
        assert_eq!(by_id.facebook_id, "fb123");
        assert_eq!(by_id.first_name, "Ann");
        assert_eq!(by_id.email, Some("ann@x.com".to_string()));

        let by_fb = db.find_user_by_facebook_id("fb123").unwrap().unwrap();
        assert_eq!(by_fb.id, user.id);
    }

    #[test]
    fn test_find_missing_user_returns_none() {
        let db = test_db();
        assert!(db.find_user_by_id(42).unwrap().is_none());
        assert!(db.find_user_by_facebook_id("nobody").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_facebook_id_is_conflict() {
        let db = test_db();
        db.create_user(&ann()).unwrap();
        let err = db.create_user(&ann()).unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }

    #[test]
    fn test_update_user_profile_partial() {
        let db = test_db();
        let user = db.create_user(&ann()).unwrap();

        let updated = db
            .update_user_profile(
                user.id,
                &ProfileUpdate {
                    location: Some("Berlin".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.first_name, "Ann");
        assert_eq!(updated.location, Some("Berlin".to_string()));
    }

    #[test]
    fn test_update_missing_user_is_not_found() {
        let db = test_db();
        let err = db
            .update_user_profile(999, &ProfileUpdate::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn test_item_crud_scoped_to_owner() {
        let db = test_db();
        let owner = db.create_user(&ann()).unwrap();
        let other = db
            .create_user(&NewUser {
                facebook_id: "fb456".to_string(),
                first_name: "Bob".to_string(),
                last_name: "Baker".to_string(),
                email: None,
            })
            .unwrap();

        let item = db
            .add_item(
                owner.id,
                &NewItem {
                    name: "toaster".to_string(),
                    description: None,
                    quantity: 1,
                },
            )
            .unwrap();

        // Another user cannot edit or delete it
        let err = db
            .update_item(
                other.id,
                item.id,
                &NewItem {
                    name: "stolen".to_string(),
                    description: None,
                    quantity: 1,
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(matches!(
            db.delete_item(other.id, item.id).unwrap_err(),
            StoreError::NotFound
        ));

        // The owner can
        let edited = db
            .update_item(
                owner.id,
                item.id,
                &NewItem {
                    name: "toaster oven".to_string(),
                    description: Some("barely used".to_string()),
                    quantity: 2,
                },
            )
            .unwrap();
        assert_eq!(edited.name, "toaster oven");
        assert_eq!(edited.quantity, 2);

        db.delete_item(owner.id, item.id).unwrap();
        assert!(db.items_for_user(owner.id).unwrap().is_empty());
    }

    #[test]
    fn test_replace_inventory() {
        let db = test_db();
        let user = db.create_user(&ann()).unwrap();

        db.add_item(
            user.id,
            &NewItem {
                name: "old thing".to_string(),
                description: None,
                quantity: 1,
            },
        )
        .unwrap();

        let created = db
            .replace_inventory(
                user.id,
                &[
                    NewItem {
                        name: "ladder".to_string(),
                        description: None,
                        quantity: 1,
                    },
                    NewItem {
                        name: "drill".to_string(),
                        description: Some("cordless".to_string()),
                        quantity: 3,
                    },
                ],
            )
            .unwrap();
        assert_eq!(created.len(), 2);

        let items = db.items_for_user(user.id).unwrap();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["ladder", "drill"]);
    }

    #[test]
    fn test_search_and_typeahead() {
        let db = test_db();
        let user = db.create_user(&ann()).unwrap();
        for name in ["ladder", "lawnmower", "drill"] {
            db.add_item(
                user.id,
                &NewItem {
                    name: name.to_string(),
                    description: None,
                    quantity: 1,
                },
            )
            .unwrap();
        }

        let hits = db.search_items("la").unwrap();
        assert_eq!(hits.len(), 2);

        let names = db.item_names("la", 10).unwrap();
        assert_eq!(names, vec!["ladder".to_string(), "lawnmower".to_string()]);
    }

    #[test]
    fn test_bulletin_crud_scoped_to_owner() {
        let db = test_db();
        let owner = db.create_user(&ann()).unwrap();
        let other = db
            .create_user(&NewUser {
                facebook_id: "fb456".to_string(),
                first_name: "Bob".to_string(),
                last_name: "Baker".to_string(),
                email: None,
            })
            .unwrap();

        let bulletin = db
            .create_bulletin(
                owner.id,
                &NewBulletin {
                    title: "Free mulch".to_string(),
                    body: "Come get it".to_string(),
                },
            )
            .unwrap();

        assert_eq!(db.list_bulletins().unwrap().len(), 1);
        assert_eq!(db.bulletins_for_user(owner.id).unwrap().len(), 1);
        assert!(db.bulletins_for_user(other.id).unwrap().is_empty());

        let err = db
            .update_bulletin(
                other.id,
                bulletin.id,
                &NewBulletin {
                    title: "hijacked".to_string(),
                    body: String::new(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        let unchanged = db.get_bulletin(bulletin.id).unwrap().unwrap();
        assert_eq!(unchanged.title, "Free mulch");

        db.delete_bulletin(owner.id, bulletin.id).unwrap();
        assert!(db.get_bulletin(bulletin.id).unwrap().is_none());
    }

    #[test]
    fn test_messages_for_either_side() {
        let db = test_db();
        let a = db.create_user(&ann()).unwrap();
        let b = db
            .create_user(&NewUser {
                facebook_id: "fb456".to_string(),
                first_name: "Bob".to_string(),
                last_name: "Baker".to_string(),
                email: None,
            })
            .unwrap();

        let offer = Message::new(a.id, b.id, "toaster".to_string());
        db.record_message(&offer).unwrap();

        assert_eq!(db.messages_for_user(a.id).unwrap().len(), 1);
        assert_eq!(db.messages_for_user(b.id).unwrap().len(), 1);
        assert!(db.messages_for_user(999).unwrap().is_empty());
    }
}
