use serde::{Deserialize, Serialize};

/// An item in a user's inventory.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
}

/// Incoming item payload for inventory setup, add and edit.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}
