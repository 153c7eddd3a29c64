use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Color given to boxes created without one.
pub const DEFAULT_BOX_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SuggestionBox {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for inserting a box. `owner_id` always comes from the
/// authenticated actor.
#[derive(Debug, Clone)]
pub struct NewBox {
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub color: String,
}

/// Full replacement of the mutable box fields.
#[derive(Debug, Clone)]
pub struct BoxChanges {
    pub title: String,
    pub description: String,
    pub color: String,
}

impl SuggestionBox {
    pub fn apply(&mut self, changes: BoxChanges) {
        self.title = changes.title;
        self.description = changes.description;
        self.color = changes.color;
    }
}
