use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Suggestion {
    pub id: Uuid,
    pub box_id: Uuid,
    pub content: String,
    pub rating: Option<i16>,
    pub admin_rating: Option<i16>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub box_id: Uuid,
    pub content: String,
    pub rating: Option<i16>,
    pub is_anonymous: bool,
}
