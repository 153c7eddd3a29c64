use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Account, BoxChanges, NewAccount, NewBox, NewSuggestion, Suggestion, SuggestionBox};
use super::store::Store;

#[derive(Default)]
struct Tables {
    boxes: HashMap<Uuid, SuggestionBox>,
    suggestions: HashMap<Uuid, Suggestion>,
    accounts: HashMap<Uuid, Account>,
}

/// In-process [`Store`] with the same constraints as the PostgreSQL schema:
/// suggestions need an existing box, box deletion cascades, emails are unique.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_box(&self, new: NewBox) -> Result<SuggestionBox, DatabaseError> {
        let row = SuggestionBox {
            id: Uuid::new_v4(),
            owner_id: new.owner_id,
            title: new.title,
            description: new.description,
            color: new.color,
            created_at: Utc::now(),
        };
        self.tables.write().await.boxes.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_box(&self, id: Uuid) -> Result<Option<SuggestionBox>, DatabaseError> {
        Ok(self.tables.read().await.boxes.get(&id).cloned())
    }

    async fn list_boxes_by_owner(&self, owner_id: Uuid) -> Result<Vec<SuggestionBox>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<SuggestionBox> = tables
            .boxes
            .values()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn update_box(&self, id: Uuid, changes: BoxChanges) -> Result<Option<SuggestionBox>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.boxes.get_mut(&id).map(|row| {
            row.apply(changes);
            row.clone()
        }))
    }

    async fn delete_box(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.boxes.remove(&id).is_none() {
            return Ok(false);
        }
        tables.suggestions.retain(|_, s| s.box_id != id);
        Ok(true)
    }

    async fn insert_suggestion(&self, new: NewSuggestion) -> Result<Suggestion, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.boxes.contains_key(&new.box_id) {
            return Err(DatabaseError::MissingParent(new.box_id));
        }
        let row = Suggestion {
            id: Uuid::new_v4(),
            box_id: new.box_id,
            content: new.content,
            rating: new.rating,
            admin_rating: None,
            is_anonymous: new.is_anonymous,
            created_at: Utc::now(),
        };
        tables.suggestions.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_suggestion(&self, id: Uuid) -> Result<Option<Suggestion>, DatabaseError> {
        Ok(self.tables.read().await.suggestions.get(&id).cloned())
    }

    async fn list_suggestions(&self, box_id: Uuid) -> Result<Vec<Suggestion>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Suggestion> = tables
            .suggestions
            .values()
            .filter(|s| s.box_id == box_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn set_admin_rating(&self, id: Uuid, rating: i16) -> Result<Option<Suggestion>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.suggestions.get_mut(&id).map(|row| {
            row.admin_rating = Some(rating);
            row.clone()
        }))
    }

    async fn insert_account(&self, new: NewAccount) -> Result<Account, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.values().any(|a| a.email == new.email) {
            return Err(DatabaseError::Conflict(format!("account {} already exists", new.email)));
        }
        let row = Account {
            id: Uuid::new_v4(),
            email: new.email,
            name: new.name,
            password_hash: new.password_hash,
            created_at: Utc::now(),
        };
        tables.accounts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
