use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Account, BoxChanges, NewAccount, NewBox, NewSuggestion, Suggestion, SuggestionBox};

/// Row store behind the service layer.
///
/// Lookups are by primary key, by box owner and by suggestion box. Lists come
/// back newest first. Deleting a box removes its suggestions in the same
/// operation.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_box(&self, new: NewBox) -> Result<SuggestionBox, DatabaseError>;

    async fn get_box(&self, id: Uuid) -> Result<Option<SuggestionBox>, DatabaseError>;

    async fn list_boxes_by_owner(&self, owner_id: Uuid) -> Result<Vec<SuggestionBox>, DatabaseError>;

    /// Returns `None` when the box no longer exists.
    async fn update_box(&self, id: Uuid, changes: BoxChanges) -> Result<Option<SuggestionBox>, DatabaseError>;

    /// Returns whether a row was removed.
    async fn delete_box(&self, id: Uuid) -> Result<bool, DatabaseError>;

    /// Fails with [`DatabaseError::MissingParent`] when `box_id` does not exist.
    async fn insert_suggestion(&self, new: NewSuggestion) -> Result<Suggestion, DatabaseError>;

    async fn get_suggestion(&self, id: Uuid) -> Result<Option<Suggestion>, DatabaseError>;

    async fn list_suggestions(&self, box_id: Uuid) -> Result<Vec<Suggestion>, DatabaseError>;

    async fn set_admin_rating(&self, id: Uuid, rating: i16) -> Result<Option<Suggestion>, DatabaseError>;

    /// Fails with [`DatabaseError::Conflict`] when the email is taken.
    async fn insert_account(&self, new: NewAccount) -> Result<Account, DatabaseError>;

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
