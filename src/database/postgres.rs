use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{Account, BoxChanges, NewAccount, NewBox, NewSuggestion, Suggestion, SuggestionBox};
use super::store::Store;

const BOX_COLUMNS: &str = "id, owner_id, title, description, color, created_at";
const SUGGESTION_COLUMNS: &str = "id, box_id, content, rating, admin_rating, is_anonymous, created_at";
const ACCOUNT_COLUMNS: &str = "id, email, name, password_hash, created_at";

/// PostgreSQL-backed [`Store`]
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_box(&self, new: NewBox) -> Result<SuggestionBox, DatabaseError> {
        let sql = format!(
            "INSERT INTO suggestion_boxes (id, owner_id, title, description, color) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {BOX_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SuggestionBox>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.owner_id)
            .bind(&new.title)
            .bind(&new.description)
            .bind(&new.color)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_box(&self, id: Uuid) -> Result<Option<SuggestionBox>, DatabaseError> {
        let sql = format!("SELECT {BOX_COLUMNS} FROM suggestion_boxes WHERE id = $1");
        let row = sqlx::query_as::<_, SuggestionBox>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_boxes_by_owner(&self, owner_id: Uuid) -> Result<Vec<SuggestionBox>, DatabaseError> {
        let sql = format!(
            "SELECT {BOX_COLUMNS} FROM suggestion_boxes WHERE owner_id = $1 ORDER BY created_at DESC, id"
        );
        let rows = sqlx::query_as::<_, SuggestionBox>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_box(&self, id: Uuid, changes: BoxChanges) -> Result<Option<SuggestionBox>, DatabaseError> {
        let sql = format!(
            "UPDATE suggestion_boxes SET title = $2, description = $3, color = $4 \
             WHERE id = $1 RETURNING {BOX_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SuggestionBox>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(&changes.color)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_box(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM suggestion_boxes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_suggestion(&self, new: NewSuggestion) -> Result<Suggestion, DatabaseError> {
        let sql = format!(
            "INSERT INTO suggestions (id, box_id, content, rating, is_anonymous) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {SUGGESTION_COLUMNS}"
        );
        sqlx::query_as::<_, Suggestion>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.box_id)
            .bind(&new.content)
            .bind(new.rating)
            .bind(new.is_anonymous)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    DatabaseError::MissingParent(new.box_id)
                }
                other => DatabaseError::Sqlx(other),
            })
    }

    async fn get_suggestion(&self, id: Uuid) -> Result<Option<Suggestion>, DatabaseError> {
        let sql = format!("SELECT {SUGGESTION_COLUMNS} FROM suggestions WHERE id = $1");
        let row = sqlx::query_as::<_, Suggestion>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_suggestions(&self, box_id: Uuid) -> Result<Vec<Suggestion>, DatabaseError> {
        let sql = format!(
            "SELECT {SUGGESTION_COLUMNS} FROM suggestions WHERE box_id = $1 ORDER BY created_at DESC, id"
        );
        let rows = sqlx::query_as::<_, Suggestion>(&sql)
            .bind(box_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn set_admin_rating(&self, id: Uuid, rating: i16) -> Result<Option<Suggestion>, DatabaseError> {
        let sql = format!(
            "UPDATE suggestions SET admin_rating = $2 WHERE id = $1 RETURNING {SUGGESTION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Suggestion>(&sql)
            .bind(id)
            .bind(rating)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_account(&self, new: NewAccount) -> Result<Account, DatabaseError> {
        let sql = format!(
            "INSERT INTO accounts (id, email, name, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {ACCOUNT_COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new.email)
            .bind(&new.name)
            .bind(&new.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DatabaseError::Conflict(format!("account {} already exists", new.email))
                }
                other => DatabaseError::Sqlx(other),
            })
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1");
        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
