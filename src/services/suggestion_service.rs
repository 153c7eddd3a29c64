use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::access::{self, Actor, Operation};
use crate::database::models::{NewSuggestion, Suggestion, SuggestionBox};
use crate::database::{DatabaseError, Store};

use super::export::CsvExport;
use super::{non_blank, ServiceError, BOX_NOT_FOUND, SUGGESTION_NOT_FOUND};

/// Public submission as sent by the form on the submission page.
#[derive(Debug, Clone, Default)]
pub struct SubmissionInput {
    pub box_id: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i64>,
}

#[derive(Clone)]
pub struct SuggestionService {
    store: Arc<dyn Store>,
}

impl SuggestionService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Store an anonymous suggestion against an existing box.
    pub async fn submit(&self, actor: &Actor, input: SubmissionInput) -> Result<Suggestion, ServiceError> {
        let (box_id, content) = match (non_blank(input.box_id), non_blank(input.content)) {
            (Some(box_id), Some(content)) => (box_id, content),
            _ => {
                return Err(ServiceError::InvalidInput(
                    "Box ID and content are required".to_string(),
                ))
            }
        };
        let rating = match input.rating {
            None => None,
            Some(r) if access::is_valid_rating(r) => Some(r as i16),
            Some(_) => {
                return Err(ServiceError::InvalidInput(
                    "Rating must be between 1 and 5".to_string(),
                ))
            }
        };

        let box_id = Uuid::parse_str(box_id.trim()).ok();
        let target = self.load_box(box_id).await?;
        access::authorize(actor, &Operation::CreateSuggestion, target.as_ref())
            .into_result()
            .map_err(|reason| ServiceError::denied(reason, BOX_NOT_FOUND))?;
        let target = target.ok_or_else(|| ServiceError::NotFound(BOX_NOT_FOUND.to_string()))?;

        let created = self
            .store
            .insert_suggestion(NewSuggestion {
                box_id: target.id,
                content,
                rating,
                is_anonymous: true,
            })
            .await
            .map_err(|e| match e {
                // Box deleted between the lookup and the insert.
                DatabaseError::MissingParent(_) => ServiceError::NotFound(BOX_NOT_FOUND.to_string()),
                other => ServiceError::Store(other),
            })?;

        debug!("Stored suggestion {} in box {}", created.id, created.box_id);
        Ok(created)
    }

    pub async fn list_for_box(&self, actor: &Actor, box_id: Option<Uuid>) -> Result<Vec<Suggestion>, ServiceError> {
        let target = self.load_owned(actor, &Operation::ListSuggestions, box_id).await?;
        Ok(self.store.list_suggestions(target.id).await?)
    }

    /// Set the owner's 1-5 rating on a suggestion.
    pub async fn rate(
        &self,
        actor: &Actor,
        suggestion_id: Option<Uuid>,
        rating: Option<i64>,
    ) -> Result<Suggestion, ServiceError> {
        // A missing rating is reported the same way as an out-of-range one.
        let operation = Operation::RateSuggestion { rating: rating.unwrap_or(0) };
        access::precheck(actor, &operation)
            .into_result()
            .map_err(|reason| ServiceError::denied(reason, SUGGESTION_NOT_FOUND))?;

        let suggestion = match suggestion_id {
            Some(id) => self.store.get_suggestion(id).await?,
            None => None,
        }
        .ok_or_else(|| ServiceError::NotFound(SUGGESTION_NOT_FOUND.to_string()))?;

        let target = self.load_owned(actor, &operation, Some(suggestion.box_id)).await?;
        let rating = rating.unwrap_or_default() as i16;

        let updated = self
            .store
            .set_admin_rating(suggestion.id, rating)
            .await?
            .ok_or_else(|| ServiceError::NotFound(SUGGESTION_NOT_FOUND.to_string()))?;

        info!("Rated suggestion {} in box {} as {}", updated.id, target.id, rating);
        Ok(updated)
    }

    pub async fn export_csv(&self, actor: &Actor, box_id: Option<Uuid>) -> Result<CsvExport, ServiceError> {
        let target = self.load_owned(actor, &Operation::ExportCsv, box_id).await?;
        let suggestions = self.store.list_suggestions(target.id).await?;
        info!("Exporting {} suggestions from box {}", suggestions.len(), target.id);
        Ok(CsvExport::render(target.id, &suggestions))
    }

    async fn load_box(&self, id: Option<Uuid>) -> Result<Option<SuggestionBox>, ServiceError> {
        match id {
            Some(id) => Ok(self.store.get_box(id).await?),
            None => Ok(None),
        }
    }

    /// Identity check first, then a fresh lookup of the box and its owner.
    async fn load_owned(
        &self,
        actor: &Actor,
        operation: &Operation,
        box_id: Option<Uuid>,
    ) -> Result<SuggestionBox, ServiceError> {
        access::precheck(actor, operation)
            .into_result()
            .map_err(|reason| ServiceError::denied(reason, BOX_NOT_FOUND))?;

        let target = self.load_box(box_id).await?;
        if let Err(reason) = access::authorize(actor, operation, target.as_ref()).into_result() {
            warn!("Denied {:?} on box {:?} for {:?}: {:?}", operation, box_id, actor, reason);
            return Err(ServiceError::denied(reason, BOX_NOT_FOUND));
        }
        target.ok_or_else(|| ServiceError::NotFound(BOX_NOT_FOUND.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewBox;
    use crate::database::MemoryStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        svc: SuggestionService,
        owner: Actor,
        target: SuggestionBox,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let owner_id = Uuid::new_v4();
        let target = store
            .insert_box(NewBox {
                owner_id,
                title: "Feedback".into(),
                description: String::new(),
                color: "#3B82F6".into(),
            })
            .await
            .unwrap();
        Fixture {
            svc: SuggestionService::new(store.clone()),
            store,
            owner: Actor::Administrator { id: owner_id },
            target,
        }
    }

    fn submission(box_id: Uuid, content: &str, rating: Option<i64>) -> SubmissionInput {
        SubmissionInput {
            box_id: Some(box_id.to_string()),
            content: Some(content.to_string()),
            rating,
        }
    }

    #[tokio::test]
    async fn public_submission_is_anonymous_and_unrated_by_admin() {
        let f = fixture().await;
        let s = f
            .svc
            .submit(&Actor::Anonymous, submission(f.target.id, "Great app", Some(5)))
            .await
            .unwrap();
        assert!(s.is_anonymous);
        assert_eq!(s.rating, Some(5));
        assert_eq!(s.admin_rating, None);
        assert_eq!(s.box_id, f.target.id);

        // Administrators submitting through the public form are still anonymous.
        let s = f.svc.submit(&f.owner, submission(f.target.id, "Me too", None)).await.unwrap();
        assert!(s.is_anonymous);
        assert_eq!(s.rating, None);
    }

    #[tokio::test]
    async fn submission_validation() {
        let f = fixture().await;
        for input in [
            SubmissionInput::default(),
            SubmissionInput { content: Some("no box".into()), ..Default::default() },
            submission(f.target.id, "  ", None),
        ] {
            assert!(matches!(
                f.svc.submit(&Actor::Anonymous, input).await,
                Err(ServiceError::InvalidInput(msg)) if msg == "Box ID and content are required"
            ));
        }
        for rating in [0, 6] {
            assert!(matches!(
                f.svc.submit(&Actor::Anonymous, submission(f.target.id, "x", Some(rating))).await,
                Err(ServiceError::InvalidInput(_))
            ));
        }
    }

    #[tokio::test]
    async fn submission_to_missing_box_is_not_found() {
        let f = fixture().await;
        assert!(matches!(
            f.svc.submit(&Actor::Anonymous, submission(Uuid::new_v4(), "hello", None)).await,
            Err(ServiceError::NotFound(_))
        ));
        let garbage = SubmissionInput {
            box_id: Some("not-a-uuid".into()),
            content: Some("hello".into()),
            rating: None,
        };
        assert!(matches!(
            f.svc.submit(&Actor::Anonymous, garbage).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn listing_is_owner_only_and_newest_first() {
        let f = fixture().await;
        let first = f.svc.submit(&Actor::Anonymous, submission(f.target.id, "first", None)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = f.svc.submit(&Actor::Anonymous, submission(f.target.id, "second", None)).await.unwrap();

        let listed = f.svc.list_for_box(&f.owner, Some(f.target.id)).await.unwrap();
        assert_eq!(listed.iter().map(|s| s.id).collect::<Vec<_>>(), vec![second.id, first.id]);

        let other = Actor::Administrator { id: Uuid::new_v4() };
        assert!(matches!(
            f.svc.list_for_box(&other, Some(f.target.id)).await,
            Err(ServiceError::Forbidden)
        ));
        assert!(matches!(
            f.svc.list_for_box(&Actor::Anonymous, Some(f.target.id)).await,
            Err(ServiceError::Unauthenticated)
        ));
        assert!(matches!(
            f.svc.list_for_box(&f.owner, Some(Uuid::new_v4())).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn owner_rates_within_bounds() {
        let f = fixture().await;
        let s = f.svc.submit(&Actor::Anonymous, submission(f.target.id, "rate me", None)).await.unwrap();

        for rating in 1..=5 {
            let rated = f.svc.rate(&f.owner, Some(s.id), Some(rating)).await.unwrap();
            assert_eq!(rated.admin_rating, Some(rating as i16));
        }
        for rating in [Some(0), Some(6), None] {
            assert!(matches!(
                f.svc.rate(&f.owner, Some(s.id), rating).await,
                Err(ServiceError::InvalidInput(msg)) if msg == "Rating must be between 1 and 5"
            ));
        }

        let other = Actor::Administrator { id: Uuid::new_v4() };
        assert!(matches!(f.svc.rate(&other, Some(s.id), Some(3)).await, Err(ServiceError::Forbidden)));
        assert!(matches!(
            f.svc.rate(&Actor::Anonymous, Some(s.id), Some(3)).await,
            Err(ServiceError::Unauthenticated)
        ));
        assert!(matches!(
            f.svc.rate(&f.owner, Some(Uuid::new_v4()), Some(3)).await,
            Err(ServiceError::NotFound(msg)) if msg == SUGGESTION_NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn deleting_the_box_removes_its_suggestions() {
        let f = fixture().await;
        let s = f.svc.submit(&Actor::Anonymous, submission(f.target.id, "bye", None)).await.unwrap();

        assert!(f.store.delete_box(f.target.id).await.unwrap());
        assert!(f.store.get_suggestion(s.id).await.unwrap().is_none());
        assert!(matches!(
            f.svc.rate(&f.owner, Some(s.id), Some(3)).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn export_contains_one_row_per_suggestion() {
        let f = fixture().await;
        f.svc
            .submit(&Actor::Anonymous, submission(f.target.id, r#"He said "hi""#, Some(5)))
            .await
            .unwrap();

        let export = f.svc.export_csv(&f.owner, Some(f.target.id)).await.unwrap();
        assert_eq!(export.filename, format!("suggestions-{}.csv", f.target.id));
        let lines: Vec<&str> = export.body.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains(r#","He said ""hi""","5","","true","#));

        let other = Actor::Administrator { id: Uuid::new_v4() };
        assert!(matches!(
            f.svc.export_csv(&other, Some(f.target.id)).await,
            Err(ServiceError::Forbidden)
        ));
    }
}
