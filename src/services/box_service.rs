use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::{self, Actor, Operation};
use crate::database::models::{BoxChanges, NewBox, SuggestionBox, DEFAULT_BOX_COLOR};
use crate::database::Store;

use super::{non_blank, ServiceError, BOX_NOT_FOUND};

/// Title, description and color as sent by the client. Missing description and
/// color fall back to their defaults on both create and update.
#[derive(Debug, Clone, Default)]
pub struct BoxInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl BoxInput {
    fn validate(self) -> Result<BoxChanges, ServiceError> {
        let title = non_blank(self.title)
            .ok_or_else(|| ServiceError::InvalidInput("Title is required".to_string()))?;
        let color = match non_blank(self.color) {
            Some(c) if is_hex_color(c.trim()) => c.trim().to_string(),
            Some(c) => {
                return Err(ServiceError::InvalidInput(format!(
                    "Color must be a hex value like {DEFAULT_BOX_COLOR}, got '{c}'"
                )))
            }
            None => DEFAULT_BOX_COLOR.to_string(),
        };

        Ok(BoxChanges {
            title,
            description: self.description.unwrap_or_default(),
            color,
        })
    }
}

/// `#RGB` or `#RRGGBB`
fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[derive(Clone)]
pub struct BoxService {
    store: Arc<dyn Store>,
}

impl BoxService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_box(&self, actor: &Actor, input: BoxInput) -> Result<SuggestionBox, ServiceError> {
        let owner_id = self.require_admin(actor, &Operation::CreateBox)?;
        let changes = input.validate()?;

        let created = self
            .store
            .insert_box(NewBox {
                owner_id,
                title: changes.title,
                description: changes.description,
                color: changes.color,
            })
            .await?;

        info!("Created suggestion box {} for {}", created.id, owner_id);
        Ok(created)
    }

    /// Public lookup used by the submission page.
    pub async fn get_box(&self, actor: &Actor, id: Option<Uuid>) -> Result<SuggestionBox, ServiceError> {
        let target = self.load_box(id).await?;
        access::authorize(actor, &Operation::ReadBox, target.as_ref())
            .into_result()
            .map_err(|reason| ServiceError::denied(reason, BOX_NOT_FOUND))?;
        target.ok_or_else(|| ServiceError::NotFound(BOX_NOT_FOUND.to_string()))
    }

    pub async fn list_owned_boxes(&self, actor: &Actor) -> Result<Vec<SuggestionBox>, ServiceError> {
        let owner_id = self.require_admin(actor, &Operation::ListOwnedBoxes)?;
        Ok(self.store.list_boxes_by_owner(owner_id).await?)
    }

    pub async fn update_box(
        &self,
        actor: &Actor,
        id: Option<Uuid>,
        input: BoxInput,
    ) -> Result<SuggestionBox, ServiceError> {
        self.require_admin(actor, &Operation::UpdateBox)?;
        let changes = input.validate()?;

        let target = self.load_owned(actor, &Operation::UpdateBox, id).await?;
        self.store
            .update_box(target.id, changes)
            .await?
            .ok_or_else(|| ServiceError::NotFound(BOX_NOT_FOUND.to_string()))
    }

    /// Deletes the box and, through the store's cascade, all of its suggestions.
    pub async fn delete_box(&self, actor: &Actor, id: Option<Uuid>) -> Result<(), ServiceError> {
        self.require_admin(actor, &Operation::DeleteBox)?;
        let target = self.load_owned(actor, &Operation::DeleteBox, id).await?;

        if !self.store.delete_box(target.id).await? {
            return Err(ServiceError::NotFound(BOX_NOT_FOUND.to_string()));
        }
        info!("Deleted suggestion box {}", target.id);
        Ok(())
    }

    fn require_admin(&self, actor: &Actor, operation: &Operation) -> Result<Uuid, ServiceError> {
        access::precheck(actor, operation)
            .into_result()
            .map_err(|reason| ServiceError::denied(reason, BOX_NOT_FOUND))?;
        actor.admin_id().ok_or(ServiceError::Unauthenticated)
    }

    async fn load_box(&self, id: Option<Uuid>) -> Result<Option<SuggestionBox>, ServiceError> {
        match id {
            Some(id) => Ok(self.store.get_box(id).await?),
            None => Ok(None),
        }
    }

    /// Fetch the box fresh from the store and check the actor owns it.
    async fn load_owned(
        &self,
        actor: &Actor,
        operation: &Operation,
        id: Option<Uuid>,
    ) -> Result<SuggestionBox, ServiceError> {
        let target = self.load_box(id).await?;
        if let Err(reason) = access::authorize(actor, operation, target.as_ref()).into_result() {
            warn!("Denied {:?} on box {:?} for {:?}: {:?}", operation, id, actor, reason);
            return Err(ServiceError::denied(reason, BOX_NOT_FOUND));
        }
        target.ok_or_else(|| ServiceError::NotFound(BOX_NOT_FOUND.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn service() -> BoxService {
        BoxService::new(Arc::new(MemoryStore::new()))
    }

    fn admin() -> Actor {
        Actor::Administrator { id: Uuid::new_v4() }
    }

    fn titled(title: &str) -> BoxInput {
        BoxInput {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_sets_owner_and_defaults() {
        let svc = service();
        let actor = admin();
        let created = svc
            .create_box(
                &actor,
                BoxInput {
                    title: Some("Feedback".into()),
                    description: None,
                    color: Some("#3B82F6".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(Some(created.owner_id), actor.admin_id());
        assert_eq!(created.description, "");
        assert_eq!(created.color, "#3B82F6");

        let defaulted = svc.create_box(&actor, titled("Other")).await.unwrap();
        assert_eq!(defaulted.color, DEFAULT_BOX_COLOR);
    }

    #[tokio::test]
    async fn create_requires_administrator_then_title() {
        let svc = service();
        assert!(matches!(
            svc.create_box(&Actor::Anonymous, BoxInput::default()).await,
            Err(ServiceError::Unauthenticated)
        ));
        assert!(matches!(
            svc.create_box(&admin(), titled("   ")).await,
            Err(ServiceError::InvalidInput(msg)) if msg == "Title is required"
        ));
    }

    #[tokio::test]
    async fn rejects_non_hex_color() {
        let svc = service();
        let input = BoxInput {
            title: Some("Feedback".into()),
            color: Some("blue".into()),
            ..Default::default()
        };
        assert!(matches!(svc.create_box(&admin(), input).await, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn only_owner_updates_and_deletes() {
        let svc = service();
        let owner = admin();
        let intruder = admin();
        let created = svc.create_box(&owner, titled("Mine")).await.unwrap();

        assert!(matches!(
            svc.update_box(&intruder, Some(created.id), titled("Theirs")).await,
            Err(ServiceError::Forbidden)
        ));
        assert!(matches!(
            svc.delete_box(&intruder, Some(created.id)).await,
            Err(ServiceError::Forbidden)
        ));
        assert!(matches!(
            svc.delete_box(&Actor::Anonymous, Some(created.id)).await,
            Err(ServiceError::Unauthenticated)
        ));

        let updated = svc
            .update_box(
                &owner,
                Some(created.id),
                BoxInput {
                    title: Some("Renamed".into()),
                    description: Some("About the office".into()),
                    color: Some("#fff".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.owner_id, created.owner_id);
        assert_eq!(updated.created_at, created.created_at);

        svc.delete_box(&owner, Some(created.id)).await.unwrap();
        assert!(matches!(
            svc.get_box(&Actor::Anonymous, Some(created.id)).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_resets_missing_optional_fields() {
        let svc = service();
        let owner = admin();
        let created = svc
            .create_box(
                &owner,
                BoxInput {
                    title: Some("Feedback".into()),
                    description: Some("desc".into()),
                    color: Some("#000000".into()),
                },
            )
            .await
            .unwrap();

        let updated = svc.update_box(&owner, Some(created.id), titled("Feedback")).await.unwrap();
        assert_eq!(updated.description, "");
        assert_eq!(updated.color, DEFAULT_BOX_COLOR);
    }

    #[tokio::test]
    async fn missing_box_is_forbidden_for_update() {
        let svc = service();
        assert!(matches!(
            svc.update_box(&admin(), Some(Uuid::new_v4()), titled("x")).await,
            Err(ServiceError::Forbidden)
        ));
        assert!(matches!(
            svc.delete_box(&admin(), None).await,
            Err(ServiceError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn anyone_can_read_a_box_but_lists_are_per_owner() {
        let svc = service();
        let a = admin();
        let b = admin();
        let created = svc.create_box(&a, titled("A's box")).await.unwrap();
        svc.create_box(&b, titled("B's box")).await.unwrap();

        let fetched = svc.get_box(&Actor::Anonymous, Some(created.id)).await.unwrap();
        assert_eq!(fetched, created);

        let mine = svc.list_owned_boxes(&a).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, created.id);

        assert!(matches!(
            svc.list_owned_boxes(&Actor::Anonymous).await,
            Err(ServiceError::Unauthenticated)
        ));
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#3B82F6"));
        assert!(is_hex_color("#abc"));
        assert!(!is_hex_color("3B82F6"));
        assert!(!is_hex_color("#3B82F"));
        assert!(!is_hex_color("#GGGGGG"));
    }
}
