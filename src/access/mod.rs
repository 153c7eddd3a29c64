//! Authorization rules for suggestion boxes and their suggestions.
//!
//! Decisions are pure functions of the actor, the requested operation and the
//! box as it currently exists in the store. Callers look the box up fresh for
//! every owner-gated request and pass `None` when it is gone; ownership is
//! never taken from request input.
//!
//! Checks run in a fixed order: identity, input, target existence, ownership.
//! [`precheck`] covers the first two and needs no store access, so services run
//! it before touching the store and then call [`authorize`] once the box has
//! been fetched.

use uuid::Uuid;

use crate::database::models::SuggestionBox;

/// Who a request acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Administrator { id: Uuid },
}

impl Actor {
    pub fn admin_id(&self) -> Option<Uuid> {
        match self {
            Actor::Administrator { id } => Some(*id),
            Actor::Anonymous => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateBox,
    ReadBox,
    ListOwnedBoxes,
    UpdateBox,
    DeleteBox,
    CreateSuggestion,
    ListSuggestions,
    RateSuggestion { rating: i64 },
    ExportCsv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    Forbidden,
    NotFound,
    InvalidInput(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn into_result(self) -> Result<(), DenyReason> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason),
        }
    }
}

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

pub fn is_valid_rating(rating: i64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

impl Operation {
    fn requires_administrator(&self) -> bool {
        !matches!(self, Operation::ReadBox | Operation::CreateSuggestion)
    }

    fn requires_owner(&self) -> bool {
        matches!(
            self,
            Operation::UpdateBox
                | Operation::DeleteBox
                | Operation::ListSuggestions
                | Operation::RateSuggestion { .. }
                | Operation::ExportCsv
        )
    }

    fn targets_box(&self) -> bool {
        !matches!(self, Operation::CreateBox | Operation::ListOwnedBoxes)
    }
}

/// Identity and input checks that need no store access.
pub fn precheck(actor: &Actor, operation: &Operation) -> Decision {
    if operation.requires_administrator() && actor.admin_id().is_none() {
        return Decision::Deny(DenyReason::Unauthenticated);
    }

    if let Operation::RateSuggestion { rating } = operation {
        if !is_valid_rating(*rating) {
            return Decision::Deny(DenyReason::InvalidInput(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
    }

    Decision::Allow
}

/// Full decision against the freshly loaded target box.
///
/// `target` is ignored for operations that do not address a specific box
/// (`CreateBox`, `ListOwnedBoxes`).
pub fn authorize(actor: &Actor, operation: &Operation, target: Option<&SuggestionBox>) -> Decision {
    if let Decision::Deny(reason) = precheck(actor, operation) {
        return Decision::Deny(reason);
    }

    if !operation.targets_box() {
        return Decision::Allow;
    }

    let Some(target) = target else {
        return match operation {
            // Do not tell non-owners whether the box exists.
            Operation::UpdateBox | Operation::DeleteBox => Decision::Deny(DenyReason::Forbidden),
            _ => Decision::Deny(DenyReason::NotFound),
        };
    };

    if operation.requires_owner() && actor.admin_id() != Some(target.owner_id) {
        return Decision::Deny(DenyReason::Forbidden);
    }

    Decision::Allow
}
