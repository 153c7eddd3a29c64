pub mod account_service;
pub mod box_service;
pub mod export;
pub mod links;
pub mod suggestion_service;

pub use account_service::{AccountService, LoginOutcome};
pub use box_service::{BoxInput, BoxService};
pub use export::CsvExport;
pub use links::submission_link;
pub use suggestion_service::{SubmissionInput, SuggestionService};

use thiserror::Error;

use crate::access::DenyReason;
use crate::database::DatabaseError;

pub const BOX_NOT_FOUND: &str = "Suggestion box not found";
pub const SUGGESTION_NOT_FOUND: &str = "Suggestion not found";

/// Failures surfaced by the service layer, one variant per client-visible outcome
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthenticated,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] DatabaseError),

    /// Non-store internal failure (hashing, token signing)
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Map an access denial, naming the missing record for `NotFound`.
    pub fn denied(reason: DenyReason, missing: &str) -> Self {
        match reason {
            DenyReason::Unauthenticated => ServiceError::Unauthenticated,
            DenyReason::Forbidden => ServiceError::Forbidden,
            DenyReason::NotFound => ServiceError::NotFound(missing.to_string()),
            DenyReason::InvalidInput(msg) => ServiceError::InvalidInput(msg),
        }
    }
}

/// `Some` with the trimmed-non-empty value as sent, `None` when missing or blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
