use serde::Serialize;

use crate::database::models::SuggestionBox;
use crate::services::submission_link;

/// Box as returned over the API: the stored record plus its public
/// submission URL.
#[derive(Debug, Clone, Serialize)]
pub struct BoxView {
    #[serde(flatten)]
    pub record: SuggestionBox,
    pub submission_url: String,
}

impl BoxView {
    pub fn new(record: SuggestionBox, origin: &str) -> Self {
        let submission_url = submission_link(origin, record.id);
        Self { record, submission_url }
    }

    pub fn many(records: Vec<SuggestionBox>, origin: &str) -> Vec<Self> {
        records.into_iter().map(|record| Self::new(record, origin)).collect()
    }
}
