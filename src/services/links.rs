use uuid::Uuid;

/// Public submission URL for a box: `{origin}/submit/{box_id}`.
pub fn submission_link(origin: &str, box_id: Uuid) -> String {
    format!("{}/submit/{}", origin.trim_end_matches('/'), box_id)
}
