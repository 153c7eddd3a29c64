//! CSV rendering of a box's suggestions.
//!
//! The layout matches files exported by earlier versions of the service and
//! must stay byte-compatible: an unquoted header, every data field wrapped in
//! double quotes with inner quotes doubled, `\n` between lines and no newline
//! after the last row.

use chrono::SecondsFormat;
use uuid::Uuid;

use crate::database::models::Suggestion;

pub const CSV_HEADER: &str = "ID,Content,Rating,Admin Rating,Anonymous,Created At";

/// Rendered export ready to be sent as an attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

impl CsvExport {
    /// `suggestions` must already be ordered newest first.
    pub fn render(box_id: Uuid, suggestions: &[Suggestion]) -> Self {
        Self {
            filename: export_filename(box_id),
            body: suggestions_to_csv(suggestions),
        }
    }
}

pub fn export_filename(box_id: Uuid) -> String {
    format!("suggestions-{box_id}.csv")
}

pub fn suggestions_to_csv(suggestions: &[Suggestion]) -> String {
    let rows: Vec<String> = suggestions.iter().map(csv_row).collect();
    format!("{CSV_HEADER}\n{}", rows.join("\n"))
}

fn csv_row(s: &Suggestion) -> String {
    let fields = [
        s.id.to_string(),
        s.content.clone(),
        optional_rating(s.rating),
        optional_rating(s.admin_rating),
        s.is_anonymous.to_string(),
        s.created_at.to_rfc3339_opts(SecondsFormat::Micros, false),
    ];
    fields.iter().map(|f| quote(f)).collect::<Vec<_>>().join(",")
}

fn optional_rating(rating: Option<i16>) -> String {
    rating.map(|r| r.to_string()).unwrap_or_default()
}

/// Wrap in double quotes, doubling any inside.
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
