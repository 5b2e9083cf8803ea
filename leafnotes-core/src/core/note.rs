//! Note records and the request shapes used to create and update them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Title given to notes created without one.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled";

/// Title the UI gives to freshly created folders.
pub const DEFAULT_FOLDER_TITLE: &str = "New Folder";

/// A single persisted note or folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub parent_id: Option<String>,
    pub is_folder: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a note. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNote {
    /// Client-chosen ID; one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub is_folder: bool,
}

impl CreateNote {
    /// A plain note under `parent_id` with the default title.
    pub fn note(parent_id: Option<&str>) -> Self {
        Self {
            title: Some(DEFAULT_NOTE_TITLE.to_string()),
            parent_id: parent_id.map(str::to_string),
            ..Self::default()
        }
    }

    /// A folder under `parent_id` with the folder default title.
    pub fn folder(parent_id: Option<&str>) -> Self {
        Self {
            title: Some(DEFAULT_FOLDER_TITLE.to_string()),
            parent_id: parent_id.map(str::to_string),
            is_folder: true,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A partial update. Only the fields that are `Some` are written.
///
/// `parent_id` is doubly optional: `None` leaves the parent untouched,
/// `Some(None)` moves the note to the root level. In JSON an absent key
/// maps to the former and an explicit `null` to the latter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

impl UpdateNote {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn parent(parent_id: Option<&str>) -> Self {
        Self {
            parent_id: Some(parent_id.map(str::to_string)),
            ..Self::default()
        }
    }

    pub fn sort_order(sort_order: i64) -> Self {
        Self {
            sort_order: Some(sort_order),
            ..Self::default()
        }
    }

    /// Returns `true` when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.parent_id.is_none()
            && self.sort_order.is_none()
    }
}

// Runs only when the key is present, so `null` becomes `Some(None)`.
fn present_field<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Formats a timestamp as fixed-width RFC 3339 with microseconds, so that the
/// stored text sorts in chronological order.
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_update_note_distinguishes_absent_and_null_parent() {
        let absent: UpdateNote = serde_json::from_str(r#"{"title":"X"}"#).unwrap();
        assert_eq!(absent.parent_id, None);
        assert_eq!(absent.title.as_deref(), Some("X"));

        let to_root: UpdateNote = serde_json::from_str(r#"{"parent_id":null}"#).unwrap();
        assert_eq!(to_root.parent_id, Some(None));

        let moved: UpdateNote = serde_json::from_str(r#"{"parent_id":"f1"}"#).unwrap();
        assert_eq!(moved.parent_id, Some(Some("f1".to_string())));
    }

    #[test]
    fn test_empty_update() {
        assert!(UpdateNote::default().is_empty());
        assert!(!UpdateNote::parent(None).is_empty());
    }

    #[test]
    fn test_create_note_defaults() {
        let body: CreateNote = serde_json::from_str("{}").unwrap();
        assert_eq!(body, CreateNote::default());
        assert!(!body.is_folder);

        let folder = CreateNote::folder(Some("root"));
        assert_eq!(folder.title.as_deref(), Some(DEFAULT_FOLDER_TITLE));
        assert!(folder.is_folder);
    }

    #[test]
    fn test_timestamp_text_sorts_chronologically() {
        let early = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let late = early + chrono::Duration::microseconds(1);
        let (a, b) = (format_timestamp(early), format_timestamp(late));
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(parse_timestamp(&b), Some(late));
    }
}
