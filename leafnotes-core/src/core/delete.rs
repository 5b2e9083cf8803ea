//! Result type for cascading note removal.
//!
//! Deleting a note always removes its whole subtree. [`DeleteResult`] reports
//! what went, so callers can drop stale selections and cached views.
//!
//! Fields serialize in camelCase (`deletedCount`, `affectedIds`) and the
//! struct carries a `success` flag for front ends that only check that.
//!
//! ```rust
//! use leafnotes_core::DeleteResult;
//!
//! let result = DeleteResult::new(vec!["f".to_string(), "b".to_string()]);
//! assert_eq!(result.deleted_count, 2);
//! assert!(result.contains("b"));
//!
//! let json = serde_json::to_string(&result).unwrap();
//! assert!(json.contains("deletedCount"));
//! assert!(json.contains("\"success\":true"));
//! ```

use serde::{Deserialize, Serialize};

/// The outcome of deleting a note and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// Always `true` for a returned result; failures surface as errors.
    pub success: bool,

    /// The total number of notes that were permanently removed.
    pub deleted_count: usize,

    /// IDs of every removed note, the requested root first.
    pub affected_ids: Vec<String>,
}

impl DeleteResult {
    pub fn new(affected_ids: Vec<String>) -> Self {
        Self {
            success: true,
            deleted_count: affected_ids.len(),
            affected_ids,
        }
    }

    /// Returns `true` if `note_id` was removed by this operation.
    pub fn contains(&self, note_id: &str) -> bool {
        self.affected_ids.iter().any(|id| id == note_id)
    }
}
