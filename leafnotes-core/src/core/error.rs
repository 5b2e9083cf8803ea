//! Error types for the Leafnotes core library.

use thiserror::Error;

/// All errors that can occur within the Leafnotes core library.
#[derive(Debug, Error)]
pub enum LeafnotesError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A note ID was requested that does not exist in the database.
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// A request was rejected before touching the database.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A move operation would create a cycle or is otherwise invalid.
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// The opened file is not a valid Leafnotes workspace.
    #[error("Invalid workspace: {0}")]
    InvalidWorkspace(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias that pins the error type to [`LeafnotesError`].
pub type Result<T> = std::result::Result<T, LeafnotesError>;

impl LeafnotesError {
    /// Returns `true` when the error reports a nonexistent note.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoteNotFound(_))
    }

    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
            Self::ValidationFailed(msg) => msg.clone(),
            Self::InvalidMove(msg) => msg.clone(),
            Self::InvalidWorkspace(_) => "Could not open workspace file".to_string(),
            Self::Io(e) => format!("File error: {e}"),
        }
    }
}
