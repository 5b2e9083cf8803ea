//! Core library for Leafnotes, a local-first markdown note tree.
//!
//! The primary entry point is [`Workspace`], which represents an open
//! SQLite database file. All note mutations go through `Workspace` methods;
//! [`build_tree`] turns the flat record list into the sidebar hierarchy and
//! [`AutosaveCoordinator`] tracks the open note and its debounced saves.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    autosave::{AutosaveConfig, AutosaveCoordinator, NoteStore, SaveRequest, SaveStatus},
    delete::DeleteResult,
    error::{LeafnotesError, Result},
    markdown::render_markdown_to_html,
    note::{CreateNote, Note, UpdateNote, DEFAULT_FOLDER_TITLE, DEFAULT_NOTE_TITLE},
    storage::Storage,
    tree::{build_tree, flatten, NoteTreeNode},
    workspace::Workspace,
};
