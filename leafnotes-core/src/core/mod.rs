//! Internal domain modules for the Leafnotes core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod autosave;
pub mod delete;
pub mod error;
pub mod markdown;
pub mod note;
pub mod storage;
pub mod tree;
pub mod workspace;

#[doc(inline)]
pub use autosave::{AutosaveConfig, AutosaveCoordinator, NoteStore};
#[doc(inline)]
pub use delete::DeleteResult;
#[doc(inline)]
pub use error::{LeafnotesError, Result};
#[doc(inline)]
pub use note::{CreateNote, Note, UpdateNote};
#[doc(inline)]
pub use storage::Storage;
#[doc(inline)]
pub use tree::{build_tree, NoteTreeNode};
#[doc(inline)]
pub use workspace::Workspace;
