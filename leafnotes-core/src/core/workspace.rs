//! High-level workspace operations over a Leafnotes SQLite database.

use crate::core::note::{format_timestamp, parse_timestamp};
use crate::{
    build_tree, CreateNote, DeleteResult, LeafnotesError, Note, NoteTreeNode, Result, Storage,
    UpdateNote, DEFAULT_NOTE_TITLE,
};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

const NOTE_COLUMNS: &str =
    "id, title, content, parent_id, is_folder, sort_order, created_at, updated_at";

/// Recursive closure of a note and everything parented under it.
/// `UNION` (not `UNION ALL`) keeps a corrupt parent cycle from looping.
const SUBTREE_CTE: &str = "WITH RECURSIVE subtree(id) AS (
        SELECT id FROM notes WHERE id = ?1
        UNION
        SELECT n.id FROM notes n INNER JOIN subtree s ON n.parent_id = s.id
     )";

/// An open Leafnotes workspace backed by a SQLite database.
///
/// `Workspace` is the only path through which notes are mutated. Every
/// public operation runs in its own transaction; there is no transaction
/// spanning two calls. Mutating methods take `&mut self`, so callers that
/// share a workspace across threads wrap it in a `Mutex`.
pub struct Workspace {
    storage: Storage,
}

impl Workspace {
    /// Creates a new workspace database at `path` and seeds it with a
    /// welcome note and a sample folder.
    ///
    /// # Errors
    ///
    /// Returns [`LeafnotesError::Database`] for any SQLite failure, including
    /// when `path` already holds a workspace.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = Storage::create(&path)?;
        let mut ws = Self { storage };
        ws.seed_starter_notes()?;
        log::info!("created workspace at {}", path.as_ref().display());
        Ok(ws)
    }

    /// Opens an existing workspace database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LeafnotesError::InvalidWorkspace`] if the file is not a
    /// Leafnotes database, or [`LeafnotesError::Database`] for SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = Storage::open(&path)?;
        log::info!("opened workspace at {}", path.as_ref().display());
        Ok(Self { storage })
    }

    /// Opens `path` if it holds data, otherwise creates a fresh workspace there.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let has_data = std::fs::metadata(&path)
            .map(|meta| meta.len() > 0)
            .unwrap_or(false);
        if has_data {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// An unseeded workspace that lives only as long as the value.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            storage: Storage::open_in_memory()?,
        })
    }

    /// Returns the underlying SQLite connection.
    pub fn connection(&self) -> &Connection {
        self.storage.connection()
    }

    /// Fetches a single note by ID.
    ///
    /// # Errors
    ///
    /// Returns [`LeafnotesError::ValidationFailed`] for a blank ID and
    /// [`LeafnotesError::NoteNotFound`] when no such note exists.
    pub fn get_note(&self, note_id: &str) -> Result<Note> {
        require_id(note_id)?;
        fetch_note(self.connection(), note_id)?
            .ok_or_else(|| LeafnotesError::NoteNotFound(note_id.to_string()))
    }

    /// Returns every note ordered by `(sort_order, created_at)`.
    ///
    /// The tree builder relies on this order for deterministic sibling
    /// placement. Insertion order breaks any remaining ties.
    pub fn list_all_notes(&self) -> Result<Vec<Note>> {
        let mut stmt = self.connection().prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             ORDER BY sort_order ASC, created_at ASC, rowid ASC"
        ))?;
        let rows = stmt
            .query_map([], map_note_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(note_from_row_tuple).collect()
    }

    /// Reads all notes and assembles the display hierarchy.
    pub fn list_tree(&self) -> Result<Vec<NoteTreeNode>> {
        Ok(build_tree(self.list_all_notes()?))
    }

    /// Returns the direct children of `parent_id` (the root group for
    /// `None`) in display order.
    pub fn get_children(&self, parent_id: Option<&str>) -> Result<Vec<Note>> {
        let mut stmt = self.connection().prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             WHERE parent_id IS ?1
             ORDER BY sort_order ASC, created_at ASC, rowid ASC"
        ))?;
        let rows = stmt
            .query_map([parent_id], map_note_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(note_from_row_tuple).collect()
    }

    /// Total number of notes and folders in the workspace.
    pub fn count_notes(&self) -> Result<usize> {
        let count: i64 = self
            .connection()
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Inserts a new note and returns it as stored.
    ///
    /// A random ID is generated unless the request carries one. A missing or
    /// blank title becomes `"Untitled"`. The note is appended
    /// to its sibling group: its `sort_order` is one past the largest among
    /// notes sharing `parent_id`, or 0 for an empty group.
    ///
    /// # Errors
    ///
    /// Returns [`LeafnotesError::NoteNotFound`] if `parent_id` names a
    /// missing note, or [`LeafnotesError::Database`] for any SQLite failure,
    /// including a supplied ID that is already taken.
    pub fn create_note(&mut self, request: CreateNote) -> Result<Note> {
        let CreateNote {
            id,
            title,
            content,
            parent_id,
            is_folder,
        } = request;
        let parent_id = parent_id.filter(|pid| !pid.trim().is_empty());
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NOTE_TITLE.to_string());

        let tx = self.storage.connection_mut().transaction()?;

        if let Some(pid) = parent_id.as_deref() {
            if !note_exists(&tx, pid)? {
                return Err(LeafnotesError::NoteNotFound(pid.to_string()));
            }
        }

        let sort_order: i64 = tx.query_row(
            "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM notes WHERE parent_id IS ?1",
            [parent_id.as_deref()],
            |row| row.get(0),
        )?;

        let now = now_micros();
        let note = Note {
            id: id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(new_note_id),
            title,
            content: content.unwrap_or_default(),
            parent_id,
            is_folder,
            sort_order,
            created_at: now,
            updated_at: now,
        };

        tx.execute(
            &format!("INSERT INTO notes ({NOTE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            rusqlite::params![
                note.id,
                note.title,
                note.content,
                note.parent_id,
                note.is_folder,
                note.sort_order,
                format_timestamp(note.created_at),
                format_timestamp(note.updated_at),
            ],
        )?;
        tx.commit()?;

        log::info!(
            "created {} {} under {}",
            if note.is_folder { "folder" } else { "note" },
            note.id,
            note.parent_id.as_deref().unwrap_or("root")
        );
        Ok(note)
    }

    /// Applies the fields present in `changes` and leaves the rest alone.
    ///
    /// `updated_at` is always refreshed and is strictly later than the
    /// previous value, even when two updates land within the same clock tick.
    /// A parent change keeps the note's `sort_order`; neither the moved note
    /// nor its former siblings are renumbered.
    ///
    /// # Errors
    ///
    /// - [`LeafnotesError::ValidationFailed`] for a blank ID or blank title.
    /// - [`LeafnotesError::NoteNotFound`] if the note or the new parent is missing.
    /// - [`LeafnotesError::InvalidMove`] if the new parent is the note itself
    ///   or one of its descendants.
    /// - [`LeafnotesError::Database`] for any SQLite failure.
    pub fn update_note(&mut self, note_id: &str, changes: UpdateNote) -> Result<Note> {
        require_id(note_id)?;
        if changes.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(LeafnotesError::ValidationFailed(
                "Title must not be empty".to_string(),
            ));
        }

        let tx = self.storage.connection_mut().transaction()?;

        let mut note = fetch_note(&tx, note_id)?
            .ok_or_else(|| LeafnotesError::NoteNotFound(note_id.to_string()))?;

        if let Some(Some(new_parent)) = &changes.parent_id {
            check_new_parent(&tx, note_id, new_parent)?;
        }

        let UpdateNote {
            title,
            content,
            parent_id,
            sort_order,
        } = changes;
        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }
        if let Some(parent_id) = parent_id {
            note.parent_id = parent_id;
        }
        if let Some(sort_order) = sort_order {
            note.sort_order = sort_order;
        }
        note.updated_at = next_update_stamp(note.updated_at);

        tx.execute(
            "UPDATE notes
             SET title = ?1, content = ?2, parent_id = ?3, sort_order = ?4, updated_at = ?5
             WHERE id = ?6",
            rusqlite::params![
                note.title,
                note.content,
                note.parent_id,
                note.sort_order,
                format_timestamp(note.updated_at),
                note.id,
            ],
        )?;
        tx.commit()?;

        log::debug!("updated note {}", note.id);
        Ok(note)
    }

    /// Changes only the title of `note_id`.
    pub fn rename_note(&mut self, note_id: &str, title: &str) -> Result<Note> {
        self.update_note(note_id, UpdateNote::title(title))
    }

    /// Re-parents `note_id` under `new_parent_id`, or to the root for `None`.
    pub fn move_note(&mut self, note_id: &str, new_parent_id: Option<&str>) -> Result<Note> {
        self.update_note(note_id, UpdateNote::parent(new_parent_id))
    }

    /// Deletes `note_id` and every descendant.
    ///
    /// The descendant closure is computed and removed with a single DELETE
    /// inside one transaction, so readers never observe a partial cascade.
    /// The `ON DELETE SET NULL` foreign key never gets a chance to orphan a
    /// child, because every child is in the deleted set.
    ///
    /// # Errors
    ///
    /// Returns [`LeafnotesError::NoteNotFound`] when `note_id` does not exist;
    /// that check happens before anything is deleted.
    pub fn delete_note(&mut self, note_id: &str) -> Result<DeleteResult> {
        require_id(note_id)?;
        let tx = self.storage.connection_mut().transaction()?;

        if !note_exists(&tx, note_id)? {
            return Err(LeafnotesError::NoteNotFound(note_id.to_string()));
        }

        let mut affected_ids: Vec<String> = {
            let mut stmt = tx.prepare(&format!("{SUBTREE_CTE} SELECT id FROM subtree"))?;
            let ids = stmt
                .query_map([note_id], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            ids
        };
        if let Some(pos) = affected_ids.iter().position(|id| id == note_id) {
            affected_ids[..=pos].rotate_right(1);
        }

        let removed = tx.execute(
            &format!("{SUBTREE_CTE} DELETE FROM notes WHERE id IN (SELECT id FROM subtree)"),
            [note_id],
        )?;
        tx.commit()?;

        log::info!("deleted note {note_id} and {} descendant(s)", removed.saturating_sub(1));
        Ok(DeleteResult::new(affected_ids))
    }

    fn seed_starter_notes(&mut self) -> Result<()> {
        self.create_note(
            CreateNote::note(None)
                .with_title("Welcome to Leafnotes")
                .with_content(include_str!("seed/welcome.md")),
        )?;
        let folder = self.create_note(CreateNote::folder(None).with_title("Getting Started"))?;
        self.create_note(
            CreateNote::note(Some(&folder.id))
                .with_title("Quick Tips")
                .with_content(include_str!("seed/quick_tips.md")),
        )?;
        Ok(())
    }
}

fn require_id(note_id: &str) -> Result<()> {
    if note_id.trim().is_empty() {
        return Err(LeafnotesError::ValidationFailed("Missing note ID".to_string()));
    }
    Ok(())
}

fn new_note_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Current UTC time at the precision the database stores.
fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn next_update_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    now_micros().max(previous + Duration::microseconds(1))
}

fn note_exists(conn: &Connection, note_id: &str) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM notes WHERE id = ?1", [note_id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

fn fetch_note(conn: &Connection, note_id: &str) -> Result<Option<Note>> {
    conn.query_row(
        &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
        [note_id],
        map_note_row,
    )
    .optional()?
    .map(note_from_row_tuple)
    .transpose()
}

/// Rejects a parent that is missing, the note itself, or one of its descendants.
fn check_new_parent(conn: &Connection, note_id: &str, new_parent: &str) -> Result<()> {
    if new_parent == note_id {
        return Err(LeafnotesError::InvalidMove(
            "A note cannot be its own parent".to_string(),
        ));
    }
    if !note_exists(conn, new_parent)? {
        return Err(LeafnotesError::NoteNotFound(new_parent.to_string()));
    }

    // Walk up from the new parent; reaching `note_id` means a cycle.
    let mut seen = HashSet::new();
    let mut current = new_parent.to_string();
    while seen.insert(current.clone()) {
        let parent: Option<String> = conn
            .query_row(
                "SELECT parent_id FROM notes WHERE id = ?1",
                [&current],
                |row| row.get(0),
            )
            .optional()?
            .flatten();
        match parent {
            Some(pid) if pid == note_id => {
                return Err(LeafnotesError::InvalidMove(
                    "Move would create a cycle".to_string(),
                ));
            }
            Some(pid) => current = pid,
            None => break,
        }
    }
    Ok(())
}

/// Raw 8-column tuple extracted from a `notes` row.
type NoteRow = (String, String, String, Option<String>, bool, i64, String, String);

fn map_note_row(row: &rusqlite::Row) -> rusqlite::Result<NoteRow> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, Option<String>>(3)?,
        row.get::<_, bool>(4)?,
        row.get::<_, i64>(5)?,
        row.get::<_, String>(6)?,
        row.get::<_, String>(7)?,
    ))
}

/// Converts a raw row tuple into a [`Note`], parsing both timestamps.
fn note_from_row_tuple(
    (id, title, content, parent_id, is_folder, sort_order, created_at, updated_at): NoteRow,
) -> Result<Note> {
    let stamp = |raw: &str| {
        parse_timestamp(raw).ok_or_else(|| {
            LeafnotesError::InvalidWorkspace(format!("note {id} has malformed timestamp '{raw}'"))
        })
    };
    Ok(Note {
        created_at: stamp(&created_at)?,
        updated_at: stamp(&updated_at)?,
        id,
        title,
        content,
        parent_id,
        is_folder,
        sort_order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn empty_workspace() -> Workspace {
        Workspace::open_in_memory().unwrap()
    }

    fn titled(title: &str) -> CreateNote {
        CreateNote::note(None).with_title(title)
    }

    #[test]
    fn test_create_workspace_seeds_starter_notes() {
        let temp = NamedTempFile::new().unwrap();
        let ws = Workspace::create(temp.path()).unwrap();

        assert_eq!(ws.count_notes().unwrap(), 3);
        let tree = ws.list_tree().unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].note.title, "Welcome to Leafnotes");
        assert!(tree[1].note.is_folder);
        assert_eq!(tree[1].children[0].note.title, "Quick Tips");
    }

    #[test]
    fn test_open_existing_workspace() {
        let temp = NamedTempFile::new().unwrap();
        {
            Workspace::create(temp.path()).unwrap();
        }

        let ws = Workspace::open(temp.path()).unwrap();
        assert_eq!(ws.list_all_notes().unwrap().len(), 3);
    }

    #[test]
    fn test_open_or_create() {
        let temp = NamedTempFile::new().unwrap();
        let id = {
            let mut ws = Workspace::open_or_create(temp.path()).unwrap();
            ws.create_note(titled("Extra")).unwrap().id
        };

        let ws = Workspace::open_or_create(temp.path()).unwrap();
        assert_eq!(ws.count_notes().unwrap(), 4);
        assert_eq!(ws.get_note(&id).unwrap().title, "Extra");
    }

    #[test]
    fn test_in_memory_workspace_is_empty() {
        let ws = empty_workspace();
        assert_eq!(ws.count_notes().unwrap(), 0);
        assert!(ws.list_tree().unwrap().is_empty());
    }

    #[test]
    fn test_create_applies_defaults() {
        let mut ws = empty_workspace();
        let note = ws.create_note(CreateNote::default()).unwrap();

        assert_eq!(note.title, "Untitled");
        assert_eq!(note.content, "");
        assert_eq!(note.parent_id, None);
        assert!(!note.is_folder);
        assert_eq!(note.sort_order, 0);
        assert_eq!(note.id.len(), 32);
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(ws.get_note(&note.id).unwrap(), note);
    }

    #[test]
    fn test_create_with_supplied_id() {
        let mut ws = empty_workspace();
        let note = ws.create_note(titled("Mine").with_id("custom-1")).unwrap();
        assert_eq!(note.id, "custom-1");
        assert_eq!(ws.get_note("custom-1").unwrap().title, "Mine");

        let err = ws.create_note(titled("Dup").with_id("custom-1")).unwrap_err();
        assert!(matches!(err, LeafnotesError::Database(_)), "got {err:?}");
        assert_eq!(ws.count_notes().unwrap(), 1);
    }

    #[test]
    fn test_blank_title_falls_back_to_default() {
        let mut ws = empty_workspace();
        let note = ws.create_note(titled("   ")).unwrap();
        assert_eq!(note.title, "Untitled");
    }

    #[test]
    fn test_sort_order_is_per_sibling_group() {
        let mut ws = empty_workspace();
        let a = ws.create_note(titled("A")).unwrap();
        let f = ws.create_note(CreateNote::folder(None)).unwrap();
        let b = ws.create_note(CreateNote::note(Some(&f.id))).unwrap();
        let c = ws.create_note(CreateNote::note(Some(&f.id))).unwrap();
        let d = ws.create_note(titled("D")).unwrap();

        assert_eq!(a.sort_order, 0);
        assert_eq!(f.sort_order, 1);
        assert_eq!(b.sort_order, 0);
        assert_eq!(c.sort_order, 1);
        assert_eq!(d.sort_order, 2);
    }

    #[test]
    fn test_sort_order_continues_after_gap() {
        let mut ws = empty_workspace();
        let a = ws.create_note(titled("A")).unwrap();
        ws.update_note(&a.id, UpdateNote::sort_order(7)).unwrap();

        let b = ws.create_note(titled("B")).unwrap();
        assert_eq!(b.sort_order, 8);
    }

    #[test]
    fn test_create_under_missing_parent_fails() {
        let mut ws = empty_workspace();
        let err = ws
            .create_note(CreateNote::note(Some("does-not-exist")))
            .unwrap_err();
        assert!(err.is_not_found(), "got {err:?}");
        assert_eq!(ws.count_notes().unwrap(), 0);
    }

    #[test]
    fn test_get_missing_note() {
        let ws = empty_workspace();
        assert!(ws.get_note("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_blank_id_is_validation_error() {
        let mut ws = empty_workspace();
        assert!(matches!(
            ws.get_note(""),
            Err(LeafnotesError::ValidationFailed(_))
        ));
        assert!(matches!(
            ws.update_note(" ", UpdateNote::title("x")),
            Err(LeafnotesError::ValidationFailed(_))
        ));
        assert!(matches!(
            ws.delete_note(""),
            Err(LeafnotesError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_rename_leaves_other_fields() {
        let mut ws = empty_workspace();
        let f = ws.create_note(CreateNote::folder(None)).unwrap();
        let note = ws
            .create_note(CreateNote::note(Some(&f.id)).with_content("body"))
            .unwrap();

        let renamed = ws.rename_note(&note.id, "X").unwrap();
        assert_eq!(renamed.title, "X");
        assert_eq!(renamed.content, "body");
        assert_eq!(renamed.parent_id.as_deref(), Some(f.id.as_str()));
        assert_eq!(renamed.sort_order, note.sort_order);
        assert_eq!(renamed.created_at, note.created_at);
        assert!(renamed.updated_at > note.updated_at);
        assert_eq!(ws.get_note(&note.id).unwrap(), renamed);
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let mut ws = empty_workspace();
        let note = ws.create_note(titled("Keep")).unwrap();
        assert!(matches!(
            ws.rename_note(&note.id, ""),
            Err(LeafnotesError::ValidationFailed(_))
        ));
        assert_eq!(ws.get_note(&note.id).unwrap().title, "Keep");
    }

    #[test]
    fn test_update_missing_note() {
        let mut ws = empty_workspace();
        let err = ws.update_note("ghost", UpdateNote::content("x")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_consecutive_updates_advance_updated_at() {
        let mut ws = empty_workspace();
        let note = ws.create_note(titled("A")).unwrap();
        let first = ws.update_note(&note.id, UpdateNote::content("one")).unwrap();
        let second = ws.update_note(&note.id, UpdateNote::content("two")).unwrap();
        assert!(second.updated_at > first.updated_at);
        assert!(first.updated_at > note.updated_at);
    }

    #[test]
    fn test_move_keeps_sort_order() {
        let mut ws = empty_workspace();
        let a = ws.create_note(titled("A")).unwrap();
        let b = ws.create_note(titled("B")).unwrap();
        let f = ws.create_note(CreateNote::folder(None)).unwrap();

        let moved = ws.move_note(&b.id, Some(&f.id)).unwrap();
        assert_eq!(moved.sort_order, 1);
        assert_eq!(moved.parent_id.as_deref(), Some(f.id.as_str()));
        // Siblings left behind are not renumbered.
        assert_eq!(ws.get_note(&a.id).unwrap().sort_order, 0);
        assert_eq!(ws.get_note(&f.id).unwrap().sort_order, 2);
    }

    #[test]
    fn test_move_to_root() {
        let mut ws = empty_workspace();
        let f = ws.create_note(CreateNote::folder(None)).unwrap();
        let b = ws.create_note(CreateNote::note(Some(&f.id))).unwrap();

        let moved = ws.move_note(&b.id, None).unwrap();
        assert_eq!(moved.parent_id, None);
        assert_eq!(ws.get_children(None).unwrap().len(), 2);
        assert!(ws.get_children(Some(&f.id)).unwrap().is_empty());
    }

    #[test]
    fn test_move_into_self_rejected() {
        let mut ws = empty_workspace();
        let f = ws.create_note(CreateNote::folder(None)).unwrap();
        assert!(matches!(
            ws.move_note(&f.id, Some(&f.id)),
            Err(LeafnotesError::InvalidMove(_))
        ));
    }

    #[test]
    fn test_move_into_descendant_rejected() {
        let mut ws = empty_workspace();
        let top = ws.create_note(CreateNote::folder(None)).unwrap();
        let mid = ws.create_note(CreateNote::folder(Some(&top.id))).unwrap();
        let leaf = ws.create_note(CreateNote::note(Some(&mid.id))).unwrap();

        assert!(matches!(
            ws.move_note(&top.id, Some(&leaf.id)),
            Err(LeafnotesError::InvalidMove(_))
        ));
        assert_eq!(ws.get_note(&top.id).unwrap().parent_id, None);
    }

    #[test]
    fn test_move_to_missing_parent() {
        let mut ws = empty_workspace();
        let a = ws.create_note(titled("A")).unwrap();
        let err = ws.move_note(&a.id, Some("ghost")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_move_under_plain_note_allowed() {
        let mut ws = empty_workspace();
        let doc = ws.create_note(titled("Doc")).unwrap();
        let other = ws.create_note(titled("Other")).unwrap();

        ws.move_note(&other.id, Some(&doc.id)).unwrap();
        let tree = ws.list_tree().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children[0].note.id, other.id);
    }

    #[test]
    fn test_delete_leaf() {
        let mut ws = empty_workspace();
        let a = ws.create_note(titled("A")).unwrap();
        let b = ws.create_note(titled("B")).unwrap();

        let result = ws.delete_note(&a.id).unwrap();
        assert_eq!(result.deleted_count, 1);
        assert_eq!(result.affected_ids, vec![a.id.clone()]);
        assert!(ws.get_note(&a.id).unwrap_err().is_not_found());
        assert!(ws.get_note(&b.id).is_ok());
    }

    #[test]
    fn test_delete_cascades_through_subtree() {
        let mut ws = empty_workspace();
        let top = ws.create_note(CreateNote::folder(None)).unwrap();
        let mid = ws.create_note(CreateNote::folder(Some(&top.id))).unwrap();
        let leaf1 = ws.create_note(CreateNote::note(Some(&mid.id))).unwrap();
        let leaf2 = ws.create_note(CreateNote::note(Some(&top.id))).unwrap();
        let keep = ws.create_note(titled("Keep")).unwrap();

        let result = ws.delete_note(&top.id).unwrap();
        assert_eq!(result.deleted_count, 4);
        assert_eq!(result.affected_ids[0], top.id);
        for id in [&top.id, &mid.id, &leaf1.id, &leaf2.id] {
            assert!(result.contains(id));
            assert!(ws.get_note(id).unwrap_err().is_not_found());
        }
        assert_eq!(ws.count_notes().unwrap(), 1);
        assert!(ws.get_note(&keep.id).is_ok());
    }

    #[test]
    fn test_delete_missing_note() {
        let mut ws = empty_workspace();
        ws.create_note(titled("A")).unwrap();
        let err = ws.delete_note("ghost").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(ws.count_notes().unwrap(), 1);
    }

    #[test]
    fn test_list_all_orders_by_sort_then_creation() {
        let mut ws = empty_workspace();
        let a = ws.create_note(titled("A")).unwrap();
        let b = ws.create_note(titled("B")).unwrap();
        ws.update_note(&a.id, UpdateNote::sort_order(5)).unwrap();

        let order: Vec<String> = ws
            .list_all_notes()
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(order, vec![b.id, a.id]);
    }
}
