//! Selection tracking and debounced content saving for the open note.
//!
//! [`AutosaveCoordinator`] is the client-side session state: which note is
//! open, which edits are waiting to be written, and the save indicator shown
//! to the user. It owns no timers. Callers pass the current [`Instant`] into
//! every time-dependent call and use [`AutosaveCoordinator::next_deadline`]
//! to decide when to call [`AutosaveCoordinator::poll`] again.
//!
//! ## Save status
//!
//! `Idle` → `Saving` (a write is in flight) → `Saved` (for the configured
//! display window) → `Idle`. `Saved` is only shown when the written note is
//! still the selected one. A failed write goes straight from `Saving` back
//! to `Idle`; the failure is logged and the edit is not reported as saved.
//!
//! ## Debounce
//!
//! Each note has at most one pending save. A new edit replaces the pending
//! content and pushes its deadline out by the quiet period. Only one write is
//! in flight at a time; saves that come due meanwhile wait for it to finish.
//! Nothing is retried.

use crate::{DeleteResult, LeafnotesError, Note, Result, UpdateNote, Workspace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Persistence operations the coordinator needs from the note store.
pub trait NoteStore {
    fn get_note(&self, note_id: &str) -> Result<Note>;
    fn update_note(&mut self, note_id: &str, changes: UpdateNote) -> Result<Note>;
}

impl NoteStore for Workspace {
    fn get_note(&self, note_id: &str) -> Result<Note> {
        Workspace::get_note(self, note_id)
    }

    fn update_note(&mut self, note_id: &str, changes: UpdateNote) -> Result<Note> {
        Workspace::update_note(self, note_id, changes)
    }
}

/// Timing policy for autosave, owned by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Inactivity required after the last edit before it is written.
    pub quiet_period: Duration,
    /// How long the "saved" indicator stays up after a successful write.
    pub saved_display: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(500),
            saved_display: Duration::from_millis(2000),
        }
    }
}

/// Save indicator state as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
}

/// A content write handed out by [`AutosaveCoordinator::begin_due_save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub note_id: String,
    pub content: String,
}

#[derive(Debug, Clone)]
struct PendingSave {
    content: String,
    due: Instant,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Saving,
    Saved { until: Instant },
}

/// Session state for the open note and its pending saves.
#[derive(Debug)]
pub struct AutosaveCoordinator {
    config: AutosaveConfig,
    selected: Option<Note>,
    pending: HashMap<String, PendingSave>,
    in_flight: Option<String>,
    phase: Phase,
}

impl Default for AutosaveCoordinator {
    fn default() -> Self {
        Self::new(AutosaveConfig::default())
    }
}

impl AutosaveCoordinator {
    pub fn new(config: AutosaveConfig) -> Self {
        Self {
            config,
            selected: None,
            pending: HashMap::new(),
            in_flight: None,
            phase: Phase::Idle,
        }
    }

    pub fn config(&self) -> AutosaveConfig {
        self.config
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|note| note.id.as_str())
    }

    pub fn status(&self) -> SaveStatus {
        match self.phase {
            Phase::Idle => SaveStatus::Idle,
            Phase::Saving => SaveStatus::Saving,
            Phase::Saved { .. } => SaveStatus::Saved,
        }
    }

    /// Returns `true` if an edit to `note_id` is waiting for its deadline.
    pub fn has_pending(&self, note_id: &str) -> bool {
        self.pending.contains_key(note_id)
    }

    /// What the editor should show for the selected note: the newest
    /// unsaved edit if there is one, otherwise the stored content.
    pub fn editor_content(&self) -> Option<&str> {
        let note = self.selected.as_ref()?;
        Some(
            self.pending
                .get(&note.id)
                .map_or(note.content.as_str(), |p| p.content.as_str()),
        )
    }

    /// Fetches `note_id` and makes it the selection, replacing the previous
    /// one wholesale. Pending saves for other notes are kept; they carry
    /// their own note ID and cannot land on the new selection.
    ///
    /// # Errors
    ///
    /// Propagates the store error; the previous selection is kept on failure.
    pub fn select<S: NoteStore + ?Sized>(&mut self, store: &S, note_id: &str) -> Result<&Note> {
        let note = store.get_note(note_id)?;
        log::debug!("selected note {note_id}");
        Ok(self.selected.insert(note))
    }

    /// Drops the selection and discards its unsaved edit. Call
    /// [`flush`](Self::flush) first to keep it.
    pub fn clear_selection(&mut self) {
        if let Some(note) = self.selected.take() {
            if self.pending.remove(&note.id).is_some() {
                log::debug!("discarded pending save for {}", note.id);
            }
        }
    }

    /// Buffers `content` for the selected note and (re)starts its quiet
    /// period. Returns `false`, doing nothing, when no note is selected.
    pub fn edit_content(&mut self, content: impl Into<String>, now: Instant) -> bool {
        let Some(note_id) = self.selected_id().map(str::to_string) else {
            return false;
        };
        let due = now + self.config.quiet_period;
        self.pending.insert(
            note_id,
            PendingSave {
                content: content.into(),
                due,
            },
        );
        true
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let next_save = if self.in_flight.is_some() {
            None
        } else {
            self.pending.values().map(|p| p.due).min()
        };
        let indicator = match self.phase {
            Phase::Saved { until } => Some(until),
            _ => None,
        };
        match (next_save, indicator) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Reverts an expired "saved" indicator to idle.
    pub fn tick(&mut self, now: Instant) {
        if let Phase::Saved { until } = self.phase {
            if now >= until {
                self.phase = Phase::Idle;
            }
        }
    }

    /// Takes the earliest pending save whose deadline has passed and marks
    /// it in flight. Returns `None` while another write is in flight.
    pub fn begin_due_save(&mut self, now: Instant) -> Option<SaveRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        let note_id = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= now)
            .min_by_key(|(_, p)| p.due)
            .map(|(id, _)| id.clone())?;
        let pending = self.pending.remove(&note_id)?;

        self.in_flight = Some(note_id.clone());
        self.phase = Phase::Saving;
        Some(SaveRequest {
            note_id,
            content: pending.content,
        })
    }

    /// Records the outcome of a write started by
    /// [`begin_due_save`](Self::begin_due_save).
    ///
    /// On success the selected note, if it is still the one that was saved,
    /// is replaced by the stored record and the indicator shows `Saved`.
    /// On failure the error is logged and the indicator returns to `Idle`.
    pub fn finish_save(
        &mut self,
        request: SaveRequest,
        outcome: Result<Note>,
        now: Instant,
    ) -> Option<Note> {
        match outcome {
            Ok(saved) => {
                self.save_succeeded(&saved, now);
                Some(saved)
            }
            Err(err) => {
                self.save_failed(&request.note_id, &err);
                None
            }
        }
    }

    /// Writes every save that is due at `now` and expires the indicator.
    /// Returns the records that were stored successfully.
    pub fn poll<S: NoteStore + ?Sized>(&mut self, store: &mut S, now: Instant) -> Vec<Note> {
        self.tick(now);
        let mut saved = Vec::new();
        while let Some(request) = self.begin_due_save(now) {
            let outcome = store.update_note(&request.note_id, UpdateNote::content(request.content.clone()));
            saved.extend(self.finish_save(request, outcome, now));
        }
        saved
    }

    /// Writes all pending saves immediately, ignoring their deadlines.
    ///
    /// # Errors
    ///
    /// Unlike [`poll`](Self::poll), returns the first store error so callers
    /// shutting down can report lost edits. Remaining saves are still
    /// attempted.
    pub fn flush<S: NoteStore + ?Sized>(&mut self, store: &mut S, now: Instant) -> Result<usize> {
        for pending in self.pending.values_mut() {
            pending.due = pending.due.min(now);
        }
        let mut first_error: Option<LeafnotesError> = None;
        let mut written = 0;
        while let Some(request) = self.begin_due_save(now) {
            match store.update_note(&request.note_id, UpdateNote::content(request.content)) {
                Ok(saved) => {
                    self.save_succeeded(&saved, now);
                    written += 1;
                }
                Err(err) => {
                    self.save_failed(&request.note_id, &err);
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(written),
        }
    }

    fn save_succeeded(&mut self, saved: &Note, now: Instant) {
        if self.in_flight.as_deref() == Some(saved.id.as_str()) {
            self.in_flight = None;
        }
        // The indicator belongs to the open note; a background save for a
        // note that is no longer selected only clears `Saving`.
        if self.selected_id() == Some(saved.id.as_str()) {
            self.selected = Some(saved.clone());
            self.phase = Phase::Saved {
                until: now + self.config.saved_display,
            };
        } else if matches!(self.phase, Phase::Saving) {
            self.phase = Phase::Idle;
        }
        log::debug!("autosaved note {}", saved.id);
    }

    fn save_failed(&mut self, note_id: &str, err: &LeafnotesError) {
        if self.in_flight.as_deref() == Some(note_id) {
            self.in_flight = None;
        }
        self.phase = Phase::Idle;
        log::warn!("autosave of note {note_id} failed: {err}");
    }

    /// Reacts to a cascading delete: drops pending saves for removed notes
    /// and clears the selection if the open note was among them.
    pub fn on_deleted(&mut self, result: &DeleteResult) {
        self.pending.retain(|id, _| !result.contains(id));
        if self.selected_id().is_some_and(|id| result.contains(id)) {
            self.selected = None;
        }
    }
}
