//! Note list controller.
//!
//! # Responsibility
//! - Load the persisted collection once and expose it as an ordered mirror.
//! - Apply add/remove commands to the store first, then to the mirror.
//! - Reconcile the mirror from the store after a failed command.
//!
//! # Invariants
//! - Empty or whitespace-only content never reaches the store.
//! - Commands on an uninitialized controller load the collection first.
//! - `last_error` describes the most recent failed operation and is cleared
//!   by the next successful one.

use crate::model::note::Note;
use crate::storage::KeyValueStore;
use crate::store::note_store::{NoteStore, NoteStoreError};
use chrono::Utc;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Source of creation timestamps in epoch milliseconds.
pub trait Clock {
    fn now_epoch_ms(&self) -> i64;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

impl<F: Fn() -> i64> Clock for F {
    fn now_epoch_ms(&self) -> i64 {
        self()
    }
}

/// Lifecycle of the in-memory mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// Collection has not been read yet.
    Uninitialized,
    /// Mirror holds the last collection read or written.
    Loaded,
}

/// Failure of a controller command.
#[derive(Debug)]
pub enum ControllerError {
    /// Editor content was empty after trimming.
    EmptyContent,
    /// Store read or write failed.
    Store(NoteStoreError),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "note content cannot be empty"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyContent => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<NoteStoreError> for ControllerError {
    fn from(value: NoteStoreError) -> Self {
        Self::Store(value)
    }
}

/// In-memory mirror of a `NoteStore` with add/remove commands.
pub struct NoteListController<S: KeyValueStore> {
    store: NoteStore<S>,
    clock: Box<dyn Clock + Send + Sync>,
    notes: Vec<Note>,
    state: ListState,
    last_error: Option<String>,
}

impl<S: KeyValueStore> NoteListController<S> {
    /// Creates an uninitialized controller using the wall clock.
    pub fn new(store: NoteStore<S>) -> Self {
        Self::with_clock(store, SystemClock)
    }

    /// Creates an uninitialized controller with a custom clock.
    pub fn with_clock(store: NoteStore<S>, clock: impl Clock + Send + Sync + 'static) -> Self {
        Self {
            store,
            clock: Box::new(clock),
            notes: Vec::new(),
            state: ListState::Uninitialized,
            last_error: None,
        }
    }

    /// Current mirror in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    /// True until the first successful load.
    pub fn is_loading(&self) -> bool {
        self.state == ListState::Uninitialized
    }

    /// Message of the most recent failed operation, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    /// Loads (or reloads) the full collection into the mirror.
    ///
    /// On failure the previous mirror and state are kept.
    pub fn load(&mut self) -> Result<&[Note], ControllerError> {
        match self.store.get_notes() {
            Ok(notes) => {
                self.notes = notes;
                self.state = ListState::Loaded;
                self.last_error = None;
                info!(
                    "event=note_list_load module=controller status=ok count={}",
                    self.notes.len()
                );
                Ok(&self.notes)
            }
            Err(err) => {
                warn!("event=note_list_load module=controller status=error error={err}");
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Creates a note from editor input and appends it to the mirror.
    ///
    /// # Errors
    /// - `EmptyContent` when `content` is blank; the store is not touched.
    /// - `Store` when persistence fails; the mirror is re-read from the store.
    pub fn add_note(&mut self, content: &str) -> Result<Note, ControllerError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ControllerError::EmptyContent);
        }
        self.ensure_loaded()?;

        let note = Note::new(content, self.clock.now_epoch_ms());
        if let Err(err) = self.store.save_note(&note) {
            return Err(self.fail("note_add", err));
        }

        self.notes.push(note.clone());
        self.last_error = None;
        Ok(note)
    }

    /// Deletes every note with `id` from the store and the mirror.
    ///
    /// Unknown ids are a no-op.
    pub fn remove_note(&mut self, id: &str) -> Result<(), ControllerError> {
        self.ensure_loaded()?;

        if let Err(err) = self.store.delete_note(id) {
            return Err(self.fail("note_remove", err));
        }

        self.notes.retain(|note| note.id != id);
        self.last_error = None;
        Ok(())
    }

    fn ensure_loaded(&mut self) -> Result<(), ControllerError> {
        if self.state == ListState::Uninitialized {
            self.load()?;
        }
        Ok(())
    }

    fn fail(&mut self, event: &str, err: NoteStoreError) -> ControllerError {
        warn!("event={event} module=controller status=error error={err}");
        self.last_error = Some(err.to_string());
        self.reconcile();
        ControllerError::Store(err)
    }

    fn reconcile(&mut self) {
        match self.store.get_notes() {
            Ok(notes) => {
                self.notes = notes;
                self.state = ListState::Loaded;
                info!(
                    "event=note_list_reconcile module=controller status=ok count={}",
                    self.notes.len()
                );
            }
            Err(err) => warn!(
                "event=note_list_reconcile module=controller status=error error={err}"
            ),
        }
    }
}
