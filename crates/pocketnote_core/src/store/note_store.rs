//! Blob-backed note store.
//!
//! # Responsibility
//! - Provide list/save/delete over the `notes` blob.
//! - Serialize concurrent read-modify-write cycles in-process.
//!
//! # Invariants
//! - Every write replaces the full blob; there are no partial updates.
//! - Save never checks id uniqueness; delete removes every matching id.
//! - Log events carry counts and durations only, never note content.

use crate::model::note::Note;
use crate::storage::{KeyValueStore, StorageError};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Fixed storage key holding the serialized collection.
pub const NOTES_STORAGE_KEY: &str = "notes";

pub type NoteStoreResult<T> = Result<T, NoteStoreError>;

/// Failure of a note store operation.
#[derive(Debug)]
pub enum NoteStoreError {
    /// Stored blob is not a JSON array of note records.
    CorruptData(String),
    /// Underlying backend rejected the read or write, or the collection
    /// could not be encoded for writing.
    StorageUnavailable(StorageError),
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptData(details) => write!(f, "corrupt note data: {details}"),
            Self::StorageUnavailable(err) => write!(f, "note storage unavailable: {err}"),
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CorruptData(_) => None,
            Self::StorageUnavailable(err) => Some(err),
        }
    }
}

impl From<StorageError> for NoteStoreError {
    fn from(value: StorageError) -> Self {
        Self::StorageUnavailable(value)
    }
}

impl NoteStoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::CorruptData(_) => "corrupt_data",
            Self::StorageUnavailable(_) => "storage_unavailable",
        }
    }
}

/// Note collection persisted as one blob in a key-value backend.
pub struct NoteStore<S: KeyValueStore> {
    backend: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> NoteStore<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Borrows the underlying backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Returns the persisted collection in insertion order.
    ///
    /// # Errors
    /// - `CorruptData` when the blob is not a JSON array of notes.
    /// - `StorageUnavailable` when the backend read fails.
    pub fn get_notes(&self) -> NoteStoreResult<Vec<Note>> {
        let started_at = Instant::now();
        let result = self.read_collection();
        log_outcome("note_list", started_at, &result, |notes| notes.len());
        result
    }

    /// Appends `note` to the persisted collection.
    ///
    /// Duplicate ids are stored as-is.
    pub fn save_note(&self, note: &Note) -> NoteStoreResult<()> {
        let started_at = Instant::now();
        let result = self.mutate(|notes| notes.push(note.clone()));
        log_outcome("note_save", started_at, &result, |count| *count);
        result.map(|_| ())
    }

    /// Removes every note whose id equals `id`.
    ///
    /// Unknown ids leave the collection unchanged.
    pub fn delete_note(&self, id: &str) -> NoteStoreResult<()> {
        let started_at = Instant::now();
        let mut removed = 0;
        let result = self.mutate(|notes| {
            let before = notes.len();
            notes.retain(|note| note.id != id);
            removed = before - notes.len();
        });
        if result.is_ok() {
            debug!("event=note_delete module=store status=matched removed={removed}");
        }
        log_outcome("note_delete", started_at, &result, |count| *count);
        result.map(|_| ())
    }

    /// Runs one read-modify-write cycle and returns the written length.
    fn mutate(&self, apply: impl FnOnce(&mut Vec<Note>)) -> NoteStoreResult<usize> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut notes = self.read_collection()?;
        apply(&mut notes);
        self.write_collection(&notes)?;
        Ok(notes.len())
    }

    fn read_collection(&self) -> NoteStoreResult<Vec<Note>> {
        match self.backend.get(NOTES_STORAGE_KEY)? {
            None => Ok(Vec::new()),
            Some(blob) => serde_json::from_str(&blob)
                .map_err(|err| NoteStoreError::CorruptData(err.to_string())),
        }
    }

    fn write_collection(&self, notes: &[Note]) -> NoteStoreResult<()> {
        let blob = serde_json::to_string(notes).map_err(|err| {
            StorageError::Backend(format!("failed to encode note collection: {err}"))
        })?;
        self.backend.set(NOTES_STORAGE_KEY, &blob)?;
        Ok(())
    }
}

fn log_outcome<T>(
    event: &str,
    started_at: Instant,
    result: &NoteStoreResult<T>,
    count: impl FnOnce(&T) -> usize,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(value) => info!(
            "event={event} module=store status=ok count={} duration_ms={duration_ms}",
            count(value)
        ),
        Err(err) => error!(
            "event={event} module=store status=error duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        ),
    }
}
