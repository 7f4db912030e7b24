//! FFI note-list API for the mobile shell.
//!
//! # Responsibility
//! - Expose list/add/remove over one process-wide note controller.
//! - Translate core errors into response envelopes Dart can render.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - The backing database path is resolved once per process.
//! - Every call sees the controller after its first successful load.

use log::warn;
use pocketnote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Note, NoteListController, NoteStore, SqliteStore,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const DB_FILE_NAME: &str = "pocketnote.sqlite3";
const DB_PATH_ENV: &str = "POCKETNOTE_DB_PATH";

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static CONTROLLER: Mutex<Option<NoteListController<SqliteStore>>> = Mutex::new(None);

/// Health-check probe.
///
/// # FFI contract
/// - Sync call, non-blocking. Never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes rolling file logs once per process.
///
/// Returns an empty string on success and the error message otherwise.
/// Repeating the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One note as rendered by the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub content: String,
    /// Creation time in epoch milliseconds.
    pub timestamp_ms: i64,
}

impl From<&Note> for NoteItem {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.to_string(),
            content: note.content.clone(),
            timestamp_ms: note.timestamp,
        }
    }
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResponse {
    pub ok: bool,
    /// Current mirror in insertion order; empty on failure.
    pub items: Vec<NoteItem>,
    /// Human-readable status for diagnostics/UI.
    pub message: String,
}

/// Add/remove response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Affected note id when known.
    pub note_id: Option<String>,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: String) -> Self {
        Self {
            ok: true,
            note_id: Some(note_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

/// Returns the current note list, loading it on first use.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures return `ok=false` with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> NotesListResponse {
    let listed = with_controller(|controller| {
        Ok(controller
            .notes()
            .iter()
            .map(NoteItem::from)
            .collect::<Vec<_>>())
    });
    match listed {
        Ok(items) => {
            let message = if items.is_empty() {
                "No notes.".to_string()
            } else {
                format!("{} note(s).", items.len())
            };
            NotesListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => NotesListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("notes_list failed: {err}"),
        },
    }
}

/// Creates a note from editor input.
///
/// Blank input is rejected before anything is written.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_add(content: String) -> NoteActionResponse {
    match with_controller(|controller| {
        controller
            .add_note(content.as_str())
            .map_err(|err| err.to_string())
    }) {
        Ok(note) => NoteActionResponse::success("Note saved.", note.id.into_string()),
        Err(err) => NoteActionResponse::failure(format!("notes_add failed: {err}")),
    }
}

/// Deletes every note with `id`. Unknown ids succeed.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_remove(id: String) -> NoteActionResponse {
    let id = id.trim().to_string();
    match with_controller(|controller| {
        controller
            .remove_note(id.as_str())
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => NoteActionResponse::success("Note deleted.", id),
        Err(err) => NoteActionResponse::failure(format!("notes_remove failed: {err}")),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_controller<T>(
    f: impl FnOnce(&mut NoteListController<SqliteStore>) -> Result<T, String>,
) -> Result<T, String> {
    let mut slot = CONTROLLER.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.is_none() {
        let db_path = resolve_db_path();
        let store = SqliteStore::open(&db_path).map_err(|err| {
            warn!("event=ffi_open module=ffi status=error error={err}");
            format!("note DB open failed: {err}")
        })?;
        *slot = Some(NoteListController::new(NoteStore::new(store)));
    }

    let controller = slot
        .as_mut()
        .ok_or_else(|| "note controller unavailable".to_string())?;
    if controller.is_loading() {
        controller.load().map_err(|err| err.to_string())?;
    }
    f(controller)
}
