//! Core domain logic for PocketNote.
//! This crate owns note persistence and the list mirror shown by shells.

pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;

pub use controller::note_list::{
    Clock, ControllerError, ListState, NoteListController, SystemClock,
};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogSink,
};
pub use model::note::{Note, NoteId};
pub use storage::memory::MemoryStore;
pub use storage::sqlite::SqliteStore;
pub use storage::{KeyValueStore, StorageError, StorageResult};
pub use store::note_store::{NoteStore, NoteStoreError, NoteStoreResult, NOTES_STORAGE_KEY};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
