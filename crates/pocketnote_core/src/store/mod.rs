//! Note persistence over a key-value slot.
//!
//! # Responsibility
//! - Keep the whole note collection in one JSON blob under a fixed key.
//! - Surface corrupt blobs and backend failures instead of masking them.
//!
//! # Invariants
//! - An absent key is an empty collection.
//! - Read-modify-write cycles on one `NoteStore` never interleave.

pub mod note_store;
