//! List controllers consumed by rendering shells.
//!
//! # Responsibility
//! - Keep an ordered in-memory mirror of persisted notes.
//! - Guard editor input before it reaches the store.
//!
//! # Invariants
//! - After every completed operation the mirror matches the store, unless
//!   the store itself could not be read.

pub mod note_list;
