//! Domain model for persisted notes.
//!
//! # Responsibility
//! - Define the record shape stored inside the `notes` blob.
//! - Keep id generation and timestamp normalization next to the data.
//!
//! # Invariants
//! - Timestamps are epoch milliseconds once loaded into memory.

pub mod note;
