//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical `{id, content, timestamp}` record.
//! - Generate collision-free ids for newly created notes.
//! - Normalize legacy timestamp shapes to epoch milliseconds on read.
//!
//! # Invariants
//! - `timestamp` is always epoch milliseconds in memory and on write.
//! - Ids read from storage are kept verbatim, even if they collide.

use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Identifier of one note inside the collection.
///
/// Serialized as a bare JSON string. Older blobs used millisecond
/// timestamps as ids, so any string is accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for NoteId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NoteId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One user-authored text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Trimmed, non-empty text when created through the controller.
    pub content: String,
    /// Creation time in Unix epoch milliseconds.
    #[serde(deserialize_with = "deserialize_epoch_ms")]
    pub timestamp: i64,
}

impl Note {
    /// Creates a note with a generated id.
    pub fn new(content: impl Into<String>, timestamp: i64) -> Self {
        Self::with_id(NoteId::generate(), content, timestamp)
    }

    /// Creates a note with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(id: impl Into<NoteId>, content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            timestamp,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

fn deserialize_epoch_ms<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(value) => Ok(value),
        RawTimestamp::Fractional(value) => fractional_to_epoch_ms(value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "timestamp `{value}` is outside the epoch millisecond range"
            ))
        }),
        RawTimestamp::Text(text) => parse_timestamp_text(&text).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "timestamp `{text}` is neither epoch milliseconds nor RFC 3339"
            ))
        }),
    }
}

/// Truncates a fractional timestamp; `None` when it does not fit in `i64`.
fn fractional_to_epoch_ms(value: f64) -> Option<i64> {
    // `i64::MAX as f64` rounds up to 2^63, hence the strict upper bound.
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.is_finite() && in_range).then(|| value.trunc() as i64)
}

/// Parses a textual timestamp into epoch milliseconds.
///
/// Accepts digit strings (epoch milliseconds) and RFC 3339 / ISO-8601
/// date-times such as `2024-03-01T09:30:00.000Z`.
pub fn parse_timestamp_text(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Ok(millis) = trimmed.parse::<i64>() {
        return Some(millis);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|parsed| parsed.timestamp_millis())
}
