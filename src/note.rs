//! Core data structures for the textnode application.
//!
//! This module contains the `Note` record, its identifier type and the
//! trimming/defaulting rules applied to user input before a note exists.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, TextNodeError};

/// Title used when the user only supplied content
pub const DEFAULT_TITLE: &str = "Untitled Note";

/// Category used when the user left the category blank
pub const DEFAULT_CATEGORY: &str = "General";

/// Stable identity of a note, milliseconds since the epoch at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl NoteId {
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NoteId {
    fn from(value: i64) -> Self {
        NoteId(value)
    }
}

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note
    pub id: NoteId,
    /// Note title, never empty
    pub title: String,
    /// Free text body, may be empty
    pub content: String,
    /// Category label, never empty
    pub category: String,
    /// Localized creation date, fixed once the note exists
    pub created_at: String,
}

/// User supplied fields, before trimming and defaulting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl NoteInput {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
        }
    }

    /// Trims every field and applies the title/category defaults.
    ///
    /// Fails with `EmptyNote` when both title and content are blank.
    pub fn normalize(&self) -> Result<NoteInput> {
        let title = self.title.trim();
        let content = self.content.trim();
        let category = self.category.trim();

        if title.is_empty() && content.is_empty() {
            return Err(TextNodeError::EmptyNote);
        }

        Ok(NoteInput {
            title: if title.is_empty() { DEFAULT_TITLE } else { title }.to_string(),
            content: content.to_string(),
            category: if category.is_empty() {
                DEFAULT_CATEGORY
            } else {
                category
            }
            .to_string(),
        })
    }
}

impl Note {
    /// Creates a new note from raw input, trimming and defaulting its fields
    pub fn new(id: NoteId, input: &NoteInput, created_at: String) -> Result<Self> {
        let NoteInput {
            title,
            content,
            category,
        } = input.normalize()?;

        Ok(Note {
            id,
            title,
            content,
            category,
            created_at,
        })
    }
}
