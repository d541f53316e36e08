//! Error types for the textnode application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur during note management operations.

use std::io;

use thiserror::Error;

/// The main error type for the textnode application.
#[derive(Error, Debug)]
pub enum TextNodeError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Both title and content were empty after trimming.
    #[error("Please enter a title or content")]
    EmptyNote,

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: i64 },

    /// The stored collection holds two notes with the same id.
    #[error("Duplicate note id in stored data: {id}")]
    DuplicateNoteId { id: i64 },

    /// No id above the highest existing one can be issued.
    #[error("No note id left after {highest}")]
    IdExhausted { highest: i64 },

    /// Storage key that cannot be mapped onto the substrate.
    #[error("Invalid storage key: {key:?}")]
    InvalidKey { key: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}
