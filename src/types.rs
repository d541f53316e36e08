//! Shared types for the textnode application.
//!
//! This module contains the result alias, the outcome types returned by the
//! note store and the CLI command definitions.
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::TextNodeError;

/// A specialized Result type for textnode operations.
pub type Result<T> = std::result::Result<T, TextNodeError>;

/// What happened when a delete was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The note was removed and the collection persisted
    Deleted,
    /// The user declined the confirmation, nothing changed
    Cancelled,
    /// No note carries the requested id, nothing changed
    NotFound,
}

/// Aggregate numbers shown next to the note list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteStats {
    /// Number of live notes
    pub total_notes: usize,
    /// Number of distinct category labels
    pub total_categories: usize,
}

/// File formats supported by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Human readable plain text
    Text,
    /// Pretty-printed JSON
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Available subcommands for the textnode application
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    Create {
        /// Title of the note
        #[clap(short = 'T', long, default_value = "")]
        title: String,

        /// Content of the note
        #[clap(short, long, default_value = "")]
        content: String,

        /// Category of the note (defaults to "General")
        #[clap(short = 'C', long, default_value = "")]
        category: String,
    },

    /// List all notes, most recent first
    List {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Search notes by title, content or category
    Search {
        /// Case-insensitive search text
        query: String,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// View a note by ID
    View {
        /// ID of the note to view
        id: i64,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,

        /// Escape the fields for markup display
        #[clap(short, long)]
        escaped: bool,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: i64,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,

        /// New category for the note
        #[clap(short = 'C', long)]
        category: Option<String>,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: i64,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Export one note or the whole collection to a file
    Export {
        /// ID of a single note to export
        #[clap(short, long, conflicts_with = "last")]
        id: Option<i64>,

        /// Export the most recently created note
        #[clap(short, long)]
        last: bool,

        /// Format to export to
        #[clap(short, long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,

        /// Directory where the exported file will be written
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Show note and category counts
    Stats,

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,

        /// Reset configuration to defaults
        #[clap(short, long)]
        reset: bool,
    },
}
