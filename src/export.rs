//! Export of notes to downloadable text and JSON files.
//!
//! Exports carry the raw field values; markup escaping is never applied here.
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use log::{debug, info};
use serde::Serialize;

use crate::{underscore_whitespace, write_atomically, ExportFormat, Note, NoteId, Result};

/// Application name written into collection exports
pub const APP_NAME: &str = "TextNode";

/// Filename prefix for collection exports
pub const ALL_NOTES_PREFIX: &str = "TextNode_All_Notes_";

const ALL_NOTES_BANNER: &str = "TEXTNODE - All Notes";

/// A rendered export, ready to be written or handed to a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ExportFile {
    /// Writes the file into `dir` and returns the full path.
    ///
    /// Path separators in the filename are replaced so the file always lands
    /// directly inside `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let name: String = self
            .filename
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        let path = dir.join(name);
        write_atomically(&path, &self.contents)?;
        info!("Exported {} to {}", self.filename, path.display());
        Ok(path)
    }
}

/// Wrapper object for a full-collection JSON export
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionExport<'a> {
    app: &'static str,
    export_date: String,
    total_notes: usize,
    notes: &'a [Note],
}

/// Plain text rendering of one note, title underlined with `=`
pub fn render_single_text(note: &Note) -> String {
    format!(
        "{}\n{}\n\nCategory: {}\nCreated: {}\n\n{}",
        note.title,
        "=".repeat(note.title.chars().count()),
        note.category,
        note.created_at,
        note.content
    )
}

/// Pretty-printed JSON of one note's full field set
pub fn render_single_json(note: &Note) -> Result<String> {
    Ok(serde_json::to_string_pretty(note)?)
}

/// Plain text rendering of the collection, numbered in collection order
pub fn render_all_text(notes: &[Note]) -> String {
    let mut out = format!("{}\n{}\n\n", ALL_NOTES_BANNER, "=".repeat(30));

    for (index, note) in notes.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, note.title));
        out.push_str(&format!(
            "Category: {} | Created: {}\n",
            note.category, note.created_at
        ));
        out.push_str(&"-".repeat(40));
        out.push('\n');
        out.push_str(&note.content);
        out.push_str("\n\n");
    }

    out
}

/// JSON document wrapping the collection with app name, export time and count
pub fn render_all_json(notes: &[Note], exported_at: DateTime<Utc>) -> Result<String> {
    let document = CollectionExport {
        app: APP_NAME,
        export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        total_notes: notes.len(),
        notes,
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

/// `<Title_with_underscores>.<ext>`
pub fn single_note_filename(title: &str, format: ExportFormat) -> String {
    format!("{}.{}", underscore_whitespace(title), format.extension())
}

/// `TextNode_All_Notes_<YYYY-MM-DD>.<ext>`
pub fn all_notes_filename(date: NaiveDate, format: ExportFormat) -> String {
    format!(
        "{}{}.{}",
        ALL_NOTES_PREFIX,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Renders a single note as an export file
pub fn render_note(note: &Note, format: ExportFormat) -> Result<ExportFile> {
    let contents = match format {
        ExportFormat::Text => render_single_text(note),
        ExportFormat::Json => render_single_json(note)?,
    };

    Ok(ExportFile {
        filename: single_note_filename(&note.title, format),
        mime_type: format.mime_type(),
        contents,
    })
}

/// Exports the note with `id`; `Ok(None)` when no such note exists.
pub fn export_single(notes: &[Note], id: NoteId, format: ExportFormat) -> Result<Option<ExportFile>> {
    let Some(note) = notes.iter().find(|note| note.id == id) else {
        debug!("Export requested for unknown note {}, nothing produced", id);
        return Ok(None);
    };

    render_note(note, format).map(Some)
}

/// Exports the whole collection as of `now`
pub fn export_all(notes: &[Note], format: ExportFormat, now: DateTime<Utc>) -> Result<ExportFile> {
    let contents = match format {
        ExportFormat::Text => render_all_text(notes),
        ExportFormat::Json => render_all_json(notes, now)?,
    };

    debug!("Rendered {} notes as {:?}", notes.len(), format);
    Ok(ExportFile {
        filename: all_notes_filename(now.date_naive(), format),
        mime_type: format.mime_type(),
        contents,
    })
}
