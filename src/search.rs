use log::{debug, trace};

use crate::Note;

/// Returns the notes whose title, content or category contains `query`,
/// ignoring case. An empty query matches every note. Source order is kept.
pub fn filter_notes(notes: &[Note], query: &str) -> Vec<Note> {
    let needle = query.to_lowercase();
    trace!("Filtering {} notes with query '{}'", notes.len(), query);

    let matches: Vec<Note> = notes
        .iter()
        .filter(|note| note_matches(note, &needle))
        .cloned()
        .collect();

    debug!("Query '{}' matched {} of {} notes", query, matches.len(), notes.len());
    matches
}

/// `needle` must already be lower-cased
fn note_matches(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle)
        || note.content.to_lowercase().contains(needle)
        || note.category.to_lowercase().contains(needle)
}
