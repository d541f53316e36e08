//! The note store owns the live collection and is its only mutator.
//!
//! Every mutation is persisted before the call returns. Reads never touch
//! the persistence layer.
use std::collections::HashSet;

use chrono::{
    format::{Item, StrftimeItems},
    Local, Utc,
};
use log::{debug, info, warn};

use crate::{
    filter_notes, DeleteOutcome, KeyValueStore, Note, NoteId, NoteInput, NotePersistence,
    NoteStats, Result, TextNodeError,
};

/// Default `createdAt` layout, month/day/year without padding
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Prompt shown before a note is deleted
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this note?";

/// Yes/no gate for destructive actions
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Staged field values for an edit that has not been committed yet.
///
/// Dropping a draft abandons the edit; the original note is untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    id: NoteId,
    pub title: String,
    pub content: String,
    pub category: String,
}

impl EditDraft {
    pub fn id(&self) -> NoteId {
        self.id
    }

    fn input(&self) -> NoteInput {
        NoteInput::new(
            self.title.clone(),
            self.content.clone(),
            self.category.clone(),
        )
    }
}

/// Owns the ordered note collection, most recently created first.
pub struct NoteStore<S: KeyValueStore> {
    notes: Vec<Note>,
    last_note_id: Option<NoteId>,
    persistence: NotePersistence<S>,
    date_format: String,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Loads the persisted collection and returns a ready store
    pub fn open(persistence: NotePersistence<S>) -> Result<Self> {
        let notes = persistence.load()?;
        info!("Note store opened with {} notes", notes.len());

        Ok(Self {
            notes,
            last_note_id: None,
            persistence,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        })
    }

    /// Overrides the chrono format used for `createdAt`
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Result<Self> {
        let date_format = date_format.into();
        if StrftimeItems::new(&date_format).any(|item| item == Item::Error) {
            return Err(TextNodeError::ConfigError {
                message: format!("Invalid date format: {}", date_format),
            });
        }

        self.date_format = date_format;
        Ok(self)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn persistence(&self) -> &NotePersistence<S> {
        &self.persistence
    }

    /// Id of the note created most recently in this session, if it still exists
    pub fn last_note_id(&self) -> Option<NoteId> {
        self.last_note_id
    }

    pub fn last_note(&self) -> Option<&Note> {
        self.last_note_id.and_then(|id| self.find(id))
    }

    pub fn find(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Validates the input, inserts the new note at the front and persists.
    ///
    /// Fails with `EmptyNote` and leaves the store untouched when both the
    /// trimmed title and content are empty.
    pub fn create(
        &mut self,
        title: &str,
        content: &str,
        category: &str,
    ) -> Result<Note> {
        let input = NoteInput::new(title, content, category);
        let note = Note::new(self.next_id()?, &input, self.today())?;

        let previous_last = self.last_note_id;
        self.notes.insert(0, note.clone());
        self.last_note_id = Some(note.id);

        if let Err(e) = self.persistence.save(&self.notes) {
            // keep memory and storage in agreement
            self.notes.remove(0);
            self.last_note_id = previous_last;
            return Err(e);
        }

        info!("Created note {} ({})", note.id, note.title);
        Ok(note)
    }

    /// Removes the note after the confirmer agrees.
    pub fn delete(&mut self, id: NoteId, confirmer: &mut impl Confirm) -> Result<DeleteOutcome> {
        if !confirmer.confirm(DELETE_PROMPT) {
            debug!("Deletion of note {} cancelled", id);
            return Ok(DeleteOutcome::Cancelled);
        }

        let Some(index) = self.position(id) else {
            debug!("Delete requested for unknown note {}", id);
            return Ok(DeleteOutcome::NotFound);
        };

        let removed = self.notes.remove(index);
        if let Err(e) = self.persistence.save(&self.notes) {
            self.notes.insert(index, removed);
            return Err(e);
        }

        if self.last_note_id == Some(id) {
            self.last_note_id = None;
        }

        info!("Deleted note {} ({})", id, removed.title);
        Ok(DeleteOutcome::Deleted)
    }

    /// Stages the current fields of a note for editing. Nothing is removed.
    pub fn begin_edit(&self, id: NoteId) -> Option<EditDraft> {
        let note = self.find(id)?;
        debug!("Editing note {}", id);

        Some(EditDraft {
            id,
            title: note.title.clone(),
            content: note.content.clone(),
            category: note.category.clone(),
        })
    }

    /// Replaces the drafted note in place, keeping its id, position and
    /// creation date.
    ///
    /// Returns `Ok(None)` when the note no longer exists.
    pub fn commit_edit(&mut self, draft: EditDraft) -> Result<Option<Note>> {
        let Some(index) = self.position(draft.id) else {
            warn!("Note {} disappeared before its edit was committed", draft.id);
            return Ok(None);
        };

        let original = &self.notes[index];
        let updated = Note::new(original.id, &draft.input(), original.created_at.clone())?;

        let previous = std::mem::replace(&mut self.notes[index], updated.clone());
        if let Err(e) = self.persistence.save(&self.notes) {
            self.notes[index] = previous;
            return Err(e);
        }

        info!("Updated note {} ({})", updated.id, updated.title);
        Ok(Some(updated))
    }

    /// Case-insensitive search over title, content and category
    pub fn filter(&self, query: &str) -> Vec<Note> {
        filter_notes(&self.notes, query)
    }

    pub fn stats(&self) -> NoteStats {
        let categories: HashSet<&str> = self.notes.iter().map(|n| n.category.as_str()).collect();

        NoteStats {
            total_notes: self.notes.len(),
            total_categories: categories.len(),
        }
    }

    fn position(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    /// Current time in milliseconds, bumped past every id already in use
    fn next_id(&self) -> Result<NoteId> {
        let now = Utc::now().timestamp_millis();
        let highest = self.notes.iter().map(|n| n.id.as_i64()).max();

        match highest {
            Some(highest) if highest >= now => highest
                .checked_add(1)
                .map(NoteId)
                .ok_or(TextNodeError::IdExhausted { highest }),
            _ => Ok(NoteId(now)),
        }
    }

    fn today(&self) -> String {
        Local::now().format(&self.date_format).to_string()
    }
}
