//! CLI module for the textnode application
//!
//! This module handles the command-line interface for interacting with the
//! note store.
use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
};

use chrono::Utc;
use log::{debug, info};

use crate::{
    export_all, export_single, render_note, render_single_json, render_single_text, Commands,
    Config, DeleteOutcome, EscapedNote, ExportFile, ExportFormat, KeyValueStore, Note, NoteId,
    NoteStore, Result, TextNodeError,
};

/// Asks the yes/no question on the terminal, defaulting to no
pub struct TerminalConfirmer;

impl crate::Confirm for TerminalConfirmer {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{} [y/N]: ", prompt);
        if stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        if stdin().read_line(&mut input).is_err() {
            return false;
        }

        let input = input.trim().to_lowercase();
        input == "y" || input == "yes"
    }
}

/// CLI Application handler - processes CLI commands and interfaces with NoteStore
pub struct App<S: KeyValueStore> {
    /// The note store backend
    store: NoteStore<S>,

    /// Application configuration
    config: Config,

    /// Where `config --reset` writes to
    config_path: Option<PathBuf>,

    /// Whether to display verbose output
    verbose: bool,
}

impl<S: KeyValueStore> App<S> {
    /// Create a new CLI application with the given store and config
    pub fn new(
        store: NoteStore<S>,
        config: Config,
        config_path: Option<PathBuf>,
        verbose: bool,
    ) -> Self {
        Self {
            store,
            config,
            config_path,
            verbose,
        }
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Create {
                title,
                content,
                category,
            } => self.create_note(&title, &content, &category),

            Commands::List { json } => {
                let notes = self.store.notes().to_vec();
                self.display_notes(&notes, json, "Start by creating your first note!")
            }

            Commands::Search { query, json } => {
                let notes = self.store.filter(&query);
                self.display_notes(&notes, json, "No notes match your search.")
            }

            Commands::View { id, json, escaped } => self.view_note(NoteId(id), json, escaped),

            Commands::Edit {
                id,
                title,
                content,
                category,
            } => self.edit_note(NoteId(id), title, content, category),

            Commands::Delete { id, force } => self.handle_delete(NoteId(id), force),

            Commands::Export {
                id,
                last,
                format,
                output,
            } => self.handle_export(id.map(NoteId), last, format, output),

            Commands::Stats => {
                let stats = self.store.stats();
                println!("Total notes:      {}", stats.total_notes);
                println!("Total categories: {}", stats.total_categories);
                Ok(())
            }

            Commands::Config { show, reset } => self.handle_config(show, reset),
        }
    }

    fn create_note(&mut self, title: &str, content: &str, category: &str) -> Result<()> {
        let note = self.store.create(title, content, category)?;

        println!("{}", console::style("Note saved successfully!").green().bold());
        println!("Note created with ID: {}", note.id);
        Ok(())
    }

    fn view_note(&self, id: NoteId, json: bool, escaped: bool) -> Result<()> {
        let note = self
            .store
            .find(id)
            .ok_or(TextNodeError::NoteNotFound { id: id.as_i64() })?;

        if json {
            println!("{}", render_single_json(note)?);
        } else if escaped {
            let safe = EscapedNote::from(note);
            println!("ID:       {}", safe.id);
            println!("Title:    {}", safe.title);
            println!("Category: {}", safe.category);
            println!("Created:  {}", safe.created_at);
            println!("\n{}", safe.content);
        } else {
            println!("{}", render_single_text(note));
        }

        Ok(())
    }

    fn edit_note(
        &mut self,
        id: NoteId,
        title: Option<String>,
        content: Option<String>,
        category: Option<String>,
    ) -> Result<()> {
        let mut draft = self
            .store
            .begin_edit(id)
            .ok_or(TextNodeError::NoteNotFound { id: id.as_i64() })?;

        if title.is_none() && content.is_none() && category.is_none() {
            println!("Nothing to change for note {}.", id);
            return Ok(());
        }

        if let Some(title) = title {
            draft.title = title;
        }
        if let Some(content) = content {
            draft.content = content;
        }
        if let Some(category) = category {
            draft.category = category;
        }

        match self.store.commit_edit(draft)? {
            Some(note) => println!("Note '{}' ({}) updated.", note.title, note.id),
            None => return Err(TextNodeError::NoteNotFound { id: id.as_i64() }),
        }

        Ok(())
    }

    fn handle_delete(&mut self, id: NoteId, force: bool) -> Result<()> {
        let title = match self.store.find(id) {
            Some(note) => note.title.clone(),
            None => return Err(TextNodeError::NoteNotFound { id: id.as_i64() }),
        };

        let outcome = if force || !self.config.confirm_deletes {
            self.store.delete(id, &mut |_: &str| true)?
        } else {
            println!("You are about to delete '{}' ({}).", title, id);
            self.store.delete(id, &mut TerminalConfirmer)?
        };

        match outcome {
            DeleteOutcome::Deleted => println!("Note '{}' ({}) has been deleted.", title, id),
            DeleteOutcome::Cancelled => println!("Deletion cancelled."),
            DeleteOutcome::NotFound => println!("Note {} no longer exists.", id),
        }

        Ok(())
    }

    fn handle_export(
        &self,
        id: Option<NoteId>,
        last: bool,
        format: ExportFormat,
        output: Option<PathBuf>,
    ) -> Result<()> {
        let file = if let Some(id) = id {
            export_single(self.store.notes(), id, format)?
        } else if last {
            // outside the creating session, the newest note stands in
            self.store
                .last_note()
                .or_else(|| self.store.notes().first())
                .map(|note| render_note(note, format))
                .transpose()?
        } else {
            Some(export_all(self.store.notes(), format, Utc::now())?)
        };

        let Some(file) = file else {
            println!("No matching note, nothing exported.");
            return Ok(());
        };

        let dir = output.unwrap_or_else(|| self.config.export_dir.clone());
        self.write_export(&file, dir)
    }

    fn write_export(&self, file: &ExportFile, dir: PathBuf) -> Result<()> {
        let path = file.write_to(&dir)?;
        if self.verbose {
            println!("Wrote {} bytes ({})", file.contents.len(), file.mime_type);
        }
        println!("Exported to {}", path.display());
        Ok(())
    }

    fn handle_config(&self, show: bool, reset: bool) -> Result<()> {
        if reset {
            let path = self
                .config_path
                .clone()
                .or_else(Config::default_path)
                .ok_or_else(|| TextNodeError::ConfigError {
                    message: "Could not determine config file location".to_string(),
                })?;
            Config::default().save(&path)?;
            info!("Configuration reset at {}", path.display());
            println!("Configuration reset to defaults at {}", path.display());
        }

        if show || !reset {
            println!("{}", serde_json::to_string_pretty(&self.config)?);
        }

        Ok(())
    }

    /// Display notes in the requested format
    fn display_notes(&self, notes: &[Note], json: bool, empty_message: &str) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(notes)?);
            return Ok(());
        }

        if notes.is_empty() {
            println!("{}", empty_message);
            return Ok(());
        }

        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            println!("ID: {} | Created: {}", note.id, note.created_at);
            println!(
                "{} {}",
                console::style(&note.title).bold(),
                console::style(format!("[{}]", note.category)).cyan()
            );

            let preview = content_preview(&note.content, 100);
            if !preview.is_empty() {
                println!("{}", preview);
            }
        }

        let stats = self.store.stats();
        debug!("Displayed {} of {} notes", notes.len(), stats.total_notes);
        println!(
            "\nShowing {} of {} note{} in {} categor{}",
            notes.len(),
            stats.total_notes,
            if stats.total_notes == 1 { "" } else { "s" },
            stats.total_categories,
            if stats.total_categories == 1 { "y" } else { "ies" }
        );

        Ok(())
    }
}

/// First non-empty line, cut to `max_chars` characters
fn content_preview(content: &str, max_chars: usize) -> String {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
