use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, trace};
use tempfile::NamedTempFile;

use crate::{Note, Result, TextNodeError};

/// Writes `contents` to `path` through a temporary file in the same
/// directory, so readers never observe a half-written file.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if !dir.exists() {
        debug!("Creating parent directory: {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| {
            error!("Failed to create directory {}: {}", dir.display(), e);
            TextNodeError::Io(e)
        })?;
    }

    trace!("Creating temporary file in directory: {}", dir.display());
    let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| {
        error!("Failed to create temporary file: {}", e);
        TextNodeError::Io(e)
    })?;

    temp_file.write_all(contents.as_bytes()).map_err(|e| {
        error!("Failed to write to temporary file: {}", e);
        TextNodeError::Io(e)
    })?;

    temp_file.flush().map_err(|e| {
        error!("Failed to flush temporary file: {}", e);
        TextNodeError::Io(e)
    })?;

    temp_file.persist(path).map_err(|e| {
        error!("Failed to persist file {}: {}", path.display(), e.error);
        TextNodeError::Io(e.error)
    })?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Escapes the characters that are significant in HTML markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// A note whose user supplied fields are safe to embed in markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapedNote {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: String,
}

impl From<&Note> for EscapedNote {
    fn from(note: &Note) -> Self {
        EscapedNote {
            id: note.id.as_i64(),
            title: escape_html(&note.title),
            content: escape_html(&note.content),
            category: escape_html(&note.category),
            created_at: note.created_at.clone(),
        }
    }
}

/// Replaces every run of whitespace with a single underscore
pub fn underscore_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Expands a leading `~` to the user's home directory
pub fn expand_home(path: PathBuf) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(dirs) = directories::UserDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_five_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
        );
    }

    #[test]
    fn escaping_leaves_plain_text_alone() {
        assert_eq!(escape_html("milk, eggs"), "milk, eggs");
    }

    #[test]
    fn whitespace_runs_collapse_to_one_underscore() {
        assert_eq!(underscore_whitespace("Weekly  team\tsync"), "Weekly_team_sync");
        assert_eq!(underscore_whitespace(" a "), "_a_");
    }

    #[test]
    fn atomic_write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");
        write_atomically(&path, "hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        write_atomically(&path, "bye").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "bye");
    }
}
