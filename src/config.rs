use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    expand_home, write_atomically, Result, TextNodeError, DEFAULT_DATE_FORMAT,
    DEFAULT_STORAGE_KEY,
};

const CONFIG_FILE_NAME: &str = "config.json";

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the key-value store files
    pub data_dir: PathBuf,

    /// Default directory for exported files
    pub export_dir: PathBuf,

    /// Key under which the note collection is persisted
    pub storage_key: String,

    /// chrono format used for a note's creation date
    pub date_format: String,

    /// Whether deletes ask for confirmation unless forced
    pub confirm_deletes: bool,
}

impl Default for Config {
    fn default() -> Self {
        let (data_dir, export_dir) = match project_dirs() {
            Some(dirs) => (dirs.data_dir().to_path_buf(), default_export_dir()),
            None => (PathBuf::from(".textnode"), PathBuf::from(".")),
        };

        Self {
            data_dir,
            export_dir,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            confirm_deletes: true,
        }
    }
}

impl Config {
    /// Platform location of the config file, e.g. `~/.config/textnode/config.json`
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Reads the config from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", path.display());
                return Ok(Config::default());
            }
            Err(e) => return Err(TextNodeError::Io(e)),
        };

        let mut config: Config =
            serde_json::from_str(&raw).map_err(|e| TextNodeError::ConfigError {
                message: format!("Failed to parse {}: {}", path.display(), e),
            })?;

        config.data_dir = expand_home(config.data_dir);
        config.export_dir = expand_home(config.export_dir);
        config.validate()?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Overrides the data directory, expanding a leading `~`
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = expand_home(data_dir);
        self
    }

    /// Writes the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomically(path, &json)?;
        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(TextNodeError::ConfigError {
                message: "storage_key must not be empty".to_string(),
            });
        }

        if self.date_format.trim().is_empty() {
            return Err(TextNodeError::ConfigError {
                message: "date_format must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "textnode")
}

fn default_export_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
