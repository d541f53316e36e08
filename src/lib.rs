//! TextNode note-taking library
//!
//! This library provides an owned note store persisted in a key-value
//! substrate, case-insensitive search, markup escaping, and plain text and
//! JSON export of single notes or the whole collection.

mod cli;
mod config;
mod errors;
mod export;
mod helper;
mod note;
mod search;
mod storage;
mod store;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use export::*;
pub use helper::*;
pub use note::*;
pub use search::*;
pub use storage::*;
pub use store::*;
pub use types::*;
