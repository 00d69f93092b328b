use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry that cannot be written as a single `source,target` line
    #[error("Invalid entry '{source_word}': {reason}")]
    InvalidEntry { source_word: String, reason: String },

    #[error("Unknown encoding label '{0}'")]
    UnknownEncoding(String),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to read config {file}: {reason}")]
    Config { file: PathBuf, reason: String },
}

impl Error {
    pub fn invalid_entry(source_word: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            source_word: source_word.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
