use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading Go test sources with tree-sitter.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to load the Go grammar: {message}")]
    Grammar { message: String },

    #[error("invalid test declaration query: {message}")]
    InvalidQuery { message: String },

    #[error("failed to parse Go source '{path}'")]
    Unparsable { path: PathBuf },
}

impl SourceError {
    pub fn grammar(message: impl Into<String>) -> Self {
        Self::Grammar {
            message: message.into(),
        }
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    pub fn unparsable(path: impl Into<PathBuf>) -> Self {
        Self::Unparsable { path: path.into() }
    }
}
