use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("failed to create scratch directory: {source}")]
    ScratchDir { source: std::io::Error },

    #[error("failed to determine current directory: {source}")]
    CurrentDir { source: std::io::Error },

    #[error("failed to read file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to scan directory '{path}': {source}")]
    DirectoryScanError {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl IoError {
    pub fn scratch_dir(source: std::io::Error) -> Self {
        Self::ScratchDir { source }
    }

    pub fn current_dir(source: std::io::Error) -> Self {
        Self::CurrentDir { source }
    }

    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }

    pub fn directory_scan_error(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::DirectoryScanError {
            path: path.into(),
            source,
        }
    }
}
