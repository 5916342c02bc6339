use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::GoToolchain;
use crate::error::{Error, IoError, Result};

/// The source position whose covering tests are sought.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub file: String,
    pub line: usize,
    pub col: usize,
    pub package: String,
    /// Directory toolchain commands run from, when the file lives on disk.
    pub work_dir: Option<PathBuf>,
}

impl Position {
    pub fn new(file: impl Into<String>, line: usize, col: usize, package: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            col,
            package: package.into(),
            work_dir: None,
        }
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(work_dir.into());
        self
    }

    /// Resolves the Go package of the file at `path`.
    ///
    /// Paths spelled relative to the current directory (`./pkg/file.go`) or
    /// absolutely are also given a working directory; anything else is
    /// handed to `go list` as an import path (`fmt/errors.go`).
    pub fn resolve(toolchain: &GoToolchain, path: &Path, line: usize, col: usize) -> Result<Self> {
        let (dir, file) = split_path(path);
        let work_dir = local_dir(path, &dir)?;

        let package = match &work_dir {
            Some(work_dir) => toolchain.package_name(".", Some(work_dir)),
            None => toolchain.package_name(&dir, None),
        }
        .map_err(|e| Error::resolution(path, e))?;

        debug!(path = %path.display(), %package, "resolved position");
        Ok(Self {
            file,
            line,
            col,
            package,
            work_dir,
        })
    }
}

fn split_path(path: &Path) -> (String, String) {
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = path
        .parent()
        .map(|d| d.to_string_lossy().into_owned())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| ".".to_string());
    (dir, file)
}

fn local_dir(path: &Path, dir: &str) -> Result<Option<PathBuf>> {
    if path.is_absolute() {
        return Ok(Some(PathBuf::from(dir)));
    }
    if !path.starts_with(".") && !path.starts_with("..") {
        return Ok(None);
    }

    let cwd = env::current_dir().map_err(IoError::current_dir)?;
    Ok(Some(cwd.join(dir)))
}
