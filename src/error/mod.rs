mod command;
mod io;
mod parser;
mod source;
mod test_failure;

pub use command::CommandError;
pub use io::IoError;
pub use parser::ParseError;
pub use source::SourceError;
pub use test_failure::TestFailure;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error finding go package from '{path}': {source}")]
    Resolution { path: PathBuf, source: CommandError },

    #[error("error finding tests in go package {package}: {source}")]
    Discovery { package: String, source: CommandError },

    #[error("error compiling test for go package {package}: {source}")]
    Compile { package: String, source: CommandError },

    #[error(transparent)]
    TestFailure(#[from] TestFailure),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("sweep cancelled after an earlier failure")]
    Cancelled,
}

impl Error {
    pub fn resolution(path: impl Into<PathBuf>, source: CommandError) -> Self {
        Self::Resolution {
            path: path.into(),
            source,
        }
    }

    pub fn discovery(package: impl Into<String>, source: CommandError) -> Self {
        Self::Discovery {
            package: package.into(),
            source,
        }
    }

    pub fn compile(package: impl Into<String>, source: CommandError) -> Self {
        Self::Compile {
            package: package.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
