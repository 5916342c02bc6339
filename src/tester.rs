use std::path::Path;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{IoError, Result};
use crate::finder::{self, Sweep};
use crate::toolchain::{GoToolchain, Position, TestRunner};

const SCRATCH_PREFIX: &str = "test_finder";

/// Finds the tests of a package that cover one source position.
pub struct Tester {
    position: Position,
    config: Config,
    toolchain: GoToolchain,
    runner: Box<dyn TestRunner>,
}

impl Tester {
    /// Resolves the package of `path` with the configured Go toolchain.
    pub fn new(path: impl AsRef<Path>, line: usize, col: usize, config: Config) -> Result<Self> {
        let toolchain = GoToolchain::new()
            .with_go_command(&config.go_command)
            .with_short(config.short);
        let position = Position::resolve(&toolchain, path.as_ref(), line, col)?;
        Ok(Self::from_position(position, config))
    }

    /// Uses an already resolved position.
    pub fn from_position(position: Position, config: Config) -> Self {
        let toolchain = GoToolchain::new()
            .with_go_command(&config.go_command)
            .with_short(config.short);
        Self {
            position,
            runner: Box::new(toolchain.clone()),
            toolchain,
            config,
        }
    }

    /// Replaces how the test binary is compiled and run.
    pub fn with_runner(mut self, runner: Box<dyn TestRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sorted names of the tests, and with `include_subtests` the sub-tests,
    /// whose coverage includes the position.
    ///
    /// Compiles the package once into a scratch directory that is removed
    /// when this returns, whatever the outcome.
    pub fn covered_by(&self) -> Result<Vec<String>> {
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir()
            .map_err(IoError::scratch_dir)?;
        self.covered_by_in(&scratch)
    }

    fn covered_by_in(&self, scratch: &TempDir) -> Result<Vec<String>> {
        let pos = &self.position;
        let work_dir = pos.work_dir.as_deref();
        debug!(scratch = %scratch.path().display(), package = %pos.package, "using scratch directory");

        let binary = self.runner.compile(&pos.package, scratch.path(), work_dir)?;
        let tests = self
            .toolchain
            .list_tests(&pos.package, &self.config.run, work_dir)?;
        if tests.is_empty() {
            info!(package = %pos.package, run = %self.config.run, "no candidate tests");
            return Ok(Vec::new());
        }

        let finder = finder::build(self.config.strategy, self.config.workers);
        let sweep = Sweep::new(self.runner.as_ref(), &binary, scratch.path(), pos);
        finder.find(&sweep, &tests, self.config.include_subtests)
    }
}
