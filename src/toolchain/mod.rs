//! Thin wrappers around the Go toolchain: package lookup, test listing,
//! instrumented compilation and single-test execution.

pub mod command;
pub mod config;
pub mod discovery;
pub mod events;
pub mod position;
pub mod runner;

pub use events::{passing_subtests, TestEvent};
pub use position::Position;
pub use runner::{cover_profile_name, run_pattern, TestBinary, TestRun, TestRunner};

use std::path::Path;
use std::process::Command;

use crate::error::CommandError;
use config::{GO_COMMAND, GO_LIST_ARGS};

#[derive(Debug, Clone)]
pub struct GoToolchain {
    go: String,
    short: bool,
}

impl GoToolchain {
    pub fn new() -> Self {
        Self {
            go: GO_COMMAND.to_string(),
            short: false,
        }
    }

    pub fn with_go_command(mut self, go: impl Into<String>) -> Self {
        self.go = go.into();
        self
    }

    /// Passes `-test.short` to every test run.
    pub fn with_short(mut self, short: bool) -> Self {
        self.short = short;
        self
    }

    pub fn go_command(&self) -> &str {
        &self.go
    }

    pub fn is_short(&self) -> bool {
        self.short
    }

    /// Import path of the package at `target`, a directory or import path.
    pub fn package_name(&self, target: &str, work_dir: Option<&Path>) -> Result<String, CommandError> {
        let mut cmd = self.command(work_dir);
        cmd.args(GO_LIST_ARGS).arg(target);

        let stdout = command::run(&mut cmd)?;
        Ok(stdout.trim().to_string())
    }

    fn command(&self, work_dir: Option<&Path>) -> Command {
        let mut cmd = Command::new(&self.go);
        if let Some(dir) = work_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new()
    }
}
