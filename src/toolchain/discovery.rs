use std::path::Path;

use tracing::debug;

use super::command;
use super::config::{DEFAULT_RUN_PATTERN, GO_TEST_LIST_ARGS, TEST_PREFIX};
use super::GoToolchain;
use crate::error::{Error, Result};

impl GoToolchain {
    /// Lists the top-level tests of `package` whose names match `pattern`.
    ///
    /// A pattern matching nothing yields an empty list.
    pub fn list_tests(&self, package: &str, pattern: &str, work_dir: Option<&Path>) -> Result<Vec<String>> {
        let pattern = if pattern.is_empty() {
            DEFAULT_RUN_PATTERN
        } else {
            pattern
        };

        let mut cmd = self.command(work_dir);
        cmd.args(GO_TEST_LIST_ARGS).arg(pattern).arg(package);

        let stdout = command::run(&mut cmd).map_err(|e| Error::discovery(package, e))?;
        let tests = test_names(&stdout);

        debug!(package, pattern, count = tests.len(), "listed tests");
        Ok(tests)
    }
}

/// Keeps the test names from `go test -list` output, dropping the trailing
/// `ok <package>` summary and any benchmarks or examples.
pub fn test_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(TEST_PREFIX))
        .map(str::to_string)
        .collect()
}
