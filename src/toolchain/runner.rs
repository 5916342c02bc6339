use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, warn};

use super::command::{self, display_command};
use super::config::*;
use super::events::{failure_from_events, parse_events};
use super::GoToolchain;
use crate::error::{Error, Result};
use crate::finder::Cancellation;

/// An instrumented test binary, shared read-only by every run of a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBinary {
    pub path: PathBuf,
    pub package: String,
    pub work_dir: Option<PathBuf>,
}

/// What a single test run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRun {
    pub test_name: String,
    /// Coverage artifact written into the scratch directory.
    pub cover_profile: PathBuf,
    /// The `test2json` event stream of the run.
    pub events: String,
}

pub trait TestRunner: Send + Sync {
    fn compile(&self, package: &str, scratch: &Path, work_dir: Option<&Path>) -> Result<TestBinary>;

    /// Runs exactly one test (and its sub-tests) against `binary`.
    ///
    /// With `include_events` the run is verbose so the event stream reports
    /// every sub-test that passed. A run still in progress when `cancel`
    /// fires is abandoned with [`Error::Cancelled`].
    fn run_test(
        &self,
        binary: &TestBinary,
        scratch: &Path,
        test_name: &str,
        include_events: bool,
        cancel: &Cancellation,
    ) -> Result<TestRun>;
}

/// File name of the coverage artifact of `test_name`; slashes are dropped
/// so sub-tests stay flat inside the scratch directory.
pub fn cover_profile_name(test_name: &str) -> String {
    let mut name = test_name.replace('/', "");
    name.push_str(COVER_PROFILE_SUFFIX);
    name
}

/// A `-test.run` pattern selecting exactly `test_name`, one anchored regular
/// expression per level.
pub fn run_pattern(test_name: &str) -> String {
    test_name
        .split('/')
        .map(|segment| format!("^{}$", regex::escape(segment)))
        .collect::<Vec<_>>()
        .join("/")
}

fn binary_name(package: &str) -> String {
    let last = package.rsplit('/').next().unwrap_or(package);
    format!("{last}{TEST_BINARY_SUFFIX}")
}

impl TestRunner for GoToolchain {
    fn compile(&self, package: &str, scratch: &Path, work_dir: Option<&Path>) -> Result<TestBinary> {
        let path = scratch.join(binary_name(package));

        let mut cmd = self.command(work_dir);
        cmd.arg("test")
            .arg(package)
            .args(GO_TEST_COMPILE_FLAGS)
            .arg(&path);

        let output = command::capture(&mut cmd).map_err(|e| Error::compile(package, e))?;
        if !output.status.success() {
            return Err(Error::compile(package, command::exit_error(&cmd, &output)));
        }

        debug!(package, binary = %path.display(), "compiled test binary");
        Ok(TestBinary {
            path,
            package: package.to_string(),
            work_dir: work_dir.map(Path::to_path_buf),
        })
    }

    fn run_test(
        &self,
        binary: &TestBinary,
        scratch: &Path,
        test_name: &str,
        include_events: bool,
        cancel: &Cancellation,
    ) -> Result<TestRun> {
        let profile_name = cover_profile_name(test_name);

        let mut cmd = self.command(binary.work_dir.as_deref());
        cmd.args(TEST2JSON_ARGS)
            .arg(&binary.path)
            .arg(TEST_RUN_FLAG)
            .arg(run_pattern(test_name))
            .arg(TEST_COVERPROFILE_FLAG)
            .arg(&profile_name)
            .arg(TEST_OUTPUTDIR_FLAG)
            .arg(scratch);
        if include_events {
            cmd.arg(TEST_VERBOSE_FLAG);
        }
        if self.short {
            cmd.arg(TEST_SHORT_FLAG);
        }

        let Some(output) = command::capture_cancellable(&mut cmd, cancel.signal())? else {
            return Err(Error::Cancelled);
        };
        if !output.status.success() {
            return Err(recover_failure(&cmd, &output));
        }

        Ok(TestRun {
            test_name: test_name.to_string(),
            cover_profile: scratch.join(profile_name),
            events: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Explains a failed run from its event stream, falling back to the exit
/// status and stderr when the stream does not say which test failed.
fn recover_failure(cmd: &Command, output: &Output) -> Error {
    let stream = String::from_utf8_lossy(&output.stdout);

    match parse_events(&stream) {
        Ok(events) => {
            if let Some(failure) = failure_from_events(&events) {
                return failure.into();
            }
        }
        Err(e) => {
            warn!(command = %display_command(cmd), error = %e, "unreadable test event stream");
        }
    }

    command::exit_error(cmd, output).into()
}
