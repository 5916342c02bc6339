#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use std::time::Duration;

use crossbeam_channel::select;
use testcover::error::{CommandError, Error, IoError, Result, TestFailure};
use testcover::finder::Cancellation;
use testcover::toolchain::{cover_profile_name, Position, TestBinary, TestRun, TestRunner};

pub const PACKAGE: &str = "example.com/fixtures/size";

/// The block every scripted profile describes; `target()` sits inside it.
const BLOCK: &str = "size.go:8.16,10.3 1";

pub fn get_test_fixture_path(package: Option<&str>) -> PathBuf {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("go");
    match package {
        Some(package) => root.join(package),
        None => root,
    }
}

pub fn go_available() -> bool {
    Command::new("go")
        .arg("version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub fn target() -> Position {
    Position::new("size.go", 9, 3, PACKAGE)
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone)]
enum Script {
    Run { covers: bool, subtests: Vec<String> },
    Fail { output: String },
}

/// A `TestRunner` that replays canned results instead of invoking Go.
///
/// Covering runs write a profile whose only block contains `target()` with
/// a non-zero count; other runs write the same block with a zero count.
#[derive(Default)]
pub struct ScriptedRunner {
    scripts: HashMap<String, Script>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn covering(mut self, test: &str) -> Self {
        self.scripts.insert(
            test.to_string(),
            Script::Run {
                covers: true,
                subtests: Vec::new(),
            },
        );
        self
    }

    pub fn covering_with_subtests(mut self, test: &str, subtests: &[&str]) -> Self {
        self.scripts.insert(
            test.to_string(),
            Script::Run {
                covers: true,
                subtests: names(subtests),
            },
        );
        self
    }

    pub fn not_covering(mut self, test: &str) -> Self {
        self.scripts.insert(
            test.to_string(),
            Script::Run {
                covers: false,
                subtests: Vec::new(),
            },
        );
        self
    }

    pub fn failing(mut self, test: &str, output: &str) -> Self {
        self.scripts.insert(
            test.to_string(),
            Script::Fail {
                output: output.to_string(),
            },
        );
        self
    }

    /// Delays the run of `test`, to shuffle completion order. A cancelled
    /// sweep cuts the delay short, the way a killed process would.
    pub fn with_delay(mut self, test: &str, delay: Duration) -> Self {
        self.delays.insert(test.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, test: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == test).count()
    }
}

impl TestRunner for ScriptedRunner {
    fn compile(&self, package: &str, scratch: &Path, work_dir: Option<&Path>) -> Result<TestBinary> {
        Ok(TestBinary {
            path: scratch.join("size.test"),
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
        self.calls.lock().unwrap().push(test_name.to_string());
        if let Some(delay) = self.delays.get(test_name) {
            select! {
                recv(cancel.signal()) -> _ => return Err(Error::Cancelled),
                default(*delay) => {}
            }
        }

        let script = self.scripts.get(test_name).cloned().ok_or_else(|| {
            CommandError::exited(
                format!("{} -test.run {test_name}", binary.path.display()),
                Some(1),
                format!("no script for {test_name}"),
            )
        })?;

        match script {
            Script::Fail { output } => Err(TestFailure::new(test_name, output).into()),
            Script::Run { covers, subtests } => {
                let profile = scratch.join(cover_profile_name(test_name));
                let text = format!(
                    "mode: set\n{}/{BLOCK} {}\n",
                    binary.package,
                    if covers { 1 } else { 0 }
                );
                fs::write(&profile, text)
                    .map_err(|e| Error::from(IoError::write_error(&profile, e)))?;

                let events = if include_events {
                    event_stream(&binary.package, test_name, &subtests)
                } else {
                    String::new()
                };
                Ok(TestRun {
                    test_name: test_name.to_string(),
                    cover_profile: profile,
                    events,
                })
            }
        }
    }
}

fn event_stream(package: &str, test: &str, subtests: &[String]) -> String {
    let mut stream = format!(
        "{{\"Action\":\"run\",\"Package\":\"{package}\",\"Test\":\"{test}\"}}\n"
    );
    for sub in subtests {
        stream.push_str(&format!(
            "{{\"Action\":\"run\",\"Package\":\"{package}\",\"Test\":\"{sub}\"}}\n"
        ));
        stream.push_str(&format!(
            "{{\"Action\":\"pass\",\"Package\":\"{package}\",\"Test\":\"{sub}\",\"Elapsed\":0}}\n"
        ));
    }
    stream.push_str(&format!(
        "{{\"Action\":\"pass\",\"Package\":\"{package}\",\"Test\":\"{test}\",\"Elapsed\":0.01}}\n"
    ));
    stream
}
