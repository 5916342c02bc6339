use serde::Deserialize;

use crate::error::{ParseError, TestFailure};

pub const ACTION_RUN: &str = "run";
pub const ACTION_OUTPUT: &str = "output";
pub const ACTION_PASS: &str = "pass";
pub const ACTION_FAIL: &str = "fail";

const SUBTEST_SEPARATOR: char = '/';

/// Framing lines printed by the test runner itself rather than by a test.
const FRAMING_PREFIXES: &[&str] = &["=== ", "--- "];

/// One record of the `go tool test2json` stream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TestEvent {
    /// RFC3339 timestamp, kept as text since nothing here orders by it.
    pub time: Option<String>,
    pub action: String,
    pub package: String,
    pub test: String,
    pub elapsed: f64,
    pub output: String,
}

impl TestEvent {
    pub fn is_subtest(&self) -> bool {
        self.test.contains(SUBTEST_SEPARATOR)
    }

    fn is_framing_output(&self) -> bool {
        let trimmed = self.output.trim_start();
        FRAMING_PREFIXES.iter().any(|p| trimmed.starts_with(p))
    }
}

pub fn parse_events(stream: &str) -> Result<Vec<TestEvent>, ParseError> {
    stream
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| ParseError::event(index + 1, e))
        })
        .collect()
}

/// Names of the sub-tests that passed, in the order the stream reports them.
pub fn passing_subtests(stream: &str) -> Result<Vec<String>, ParseError> {
    Ok(parse_events(stream)?
        .into_iter()
        .filter(|e| e.action == ACTION_PASS && e.is_subtest())
        .map(|e| e.test)
        .collect())
}

/// The first failing test of a run and the last line it printed.
pub fn failure_from_events(events: &[TestEvent]) -> Option<TestFailure> {
    let mut last_output: Option<&TestEvent> = None;

    for event in events {
        match event.action.as_str() {
            ACTION_OUTPUT if !event.is_framing_output() => last_output = Some(event),
            ACTION_FAIL => {
                let output = last_output.map(|e| e.output.as_str()).unwrap_or_default();
                return Some(TestFailure::new(&event.test, output));
            }
            _ => {}
        }
    }

    None
}
