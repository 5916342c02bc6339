use thiserror::Error;

/// A candidate test failed while its coverage was being collected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("FAIL: {test_name} - {}", .output.trim())]
pub struct TestFailure {
    pub test_name: String,
    pub output: String,
}

impl TestFailure {
    pub fn new(test_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            output: output.into(),
        }
    }
}
