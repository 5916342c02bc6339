use thiserror::Error;

/// An external process that could not be started or exited unsuccessfully.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe(.command, .status, .stderr))]
pub struct CommandError {
    pub command: String,
    pub status: Option<i32>,
    pub stderr: String,
}

fn describe(command: &str, status: &Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim();
    match (status, stderr.is_empty()) {
        (Some(code), true) => format!("'{command}' exited with status {code}"),
        (Some(code), false) => format!("'{command}' exited with status {code} - {stderr}"),
        (None, true) => format!("'{command}' failed"),
        (None, false) => format!("'{command}' failed - {stderr}"),
    }
}

impl CommandError {
    pub fn exited(command: impl Into<String>, status: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            status,
            stderr: stderr.into(),
        }
    }

    pub fn spawn_failed(command: impl Into<String>, source: &std::io::Error) -> Self {
        Self {
            command: command.into(),
            status: None,
            stderr: source.to_string(),
        }
    }
}
