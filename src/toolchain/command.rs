use std::io::Read;
use std::process::{Command, Output, Stdio};
use std::str;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, Receiver};
use tracing::{debug, trace, warn};

use crate::error::CommandError;

/// Renders a command the way a user would type it, for errors and logs.
pub fn display_command(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

/// Runs `cmd` to completion and returns its output whatever the exit status.
pub fn capture(cmd: &mut Command) -> Result<Output, CommandError> {
    let rendered = display_command(cmd);
    debug!(command = %rendered, "running");

    let output = cmd
        .output()
        .map_err(|e| CommandError::spawn_failed(&rendered, &e))?;

    trace!(
        command = %rendered,
        status = ?output.status.code(),
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "finished"
    );
    Ok(output)
}

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Like [`capture`], but kills the process once `cancel` becomes ready.
///
/// Returns `None` when the process was killed. Output still held by
/// grandchildren of a killed process is abandoned rather than awaited.
pub fn capture_cancellable(
    cmd: &mut Command,
    cancel: &Receiver<()>,
) -> Result<Option<Output>, CommandError> {
    let rendered = display_command(cmd);
    debug!(command = %rendered, "running");

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| CommandError::spawn_failed(&rendered, &e))?;
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    loop {
        let exited = child
            .try_wait()
            .map_err(|e| CommandError::spawn_failed(&rendered, &e))?;
        if let Some(status) = exited {
            let output = Output {
                status,
                stdout: collect(stdout),
                stderr: collect(stderr),
            };
            trace!(
                command = %rendered,
                status = ?output.status.code(),
                stdout_bytes = output.stdout.len(),
                stderr_bytes = output.stderr.len(),
                "finished"
            );
            return Ok(Some(output));
        }

        select! {
            recv(cancel) -> _ => {
                if let Err(e) = child.kill().and_then(|()| child.wait().map(drop)) {
                    warn!(command = %rendered, error = %e, "failed to kill cancelled process");
                }
                debug!(command = %rendered, "killed after cancellation");
                return Ok(None);
            }
            default(POLL_INTERVAL) => {}
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            if let Err(e) = pipe.read_to_end(&mut buf) {
                trace!(error = %e, "pipe closed early");
            }
        }
        buf
    })
}

fn collect(reader: JoinHandle<Vec<u8>>) -> Vec<u8> {
    reader.join().unwrap_or_default()
}

/// Runs `cmd` and returns its stdout, failing on a non-zero exit.
pub fn run(cmd: &mut Command) -> Result<String, CommandError> {
    let output = capture(cmd)?;
    if !output.status.success() {
        return Err(exit_error(cmd, &output));
    }

    str::from_utf8(&output.stdout).map(str::to_string).map_err(|e| {
        CommandError::exited(display_command(cmd), None, format!("Invalid UTF-8 output: {e}"))
    })
}

pub fn exit_error(cmd: &Command, output: &Output) -> CommandError {
    CommandError::exited(
        display_command(cmd),
        output.status.code(),
        String::from_utf8_lossy(&output.stderr),
    )
}
