//! Bounded-wait command runner for external process execution.
//!
//! External tools are awaited synchronously, but against a deadline: a hung
//! decoder or inference process is killed and reported as `TimedOut`
//! instead of blocking the pipeline forever.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::ToolError;

/// Default deadline for a single external tool invocation.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(600);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured output of a completed command.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `program` with `args`, waiting at most `timeout` for it to finish.
///
/// stdout and stderr are drained on reader threads while the child runs,
/// so a chatty tool cannot deadlock on a full pipe. A non-zero exit is an
/// error carrying the captured stderr.
pub fn run_command(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<CommandOutput, ToolError> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    tracing::debug!("Running: {} {}", program, args.join(" "));

    let mut child = cmd.spawn().map_err(|e| ToolError::Spawn {
        tool: program.to_string(),
        source: e,
    })?;

    let stdout_handle = drain(child.stdout.take());
    let stderr_handle = drain(child.stderr.take());

    let status = wait_with_deadline(&mut child, program, timeout)?;

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    if !status.success() {
        return Err(ToolError::CommandFailed {
            tool: program.to_string(),
            exit_code: status.code().unwrap_or(-1),
            stderr: stderr.trim_end().to_string(),
        });
    }

    Ok(CommandOutput { stdout, stderr })
}

fn drain<R: Read + Send + 'static>(reader: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut reader) = reader {
            let _ = reader.read_to_string(&mut buf);
        }
        buf
    })
}

fn wait_with_deadline(
    child: &mut Child,
    tool: &str,
    timeout: Duration,
) -> Result<std::process::ExitStatus, ToolError> {
    let deadline = Instant::now() + timeout;

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ToolError::TimedOut {
                        tool: tool.to_string(),
                        timeout_secs: timeout.as_secs(),
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(ToolError::Io {
                    tool: tool.to_string(),
                    source: e,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() {
        let out = run_command("sh", &["-c", "printf hello"], None, DEFAULT_TOOL_TIMEOUT).unwrap();
        assert_eq!(out.stdout, "hello");
    }

    #[test]
    fn nonzero_exit_surfaces_stderr() {
        let err = run_command(
            "sh",
            &["-c", "echo boom >&2; exit 3"],
            None,
            DEFAULT_TOOL_TIMEOUT,
        )
        .unwrap_err();

        match err {
            ToolError::CommandFailed {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, 3);
                assert!(stderr.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn respects_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_command(
            "sh",
            &["-c", "pwd"],
            Some(dir.path()),
            DEFAULT_TOOL_TIMEOUT,
        )
        .unwrap();
        let reported = std::fs::canonicalize(out.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn kills_hung_process_at_deadline() {
        let err = run_command("sleep", &["30"], None, Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, ToolError::TimedOut { .. }));
    }

    #[test]
    fn missing_binary_is_spawn_error() {
        let err = run_command(
            "definitely-not-a-real-binary",
            &[],
            None,
            DEFAULT_TOOL_TIMEOUT,
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}
