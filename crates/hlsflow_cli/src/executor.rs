//! Runs stage commands as child processes.
//!
//! The flow crates only describe commands. [`ProcessExecutor`] spawns each
//! one with `tokio::process` in the descriptor's working directory, captures
//! its output, and kills it when the optional time limit expires.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use hlsflow_flow::{CommandDescriptor, Executor, StageId};
use tokio::process::Command;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// Number of trailing stderr lines kept in a failure report.
const STDERR_TAIL: usize = 20;

/// Why a stage's process did not complete successfully.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The program could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// The executable.
        program: String,
        /// The OS error.
        source: io::Error,
    },

    /// Waiting for the program failed.
    #[error("failed to wait for '{program}': {source}")]
    Wait {
        /// The executable.
        program: String,
        /// The OS error.
        source: io::Error,
    },

    /// The program ran past the time limit and was killed.
    #[error("'{program}' did not finish within {}s and was killed", .limit.as_secs())]
    Timeout {
        /// The executable.
        program: String,
        /// The limit that expired.
        limit: Duration,
    },

    /// The program exited unsuccessfully.
    #[error("'{program}' exited with {status}{}", render_tail(.stderr))]
    Failed {
        /// The executable.
        program: String,
        /// The exit status.
        status: ExitStatus,
        /// The last lines the program wrote to stderr.
        stderr: String,
    },
}

fn render_tail(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{stderr}")
    }
}

/// Executes stage commands one at a time on a private runtime.
pub struct ProcessExecutor {
    runtime: Runtime,
    timeout: Option<Duration>,
    quiet: bool,
}

impl ProcessExecutor {
    /// Creates an executor. `timeout` applies to each stage separately.
    pub fn new(timeout: Option<Duration>, quiet: bool) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            runtime,
            timeout,
            quiet,
        })
    }
}

impl Executor for ProcessExecutor {
    type Error = ExecError;

    fn execute(&mut self, stage: StageId, command: &CommandDescriptor) -> Result<(), ExecError> {
        if !self.quiet {
            eprintln!("   Running {stage}: {}", command.display_line());
        }
        self.runtime.block_on(run_command(command, self.timeout))
    }
}

/// Spawns `command`, waits for it under `limit`, and checks its exit status.
async fn run_command(command: &CommandDescriptor, limit: Option<Duration>) -> Result<(), ExecError> {
    let program = command.executable.clone();
    let child = Command::new(&command.executable)
        .args(&command.arguments)
        .current_dir(&command.working_directory)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ExecError::Spawn {
            program: program.clone(),
            source,
        })?;

    // Dropping the future on timeout drops the child, which kills it.
    let wait = child.wait_with_output();
    let output = match limit {
        Some(limit) => match tokio::time::timeout(limit, wait).await {
            Ok(result) => result,
            Err(_) => {
                warn!(program = %program, ?limit, "killed stage after time limit");
                return Err(ExecError::Timeout { program, limit });
            }
        },
        None => wait.await,
    }
    .map_err(|source| ExecError::Wait {
        program: program.clone(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        debug!(program = %program, "{line}");
    }

    if output.status.success() {
        Ok(())
    } else {
        Err(ExecError::Failed {
            program,
            status: output.status,
            stderr: tail(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL),
        })
    }
}

/// Returns the last `n` non-empty lines of `text`.
fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn descriptor(dir: &Path, executable: &str, args: &[&str]) -> CommandDescriptor {
        CommandDescriptor {
            executable: executable.to_string(),
            arguments: args.iter().map(|a| a.to_string()).collect(),
            working_directory: dir.to_path_buf(),
        }
    }

    #[test]
    fn tail_keeps_last_lines() {
        assert_eq!(tail("a\nb\n\nc\n", 2), "b\nc");
        assert_eq!(tail("", 5), "");
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let tmp = TempDir::new().unwrap();
        let mut exec = ProcessExecutor::new(None, true).unwrap();
        let cmd = descriptor(tmp.path(), "hlsflow-no-such-tool", &[]);
        let err = exec.execute(StageId::Map, &cmd).unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_working_directory() {
        let tmp = TempDir::new().unwrap();
        let mut exec = ProcessExecutor::new(None, true).unwrap();
        let cmd = descriptor(tmp.path(), "sh", &["-c", "echo done > out.txt"]);
        exec.execute(StageId::Hls, &cmd).unwrap();
        assert!(tmp.path().join("out.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_reports_stderr() {
        let tmp = TempDir::new().unwrap();
        let mut exec = ProcessExecutor::new(None, true).unwrap();
        let cmd = descriptor(tmp.path(), "sh", &["-c", "echo 'bad netlist' >&2; exit 3"]);
        let err = exec.execute(StageId::Pack, &cmd).unwrap_err();
        match &err {
            ExecError::Failed { status, stderr, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "bad netlist");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().ends_with("\nbad netlist"));
    }

    #[cfg(unix)]
    #[test]
    fn timeout_kills_process() {
        let tmp = TempDir::new().unwrap();
        let mut exec = ProcessExecutor::new(Some(Duration::from_millis(100)), true).unwrap();
        let cmd = descriptor(tmp.path(), "sleep", &["5"]);
        let err = exec.execute(StageId::Route, &cmd).unwrap_err();
        assert!(matches!(err, ExecError::Timeout { .. }));
        assert!(err.to_string().contains("did not finish"));
    }
}
