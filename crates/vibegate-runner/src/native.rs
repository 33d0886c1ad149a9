use std::io;
use std::process::Stdio;
use std::time::Duration;

use crate::command_spec::CommandSpec;
use crate::error::RunnerError;
use crate::process::{ProcessOutput, ProcessRunner};

/// Native process runner using `std::process::Command`.
///
/// The primary [`ProcessRunner`] implementation. Executes scanners via
/// argv-style APIs only (no `sh -c`, no `cmd /C`), captures stdout and
/// stderr, and enforces a hard wall-clock timeout: a subprocess that
/// outlives its bound is killed and reported as [`RunnerError::Timeout`].
///
/// # Example
///
/// ```rust,no_run
/// use vibegate_runner::{CommandSpec, NativeRunner, ProcessRunner};
/// use std::time::Duration;
///
/// let runner = NativeRunner::new();
/// let cmd = CommandSpec::new("git").args(["rev-parse", "--abbrev-ref", "HEAD"]);
/// let output = runner.run(&cmd, Duration::from_secs(10)).unwrap();
/// assert!(output.success());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner;

impl NativeRunner {
    /// Create a new `NativeRunner`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Terminate a process by its PID.
    ///
    /// On Unix the child leads its own process group (see [`run`]), so
    /// SIGKILL goes to the whole group and reaps any descendants the
    /// scanner forked. On Windows, uses TerminateProcess.
    ///
    /// [`run`]: ProcessRunner::run
    fn terminate_process(pid: u32) {
        #[cfg(unix)]
        {
            unsafe {
                if libc::killpg(pid as i32, libc::SIGKILL) != 0 {
                    libc::kill(pid as i32, libc::SIGKILL);
                }
            }
        }

        #[cfg(windows)]
        {
            use windows::Win32::Foundation::CloseHandle;
            use windows::Win32::System::Threading::{
                OpenProcess, PROCESS_TERMINATE, TerminateProcess,
            };

            unsafe {
                if let Ok(handle) = OpenProcess(PROCESS_TERMINATE, false, pid) {
                    let _ = TerminateProcess(handle, 1);
                    let _ = CloseHandle(handle);
                }
            }
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = pid;
        }
    }
}

impl ProcessRunner for NativeRunner {
    fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError> {
        use std::sync::mpsc;
        use std::thread;

        let mut command = cmd.to_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Give the scanner its own process group so a timeout kill reaches
        // any descendants it forked, not just the direct child.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command.spawn().map_err(|e| RunnerError::SpawnFailed {
            program: cmd.program.to_string_lossy().to_string(),
            reason: e.to_string(),
            tool_missing: e.kind() == io::ErrorKind::NotFound,
        })?;

        let child_id = child.id();
        let (tx, rx) = mpsc::channel();

        // Wait for the child on a separate thread so the timeout can be
        // enforced regardless of how long the scanner blocks.
        let handle = thread::spawn(move || {
            let output = child.wait_with_output();
            let _ = tx.send(output);
        });

        match rx.recv_timeout(timeout) {
            Ok(output_result) => {
                let _ = handle.join();

                let output = output_result.map_err(|e| RunnerError::ExecutionFailed {
                    reason: format!("failed to wait for process: {e}"),
                })?;

                Ok(ProcessOutput::new(
                    output.stdout,
                    output.stderr,
                    output.status.code(),
                ))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Self::terminate_process(child_id);
                // The timeout is a hard wall-clock bound: do not join the
                // wait thread here. A descendant that escaped the kill could
                // hold the stdout pipe open, and the thread exits on its own
                // once the pipe reaches EOF.
                drop(handle);

                Err(RunnerError::Timeout {
                    timeout_seconds: timeout.as_secs(),
                })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(RunnerError::ExecutionFailed {
                reason: "process monitoring thread terminated unexpectedly".to_string(),
            }),
        }
    }
}
