use std::time::Duration;

use crate::command_spec::CommandSpec;
use crate::error::RunnerError;

/// Output from a process execution.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Standard output from the process
    pub stdout: Vec<u8>,
    /// Standard error from the process
    pub stderr: Vec<u8>,
    /// Exit code from the process (None if terminated by signal)
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    /// Create a new `ProcessOutput` with the given values.
    #[must_use]
    pub fn new(stdout: Vec<u8>, stderr: Vec<u8>, exit_code: Option<i32>) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
        }
    }

    /// Get stdout as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }

    /// Check if the process exited successfully (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Trait for process execution.
///
/// Implementations MUST use argv-style APIs only (no shell string
/// evaluation): `Command::new().args()` with arguments as discrete
/// elements. The interface is synchronous; implementations may use
/// threads internally for timeout handling but must not expose async.
pub trait ProcessRunner {
    /// Execute a command with the given wall-clock timeout.
    ///
    /// # Returns
    ///
    /// * `Ok(ProcessOutput)` - process completed (possibly non-zero exit)
    /// * `Err(RunnerError::Timeout)` - wall-clock bound exceeded, process killed
    /// * `Err(RunnerError::SpawnFailed)` - process could not be started
    /// * `Err(RunnerError::ExecutionFailed)` - other execution errors
    fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_output_strings() {
        let output = ProcessOutput::new(b"found 2 issues".to_vec(), b"warning".to_vec(), Some(1));
        assert_eq!(output.stdout_string(), "found 2 issues");
        assert_eq!(output.stderr_string(), "warning");
        assert!(!output.success());
    }

    #[test]
    fn test_process_output_success() {
        assert!(ProcessOutput::new(Vec::new(), Vec::new(), Some(0)).success());
        assert!(!ProcessOutput::new(Vec::new(), Vec::new(), Some(1)).success());
        // Killed by signal: no exit code, never success
        assert!(!ProcessOutput::new(Vec::new(), Vec::new(), None).success());
    }

    #[test]
    fn test_process_output_lossy_utf8() {
        let invalid = vec![0xff, 0xfe, 0x00, 0x01];
        let output = ProcessOutput::new(invalid.clone(), invalid, Some(0));
        // Must not panic; replacement characters are fine
        assert!(!output.stdout_string().is_empty());
        assert!(!output.stderr_string().is_empty());
    }

    struct MockRunner {
        expected: ProcessOutput,
    }

    impl ProcessRunner for MockRunner {
        fn run(
            &self,
            _cmd: &CommandSpec,
            _timeout: Duration,
        ) -> Result<ProcessOutput, RunnerError> {
            Ok(self.expected.clone())
        }
    }

    #[test]
    fn test_process_runner_trait_object() {
        let mock = MockRunner {
            expected: ProcessOutput::new(b"ok".to_vec(), Vec::new(), Some(0)),
        };
        let runner: &dyn ProcessRunner = &mock;
        let out = runner
            .run(&CommandSpec::new("ruff"), Duration::from_secs(5))
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout_string(), "ok");
    }
}
