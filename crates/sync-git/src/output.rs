//! Structured command results and merge-outcome translation

/// Substring the backend emits when an automatic merge or rebase could not
/// be completed. Matching on it is a weak contract; every consumer goes
/// through [`MergeOutcome`] so the brittleness stays in this module.
pub const CONFLICT_MARKER: &str = "CONFLICT";

/// Captured result of one backend invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Process exit status; `-1` when terminated by a signal.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Stdout and stderr concatenated, for marker matching — the backend is
    /// not consistent about which stream conflict notices land on.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

impl From<&std::process::Output> for CommandOutput {
    fn from(output: &std::process::Output) -> Self {
        Self {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Interpreted result of a merge-like operation (fetch-and-merge, rebase).
///
/// A failed operation without conflict markers is recoverable noise for the
/// caller to log; a failed operation with markers routes to conflict
/// preservation.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub succeeded: bool,
    pub had_conflicts: bool,
    /// Trimmed stderr, for logging when the operation failed.
    pub detail: String,
}

impl MergeOutcome {
    pub fn from_output(output: &CommandOutput) -> Self {
        let succeeded = output.success();
        Self {
            succeeded,
            had_conflicts: !succeeded && output.combined().contains(CONFLICT_MARKER),
            detail: output.stderr.trim().to_string(),
        }
    }
}
