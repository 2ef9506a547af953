//! The backend command surface as a capability trait

use crate::error::{Error, Result};
use crate::output::{CommandOutput, MergeOutcome};
use std::path::PathBuf;
use std::process::Command;

/// Proxy configuration slots the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    Http,
    Https,
}

impl ProxyKind {
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::Http => "http.proxy",
            Self::Https => "https.proxy",
        }
    }
}

/// Discrete operations the sync engine needs from the backend.
///
/// Merge-like operations return a [`MergeOutcome`] instead of raising,
/// because their failure is an expected, handled case. Operations with no
/// recovery policy (push, stage, show-revision, set-proxy) are checked and
/// raise [`Error::CommandFailed`] on a non-zero exit.
pub trait VcsGateway {
    /// `git pull` from origin without rebasing. Unchecked.
    fn fetch_and_merge(&self, branch: &str) -> Result<MergeOutcome>;

    /// `git pull --rebase` from origin. Unchecked.
    fn rebase(&self, branch: &str) -> Result<MergeOutcome>;

    /// Commit staged changes. Unchecked: an empty staging area exits
    /// non-zero and the caller decides what that means.
    fn commit(&self, message: &str) -> Result<CommandOutput>;

    /// Push the branch to origin. Checked.
    fn push(&self, branch: &str) -> Result<()>;

    /// Relative paths left unresolved after a failed merge or rebase.
    fn conflicted_paths(&self) -> Result<Vec<String>>;

    /// Abandon an in-progress merge. Best effort, unchecked.
    fn abort_merge(&self) -> Result<()>;

    /// Abandon an in-progress rebase. Best effort, unchecked.
    fn abort_rebase(&self) -> Result<()>;

    /// Raw bytes of `path` as of `rev`. Checked.
    fn show_revision(&self, rev: &str, path: &str) -> Result<Vec<u8>>;

    /// Stage one file for the next commit. Checked.
    fn stage(&self, path: &str) -> Result<()>;

    /// Set a proxy in the backend's repository-local config. Checked.
    fn set_proxy(&self, kind: ProxyKind, url: &str) -> Result<()>;
}

/// Gateway implementation that shells out to the `git` binary.
///
/// Every invocation runs with the synchronized root as its working
/// directory; no process-wide state outside that root is touched.
#[derive(Debug, Clone)]
pub struct GitCommandGateway {
    root: PathBuf,
}

impl GitCommandGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn invoke(&self, args: &[&str]) -> Result<std::process::Output> {
        tracing::debug!(?args, root = %self.root.display(), "git");
        Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| Error::Spawn {
                command: command_line(args),
                source: e,
            })
    }

    /// Unchecked invocation: a non-zero exit is data, not an error.
    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        self.invoke(args).map(|output| CommandOutput::from(&output))
    }

    /// Checked invocation: a non-zero exit raises with the stderr text.
    fn run_checked(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.run(args)?;
        if output.success() {
            Ok(output)
        } else {
            Err(Error::CommandFailed {
                command: command_line(args),
                status: output.status,
                stderr: output.stderr,
            })
        }
    }
}

fn command_line(args: &[&str]) -> String {
    format!("git {}", args.join(" "))
}

impl VcsGateway for GitCommandGateway {
    fn fetch_and_merge(&self, branch: &str) -> Result<MergeOutcome> {
        // Explicit merge mode: newer git otherwise refuses divergent pulls
        // until pull.rebase is configured
        let output = self.run(&["pull", "--no-rebase", "origin", branch])?;
        Ok(MergeOutcome::from_output(&output))
    }

    fn rebase(&self, branch: &str) -> Result<MergeOutcome> {
        let output = self.run(&["pull", "--rebase", "origin", branch])?;
        Ok(MergeOutcome::from_output(&output))
    }

    fn commit(&self, message: &str) -> Result<CommandOutput> {
        self.run(&["commit", "-m", message])
    }

    fn push(&self, branch: &str) -> Result<()> {
        self.run_checked(&["push", "origin", branch])?;
        Ok(())
    }

    fn conflicted_paths(&self) -> Result<Vec<String>> {
        let output = self.run_checked(&["diff", "--name-only", "--diff-filter=U"])?;
        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn abort_merge(&self) -> Result<()> {
        self.run(&["merge", "--abort"])?;
        Ok(())
    }

    fn abort_rebase(&self) -> Result<()> {
        self.run(&["rebase", "--abort"])?;
        Ok(())
    }

    fn show_revision(&self, rev: &str, path: &str) -> Result<Vec<u8>> {
        let spec = format!("{rev}:{path}");
        let output = self.invoke(&["show", &spec])?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(Error::CommandFailed {
                command: command_line(&["show", &spec]),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }

    fn stage(&self, path: &str) -> Result<()> {
        self.run_checked(&["add", path])?;
        Ok(())
    }

    fn set_proxy(&self, kind: ProxyKind, url: &str) -> Result<()> {
        self.run_checked(&["config", kind.config_key(), url])?;
        Ok(())
    }
}
