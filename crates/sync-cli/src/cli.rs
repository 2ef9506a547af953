//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// folder-sync - Unattended synchronizer for a git-backed directory tree
#[derive(Parser, Debug)]
#[command(name = "foldsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run one full sync pass
    ///
    /// Integrates remote changes, stages and commits local edits, and
    /// publishes the result. Intended to be invoked from a scheduler;
    /// concurrent runs against the same root are not coordinated.
    Run {
        /// Synchronized root (defaults to the configured root, then the
        /// current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Show files that would be staged, without touching the backend
    Status {
        /// Synchronized root (defaults to the configured root, then the
        /// current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   foldsync completions bash > ~/.local/share/bash-completion/completions/foldsync
    ///   foldsync completions zsh > ~/.zfunc/_foldsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
