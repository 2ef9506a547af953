//! Error types for sync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from sync-core
    #[error(transparent)]
    Core(#[from] sync_core::Error),

    /// Error from sync-fs
    #[error(transparent)]
    Fs(#[from] sync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
