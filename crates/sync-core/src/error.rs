//! Error types for sync-core

/// Result type for sync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sync-core operations
///
/// Anything that reaches the caller here is fatal for the run: recoverable
/// conditions (unreachable network, merge conflicts, per-file staging
/// failures, a rejected push) are journaled inside the engine and never
/// surface as errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration could not be resolved
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Filesystem error from sync-fs, including a corrupt fingerprint store
    #[error(transparent)]
    Fs(#[from] sync_fs::Error),

    /// Backend error from sync-git
    #[error(transparent)]
    Git(#[from] sync_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
