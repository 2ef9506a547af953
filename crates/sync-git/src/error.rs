//! Error types for sync-git

/// Result type for sync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },
}
