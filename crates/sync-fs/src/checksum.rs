//! SHA-256 content fingerprints
//!
//! Change detection compares the current digest of every file against the
//! digest recorded by the previous run. Digests are lowercase hex, 64 chars.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

/// Compute the SHA-256 digest of in-memory content.
pub fn content_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Compute the SHA-256 digest of a file's contents.
///
/// Streams the file through the hasher rather than reading it whole, so
/// large tracked files do not balloon memory.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn file_digest(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
