//! Filesystem layer for folder-sync
//!
//! Provides recursive scanning, content fingerprints, and the persisted
//! fingerprint store used for change detection across runs.

pub mod checksum;
pub mod error;
pub mod io;
pub mod path;
pub mod scan;
pub mod store;

pub use checksum::{content_digest, file_digest};
pub use error::{Error, Result};
pub use path::SlashPath;
pub use scan::scan;
pub use store::FingerprintStore;
