//! Persisted fingerprint store
//!
//! Maps relative file paths to content digests across runs. The store is
//! loaded once at the start of a sync run and rewritten wholesale at the
//! end of a run that staged anything; an unchanged run never touches it.

use crate::{Error, Result, io};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Record delimiter. Two characters so it cannot collide with a single
/// `|` in a file name; paths containing `||` are not supported.
const DELIMITER: &str = "||";

/// On-disk mapping from relative path to content digest.
#[derive(Debug, Clone)]
pub struct FingerprintStore {
    path: PathBuf,
}

impl FingerprintStore {
    /// Create a store handle for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted mapping.
    ///
    /// A missing file is not an error: the first run starts from an empty
    /// mapping. A line that does not split into exactly two fields is a
    /// fatal [`Error::CorruptStore`] — change detection cannot proceed on
    /// state it cannot trust.
    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;

        let mut hashes = BTreeMap::new();
        for (idx, line) in content.lines().enumerate() {
            let fields: Vec<&str> = line.split(DELIMITER).collect();
            let [path, digest] = fields.as_slice() else {
                return Err(Error::CorruptStore {
                    path: self.path.clone(),
                    line: idx + 1,
                });
            };
            hashes.insert(path.to_string(), digest.to_string());
        }
        Ok(hashes)
    }

    /// Rewrite the store wholesale, atomically.
    ///
    /// Records are emitted in path order so successive saves of the same
    /// mapping are byte-identical.
    pub fn save(&self, hashes: &BTreeMap<String, String>) -> Result<()> {
        let mut content = String::new();
        for (path, digest) in hashes {
            content.push_str(path);
            content.push_str(DELIMITER);
            content.push_str(digest);
            content.push('\n');
        }
        io::write_atomic(&self.path, content.as_bytes())
    }
}
