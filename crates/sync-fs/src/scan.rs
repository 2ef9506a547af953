//! Recursive directory scanning

use crate::SlashPath;
use std::path::Path;
use walkdir::WalkDir;

/// Enumerate every regular file under `root`, recursively.
///
/// Returns paths relative to `root` with forward slashes, sorted for a
/// stable order. Directories are excluded and the git metadata directory
/// is pruned: staging paths under `.git` can never succeed. Symlinks are
/// not followed; whether an entry is ultimately hashable is decided at
/// digest time, not here.
pub fn scan(root: &Path) -> Vec<String> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != ".git");

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("scan: skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.path().strip_prefix(root) {
            Ok(rel) => files.push(SlashPath::new(rel).as_str().to_string()),
            Err(_) => tracing::warn!(
                "scan: entry outside root: {}",
                entry.path().display()
            ),
        }
    }

    files.sort();
    files
}
