//! Deterministic file enumeration under a scan root
//!
//! Directory entries are visited sorted by file name, so downstream match
//! and facet ordering is reproducible across runs. Symlinks are never
//! followed, which also rules out symlink-cycle non-termination; symlink
//! entries whose extension matches are still yielded as candidates so a
//! dangling link surfaces as an I/O warning at scan time rather than
//! silently vanishing.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::diagnostics::ScanWarning;

/// Enumerate candidate files under `root`, filtered by the extension
/// allow-list.
///
/// # Behavior
/// 1. Walk the tree sorted by file name (lexicographic per directory)
/// 2. Keep regular files and symlinks whose extension is allow-listed
/// 3. Downgrade unreadable directories/entries to warnings and continue
///
/// # Returns
/// Candidate paths in deterministic walk order, plus any soft warnings.
pub fn walk_files(root: &Path, extensions: &[String]) -> (Vec<PathBuf>, Vec<ScanWarning>) {
    let mut files = Vec::new();
    let mut warnings = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                let file_type = entry.file_type();
                if !file_type.is_file() && !file_type.is_symlink() {
                    continue;
                }
                if extension_matches(entry.path(), extensions) {
                    files.push(entry.into_path());
                }
            }
            Err(err) => {
                let subject = err
                    .path()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|| root.to_string_lossy().to_string());
                warnings.push(ScanWarning::new(subject, err.to_string()));
            }
        }
    }

    (files, warnings)
}

fn extension_matches(path: &Path, extensions: &[String]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions.iter().any(|allowed| allowed == ext),
        None => false,
    }
}
