use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{CleanupCategory, PathTarget};

/// Format byte count as human-readable string.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1_099_511_627_776 {
        format!("{:.2} TB", bytes as f64 / 1_099_511_627_776.0)
    } else if bytes >= 1_073_741_824 {
        format!("{:.2} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1_024 {
        format!("{:.2} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Shorten a path for display by replacing the home dir with ~.
pub fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(relative) => format!("~/{}", relative.display()),
        None => path.display().to_string(),
    }
}

/// List the children of a category root.
///
/// A root that is missing, not a directory, or not readable by this user
/// yields no children. Any other failure to inspect or list it ends the
/// stage.
pub(crate) fn list_root(category: CleanupCategory, root: &Path) -> Result<Vec<fs::DirEntry>> {
    let listing = fs::metadata(root).and_then(|meta| {
        if meta.is_dir() {
            fs::read_dir(root).map(Some)
        } else {
            Ok(None)
        }
    });
    match listing {
        Ok(Some(read_dir)) => Ok(read_dir.flatten().collect()),
        Ok(None) => Ok(Vec::new()),
        Err(e) => {
            tolerate_listing_error(category, root, e)?;
            Ok(Vec::new())
        }
    }
}

/// Decide whether a root that could not be listed is skipped (`Ok`) or
/// fails its stage.
pub(crate) fn tolerate_listing_error(
    category: CleanupCategory,
    root: &Path,
    error: io::Error,
) -> Result<()> {
    match error.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Ok(()),
        io::ErrorKind::PermissionDenied => {
            tracing::warn!("skipping {}: {error}", root.display());
            Ok(())
        }
        _ => Err(Error::Stage {
            category,
            path: root.to_path_buf(),
            source: error,
        }),
    }
}

/// Turn a directory entry into a target, keeping its file/directory kind.
pub(crate) fn target_for(category: CleanupCategory, entry: &fs::DirEntry) -> PathTarget {
    let path = entry.path();
    match entry.file_type() {
        Ok(ft) if ft.is_dir() => PathTarget::directory(category, path),
        _ => PathTarget::file(category, path),
    }
}

/// Drop repeated roots, comparing canonical forms where they resolve.
pub(crate) fn dedup_roots(roots: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = Vec::new();
    let mut unique = Vec::new();
    for root in roots {
        let key = fs::canonicalize(&root).unwrap_or_else(|_| root.clone());
        if !seen.contains(&key) {
            seen.push(key);
            unique.push(root);
        }
    }
    unique
}
