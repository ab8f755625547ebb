use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::exclusion::ExclusionPredicate;
use crate::size::{self, Measurement};

/// Measures a path, then removes it.
///
/// Directory removal is best-effort: entries that cannot be removed (locked,
/// permission denied) stay where they are, and the pre-measured totals are
/// still reported as freed. Callers that need the exact freed amount must
/// re-measure afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeDeleter {
    dry_run: bool,
}

impl SafeDeleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A deleter that only measures. Nothing is removed or recreated.
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn delete(&self, path: &Path, exclusion: &dyn ExclusionPredicate) -> Measurement {
        if exclusion.is_excluded(path) {
            tracing::debug!("excluded, leaving in place: {}", path.display());
            return Measurement::ZERO;
        }

        let meta = match path.symlink_metadata() {
            Ok(meta) => meta,
            Err(e) => {
                tracing::debug!("skipping {}: {e}", path.display());
                return Measurement::ZERO;
            }
        };

        if !meta.is_dir() {
            // Symlinks land here too: the link is removed, never its target.
            let size = Measurement::new(meta.len(), 1);
            if self.dry_run {
                return size;
            }
            return match fs::remove_file(path) {
                Ok(()) => {
                    tracing::debug!("deleted {}", path.display());
                    size
                }
                Err(e) => {
                    tracing::warn!("failed to remove {}: {e}", path.display());
                    Measurement::ZERO
                }
            };
        }

        let measured = size::measure(path);
        if !self.dry_run {
            remove_tree(path);
        }
        measured
    }

    /// Delete a directory and put an empty one back in its place, for
    /// locations whose owning application expects the folder to exist.
    ///
    /// A symlinked directory keeps its link: the entries behind it are
    /// deleted instead, so a cache redirected to another drive stays
    /// redirected.
    pub fn delete_and_recreate(
        &self,
        path: &Path,
        exclusion: &dyn ExclusionPredicate,
    ) -> Measurement {
        if exclusion.is_excluded(path) {
            tracing::debug!("excluded, leaving in place: {}", path.display());
            return Measurement::ZERO;
        }
        let is_link = path
            .symlink_metadata()
            .is_ok_and(|meta| meta.file_type().is_symlink());
        if is_link {
            return self.clear_behind_link(path, exclusion);
        }
        let freed = self.delete(path, exclusion);
        if !self.dry_run {
            if let Err(e) = fs::create_dir_all(path) {
                tracing::warn!("could not recreate {}: {e}", path.display());
            }
        }
        freed
    }

    fn clear_behind_link(&self, link: &Path, exclusion: &dyn ExclusionPredicate) -> Measurement {
        let entries = match fs::read_dir(link) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("leaving link {} alone: {e}", link.display());
                return Measurement::ZERO;
            }
        };
        let mut freed = Measurement::ZERO;
        for entry in entries.flatten() {
            freed += self.delete(&entry.path(), exclusion);
        }
        freed
    }
}

/// Remove a directory tree, continuing past entries that fail.
fn remove_tree(root: &Path) {
    let mut failures = 0usize;
    for entry in WalkDir::new(root).follow_links(false).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => {
                failures += 1;
                continue;
            }
        };
        let result = if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())
        } else {
            fs::remove_file(entry.path())
        };
        if let Err(e) = result {
            failures += 1;
            tracing::debug!("left in place {}: {e}", entry.path().display());
        }
    }
    if failures > 0 {
        tracing::warn!(
            "{failures} entries under {} could not be removed",
            root.display()
        );
    }
}
