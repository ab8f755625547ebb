use std::ops::AddAssign;
use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

/// Byte size and regular-file count of a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Measurement {
    pub bytes: u64,
    pub items: u64,
}

impl Measurement {
    pub const ZERO: Measurement = Measurement { bytes: 0, items: 0 };

    pub fn new(bytes: u64, items: u64) -> Self {
        Self { bytes, items }
    }
}

impl AddAssign for Measurement {
    fn add_assign(&mut self, rhs: Self) {
        self.bytes += rhs.bytes;
        self.items += rhs.items;
    }
}

/// Measure a file or a directory tree.
///
/// Entries that cannot be read or stat'ed are skipped; the totals cover
/// whatever was reachable. A missing path measures as zero.
pub fn measure(path: &Path) -> Measurement {
    let meta = match path.symlink_metadata() {
        Ok(meta) => meta,
        Err(_) => return Measurement::ZERO,
    };
    if !meta.is_dir() {
        return Measurement::new(meta.len(), 1);
    }

    let mut total = Measurement::ZERO;
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("skipping unreadable entry under {}: {e}", path.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(m) => total += Measurement::new(m.len(), 1),
            Err(e) => tracing::debug!("cannot stat {}: {e}", entry.path().display()),
        }
    }
    total
}
