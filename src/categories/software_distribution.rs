use crate::cleaner::Cleaner;
use crate::environment::Environment;
use crate::error::Result;
use crate::model::{CleanupCategory, PathTarget};

/// Subfolders of `SoftwareDistribution` that are safe to clear. The root
/// itself is never touched.
const SAFE_SUBFOLDERS: &[&str] = &["Download", "DataStore"];

pub struct SoftwareDistribution;

impl Cleaner for SoftwareDistribution {
    fn category(&self) -> CleanupCategory {
        CleanupCategory::SoftwareDistribution
    }

    fn locate(&self, env: &Environment) -> Result<Vec<PathTarget>> {
        let Some(root) = env.software_distribution_dir() else {
            return Ok(Vec::new());
        };
        Ok(SAFE_SUBFOLDERS
            .iter()
            .map(|name| root.join(name))
            .filter(|path| path.is_dir())
            .map(|path| PathTarget::directory(self.category(), path))
            .collect())
    }

    // Windows Update expects both folders to exist.
    fn recreates_directories(&self) -> bool {
        true
    }
}
