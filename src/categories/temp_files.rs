use crate::cleaner::Cleaner;
use crate::environment::Environment;
use crate::error::Result;
use crate::model::{CleanupCategory, PathTarget};
use crate::utils;

/// Everything directly inside the user and system temp directories.
pub struct TempFiles;

impl Cleaner for TempFiles {
    fn category(&self) -> CleanupCategory {
        CleanupCategory::TempFiles
    }

    fn locate(&self, env: &Environment) -> Result<Vec<PathTarget>> {
        let mut targets = Vec::new();
        for root in utils::dedup_roots(env.temp_roots()) {
            tracing::debug!("scanning temp root {}", root.display());
            for entry in utils::list_root(self.category(), &root)? {
                targets.push(utils::target_for(self.category(), &entry));
            }
        }
        Ok(targets)
    }
}
