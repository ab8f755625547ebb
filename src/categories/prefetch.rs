use crate::cleaner::Cleaner;
use crate::environment::Environment;
use crate::error::Result;
use crate::model::{CleanupCategory, PathTarget};
use crate::utils;

/// `.pf` files in `%WINDIR%\Prefetch`. Windows rebuilds them on demand.
pub struct Prefetch;

impl Cleaner for Prefetch {
    fn category(&self) -> CleanupCategory {
        CleanupCategory::Prefetch
    }

    fn locate(&self, env: &Environment) -> Result<Vec<PathTarget>> {
        let Some(root) = env.prefetch_dir() else {
            return Ok(Vec::new());
        };
        let targets = utils::list_root(self.category(), &root)?
            .iter()
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .to_lowercase()
                    .ends_with(".pf")
            })
            .map(|entry| utils::target_for(self.category(), entry))
            .collect();
        Ok(targets)
    }
}
