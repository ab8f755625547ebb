mod browser_caches;
mod prefetch;
mod recycle_bin;
mod software_distribution;
mod temp_files;

pub use browser_caches::{browsers, chrome_default_cache, BrowserFamily};

use crate::cleaner::Cleaner;
use crate::environment::Environment;
use crate::error::Result;
use crate::model::{CleanupCategory, PathTarget};

pub fn cleaner_for(category: CleanupCategory) -> Box<dyn Cleaner> {
    match category {
        CleanupCategory::TempFiles => Box::new(temp_files::TempFiles),
        CleanupCategory::Prefetch => Box::new(prefetch::Prefetch),
        CleanupCategory::BrowserCache => Box::new(browser_caches::BrowserCaches),
        CleanupCategory::SoftwareDistribution => {
            Box::new(software_distribution::SoftwareDistribution)
        }
        CleanupCategory::RecycleBin => Box::new(recycle_bin::RecycleBin),
    }
}

pub fn all_cleaners() -> Vec<Box<dyn Cleaner>> {
    CleanupCategory::ALL.into_iter().map(cleaner_for).collect()
}

/// Resolve the concrete locations for one category. Computed fresh on every
/// call; nothing is cached between runs.
pub fn resolve_category(category: CleanupCategory, env: &Environment) -> Result<Vec<PathTarget>> {
    cleaner_for(category).locate(env)
}
