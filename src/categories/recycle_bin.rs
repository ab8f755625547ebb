use crate::cleaner::{CleanContext, Cleaner};
use crate::environment::Environment;
use crate::error::Result;
use crate::model::{CategoryResult, CleanupCategory, PathTarget};

/// Empties the recycle bin through the platform. The OS call reports no
/// sizes, so this category always contributes zero to the totals.
pub struct RecycleBin;

impl Cleaner for RecycleBin {
    fn category(&self) -> CleanupCategory {
        CleanupCategory::RecycleBin
    }

    fn locate(&self, _env: &Environment) -> Result<Vec<PathTarget>> {
        Ok(Vec::new())
    }

    fn clean(&self, ctx: &mut CleanContext<'_>) -> Result<CategoryResult> {
        if ctx.deleter.is_dry_run() {
            return Ok(CategoryResult::empty(self.category()));
        }
        ctx.cancel.check()?;
        if let Err(e) = ctx.platform.empty_trash() {
            tracing::warn!("failed to empty recycle bin: {e}");
            (ctx.notify)(format!("Recycle bin could not be emptied: {e}"));
            return Ok(CategoryResult::incomplete(self.category()));
        }
        Ok(CategoryResult::empty(self.category()))
    }
}
