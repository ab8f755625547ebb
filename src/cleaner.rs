use crate::deleter::SafeDeleter;
use crate::environment::Environment;
use crate::error::Result;
use crate::exclusion::ExclusionPredicate;
use crate::model::{CategoryResult, CleanupCategory, PathTarget, TargetKind};
use crate::platform::Platform;
use crate::progress::CancelToken;
use crate::size::Measurement;

/// Everything a category handler needs while one stage runs.
pub struct CleanContext<'a> {
    pub env: &'a Environment,
    pub deleter: SafeDeleter,
    pub exclusion: &'a dyn ExclusionPredicate,
    pub platform: &'a dyn Platform,
    pub cancel: &'a CancelToken,
    pub notify: &'a mut dyn FnMut(String),
}

impl CleanContext<'_> {
    /// Delete one target, optionally putting an empty directory back.
    /// Checks for cancellation first.
    pub fn clear(&mut self, target: &PathTarget, recreate: bool) -> Result<Measurement> {
        self.cancel.check()?;
        let freed = if recreate && target.kind == TargetKind::Directory {
            self.deleter.delete_and_recreate(&target.path, self.exclusion)
        } else {
            self.deleter.delete(&target.path, self.exclusion)
        };
        Ok(freed)
    }
}

/// The trait every category module implements.
pub trait Cleaner: Send + Sync {
    fn category(&self) -> CleanupCategory;

    /// Resolve the concrete locations for this category. Locations that do
    /// not exist are left out; that is not an error.
    fn locate(&self, env: &Environment) -> Result<Vec<PathTarget>>;

    /// Whether cleared directories must exist again afterwards.
    fn recreates_directories(&self) -> bool {
        false
    }

    /// Delete everything `locate` finds. In a dry run the context's deleter
    /// only measures.
    fn clean(&self, ctx: &mut CleanContext<'_>) -> Result<CategoryResult> {
        let targets = self.locate(ctx.env)?;
        let mut result = CategoryResult::empty(self.category());
        for target in &targets {
            result.add(ctx.clear(target, self.recreates_directories())?);
        }
        Ok(result)
    }
}
