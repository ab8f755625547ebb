use std::path::Path;

use crate::categories;
use crate::cleaner::CleanContext;
use crate::deleter::SafeDeleter;
use crate::environment::Environment;
use crate::error::Result;
use crate::exclusion::{ExclusionPredicate, ExclusionSet};
use crate::model::{AggregateResult, CategoryResult, CleanupCategory, CleanupOptions};
use crate::platform::{NativePlatform, Platform};
use crate::progress::{CancelToken, ProgressEvent, Reporter, RunHandle};
use crate::utils::format_size;

/// Added to the running percentage when a stage starts.
const STAGE_START_STEP: u8 = 5;

/// Runs the enabled categories in stage order and totals what they freed.
///
/// The fixed critical exclusions always apply; a caller-supplied predicate
/// can only exclude more. Stages run one after another on the calling
/// thread (or on one worker thread with [`spawn`](Self::spawn)). A failing
/// stage ends the run and discards the results gathered so far; deletions
/// already made are not undone.
pub struct Orchestrator<P = NativePlatform> {
    env: Environment,
    platform: P,
    critical: ExclusionSet,
    caller_exclusion: Option<Box<dyn ExclusionPredicate + Send + Sync>>,
    dry_run: bool,
    cancel: CancelToken,
}

impl<P: Platform + 'static> Orchestrator<P> {
    pub fn new(env: Environment, platform: P) -> Self {
        Self {
            env,
            platform,
            critical: ExclusionSet::critical(),
            caller_exclusion: None,
            dry_run: false,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_exclusion(mut self, exclusion: impl ExclusionPredicate + Send + Sync + 'static) -> Self {
        self.caller_exclusion = Some(Box::new(exclusion));
        self
    }

    /// Measure what would be freed without deleting anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.critical.is_excluded(path)
            || self
                .caller_exclusion
                .as_ref()
                .is_some_and(|extra| extra.is_excluded(path))
    }

    pub fn run(
        &self,
        options: &CleanupOptions,
        on_progress: &mut dyn FnMut(ProgressEvent),
    ) -> Result<AggregateResult> {
        let mut reporter = Reporter::new(on_progress);
        if !self.platform.is_elevated() {
            reporter.report(0, "Not running elevated - some items will be skipped");
        }

        let deleter = if self.dry_run {
            SafeDeleter::dry_run()
        } else {
            SafeDeleter::new()
        };
        let exclusion = |path: &Path| self.is_excluded(path);

        let mut results = Vec::with_capacity(options.categories().len());
        for &category in options.categories() {
            self.cancel.check()?;

            let start = reporter.percent().saturating_add(STAGE_START_STEP);
            let verb = if self.dry_run { "Scanning" } else { "Cleaning" };
            reporter.report(start, format!("{verb} {}...", category.label()));
            tracing::info!(category = category.name(), dry_run = self.dry_run, "stage started");

            let result = {
                let mut notify = |message: String| reporter.note(message);
                let mut ctx = CleanContext {
                    env: &self.env,
                    deleter,
                    exclusion: &exclusion,
                    platform: &self.platform,
                    cancel: &self.cancel,
                    notify: &mut notify,
                };
                categories::cleaner_for(category).clean(&mut ctx)?
            };

            tracing::info!(
                category = category.name(),
                freed_bytes = result.freed_bytes,
                items = result.item_count,
                "stage finished"
            );
            reporter.report(category.completed_percent(), self.stage_summary(&result));
            results.push(result);
        }

        let aggregate = AggregateResult::from_results(results);
        let done = if self.dry_run {
            format!("Scan complete: {} reclaimable", format_size(aggregate.total_freed_bytes()))
        } else {
            format!("Cleanup complete: {} freed", format_size(aggregate.total_freed_bytes()))
        };
        reporter.report(100, done);
        Ok(aggregate)
    }

    fn stage_summary(&self, result: &CategoryResult) -> String {
        let label = result.category.label();
        match (result.category, self.dry_run) {
            (CleanupCategory::RecycleBin, false) if result.incomplete => {
                format!("{label} not emptied")
            }
            (CleanupCategory::RecycleBin, false) => format!("{label} emptied"),
            (CleanupCategory::RecycleBin, true) => format!("{label}: size not available"),
            (_, false) => format!("{label} cleaned: {}", format_size(result.freed_bytes)),
            (_, true) => format!("{label}: {} reclaimable", format_size(result.freed_bytes)),
        }
    }

    /// Run on a dedicated worker thread, streaming progress to the handle.
    pub fn spawn(self, options: CleanupOptions) -> Result<RunHandle<AggregateResult>> {
        let cancel = self.cancel.clone();
        RunHandle::spawn("vesaire-cleanup", cancel, move |sink| self.run(&options, sink))
    }
}

/// Start a cleanup of `options` against the real OS on a worker thread.
pub fn start_cleanup(options: CleanupOptions, env: Environment) -> Result<RunHandle<AggregateResult>> {
    Orchestrator::new(env, NativePlatform).spawn(options)
}
