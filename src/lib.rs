//! Vesaire - disposable OS artifact cleaner.
//!
//! Finds, measures and removes temp files, prefetch files, browser caches,
//! Windows Update leftovers and the recycle bin contents. Sizes are always
//! captured before anything is removed, and paths matching the critical
//! exclusion list are never deleted.
//!
//! Runs happen on a worker thread and report through a [`RunHandle`]:
//!
//! ```no_run
//! use vesaire::{start_cleanup, CleanupCategory, CleanupOptions, Environment};
//!
//! let options = CleanupOptions::new([CleanupCategory::TempFiles])?;
//! let mut run = start_cleanup(options, Environment::from_process())?;
//! for event in run.by_ref() {
//!     println!("{:>3}% {}", event.percent, event.message);
//! }
//! let result = run.wait()?;
//! println!("freed {} bytes", result.total_freed_bytes());
//! # Ok::<(), vesaire::Error>(())
//! ```

pub mod analyzer;
pub mod categories;
pub mod cleaner;
pub mod deleter;
pub mod disk_info;
pub mod environment;
pub mod error;
pub mod exclusion;
pub mod model;
pub mod orchestrator;
pub mod platform;
pub mod progress;
pub mod size;
pub mod utils;

pub use analyzer::{start_analysis, AnalysisEntry, AnalysisReport, Analyzer, NamedLocation};
pub use deleter::SafeDeleter;
pub use disk_info::{DiskInfo, Mount, SystemVolumes, VolumeProbe, VolumeUsage};
pub use environment::{Environment, EnvironmentBuilder};
pub use error::{Error, Result};
pub use exclusion::{ExclusionPredicate, ExclusionSet, CRITICAL_SUBSTRINGS};
pub use model::{
    AggregateResult, CategoryResult, CleanupCategory, CleanupOptions, PathTarget, TargetKind,
};
pub use orchestrator::{start_cleanup, Orchestrator};
pub use platform::{NativePlatform, Platform};
pub use progress::{CancelToken, ProgressEvent, RunHandle};
pub use size::{measure, Measurement};
