use std::path::PathBuf;

use crate::model::CleanupCategory;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that end a cleanup or analysis run.
///
/// Per-item failures (permission denied, vanished files, locked files) never
/// show up here: they are logged and contribute zero to the totals.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no cleanup categories selected")]
    NoCategories,

    #[error("{category} stage failed: cannot enumerate {}: {source}", path.display())]
    Stage {
        category: CleanupCategory,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("run cancelled")]
    Cancelled,

    #[error("worker exited before reporting a result")]
    WorkerLost,

    #[error("failed to start worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}
