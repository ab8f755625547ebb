use std::io;
use std::path::PathBuf;

use serde::Serialize;

use crate::categories;
use crate::disk_info::{SystemVolumes, VolumeProbe, VolumeUsage};
use crate::environment::Environment;
use crate::error::Result;
use crate::progress::{CancelToken, ProgressEvent, Reporter, RunHandle};
use crate::size;
use crate::utils::format_size;

/// Share of the progress bar spent measuring locations; the rest covers the
/// volume snapshot.
const LOCATIONS_PERCENT: usize = 90;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedLocation {
    pub label: String,
    pub path: PathBuf,
}

impl NamedLocation {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// The locations reported by default: user temp, system temp, prefetch and
/// Chrome's cache.
pub fn default_locations(env: &Environment) -> Vec<NamedLocation> {
    [
        ("User Temp", env.temp.clone()),
        ("System Temp", env.system_temp()),
        ("Prefetch", env.prefetch_dir()),
        ("Browser Cache", categories::chrome_default_cache(env)),
    ]
    .into_iter()
    .filter_map(|(label, path)| path.map(|p| NamedLocation::new(label, p)))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisEntry {
    pub label: String,
    pub size_bytes: u64,
    pub item_count: u64,
    pub source_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub entries: Vec<AnalysisEntry>,
    pub volumes: Vec<VolumeUsage>,
}

/// Read-only counterpart of the orchestrator: sizes the candidate
/// locations and snapshots every mounted volume. Never deletes.
pub struct Analyzer<V = SystemVolumes> {
    locations: Vec<NamedLocation>,
    probe: V,
    cancel: CancelToken,
}

impl<V: VolumeProbe + 'static> Analyzer<V> {
    pub fn new(locations: Vec<NamedLocation>, probe: V) -> Self {
        Self {
            locations,
            probe,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn run(&self, on_progress: &mut dyn FnMut(ProgressEvent)) -> Result<AnalysisReport> {
        let mut reporter = Reporter::new(on_progress);
        let count = self.locations.len().max(1);

        let mut entries = Vec::new();
        for (i, location) in self.locations.iter().enumerate() {
            self.cancel.check()?;
            if !location.path.exists() {
                tracing::debug!("{} not present at {}", location.label, location.path.display());
                continue;
            }
            let measured = size::measure(&location.path);
            entries.push(AnalysisEntry {
                label: location.label.clone(),
                size_bytes: measured.bytes,
                item_count: measured.items,
                source_path: location.path.clone(),
            });
            let percent = (LOCATIONS_PERCENT * (i + 1) / count) as u8;
            reporter.report(
                percent,
                format!("Analyzed {}: {}", location.label, format_size(measured.bytes)),
            );
        }

        self.cancel.check()?;
        reporter.note("Reading volume usage...");
        let volumes = self.volumes();

        reporter.report(100, "Analysis complete");
        Ok(AnalysisReport { entries, volumes })
    }

    fn volumes(&self) -> Vec<VolumeUsage> {
        let mut volumes = Vec::new();
        for mount in self.probe.mounts() {
            match self.probe.usage(&mount) {
                Ok(info) => volumes.push(VolumeUsage::new(&mount, info)),
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                    tracing::debug!("no permission to query {}", mount.mount_point.display());
                }
                Err(e) => {
                    tracing::warn!("skipping volume {}: {e}", mount.mount_point.display());
                }
            }
        }
        volumes
    }

    /// Run on a dedicated worker thread, streaming progress to the handle.
    pub fn spawn(self) -> Result<RunHandle<AnalysisReport>> {
        let cancel = self.cancel.clone();
        RunHandle::spawn("vesaire-analysis", cancel, move |sink| self.run(sink))
    }
}

/// Start an analysis of the default locations on a worker thread.
pub fn start_analysis(env: &Environment) -> Result<RunHandle<AnalysisReport>> {
    Analyzer::new(default_locations(env), SystemVolumes).spawn()
}
