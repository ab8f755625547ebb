use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::size::Measurement;

/// The fixed set of cleanup categories.
///
/// Variant order is the order stages run in, so iterating a sorted
/// collection of categories visits them in stage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleanupCategory {
    TempFiles,
    Prefetch,
    BrowserCache,
    SoftwareDistribution,
    RecycleBin,
}

impl CleanupCategory {
    pub const ALL: [CleanupCategory; 5] = [
        CleanupCategory::TempFiles,
        CleanupCategory::Prefetch,
        CleanupCategory::BrowserCache,
        CleanupCategory::SoftwareDistribution,
        CleanupCategory::RecycleBin,
    ];

    /// Machine-readable name used by `--category` (e.g. "temp-files").
    pub fn name(self) -> &'static str {
        match self {
            CleanupCategory::TempFiles => "temp-files",
            CleanupCategory::Prefetch => "prefetch",
            CleanupCategory::BrowserCache => "browser-cache",
            CleanupCategory::SoftwareDistribution => "software-distribution",
            CleanupCategory::RecycleBin => "recycle-bin",
        }
    }

    /// Human-readable label for display (e.g. "Temp Files").
    pub fn label(self) -> &'static str {
        match self {
            CleanupCategory::TempFiles => "Temp Files",
            CleanupCategory::Prefetch => "Prefetch",
            CleanupCategory::BrowserCache => "Browser Cache",
            CleanupCategory::SoftwareDistribution => "Windows Update Leftovers",
            CleanupCategory::RecycleBin => "Recycle Bin",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Progress percentage reported once this stage has finished.
    pub(crate) fn completed_percent(self) -> u8 {
        match self {
            CleanupCategory::TempFiles => 20,
            CleanupCategory::Prefetch => 40,
            CleanupCategory::BrowserCache => 60,
            CleanupCategory::SoftwareDistribution => 80,
            CleanupCategory::RecycleBin => 95,
        }
    }
}

impl fmt::Display for CleanupCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The categories enabled for one run. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    categories: Vec<CleanupCategory>,
}

impl CleanupOptions {
    pub fn new(categories: impl IntoIterator<Item = CleanupCategory>) -> Result<Self> {
        let mut categories: Vec<CleanupCategory> = categories.into_iter().collect();
        if categories.is_empty() {
            return Err(Error::NoCategories);
        }
        categories.sort();
        categories.dedup();
        Ok(Self { categories })
    }

    pub fn all() -> Self {
        Self {
            categories: CleanupCategory::ALL.to_vec(),
        }
    }

    /// The quick-clean preset: temp files, prefetch and the recycle bin.
    /// Browser caches and update leftovers are left alone.
    pub fn quick() -> Self {
        Self {
            categories: vec![
                CleanupCategory::TempFiles,
                CleanupCategory::Prefetch,
                CleanupCategory::RecycleBin,
            ],
        }
    }

    pub fn contains(&self, category: CleanupCategory) -> bool {
        self.categories.contains(&category)
    }

    /// Enabled categories in stage order.
    pub fn categories(&self) -> &[CleanupCategory] {
        &self.categories
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    File,
    Directory,
}

/// A concrete location resolved for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathTarget {
    pub category: CleanupCategory,
    pub path: PathBuf,
    pub kind: TargetKind,
}

impl PathTarget {
    pub fn file(category: CleanupCategory, path: impl Into<PathBuf>) -> Self {
        Self {
            category,
            path: path.into(),
            kind: TargetKind::File,
        }
    }

    pub fn directory(category: CleanupCategory, path: impl Into<PathBuf>) -> Self {
        Self {
            category,
            path: path.into(),
            kind: TargetKind::Directory,
        }
    }
}

/// Freed (or, in a dry run, reclaimable) totals for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryResult {
    pub category: CleanupCategory,
    pub freed_bytes: u64,
    pub item_count: u64,
    /// Set when the category's own action did not go through, e.g. the
    /// recycle bin could not be emptied. Totals are unaffected.
    pub incomplete: bool,
}

impl CategoryResult {
    pub fn empty(category: CleanupCategory) -> Self {
        Self {
            category,
            freed_bytes: 0,
            item_count: 0,
            incomplete: false,
        }
    }

    pub fn incomplete(category: CleanupCategory) -> Self {
        Self {
            incomplete: true,
            ..Self::empty(category)
        }
    }

    pub fn add(&mut self, m: Measurement) {
        self.freed_bytes += m.bytes;
        self.item_count += m.items;
    }
}

/// Per-category results of a finished run plus their totals.
///
/// Only constructible from the per-category results, so the totals always
/// equal the sums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    per_category: BTreeMap<CleanupCategory, CategoryResult>,
    total_freed_bytes: u64,
    total_item_count: u64,
}

impl AggregateResult {
    pub fn from_results(results: impl IntoIterator<Item = CategoryResult>) -> Self {
        let mut per_category = BTreeMap::new();
        for result in results {
            let slot = per_category
                .entry(result.category)
                .or_insert_with(|| CategoryResult::empty(result.category));
            slot.freed_bytes += result.freed_bytes;
            slot.item_count += result.item_count;
            slot.incomplete |= result.incomplete;
        }
        let total_freed_bytes = per_category.values().map(|r| r.freed_bytes).sum();
        let total_item_count = per_category.values().map(|r| r.item_count).sum();
        Self {
            per_category,
            total_freed_bytes,
            total_item_count,
        }
    }

    pub fn get(&self, category: CleanupCategory) -> Option<&CategoryResult> {
        self.per_category.get(&category)
    }

    /// Results in stage order.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryResult> {
        self.per_category.values()
    }

    pub fn total_freed_bytes(&self) -> u64 {
        self.total_freed_bytes
    }

    pub fn total_item_count(&self) -> u64 {
        self.total_item_count
    }
}
