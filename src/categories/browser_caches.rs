use std::path::PathBuf;

use crate::cleaner::{CleanContext, Cleaner};
use crate::environment::Environment;
use crate::error::Result;
use crate::model::{CategoryResult, CleanupCategory, PathTarget};
use crate::size::Measurement;
use crate::utils;

/// One browser family's cache layout.
pub trait BrowserFamily: Send + Sync {
    fn name(&self) -> &'static str;

    fn locate(&self, env: &Environment) -> Result<Vec<PathTarget>>;

    /// Clear one cache folder. Browsers recreate missing cache folders
    /// lazily, but only if the folder itself is there.
    fn clear(&self, target: &PathTarget, ctx: &mut CleanContext<'_>) -> Result<Measurement> {
        ctx.clear(target, true)
    }
}

/// Chromium-based browsers keep their caches under
/// `User Data\Default` inside the vendor's local app-data folder.
pub struct Chromium {
    name: &'static str,
    vendor_dir: &'static [&'static str],
}

const CHROMIUM_CACHE_DIRS: &[&str] = &["Cache", "Code Cache"];

impl Chromium {
    fn default_profile(&self, env: &Environment) -> Option<PathBuf> {
        let mut path = env.local_app_data()?;
        for part in self.vendor_dir {
            path.push(part);
        }
        Some(path.join("User Data").join("Default"))
    }
}

impl BrowserFamily for Chromium {
    fn name(&self) -> &'static str {
        self.name
    }

    fn locate(&self, env: &Environment) -> Result<Vec<PathTarget>> {
        let Some(profile) = self.default_profile(env) else {
            return Ok(Vec::new());
        };
        Ok(CHROMIUM_CACHE_DIRS
            .iter()
            .map(|dir| profile.join(dir))
            .filter(|path| path.exists())
            .map(|path| PathTarget::directory(CleanupCategory::BrowserCache, path))
            .collect())
    }
}

/// Firefox keeps one cache set per profile, so the profiles root has to be
/// listed.
pub struct Firefox;

const FIREFOX_CACHE_DIRS: &[&str] = &["cache2", "cache", "thumbnails"];

impl Firefox {
    fn profiles_root(env: &Environment) -> Option<PathBuf> {
        env.local_app_data()
            .map(|local| local.join("Mozilla").join("Firefox").join("Profiles"))
    }
}

impl BrowserFamily for Firefox {
    fn name(&self) -> &'static str {
        "Firefox"
    }

    fn locate(&self, env: &Environment) -> Result<Vec<PathTarget>> {
        let Some(root) = Self::profiles_root(env) else {
            return Ok(Vec::new());
        };
        let mut profiles: Vec<PathBuf> = utils::list_root(CleanupCategory::BrowserCache, &root)?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        profiles.sort();

        let mut targets = Vec::new();
        for profile in profiles {
            for dir in FIREFOX_CACHE_DIRS {
                let path = profile.join(dir);
                if path.exists() {
                    targets.push(PathTarget::directory(CleanupCategory::BrowserCache, path));
                }
            }
        }
        Ok(targets)
    }
}

static CHROME: Chromium = Chromium {
    name: "Chrome",
    vendor_dir: &["Google", "Chrome"],
};

static EDGE: Chromium = Chromium {
    name: "Edge",
    vendor_dir: &["Microsoft", "Edge"],
};

static FIREFOX: Firefox = Firefox;

/// Supported browsers, in the order they are cleaned.
pub fn browsers() -> [&'static dyn BrowserFamily; 3] {
    [&CHROME, &EDGE, &FIREFOX]
}

/// Chrome's default-profile cache, used as the representative browser
/// cache by the disk analyzer.
pub fn chrome_default_cache(env: &Environment) -> Option<PathBuf> {
    CHROME.default_profile(env).map(|p| p.join("Cache"))
}

pub struct BrowserCaches;

impl Cleaner for BrowserCaches {
    fn category(&self) -> CleanupCategory {
        CleanupCategory::BrowserCache
    }

    fn locate(&self, env: &Environment) -> Result<Vec<PathTarget>> {
        let mut targets = Vec::new();
        for browser in browsers() {
            targets.extend(browser.locate(env)?);
        }
        Ok(targets)
    }

    fn recreates_directories(&self) -> bool {
        true
    }

    fn clean(&self, ctx: &mut CleanContext<'_>) -> Result<CategoryResult> {
        let mut result = CategoryResult::empty(self.category());
        for browser in browsers() {
            let targets = browser.locate(ctx.env)?;
            if targets.is_empty() {
                continue;
            }
            (ctx.notify)(format!("Clearing {} cache...", browser.name()));
            for target in &targets {
                result.add(browser.clear(target, ctx)?);
            }
        }
        Ok(result)
    }
}
