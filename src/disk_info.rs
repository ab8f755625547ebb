use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Capacity of one filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskInfo {
    pub total: u64,
    pub available: u64,
    pub used: u64,
}

impl DiskInfo {
    pub fn from_total_available(total: u64, available: u64) -> Self {
        Self {
            total,
            available,
            used: total.saturating_sub(available),
        }
    }

    /// From `statvfs` block counts. Blocks reserved for root are neither
    /// used nor available, so `used + available` can be less than `total`.
    pub fn from_blocks(blocks: u64, free: u64, available: u64, block_size: u64) -> Self {
        Self {
            total: blocks * block_size,
            available: available * block_size,
            used: blocks.saturating_sub(free) * block_size,
        }
    }

    /// Used share of the space an unprivileged user can see, 0-100, one
    /// decimal.
    pub fn usage_percent(&self) -> f64 {
        let visible = self.used + self.available;
        if visible == 0 {
            return 0.0;
        }
        (self.used as f64 / visible as f64 * 1000.0).round() / 10.0
    }
}

/// A mounted filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub device: String,
    pub mount_point: PathBuf,
}

/// Usage snapshot of one mounted filesystem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeUsage {
    pub device: String,
    pub mount_point: PathBuf,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub percent_used: f64,
}

impl VolumeUsage {
    pub fn new(mount: &Mount, info: DiskInfo) -> Self {
        Self {
            device: mount.device.clone(),
            mount_point: mount.mount_point.clone(),
            total_bytes: info.total,
            used_bytes: info.used,
            free_bytes: info.available,
            percent_used: info.usage_percent(),
        }
    }
}

/// Mount enumeration and per-mount usage queries.
pub trait VolumeProbe: Send + Sync {
    fn mounts(&self) -> Vec<Mount>;

    fn usage(&self, mount: &Mount) -> io::Result<DiskInfo>;
}

/// Mounts from `sysinfo`; usage from `statvfs` on Unix so that permission
/// failures surface per mount.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemVolumes;

impl VolumeProbe for SystemVolumes {
    fn mounts(&self) -> Vec<Mount> {
        let disks = sysinfo::Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .map(|disk| Mount {
                device: disk.name().to_string_lossy().into_owned(),
                mount_point: disk.mount_point().to_path_buf(),
            })
            .collect()
    }

    #[cfg(unix)]
    fn usage(&self, mount: &Mount) -> io::Result<DiskInfo> {
        statvfs(&mount.mount_point)
    }

    #[cfg(not(unix))]
    fn usage(&self, mount: &Mount) -> io::Result<DiskInfo> {
        let disks = sysinfo::Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .find(|disk| disk.mount_point() == mount.mount_point)
            .map(|disk| DiskInfo::from_total_available(disk.total_space(), disk.available_space()))
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "volume no longer mounted"))
    }
}

#[cfg(unix)]
pub fn statvfs(path: &Path) -> io::Result<DiskInfo> {
    use std::ffi::CString;
    use std::mem::MaybeUninit;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut stat = MaybeUninit::<libc::statvfs>::uninit();
    // SAFETY: c_path is NUL-terminated and stat points to writable memory
    // of the right size.
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: statvfs returned 0, so the struct is initialised.
    let stat = unsafe { stat.assume_init() };
    Ok(DiskInfo::from_blocks(
        stat.f_blocks as u64,
        stat.f_bfree as u64,
        stat.f_bavail as u64,
        stat.f_frsize as u64,
    ))
}
