use std::io;

/// OS capabilities the engine calls but does not implement itself.
pub trait Platform: Send + Sync {
    /// Whether the process runs with administrator/root rights. Only used to
    /// annotate progress; stages run the same either way.
    fn is_elevated(&self) -> bool;

    /// Empty the recycle bin / trash without asking for confirmation.
    fn empty_trash(&self) -> io::Result<()>;
}

/// The real OS bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativePlatform;

#[cfg(windows)]
impl Platform for NativePlatform {
    fn is_elevated(&self) -> bool {
        // SAFETY: IsUserAnAdmin takes no arguments and only reads the
        // process token.
        unsafe { windows_sys::Win32::UI::Shell::IsUserAnAdmin() != 0 }
    }

    fn empty_trash(&self) -> io::Result<()> {
        use windows_sys::Win32::UI::Shell::{
            SHEmptyRecycleBinW, SHERB_NOCONFIRMATION, SHERB_NOPROGRESSUI, SHERB_NOSOUND,
        };

        // SAFETY: null window and null root path mean "all drives, no owner".
        let hr = unsafe {
            SHEmptyRecycleBinW(
                std::ptr::null_mut(),
                std::ptr::null(),
                SHERB_NOCONFIRMATION | SHERB_NOPROGRESSUI | SHERB_NOSOUND,
            )
        };
        if hr == 0 {
            Ok(())
        } else {
            Err(io::Error::other(format!(
                "SHEmptyRecycleBinW returned {:#010x}",
                hr as u32
            )))
        }
    }
}

#[cfg(unix)]
impl Platform for NativePlatform {
    fn is_elevated(&self) -> bool {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }

    fn empty_trash(&self) -> io::Result<()> {
        let mut first_error = None;
        for dir in trash_dirs() {
            let read_dir = match std::fs::read_dir(&dir) {
                Ok(rd) => rd,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    first_error.get_or_insert(e);
                    continue;
                }
            };
            for entry in read_dir.flatten() {
                let path = entry.path();
                let result = match entry.file_type() {
                    Ok(ft) if ft.is_dir() => std::fs::remove_dir_all(&path),
                    _ => std::fs::remove_file(&path),
                };
                if let Err(e) = result {
                    tracing::debug!("could not remove {} from trash: {e}", path.display());
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(all(unix, target_os = "macos"))]
fn trash_dirs() -> Vec<std::path::PathBuf> {
    dirs::home_dir()
        .map(|home| vec![home.join(".Trash")])
        .unwrap_or_default()
}

#[cfg(all(unix, not(target_os = "macos")))]
fn trash_dirs() -> Vec<std::path::PathBuf> {
    dirs::data_dir()
        .map(|data| {
            let trash = data.join("Trash");
            vec![trash.join("files"), trash.join("info")]
        })
        .unwrap_or_default()
}
