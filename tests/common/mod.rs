// Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vesaire::{Platform, ProgressEvent};

/// Stands in for the OS: records trash-empty calls instead of making them.
#[derive(Clone, Default)]
pub struct FakePlatform {
    pub elevated: bool,
    pub fail_trash: bool,
    pub trash_calls: Arc<AtomicUsize>,
}

impl FakePlatform {
    pub fn elevated() -> Self {
        Self {
            elevated: true,
            ..Self::default()
        }
    }

    pub fn trash_calls(&self) -> usize {
        self.trash_calls.load(Ordering::SeqCst)
    }
}

impl Platform for FakePlatform {
    fn is_elevated(&self) -> bool {
        self.elevated
    }

    fn empty_trash(&self) -> io::Result<()> {
        self.trash_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_trash {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        } else {
            Ok(())
        }
    }
}

pub fn write_bytes(path: &Path, len: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, vec![b'x'; len]).unwrap();
}

pub fn is_empty_dir(path: &Path) -> bool {
    path.is_dir() && fs::read_dir(path).unwrap().next().is_none()
}

/// Collects progress events for later assertions.
pub fn collector(events: &mut Vec<ProgressEvent>) -> impl FnMut(ProgressEvent) + '_ {
    move |event| events.push(event)
}

pub fn ignore(_: ProgressEvent) {}
