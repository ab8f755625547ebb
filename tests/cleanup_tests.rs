mod common;

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};

use common::{collector, ignore, is_empty_dir, write_bytes, FakePlatform};
use vesaire::{
    CancelToken, CleanupCategory, CleanupOptions, Environment, Error, ExclusionSet, Orchestrator,
    ProgressEvent,
};

fn fixture() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("vesaire-it")
        .tempdir()
        .unwrap()
}

fn temp_env(temp: &Path) -> Environment {
    Environment {
        temp: Some(temp.to_path_buf()),
        ..Environment::default()
    }
}

fn only(category: CleanupCategory) -> CleanupOptions {
    CleanupOptions::new([category]).unwrap()
}

#[test]
fn temp_files_skip_protected_subfolder() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    write_bytes(&temp.join("a.tmp"), 100);
    write_bytes(&temp.join("b.tmp"), 200);
    write_bytes(&temp.join("c.tmp"), 300);
    write_bytes(&temp.join("Logs/keep.log"), 50);

    let orchestrator = Orchestrator::new(temp_env(&temp), FakePlatform::elevated());
    let result = orchestrator
        .run(&only(CleanupCategory::TempFiles), &mut ignore)
        .unwrap();

    let temp_result = result.get(CleanupCategory::TempFiles).unwrap();
    assert_eq!(temp_result.freed_bytes, 600);
    assert_eq!(temp_result.item_count, 3);
    assert!(!temp.join("a.tmp").exists());
    assert_eq!(fs::read(temp.join("Logs/keep.log")).unwrap().len(), 50);
}

#[test]
fn temp_subdirectories_are_removed_whole() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    write_bytes(&temp.join("build-1/obj/x.o"), 40);
    write_bytes(&temp.join("build-1/y.o"), 2);

    let result = Orchestrator::new(temp_env(&temp), FakePlatform::elevated())
        .run(&only(CleanupCategory::TempFiles), &mut ignore)
        .unwrap();

    assert_eq!(result.total_freed_bytes(), 42);
    assert_eq!(result.total_item_count(), 2);
    assert!(!temp.join("build-1").exists());
    assert!(temp.is_dir());
}

#[test]
fn firefox_profiles_are_cleared_and_recreated() {
    let dir = fixture();
    let profiles = dir.path().join("AppData/Local/Mozilla/Firefox/Profiles");
    write_bytes(&profiles.join("one.default/cache2/entry"), 10);
    write_bytes(&profiles.join("two.dev/cache2/entry"), 10);

    let env = Environment {
        user_profile: Some(dir.path().to_path_buf()),
        ..Environment::default()
    };
    let result = Orchestrator::new(env, FakePlatform::elevated())
        .run(&only(CleanupCategory::BrowserCache), &mut ignore)
        .unwrap();

    let browser = result.get(CleanupCategory::BrowserCache).unwrap();
    assert_eq!(browser.freed_bytes, 20);
    assert_eq!(browser.item_count, 2);
    assert!(is_empty_dir(&profiles.join("one.default/cache2")));
    assert!(is_empty_dir(&profiles.join("two.dev/cache2")));
}

#[test]
fn chromium_caches_are_recreated_and_reported_per_browser() {
    let dir = fixture();
    let chrome = dir.path().join("AppData/Local/Google/Chrome/User Data/Default");
    write_bytes(&chrome.join("Cache/Cache_Data/f_000001"), 1000);
    write_bytes(&chrome.join("Code Cache/js/abc"), 24);
    write_bytes(&chrome.join("Bookmarks"), 7);

    let env = Environment {
        user_profile: Some(dir.path().to_path_buf()),
        ..Environment::default()
    };
    let mut events = Vec::new();
    let result = Orchestrator::new(env, FakePlatform::elevated())
        .run(&only(CleanupCategory::BrowserCache), &mut collector(&mut events))
        .unwrap();

    assert_eq!(result.total_freed_bytes(), 1024);
    assert_eq!(result.total_item_count(), 2);
    assert!(is_empty_dir(&chrome.join("Cache")));
    assert!(is_empty_dir(&chrome.join("Code Cache")));
    assert!(chrome.join("Bookmarks").exists());
    assert!(events.iter().any(|e| e.message.contains("Chrome")));
}

#[cfg(unix)]
#[test]
fn symlinked_browser_cache_keeps_its_link() {
    let dir = fixture();
    let moved = dir.path().join("D/ChromeCache");
    write_bytes(&moved.join("f_000001"), 4096);
    let chrome = dir.path().join("AppData/Local/Google/Chrome/User Data/Default");
    fs::create_dir_all(&chrome).unwrap();
    std::os::unix::fs::symlink(&moved, chrome.join("Cache")).unwrap();

    let env = Environment::builder().user_profile(dir.path()).build();
    let result = Orchestrator::new(env, FakePlatform::elevated())
        .run(&only(CleanupCategory::BrowserCache), &mut ignore)
        .unwrap();

    assert_eq!(result.total_freed_bytes(), 4096);
    assert_eq!(result.total_item_count(), 1);
    let link = chrome.join("Cache").symlink_metadata().unwrap();
    assert!(link.file_type().is_symlink());
    assert!(is_empty_dir(&moved));
}

#[test]
fn software_distribution_clears_only_safe_subfolders() {
    let dir = fixture();
    let sd = dir.path().join("Windows/SoftwareDistribution");
    write_bytes(&sd.join("Download/abc/update.cab"), 500);
    write_bytes(&sd.join("DataStore/DataStore.edb"), 300);
    write_bytes(&sd.join("ReportingEvents.txt"), 9);

    let env = Environment {
        windows_dir: Some(dir.path().join("Windows")),
        ..Environment::default()
    };
    let result = Orchestrator::new(env, FakePlatform::elevated())
        .run(&only(CleanupCategory::SoftwareDistribution), &mut ignore)
        .unwrap();

    assert_eq!(result.total_freed_bytes(), 800);
    assert_eq!(result.total_item_count(), 2);
    assert!(is_empty_dir(&sd.join("Download")));
    assert!(is_empty_dir(&sd.join("DataStore")));
    assert!(sd.join("ReportingEvents.txt").exists());
}

#[test]
fn prefetch_removes_only_pf_files() {
    let dir = fixture();
    let prefetch = dir.path().join("Windows/Prefetch");
    write_bytes(&prefetch.join("NOTEPAD.EXE-D8414F97.pf"), 30);
    write_bytes(&prefetch.join("EXPLORER.EXE-A80E4F97.pf"), 70);
    write_bytes(&prefetch.join("Layout.ini"), 5);

    let env = Environment {
        windows_dir: Some(dir.path().join("Windows")),
        ..Environment::default()
    };
    let result = Orchestrator::new(env, FakePlatform::elevated())
        .run(&only(CleanupCategory::Prefetch), &mut ignore)
        .unwrap();

    assert_eq!(result.total_freed_bytes(), 100);
    assert_eq!(result.total_item_count(), 2);
    assert!(prefetch.join("Layout.ini").exists());
}

#[test]
fn recycle_bin_is_emptied_but_never_counted() {
    let platform = FakePlatform::elevated();
    let result = Orchestrator::new(Environment::default(), platform.clone())
        .run(&only(CleanupCategory::RecycleBin), &mut ignore)
        .unwrap();

    let bin = result.get(CleanupCategory::RecycleBin).unwrap();
    assert_eq!((bin.freed_bytes, bin.item_count), (0, 0));
    assert_eq!(platform.trash_calls(), 1);
}

#[test]
fn recycle_bin_failure_is_not_fatal() {
    let platform = FakePlatform {
        fail_trash: true,
        ..FakePlatform::elevated()
    };
    let mut events = Vec::new();
    let result = Orchestrator::new(Environment::default(), platform)
        .run(&only(CleanupCategory::RecycleBin), &mut collector(&mut events))
        .unwrap();

    assert_eq!(result.total_freed_bytes(), 0);
    assert!(result.get(CleanupCategory::RecycleBin).unwrap().incomplete);
    assert!(events.iter().any(|e| e.message.contains("could not be emptied")));
    assert!(events.iter().any(|e| e.message == "Recycle Bin not emptied"));
    assert!(!events.iter().any(|e| e.message == "Recycle Bin emptied"));
}

#[test]
fn totals_equal_sum_of_categories() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    write_bytes(&temp.join("a"), 11);
    write_bytes(&dir.path().join("Windows/Prefetch/X.pf"), 22);
    write_bytes(
        &dir.path().join("AppData/Local/Mozilla/Firefox/Profiles/p/cache/c"),
        33,
    );

    let env = Environment::builder()
        .user_profile(dir.path())
        .temp(temp)
        .windows_dir(dir.path().join("Windows"))
        .build();
    let result = Orchestrator::new(env, FakePlatform::elevated())
        .run(&CleanupOptions::all(), &mut ignore)
        .unwrap();

    let bytes: u64 = result.categories().map(|r| r.freed_bytes).sum();
    let items: u64 = result.categories().map(|r| r.item_count).sum();
    assert_eq!(result.total_freed_bytes(), bytes);
    assert_eq!(result.total_item_count(), items);
    assert_eq!(bytes, 66);
    assert_eq!(result.categories().count(), CleanupCategory::ALL.len());
}

#[test]
fn second_run_finds_nothing() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    write_bytes(&temp.join("a"), 10);
    write_bytes(&temp.join("logs/b"), 10);
    write_bytes(&dir.path().join("Windows/SoftwareDistribution/Download/c"), 10);
    write_bytes(
        &dir.path().join("AppData/Local/Mozilla/Firefox/Profiles/p/cache2/d"),
        10,
    );

    let env = Environment::builder()
        .user_profile(dir.path())
        .temp(temp)
        .windows_dir(dir.path().join("Windows"))
        .build();
    let orchestrator = Orchestrator::new(env, FakePlatform::elevated());
    let first = orchestrator.run(&CleanupOptions::all(), &mut ignore).unwrap();
    assert_eq!(first.total_item_count(), 3);

    let second = orchestrator.run(&CleanupOptions::all(), &mut ignore).unwrap();
    for row in second.categories() {
        assert_eq!((row.freed_bytes, row.item_count), (0, 0), "{}", row.category);
    }
}

#[test]
fn caller_exclusions_add_to_critical_list() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    write_bytes(&temp.join("keep-me.dat"), 10);
    write_bytes(&temp.join("drop.dat"), 5);

    let result = Orchestrator::new(temp_env(&temp), FakePlatform::elevated())
        .with_exclusion(ExclusionSet::default().with_substrings(["KEEP-ME"]))
        .run(&only(CleanupCategory::TempFiles), &mut ignore)
        .unwrap();

    assert_eq!(result.total_freed_bytes(), 5);
    assert!(temp.join("keep-me.dat").exists());
    assert!(!temp.join("drop.dat").exists());
}

#[test]
fn dry_run_reports_without_deleting() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    write_bytes(&temp.join("a"), 100);
    let sd = dir.path().join("Windows/SoftwareDistribution/Download");
    write_bytes(&sd.join("u.cab"), 50);
    let platform = FakePlatform::elevated();

    let env = Environment {
        temp: Some(temp.clone()),
        windows_dir: Some(dir.path().join("Windows")),
        ..Environment::default()
    };
    let result = Orchestrator::new(env, platform.clone())
        .dry_run(true)
        .run(&CleanupOptions::all(), &mut ignore)
        .unwrap();

    assert_eq!(result.total_freed_bytes(), 150);
    assert!(temp.join("a").exists());
    assert!(sd.join("u.cab").exists());
    assert_eq!(platform.trash_calls(), 0);
}

#[test]
fn progress_is_monotonic_and_finishes_at_100() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    write_bytes(&temp.join("a"), 1);

    let mut events: Vec<ProgressEvent> = Vec::new();
    Orchestrator::new(temp_env(&temp), FakePlatform::default())
        .run(&CleanupOptions::all(), &mut collector(&mut events))
        .unwrap();

    assert!(events[0].message.contains("elevated"));
    assert!(events.windows(2).all(|w| w[0].percent <= w[1].percent));
    assert_eq!(events.last().unwrap().percent, 100);
    assert!(events.iter().any(|e| e.message.starts_with("Cleaning Temp Files")));
    assert!(events.iter().any(|e| e.percent == 95));
}

#[test]
fn cancelled_run_touches_nothing() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    write_bytes(&temp.join("a"), 1);

    let cancel = CancelToken::new();
    cancel.cancel();
    let err = Orchestrator::new(temp_env(&temp), FakePlatform::elevated())
        .with_cancel_token(cancel)
        .run(&CleanupOptions::all(), &mut ignore)
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert!(temp.join("a").exists());
}

#[test]
fn empty_selection_is_rejected() {
    assert!(matches!(
        CleanupOptions::new(Vec::new()),
        Err(Error::NoCategories)
    ));
}

#[test]
fn spawned_run_streams_events_then_result() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    write_bytes(&temp.join("a"), 64);

    let mut handle = Orchestrator::new(temp_env(&temp), FakePlatform::elevated())
        .spawn(only(CleanupCategory::TempFiles))
        .unwrap();
    let events: Vec<ProgressEvent> = handle.by_ref().collect();
    let result = handle.wait().unwrap();

    assert!(!events.is_empty());
    assert_eq!(events.last().unwrap().percent, 100);
    assert_eq!(result.total_freed_bytes(), 64);
}

#[cfg(unix)]
#[test]
fn failing_stage_ends_run_after_earlier_deletions() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    write_bytes(&temp.join("a"), 10);
    let windows = dir.path().join("Windows");
    fs::create_dir_all(&windows).unwrap();
    // A self-referencing link cannot be resolved or listed.
    std::os::unix::fs::symlink("Prefetch", windows.join("Prefetch")).unwrap();

    let env = Environment::builder().temp(&temp).windows_dir(&windows).build();
    let options =
        CleanupOptions::new([CleanupCategory::TempFiles, CleanupCategory::Prefetch]).unwrap();
    let mut events = Vec::new();
    let err = Orchestrator::new(env, FakePlatform::elevated())
        .run(&options, &mut collector(&mut events))
        .unwrap_err();

    match err {
        Error::Stage { category, path, .. } => {
            assert_eq!(category, CleanupCategory::Prefetch);
            assert_eq!(path, windows.join("Prefetch"));
        }
        other => panic!("expected a stage error, got {other:?}"),
    }
    assert!(!temp.join("a").exists());
    assert!(events.iter().any(|e| e.percent == 20));
    assert!(events.iter().all(|e| e.percent < 100));
}

#[test]
fn cancelling_mid_stage_stops_before_next_item() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    for name in ["a", "b", "c"] {
        write_bytes(&temp.join(name), 1);
    }

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let err = Orchestrator::new(temp_env(&temp), FakePlatform::elevated())
        .with_cancel_token(cancel)
        .with_exclusion(move |_: &Path| {
            trigger.cancel();
            false
        })
        .run(&only(CleanupCategory::TempFiles), &mut ignore)
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert_eq!(fs::read_dir(&temp).unwrap().count(), 2);
}

#[test]
fn run_handle_cancel_reaches_running_worker() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    for name in ["a", "b", "c"] {
        write_bytes(&temp.join(name), 1);
    }

    // The worker parks on its first delete until the handle has cancelled.
    let barrier = Arc::new(Barrier::new(2));
    let gate = Arc::clone(&barrier);
    let first = AtomicBool::new(true);
    let handle = Orchestrator::new(temp_env(&temp), FakePlatform::elevated())
        .with_exclusion(move |_: &Path| {
            if first.swap(false, Ordering::SeqCst) {
                gate.wait();
                gate.wait();
            }
            false
        })
        .spawn(CleanupOptions::all())
        .unwrap();

    barrier.wait();
    handle.cancel();
    barrier.wait();

    assert!(matches!(handle.wait(), Err(Error::Cancelled)));
    assert_eq!(fs::read_dir(&temp).unwrap().count(), 2);
}

#[test]
fn quick_clean_leaves_browser_caches() {
    let dir = fixture();
    let temp = dir.path().join("Temp");
    write_bytes(&temp.join("a"), 5);
    let cache = dir.path().join("AppData/Local/Google/Chrome/User Data/Default/Cache");
    write_bytes(&cache.join("blob"), 9);

    let platform = FakePlatform::elevated();
    let env = Environment::builder()
        .user_profile(dir.path())
        .temp(&temp)
        .build();
    let result = Orchestrator::new(env, platform.clone())
        .run(&CleanupOptions::quick(), &mut ignore)
        .unwrap();

    assert_eq!(result.total_freed_bytes(), 5);
    assert!(result.get(CleanupCategory::BrowserCache).is_none());
    assert!(cache.join("blob").exists());
    assert_eq!(platform.trash_calls(), 1);
}
