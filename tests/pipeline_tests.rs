//! End-to-end pipeline tests on temp directory trees.

use diskscout::pipeline::discovery::run_discovery;
use diskscout::pipeline::transfer::copy_into;
use diskscout::pipeline::{spawn_copy_workers, spawn_discovery_thread, spawn_match_workers};
use diskscout::queue::{BoundedQueue, ProducerGuard};
use diskscout::{Opts, run, run_with_cancel};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn opts(extension: &str, root: &Path, dest: &Path, searchers: usize, copiers: usize) -> Opts {
    Opts {
        extension: extension.to_string(),
        root: root.to_path_buf(),
        destination: dest.to_path_buf(),
        searchers,
        copiers,
        verbose: false,
    }
}

fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
}

fn dest_file_names(dest: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dest)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_two_of_three_subdirs_match() {
    let root = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    for sub in ["a", "b", "c"] {
        fs::create_dir(root.path().join(sub)).unwrap();
    }
    write_file(&root.path().join("a/one.txt"), "first file");
    write_file(&root.path().join("b/two.txt"), "second file");
    write_file(&root.path().join("c/ignore.log"), "not a match");

    let summary = run(&opts("txt", root.path(), dest.path(), 1, 1)).unwrap();

    assert_eq!(summary.dirs_discovered, 4); // root + 3 subdirs
    assert_eq!(summary.files_matched, 2);
    assert_eq!(summary.files_copied, 2);
    assert!(summary.failed_copies.is_empty());
    assert_eq!(dest_file_names(dest.path()), vec!["one.txt", "two.txt"]);

    // Byte-for-byte copies; sources untouched.
    assert_eq!(fs::read(dest.path().join("one.txt")).unwrap(), b"first file");
    assert_eq!(fs::read(dest.path().join("two.txt")).unwrap(), b"second file");
    assert!(root.path().join("a/one.txt").exists());
    assert!(root.path().join("b/two.txt").exists());
}

#[test]
fn test_zero_matches_leaves_destination_untouched() {
    let root = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("sub")).unwrap();
    write_file(&root.path().join("sub/data.csv"), "a,b,c");

    let summary = run(&opts("txt", root.path(), dest.path(), 2, 2)).unwrap();

    assert_eq!(summary.files_matched, 0);
    assert_eq!(summary.files_copied, 0);
    assert!(summary.failed_copies.is_empty());
    assert!(dest_file_names(dest.path()).is_empty());
}

#[test]
fn test_existing_destination_file_fails_only_that_copy() {
    let root = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    write_file(&root.path().join("kept.txt"), "new kept");
    write_file(&root.path().join("fresh.txt"), "fresh");
    write_file(&dest.path().join("kept.txt"), "old contents");

    let summary = run(&opts("txt", root.path(), dest.path(), 1, 1)).unwrap();

    assert_eq!(summary.files_matched, 2);
    assert_eq!(summary.files_copied, 1);
    assert_eq!(summary.failed_copies.len(), 1);
    assert!(summary.failed_copies[0].0.ends_with("kept.txt"));
    // Every match is accounted for: copied or recorded as failed.
    assert_eq!(
        summary.files_copied + summary.failed_copies.len(),
        summary.files_matched
    );

    // Collision is a failure, never an overwrite.
    assert_eq!(fs::read(dest.path().join("kept.txt")).unwrap(), b"old contents");
    assert_eq!(fs::read(dest.path().join("fresh.txt")).unwrap(), b"fresh");
}

#[test]
fn test_phtml_is_not_html() {
    let root = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    write_file(&root.path().join("index.html"), "<html/>");
    write_file(&root.path().join("report.phtml"), "<?php ?>");

    let summary = run(&opts("html", root.path(), dest.path(), 1, 1)).unwrap();

    assert_eq!(summary.files_matched, 1);
    assert_eq!(dest_file_names(dest.path()), vec!["index.html"]);
}

#[test]
fn test_leading_dot_extension_accepted() {
    let root = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    write_file(&root.path().join("note.txt"), "dot form");

    let summary = run(&opts(".txt", root.path(), dest.path(), 1, 1)).unwrap();

    assert_eq!(summary.files_copied, 1);
    assert_eq!(dest_file_names(dest.path()), vec!["note.txt"]);
}

#[test]
fn test_deeply_nested_match_is_found() {
    let root = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let deep = root.path().join("a/b/c/d");
    fs::create_dir_all(&deep).unwrap();
    write_file(&deep.join("deep.txt"), "buried");

    let summary = run(&opts("txt", root.path(), dest.path(), 2, 1)).unwrap();

    assert_eq!(summary.dirs_discovered, 5); // root + a + b + c + d
    assert_eq!(summary.files_copied, 1);
    assert_eq!(fs::read(dest.path().join("deep.txt")).unwrap(), b"buried");
}

#[test]
fn test_many_workers_conserve_files() {
    let root = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let mut expected = Vec::new();
    for d in 0..8 {
        let dir = root.path().join(format!("dir{d}"));
        fs::create_dir(&dir).unwrap();
        for f in 0..5 {
            let name = format!("file_{d}_{f}.txt");
            write_file(&dir.join(&name), &format!("payload {d}/{f}"));
            expected.push(name);
        }
    }
    expected.sort();

    let summary = run(&opts("txt", root.path(), dest.path(), 4, 3)).unwrap();

    assert_eq!(summary.files_matched, 40);
    assert_eq!(summary.files_copied, 40);
    assert!(summary.failed_copies.is_empty());
    assert_eq!(dest_file_names(dest.path()), expected);
}

#[test]
fn test_pre_cancelled_run_terminates_cleanly() {
    let root = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("sub")).unwrap();
    write_file(&root.path().join("sub/file.txt"), "never copied");

    let cancel = Arc::new(AtomicBool::new(true));
    let summary = run_with_cancel(
        &opts("txt", root.path(), dest.path(), 2, 2),
        &cancel,
    )
    .unwrap();

    // Discovery publishes the root, then observes the flag and stops; every
    // producer still unregisters, so all stages drain and join.
    assert_eq!(summary.dirs_discovered, 1);
    assert_eq!(summary.files_copied, 0);
    assert!(cancel.load(Ordering::Relaxed));
}

// Cancellation under backpressure: discovery is parked in a blocking enqueue
// on a full directory queue when the cancel flag is set. Cancelled matchers
// and copiers keep draining their queues, so the parked producer is released
// and every stage reaches end-of-stream and joins.
#[test]
fn test_cancel_under_backpressure_releases_blocked_producer() {
    let root = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    for i in 0..6 {
        let dir = root.path().join(format!("sub{i}"));
        fs::create_dir(&dir).unwrap();
        write_file(&dir.join("file.txt"), "payload");
    }

    let dirs = Arc::new(BoundedQueue::new(1));
    let results = Arc::new(BoundedQueue::new(1));
    let cancel = Arc::new(AtomicBool::new(false));
    let failed = Arc::new(Mutex::new(Vec::new()));

    let discovery = spawn_discovery_thread(
        Arc::clone(&dirs),
        root.path().to_path_buf(),
        Arc::clone(&cancel),
    );
    thread::sleep(Duration::from_millis(200));
    // Capacity 1 and no consumer yet: discovery is parked in enqueue.
    assert!(!discovery.is_finished());

    cancel.store(true, Ordering::Relaxed);
    let matchers = spawn_match_workers(&dirs, &results, ".txt", &cancel, 1);
    let copiers = spawn_copy_workers(&results, dest.path(), &failed, &cancel, 1);

    discovery.join().unwrap();
    let mut scanned = 0;
    for h in matchers {
        scanned += h.join().unwrap().dirs_scanned;
    }
    let mut copied = 0;
    for h in copiers {
        copied += h.join().unwrap().files_copied;
    }

    // Drained, not processed.
    assert_eq!(scanned, 0);
    assert_eq!(copied, 0);
    assert!(dest_file_names(dest.path()).is_empty());
}

// A copy that fails after the destination was created must not leave a
// partial file behind. Opening a directory as the copy source succeeds, but
// reading from it fails, which exercises exactly that branch.
#[test]
fn test_failed_copy_leaves_no_partial_destination() {
    let root = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let bogus_source = root.path().join("weird.txt");
    fs::create_dir(&bogus_source).unwrap();

    assert!(copy_into(&bogus_source, dest.path()).is_err());
    assert!(!dest.path().join("weird.txt").exists());
    assert!(dest_file_names(dest.path()).is_empty());
}

// Backpressure: with a capacity-1 directory queue and no consumer, discovery
// parks after its first enqueue until the queue is drained.
#[test]
fn test_discovery_blocks_on_full_directory_queue() {
    let root = tempfile::tempdir().unwrap();
    for sub in ["s1", "s2", "s3", "s4"] {
        fs::create_dir(root.path().join(sub)).unwrap();
    }

    let q = Arc::new(BoundedQueue::new(1));
    let producer = ProducerGuard::register(&q);
    let cancel = Arc::new(AtomicBool::new(false));

    let qp = Arc::clone(&q);
    let root_path = root.path().to_path_buf();
    let cancel_p = Arc::clone(&cancel);
    let handle = thread::spawn(move || {
        let _producer = producer;
        run_discovery(&qp, root_path, &cancel_p)
    });

    thread::sleep(Duration::from_millis(200));
    assert!(!handle.is_finished());
    assert_eq!(q.len(), 1);

    let mut drained = Vec::new();
    while let Some(dir) = q.dequeue() {
        drained.push(dir);
    }
    assert_eq!(handle.join().unwrap(), 5); // root + 4 subdirs
    assert_eq!(drained.len(), 5);
}
