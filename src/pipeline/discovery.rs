//! Discovery stage: breadth-first directory enumeration feeding the directory
//! queue. Single producer; its unregistration is what eventually lets the
//! matching workers observe end-of-stream.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::queue::{BoundedQueue, ProducerGuard};

/// Spawn the discovery thread. The producer registration happens here, on the
/// calling thread, so consumers spawned afterwards can never observe the queue
/// as already exhausted. Returns a handle yielding the number of directories
/// published (root included).
pub fn spawn_discovery_thread(
    dir_queue: Arc<BoundedQueue<PathBuf>>,
    root: PathBuf,
    cancel: Arc<AtomicBool>,
) -> JoinHandle<usize> {
    let producer = ProducerGuard::register(&dir_queue);
    thread::spawn(move || {
        let _producer = producer;
        run_discovery(&dir_queue, root, &cancel)
    })
}

/// Walk the tree under `root` breadth-first, enqueuing the root and every
/// descendant directory. A local helper queue holds the frontier so the walk
/// itself never depends on the bounded queue being drained; `enqueue` may
/// still block on a full queue, which is the intended backpressure.
/// Unreadable directories are logged and skipped; their subtrees yield
/// nothing further.
///
/// The caller must hold a producer registration on `dir_queue` for the
/// duration of the call (see [`spawn_discovery_thread`]).
pub fn run_discovery(
    dir_queue: &BoundedQueue<PathBuf>,
    root: PathBuf,
    cancel: &AtomicBool,
) -> usize {
    let mut frontier = VecDeque::new();
    frontier.push_back(root.clone());
    dir_queue.enqueue(root);
    let mut published = 1_usize;

    while let Some(dir) = frontier.pop_front() {
        if cancel.load(Ordering::Relaxed) {
            log::debug!(
                "discovery: cancelled with {} directories pending",
                frontier.len()
            );
            break;
        }
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("discovery: cannot list {}: {}", dir.display(), err);
                continue;
            }
        };
        for entry in entries.flatten() {
            // file_type() on the entry does not traverse symlinks, so linked
            // directories are not descended into (no cycle risk).
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                let path = entry.path();
                frontier.push_back(path.clone());
                dir_queue.enqueue(path);
                published += 1;
            }
        }
    }
    log::debug!("discovery: published {} directories", published);
    published
}
