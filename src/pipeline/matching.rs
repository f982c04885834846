//! Matching stage: a pool of workers draining the directory queue, listing
//! each directory's immediate entries, and feeding files with the right
//! extension into the results queue.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::engine::tools::matches_extension;
use crate::queue::{BoundedQueue, ProducerGuard};
use crate::types::MatchStats;

/// Spawn `count` matching workers sharing both queues. Every worker's results-
/// queue registration happens here, on the calling thread, before any copy
/// worker can run; each worker unregisters (guard drop) only after the
/// directory queue has handed it end-of-stream. Each handle yields that
/// worker's [`MatchStats`].
pub fn spawn_match_workers(
    dir_queue: &Arc<BoundedQueue<PathBuf>>,
    results_queue: &Arc<BoundedQueue<PathBuf>>,
    dotted_extension: &str,
    cancel: &Arc<AtomicBool>,
    count: usize,
) -> Vec<JoinHandle<MatchStats>> {
    (0..count)
        .map(|_| {
            let producer = ProducerGuard::register(results_queue);
            let dir_queue = Arc::clone(dir_queue);
            let results_queue = Arc::clone(results_queue);
            let ext = dotted_extension.to_string();
            let cancel = Arc::clone(cancel);
            thread::spawn(move || {
                let _producer = producer;
                match_worker_loop(&dir_queue, &results_queue, &ext, &cancel)
            })
        })
        .collect()
}

/// One matching worker: dequeue directories until the directory queue is
/// exhausted. Only immediate entries are listed; subdirectories arrive through
/// the directory queue in their own right, so there is no recursion here.
/// Sharing one directory queue means each directory is scanned by exactly one
/// worker, which is the whole load-balancing story.
fn match_worker_loop(
    dir_queue: &BoundedQueue<PathBuf>,
    results_queue: &BoundedQueue<PathBuf>,
    dotted_extension: &str,
    cancel: &AtomicBool,
) -> MatchStats {
    let mut stats = MatchStats::default();

    while let Some(dir) = dir_queue.dequeue() {
        // On cancel, keep draining to end-of-stream without scanning: an
        // upstream producer parked in a blocking enqueue is only released by
        // a dequeue, so breaking out here could strand it forever.
        if cancel.load(Ordering::Relaxed) {
            continue;
        }
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("matching: cannot list {}: {}", dir.display(), err);
                stats.list_errors += 1;
                continue;
            }
        };
        stats.dirs_scanned += 1;
        for entry in entries.flatten() {
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            let path = entry.path();
            if is_file && matches_extension(&path, dotted_extension) {
                results_queue.enqueue(path);
                stats.files_matched += 1;
            }
        }
    }
    stats
}
