//! Transfer stage: a pool of workers draining the results queue and copying
//! each matched file into the destination directory.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::engine::tools::destination_path;
use crate::queue::BoundedQueue;
use crate::types::CopyStats;

/// Spawn `count` copy workers consuming the results queue. This stage only
/// consumes, so no producer registration happens here. Each handle yields that
/// worker's [`CopyStats`].
pub fn spawn_copy_workers(
    results_queue: &Arc<BoundedQueue<PathBuf>>,
    destination: &Path,
    failed_copies: &Arc<Mutex<Vec<(PathBuf, String)>>>,
    cancel: &Arc<AtomicBool>,
    count: usize,
) -> Vec<JoinHandle<CopyStats>> {
    (0..count)
        .map(|_| {
            let results_queue = Arc::clone(results_queue);
            let destination = destination.to_path_buf();
            let failed_copies = Arc::clone(failed_copies);
            let cancel = Arc::clone(cancel);
            thread::spawn(move || {
                copy_worker_loop(&results_queue, &destination, &failed_copies, &cancel)
            })
        })
        .collect()
}

/// One copy worker: dequeue file paths until end-of-stream. Every failure is
/// logged and recorded, then the worker moves on; a single bad file never
/// stops the worker or the pipeline.
fn copy_worker_loop(
    results_queue: &BoundedQueue<PathBuf>,
    destination: &Path,
    failed_copies: &Mutex<Vec<(PathBuf, String)>>,
    cancel: &AtomicBool,
) -> CopyStats {
    let mut stats = CopyStats::default();
    while let Some(source) = results_queue.dequeue() {
        // On cancel, keep draining to end-of-stream without copying, so a
        // matching worker parked in a blocking enqueue is always released.
        if cancel.load(Ordering::Relaxed) {
            continue;
        }
        match copy_into(&source, destination) {
            Ok(bytes) => {
                log::debug!("copied {} ({} bytes)", source.display(), bytes);
                stats.files_copied += 1;
                stats.bytes_copied += bytes;
            }
            Err(err) => {
                log::error!("copy failed for {}: {:#}", source.display(), err);
                failed_copies
                    .lock()
                    .unwrap()
                    .push((source, format!("{:#}", err)));
            }
        }
    }
    stats
}

/// Copy `source` into `destination` under its base name. The source is read,
/// never renamed or removed. The destination is opened with `create_new`, so a
/// pre-existing file of the same name is a reported failure rather than a
/// silent overwrite. A copy that fails midway removes the partial destination
/// file (we created it, so it holds nothing worth keeping).
pub fn copy_into(source: &Path, destination: &Path) -> Result<u64> {
    let dest_path = destination_path(source, destination)
        .with_context(|| format!("no file name in {}", source.display()))?;
    let mut reader =
        File::open(source).with_context(|| format!("open source {}", source.display()))?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&dest_path)
        .with_context(|| format!("create destination {}", dest_path.display()))?;
    match std::io::copy(&mut reader, &mut writer) {
        Ok(bytes) => Ok(bytes),
        Err(err) => {
            drop(writer);
            let _ = std::fs::remove_file(&dest_path);
            Err(err).with_context(|| format!("copy to {}", dest_path.display()))
        }
    }
}
