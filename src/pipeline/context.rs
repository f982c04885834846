//! Shared pipeline state: the two queues, the cancel flag, and the failure log.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use crate::queue::BoundedQueue;

use super::{DIRECTORY_QUEUE_CAPACITY, RESULTS_QUEUE_CAPACITY};

/// Everything the stage workers share. Queues are the only pipeline data path;
/// the cancel flag and failure log sit beside them for shutdown and reporting.
pub struct PipelineContext {
    /// Extension with its leading dot, e.g. `.html`.
    pub dotted_extension: String,
    pub destination: PathBuf,
    /// Checked at each stage loop iteration; a cancelled producer still
    /// unregisters so consumers observe end-of-stream instead of stalling.
    pub cancel: Arc<AtomicBool>,
    /// Copy failures as (source path, reason), reported after the run.
    pub failed_copies: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

/// The two queues the stages communicate through. Discovery produces into
/// `directories`; matching consumes `directories` and produces into `results`;
/// transfer consumes `results`.
pub struct PipelineQueues {
    pub directories: Arc<BoundedQueue<PathBuf>>,
    pub results: Arc<BoundedQueue<PathBuf>>,
}

pub fn create_pipeline_queues() -> PipelineQueues {
    PipelineQueues {
        directories: Arc::new(BoundedQueue::new(DIRECTORY_QUEUE_CAPACITY)),
        results: Arc::new(BoundedQueue::new(RESULTS_QUEUE_CAPACITY)),
    }
}
