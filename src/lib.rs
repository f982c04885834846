//! Diskscout: concurrent disk search-and-copy.
//!
//! A three-stage pipeline over two bounded queues: a discovery thread
//! enumerates directories breadth-first into a directory queue, a pool of
//! search workers filters each directory's files by extension into a results
//! queue, and a pool of copy workers writes the matches into a destination
//! directory. Stage completion propagates through the queues' producer counts
//! (see [`queue::BoundedQueue`]), never through explicit signals.

pub mod engine;
pub mod pipeline;
pub mod queue;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Result alias used by the public diskscout API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: search under `opts.root` for files matching
/// `opts.extension` and copy them into `opts.destination`, running
/// `opts.searchers` + `opts.copiers` + 1 worker threads. Blocks until the
/// pipeline has fully drained and every worker has exited.
///
/// Per-file copy failures are collected in the returned
/// [`PipelineSummary::failed_copies`], not raised as errors.
pub fn run(opts: &Opts) -> Result<PipelineSummary> {
    let cancel = Arc::new(AtomicBool::new(false));
    run_with_cancel(opts, &cancel)
}

/// [`run`] with a caller-owned cancel flag. Setting the flag makes discovery
/// stop publishing at its next iteration, while matchers and copiers keep
/// draining their queues without processing — a dequeue is the only thing that
/// releases a producer parked in a blocking enqueue, so cancelled consumers
/// must drain to end-of-stream rather than exit early. Producers still
/// unregister on the way out, and every stage joins.
pub fn run_with_cancel(opts: &Opts, cancel: &Arc<AtomicBool>) -> Result<PipelineSummary> {
    let ctx = engine::handlers::pipeline_context(opts, cancel);
    log::debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    pipeline::run_pipeline(opts, &ctx)
}
