//! Orchestrator: wire the queues, start every stage, join them in pipeline
//! order, and fold the per-worker stats into one summary.

use anyhow::Result;
use log::debug;

use crate::types::{Opts, PipelineSummary};

use super::context::{PipelineContext, create_pipeline_queues};
use super::{spawn_copy_workers, spawn_discovery_thread, spawn_match_workers};

/// Run the full discovery → matching → transfer pipeline and block until every
/// worker has exited. Termination propagates forward through the queues'
/// producer counts, so joining in stage order never waits on a stalled stage:
/// discovery finishes and unregisters, the matchers drain the directory queue
/// to end-of-stream and unregister, the copiers drain the results queue.
pub fn run_pipeline(opts: &Opts, ctx: &PipelineContext) -> Result<PipelineSummary> {
    let queues = create_pipeline_queues();

    let discovery_handle = spawn_discovery_thread(
        std::sync::Arc::clone(&queues.directories),
        opts.root.clone(),
        std::sync::Arc::clone(&ctx.cancel),
    );
    let match_handles = spawn_match_workers(
        &queues.directories,
        &queues.results,
        &ctx.dotted_extension,
        &ctx.cancel,
        opts.searchers,
    );
    let copy_handles = spawn_copy_workers(
        &queues.results,
        &ctx.destination,
        &ctx.failed_copies,
        &ctx.cancel,
        opts.copiers,
    );

    let mut summary = PipelineSummary::default();
    summary.dirs_discovered = discovery_handle
        .join()
        .map_err(|_| anyhow::anyhow!("discovery thread panicked"))?;
    debug!("discovery joined: {} directories", summary.dirs_discovered);

    for handle in match_handles {
        let stats = handle
            .join()
            .map_err(|_| anyhow::anyhow!("matching worker panicked"))?;
        summary.absorb_match(stats);
    }
    debug!(
        "matching joined: {} directories scanned, {} files matched",
        summary.dirs_scanned, summary.files_matched
    );

    for handle in copy_handles {
        let stats = handle
            .join()
            .map_err(|_| anyhow::anyhow!("copy worker panicked"))?;
        summary.absorb_copy(stats);
    }
    debug!(
        "transfer joined: {} files copied ({} bytes)",
        summary.files_copied, summary.bytes_copied
    );

    summary.failed_copies = std::mem::take(&mut *ctx.failed_copies.lock().unwrap());
    Ok(summary)
}
