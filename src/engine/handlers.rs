//! Run handler: logging, validation, cancellation hookup, pipeline, summary.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::Cli;
use crate::pipeline::context::PipelineContext;
use crate::types::{Opts, PipelineSummary};
use crate::utils::setup_logging;

/// Handle the run: validate, wire Ctrl-C to the cancel flag, run the pipeline,
/// report. Copy failures are reported but do not fail the run; cancellation
/// and configuration errors do.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = cli.to_opts();
    setup_logging(opts.verbose);
    validate(&opts)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_handler = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        cancel_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let summary = crate::run_with_cancel(&opts, &cancel)?;
    report_summary(&summary);

    if cancel.load(Ordering::Relaxed) {
        bail!("cancelled by user; {} files were already copied", summary.files_copied);
    }
    Ok(())
}

/// Configuration checks that must stop the run before any thread starts.
/// An unreadable root is only warned about: the pipeline still runs and
/// simply discovers nothing below the root.
fn validate(opts: &Opts) -> Result<()> {
    if opts.extension.trim_start_matches('.').is_empty() {
        bail!("extension must not be empty");
    }
    if opts.searchers == 0 {
        bail!("number of searchers must be at least 1");
    }
    if opts.copiers == 0 {
        bail!("number of copiers must be at least 1");
    }
    if let Err(err) = std::fs::read_dir(&opts.root) {
        log::warn!("root {} is not readable: {}", opts.root.display(), err);
    }
    std::fs::create_dir_all(&opts.destination).with_context(|| {
        format!("create destination directory {}", opts.destination.display())
    })?;
    Ok(())
}

fn report_summary(summary: &PipelineSummary) {
    log::info!(
        "{} directories scanned, {} files matched, {} copied ({} bytes)",
        summary.dirs_scanned,
        summary.files_matched,
        summary.files_copied.to_string().green(),
        summary.bytes_copied
    );
    if summary.list_errors > 0 {
        log::warn!("{} directories could not be listed", summary.list_errors);
    }
    if !summary.failed_copies.is_empty() {
        log::warn!(
            "{} copies failed",
            summary.failed_copies.len().to_string().red()
        );
        for (path, reason) in &summary.failed_copies {
            eprintln!("  failed: {}: {}", path.display(), reason);
        }
    }
}

/// Build the shared pipeline context from options and a cancel flag.
pub fn pipeline_context(opts: &Opts, cancel: &Arc<AtomicBool>) -> PipelineContext {
    PipelineContext {
        dotted_extension: crate::engine::dotted_extension(&opts.extension),
        destination: opts.destination.clone(),
        cancel: Arc::clone(cancel),
        failed_copies: Arc::new(std::sync::Mutex::new(Vec::new())),
    }
}
