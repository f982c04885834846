//! Public types for the diskscout API and pipeline.

use std::path::PathBuf;

/// Options for [`run`](crate::run). Built from the CLI by the handler, or
/// directly by library callers.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Extension to match, without the leading dot (a leading dot is tolerated
    /// and stripped). Matching requires the dot separator, so `html` never
    /// matches `report.phtml`.
    pub extension: String,
    /// Root directory to search under.
    pub root: PathBuf,
    /// Destination directory for copies. Copies are flat: each file lands
    /// under its base name, source tree structure is not preserved.
    pub destination: PathBuf,
    /// Number of matching workers (directory queue consumers). Must be >= 1.
    pub searchers: usize,
    /// Number of copy workers (results queue consumers). Must be >= 1.
    pub copiers: usize,
    /// Verbose output (debug-level logging).
    pub verbose: bool,
}

/// Per-worker stats from the matching stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchStats {
    /// Directories this worker dequeued and scanned.
    pub dirs_scanned: usize,
    /// Files whose name matched the extension.
    pub files_matched: usize,
    /// Directories that could not be listed (logged and skipped).
    pub list_errors: usize,
}

/// Per-worker stats from the transfer stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct CopyStats {
    /// Files copied successfully.
    pub files_copied: usize,
    /// Bytes written for successful copies. Failed copies are logged per file
    /// and recorded in the shared failure log, never counted here.
    pub bytes_copied: u64,
}

/// Aggregate result of one pipeline run.
#[derive(Clone, Debug, Default)]
pub struct PipelineSummary {
    /// Directories published by the discovery stage (root included).
    pub dirs_discovered: usize,
    /// Directories scanned across all matching workers.
    pub dirs_scanned: usize,
    /// Files matched across all matching workers.
    pub files_matched: usize,
    /// Directories that failed to list during matching.
    pub list_errors: usize,
    /// Files copied across all transfer workers.
    pub files_copied: usize,
    /// Bytes written across all transfer workers.
    pub bytes_copied: u64,
    /// Copy failures, with the reason for each. Failures do not change the
    /// exit status; they are reported and the run completes.
    pub failed_copies: Vec<(PathBuf, String)>,
}

impl PipelineSummary {
    pub fn absorb_match(&mut self, s: MatchStats) {
        self.dirs_scanned += s.dirs_scanned;
        self.files_matched += s.files_matched;
        self.list_errors += s.list_errors;
    }

    pub fn absorb_copy(&mut self, s: CopyStats) {
        self.files_copied += s.files_copied;
        self.bytes_copied += s.bytes_copied;
    }
}
