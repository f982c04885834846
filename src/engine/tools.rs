//! Path and extension helpers

use std::path::{Path, PathBuf};

/// Normalize a CLI extension argument into its dotted form: `html` → `.html`,
/// and a tolerated leading dot is stripped first (`.html` → `.html`). The dot
/// is part of the match so `.html` never matches `report.phtml`.
pub fn dotted_extension(extension: &str) -> String {
    format!(".{}", extension.trim_start_matches('.'))
}

/// True when the file name ends with the dotted extension. Matching is on the
/// name's literal suffix, the same semantics for `a.html` and a file named
/// exactly `.html`. Non-UTF-8 names never match.
pub fn matches_extension(path: &Path, dotted_extension: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.ends_with(dotted_extension))
        .unwrap_or(false)
}

/// Destination path for a copy: the source's base name under `destination`
/// (flat layout, no source tree structure). `None` when the source has no
/// file name component.
pub fn destination_path(source: &Path, destination: &Path) -> Option<PathBuf> {
    source.file_name().map(|name| destination.join(name))
}
