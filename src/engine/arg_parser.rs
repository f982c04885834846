use clap::Parser;
use std::path::PathBuf;

use crate::types::Opts;

/// Concurrent disk search-and-copy.
#[derive(Clone, Parser)]
#[command(name = "diskscout")]
#[command(
    about = "Find files by extension under a root directory and copy them into a destination."
)]
pub struct Cli {
    /// Extension to match, e.g. `html` (leading dot optional). The dot is part
    /// of the match: `html` does not match `report.phtml`.
    #[arg(value_name = "EXTENSION")]
    pub extension: String,

    /// Root directory to search under.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Destination directory for the copies (created if missing).
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Number of search workers scanning directories.
    #[arg(value_name = "SEARCHERS")]
    pub searchers: usize,

    /// Number of copy workers writing to the destination.
    #[arg(value_name = "COPIERS")]
    pub copiers: usize,

    /// Verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    pub fn to_opts(&self) -> Opts {
        Opts {
            extension: self.extension.clone(),
            root: self.root.clone(),
            destination: self.destination.clone(),
            searchers: self.searchers,
            copiers: self.copiers,
            verbose: self.verbose,
        }
    }
}
