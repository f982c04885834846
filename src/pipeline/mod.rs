//! Pipeline components: context, stage workers, orchestration.

pub mod context;
pub mod discovery;
pub mod matching;
pub mod orchestrator;
pub mod transfer;

pub use context::{PipelineContext, PipelineQueues, create_pipeline_queues};
pub use discovery::spawn_discovery_thread;
pub use matching::spawn_match_workers;
pub use orchestrator::run_pipeline;
pub use transfer::spawn_copy_workers;

/// Capacity of the queue that holds directories waiting to be scanned.
pub const DIRECTORY_QUEUE_CAPACITY: usize = 100;

/// Capacity of the queue that holds matched files waiting to be copied.
pub const RESULTS_QUEUE_CAPACITY: usize = 100;
