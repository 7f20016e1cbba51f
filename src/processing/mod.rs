//! Generic batch execution engine with bounded concurrency,
//! retry, checkpointing, and progress reporting

pub mod batch;
pub mod checkpoint;
pub mod progress;

pub use batch::BatchProcessor;
pub use checkpoint::{CheckpointSnapshot, CheckpointWriter};
pub use progress::{ProgressSink, TracingProgress};
