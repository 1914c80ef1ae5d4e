//! Where batches actually run.
//!
//! [`ExecutionPlatform`] is the submission seam: hand it a [`Batch`], get a
//! [`TaskHandle`] back immediately. [`LocalPlatform`] runs batches on a
//! dedicated thread pool in this process; other platforms only need to drive
//! a [`TaskEntry`] to completion.

mod handle;
mod local;
mod task;

pub use handle::{task_channel, BatchOutcome, TaskEntry, TaskHandle, TaskId, TaskStatus};
pub use local::LocalPlatform;
pub use task::run_batch;

use crate::record::Batch;
use crate::Result;

/// Accepts batches for asynchronous execution.
pub trait ExecutionPlatform {
    /// Must return without waiting for the batch to run.
    fn submit(&self, batch: Batch) -> Result<TaskHandle>;
}

impl<P: ExecutionPlatform + ?Sized> ExecutionPlatform for &P {
    fn submit(&self, batch: Batch) -> Result<TaskHandle> {
        (**self).submit(batch)
    }
}

impl<P: ExecutionPlatform + ?Sized> ExecutionPlatform for std::sync::Arc<P> {
    fn submit(&self, batch: Batch) -> Result<TaskHandle> {
        (**self).submit(batch)
    }
}
