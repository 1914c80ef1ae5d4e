use tokio::sync::{oneshot, watch};
use tokio::time::Instant;
use uuid::Uuid;

use crate::oracle::PredictionOracle;
use crate::platform::task::run_batch;
use crate::record::{Batch, ResultMap};
use crate::{Error, Result};

pub type TaskId = Uuid;

/// Lifecycle of one submitted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// Create the two ends of a submission: the entry the platform executes and
/// the handle the caller waits on.
pub fn task_channel(batch: Batch) -> (TaskEntry, TaskHandle) {
    let (result_tx, result_rx) = oneshot::channel();
    let (status_tx, status_rx) = watch::channel(TaskStatus::Pending);

    let entry = TaskEntry {
        id: Uuid::new_v4(),
        batch,
        result_tx,
        status_tx,
        queue_time: Instant::now(),
    };
    let handle = TaskHandle {
        id: entry.id,
        batch: entry.batch.index,
        size: entry.batch.len(),
        submitted_at: entry.queue_time,
        status: status_rx,
        result_rx,
    };
    (entry, handle)
}

/// Platform side of a submitted batch.
#[derive(Debug)]
pub struct TaskEntry {
    /// Identifier
    pub id: TaskId,

    /// Records to predict
    pub batch: Batch,

    /// Result sender
    result_tx: oneshot::Sender<Result<ResultMap>>,

    /// Lifecycle publisher
    status_tx: watch::Sender<TaskStatus>,

    /// Instant when this entry was queued
    pub queue_time: Instant,
}

impl TaskEntry {
    /// Run the batch to completion on the current thread and deliver the outcome.
    pub fn execute<O>(self, oracle: &O)
    where
        O: PredictionOracle + ?Sized,
    {
        self.status_tx.send_replace(TaskStatus::Running);
        tracing::trace!(
            "Running task {} (batch {}), queued {}ms ago",
            self.id,
            self.batch.index,
            self.queue_time.elapsed().as_millis()
        );

        let result = run_batch(oracle, &self.batch);
        self.finish(result);
    }

    /// Deliver a result produced elsewhere.
    pub fn finish(self, result: Result<ResultMap>) {
        let status = if result.is_ok() {
            TaskStatus::Completed
        } else {
            TaskStatus::Failed
        };
        self.status_tx.send_replace(status);

        if self.result_tx.send(result).is_ok() {
            tracing::trace!("Delivered result for task {}", self.id)
        } else {
            tracing::debug!("Nobody is waiting on task {} any more", self.id)
        }
    }
}

/// Caller side of a submitted batch.
#[derive(Debug)]
pub struct TaskHandle {
    pub id: TaskId,

    /// Index of the batch in partitioner order
    pub batch: usize,

    /// Number of records in the batch
    pub size: usize,

    pub submitted_at: Instant,

    pub(crate) status: watch::Receiver<TaskStatus>,
    result_rx: oneshot::Receiver<Result<ResultMap>>,
}

impl TaskHandle {
    pub fn status(&self) -> TaskStatus {
        *self.status.borrow()
    }

    /// Wait until the batch completes or fails.
    pub async fn wait(self) -> BatchOutcome {
        let result = match self.result_rx.await {
            Ok(result) => result,
            Err(_) => Err(Error::TaskLost {
                batch: self.batch,
                task: self.id,
            }),
        };

        BatchOutcome {
            task: self.id,
            batch: self.batch,
            size: self.size,
            result,
        }
    }
}

/// Terminal state of a batch as observed by the caller.
#[derive(Debug)]
pub struct BatchOutcome {
    pub task: TaskId,
    pub batch: usize,
    pub size: usize,
    pub result: Result<ResultMap>,
}
