use thiserror::Error;

use crate::platform::TaskId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Oracle failed on sequence `{id}`: {source}")]
    Oracle {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Batch {batch} (task {task}) failed: {source}")]
    BatchFailed {
        batch: usize,
        task: TaskId,
        #[source]
        source: Box<Error>,
    },

    #[error("Batch {batch} (task {task}) was dropped by the execution platform")]
    TaskLost { batch: usize, task: TaskId },

    #[error("Execution platform is no longer accepting batches")]
    PlatformStopped,

    #[error("Serde JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
