use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;

use crate::oracle::PredictionOracle;
use crate::platform::handle::{task_channel, TaskEntry, TaskHandle};
use crate::platform::ExecutionPlatform;
use crate::record::Batch;
use crate::{Error, Result};

/// Platform command
pub(crate) enum Command {
    Submit(TaskEntry),
    Stop,
}

/// In-process execution platform.
///
/// A dedicated thread owns its own tokio runtime. Every submitted batch runs on
/// a blocking thread of that runtime, with at most `workers` batches running at
/// once; the rest stay `Pending` until a thread frees up. Dropping the platform
/// stops intake and lets in-flight batches finish in the background.
pub struct LocalPlatform {
    tx: UnboundedSender<Command>,
}

impl LocalPlatform {
    pub fn new<O>(oracle: O, workers: NonZeroUsize) -> Result<Self>
    where
        O: PredictionOracle,
    {
        let oracle: Arc<dyn PredictionOracle> = Arc::new(oracle);
        let (tx, rx) = unbounded_channel();

        std::thread::Builder::new()
            .name("psibatch-platform".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_multi_thread()
                    .worker_threads(1)
                    .max_blocking_threads(workers.get())
                    .enable_all()
                    .thread_name("psibatch-worker")
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        tracing::error!("Failed to start execution platform: {e}");
                        return;
                    }
                };

                runtime.block_on(platform_task(rx, oracle))
            })?;

        tracing::info!("Local execution platform started with {workers} worker(s)");
        Ok(Self { tx })
    }
}

impl ExecutionPlatform for LocalPlatform {
    fn submit(&self, batch: Batch) -> Result<TaskHandle> {
        let (entry, handle) = task_channel(batch);
        self.tx
            .send(Command::Submit(entry))
            .map_err(|_| Error::PlatformStopped)?;
        Ok(handle)
    }
}

impl Drop for LocalPlatform {
    fn drop(&mut self) {
        if self.tx.send(Command::Stop).is_err() {
            tracing::debug!("Execution platform already stopped");
        }
    }
}

// Pull submissions off the channel and hand each batch to the blocking pool
async fn platform_task(mut receiver: UnboundedReceiver<Command>, oracle: Arc<dyn PredictionOracle>) {
    let mut running = JoinSet::new();

    'main: loop {
        tokio::select! {
            cmd = receiver.recv() => {
                use Command::*;

                match cmd {
                    Some(Submit(entry)) => {
                        tracing::trace!(
                            "Scheduling task {} (batch {}, {} records)",
                            entry.id,
                            entry.batch.index,
                            entry.batch.len()
                        );
                        let oracle = Arc::clone(&oracle);
                        running.spawn_blocking(move || entry.execute(oracle.as_ref()));
                    }
                    Some(Stop) | None => {
                        tracing::info!("Stopping execution platform");
                        break 'main;
                    }
                }
            }
            Some(joined) = running.join_next(), if !running.is_empty() => {
                if let Err(e) = joined {
                    tracing::error!("Batch task aborted: {e}");
                }
            }
        }
    }

    while let Some(joined) = running.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Batch task aborted: {e}");
        }
    }
}
