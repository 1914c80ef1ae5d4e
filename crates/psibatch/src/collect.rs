use futures_util::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};

use crate::platform::{TaskHandle, TaskId};
use crate::writer::ResultSink;
use crate::{Error, Result};

/// What to do when a batch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum FailurePolicy {
    /// Stop collecting at the first failed batch. Batches already written stay
    /// on disk; results of still-pending batches are discarded.
    #[default]
    Abort,
    /// Record the failed batch and keep collecting the others.
    Continue,
}

/// A batch whose results never reached the sink.
#[derive(Debug)]
pub struct BatchFailure {
    pub batch: usize,
    pub task: TaskId,
    pub size: usize,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub batches_total: usize,
    pub batches_completed: usize,
    pub batches_failed: usize,
    pub items_written: usize,
    pub failures: Vec<BatchFailure>,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        self.batches_completed == self.batches_total
    }

    pub fn items_lost(&self) -> usize {
        self.failures.iter().map(|f| f.size).sum()
    }

    pub(crate) fn log(&self) {
        tracing::info!(
            "Run finished: {}/{} batch(es) completed, {} item(s) written, {} batch(es) failed ({} item(s) lost)",
            self.batches_completed,
            self.batches_total,
            self.items_written,
            self.batches_failed,
            self.items_lost()
        );
    }
}

/// Drains task handles in completion order and streams each result map into
/// a sink as soon as it arrives.
#[derive(Debug, Clone, Copy, Default)]
pub struct Collector {
    policy: FailurePolicy,
}

impl Collector {
    pub fn new(policy: FailurePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Sink errors are always fatal, regardless of policy.
    pub async fn collect<S>(&self, handles: Vec<TaskHandle>, sink: &mut S) -> Result<RunSummary>
    where
        S: ResultSink + ?Sized,
    {
        let mut summary = RunSummary {
            batches_total: handles.len(),
            ..Default::default()
        };

        let mut pending = handles
            .into_iter()
            .map(TaskHandle::wait)
            .collect::<FuturesUnordered<_>>();

        while let Some(outcome) = pending.next().await {
            match outcome.result {
                Ok(results) => {
                    let written = sink.write_batch(&results)?;
                    summary.batches_completed += 1;
                    summary.items_written += written;
                    tracing::info!(
                        "Batch {} done: {} result(s) written ({}/{})",
                        outcome.batch,
                        written,
                        summary.batches_completed + summary.batches_failed,
                        summary.batches_total
                    );
                }
                Err(error) => {
                    summary.batches_failed += 1;
                    tracing::error!("Batch {} (task {}) failed: {error}", outcome.batch, outcome.task);

                    match self.policy {
                        FailurePolicy::Abort => {
                            tracing::error!(
                                "Aborting run, abandoning {} pending batch(es)",
                                pending.len()
                            );
                            return Err(Error::BatchFailed {
                                batch: outcome.batch,
                                task: outcome.task,
                                source: Box::new(error),
                            });
                        }
                        FailurePolicy::Continue => summary.failures.push(BatchFailure {
                            batch: outcome.batch,
                            task: outcome.task,
                            size: outcome.size,
                            error,
                        }),
                    }
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
    use tokio::task::JoinHandle;

    use super::*;
    use crate::platform::{task_channel, TaskEntry};
    use crate::record::{Batch, ResultMap, SequenceRecord};

    fn submit(index: usize, id: &str) -> (TaskEntry, TaskHandle) {
        let batch = Batch::new(index, vec![SequenceRecord::new(id, "MKV")]).unwrap();
        task_channel(batch)
    }

    fn single(id: &str, structure: &str) -> ResultMap {
        std::iter::once((id.to_string(), structure.to_string())).collect()
    }

    /// Forwards every written id as soon as the collector hands it over.
    struct ChannelSink(UnboundedSender<String>);

    impl ResultSink for ChannelSink {
        fn write_batch(&mut self, results: &ResultMap) -> Result<usize> {
            for (id, _) in results.iter() {
                self.0.send(id.to_string()).unwrap();
            }
            Ok(results.len())
        }
    }

    fn spawn_collector(
        policy: FailurePolicy,
        handles: Vec<TaskHandle>,
    ) -> (JoinHandle<Result<RunSummary>>, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        let join = tokio::spawn(async move {
            let mut sink = ChannelSink(tx);
            Collector::new(policy).collect(handles, &mut sink).await
        });
        (join, rx)
    }

    #[tokio::test]
    async fn test_results_stream_in_completion_order() {
        let (first, h0) = submit(0, "first");
        let (second, h1) = submit(1, "second");
        let (third, h2) = submit(2, "third");

        let (join, mut written) = spawn_collector(FailurePolicy::Abort, vec![h0, h1, h2]);

        third.finish(Ok(single("third", "C")));
        assert_eq!(written.recv().await.unwrap(), "third");

        first.finish(Ok(single("first", "E")));
        assert_eq!(written.recv().await.unwrap(), "first");

        second.finish(Ok(single("second", "H")));
        assert_eq!(written.recv().await.unwrap(), "second");

        let summary = join.await.unwrap().unwrap();
        assert_eq!(summary.batches_completed, 3);
        assert_eq!(summary.items_written, 3);
        assert!(summary.is_complete());
    }

    #[tokio::test]
    async fn test_abort_on_first_failure() {
        let (ok, h0) = submit(0, "ok");
        let (bad, h1) = submit(1, "bad");
        let (_never, h2) = submit(2, "never");

        let (join, mut written) = spawn_collector(FailurePolicy::Abort, vec![h0, h1, h2]);

        ok.finish(Ok(single("ok", "C")));
        assert_eq!(written.recv().await.unwrap(), "ok");

        bad.finish(Err(Error::InvalidArgument("bad payload")));
        let err = join.await.unwrap().unwrap_err();

        assert!(matches!(err, Error::BatchFailed { batch: 1, .. }));
        assert!(written.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_continue_records_failures() {
        let (ok, h0) = submit(0, "ok");
        let (bad, h1) = submit(1, "bad");
        let (lost, h2) = submit(2, "lost");

        ok.finish(Ok(single("ok", "C")));
        bad.finish(Err(Error::InvalidArgument("bad payload")));
        drop(lost);

        let mut sink = Vec::new();
        let summary = Collector::new(FailurePolicy::Continue)
            .collect(vec![h0, h1, h2], &mut sink)
            .await
            .unwrap();

        assert_eq!(summary.batches_total, 3);
        assert_eq!(summary.batches_completed, 1);
        assert_eq!(summary.batches_failed, 2);
        assert_eq!(summary.items_lost(), 2);
        assert!(!summary.is_complete());

        let mut failed = summary.failures.iter().map(|f| f.batch).collect::<Vec<_>>();
        failed.sort();
        assert_eq!(failed, vec![1, 2]);
        assert!(summary
            .failures
            .iter()
            .any(|f| matches!(f.error, Error::TaskLost { batch: 2, .. })));
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn test_no_handles() {
        let mut sink = Vec::new();
        let summary = Collector::default().collect(Vec::new(), &mut sink).await.unwrap();
        assert_eq!(summary.batches_total, 0);
        assert!(summary.is_complete());
        assert!(sink.is_empty());
    }
}
