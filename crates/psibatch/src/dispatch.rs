use crate::platform::{ExecutionPlatform, TaskHandle};
use crate::record::Batch;
use crate::Result;

/// Submits batches to an execution platform without waiting on them.
pub struct Dispatcher<P>
where
    P: ExecutionPlatform,
{
    platform: P,
}

impl<P> Dispatcher<P>
where
    P: ExecutionPlatform,
{
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Submit every batch and return one handle per batch, in submission order.
    ///
    /// A submission error stops dispatch; handles already created are dropped
    /// and their batches' results discarded.
    pub fn dispatch(&self, batches: Vec<Batch>) -> Result<Vec<TaskHandle>> {
        let handles = batches
            .into_iter()
            .map(|batch| -> Result<TaskHandle> {
                let index = batch.index;
                let handle = self.platform.submit(batch)?;
                tracing::debug!("Submitted batch {} as task {}", index, handle.id);
                Ok(handle)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Dispatched {} batch(es)", handles.len());
        Ok(handles)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::platform::{task_channel, TaskEntry, TaskStatus};
    use crate::record::SequenceRecord;
    use crate::Error;

    /// Platform that parks every entry until the test releases it.
    #[derive(Default)]
    struct ParkingPlatform {
        parked: Mutex<Vec<TaskEntry>>,
        capacity: Option<usize>,
    }

    impl ExecutionPlatform for ParkingPlatform {
        fn submit(&self, batch: Batch) -> Result<TaskHandle> {
            let mut parked = self.parked.lock().unwrap();
            if Some(parked.len()) == self.capacity {
                return Err(Error::PlatformStopped);
            }
            let (entry, handle) = task_channel(batch);
            parked.push(entry);
            Ok(handle)
        }
    }

    fn batches(n: usize) -> Vec<Batch> {
        (0..n)
            .map(|i| Batch::new(i, vec![SequenceRecord::new(format!("s{i}"), "MKV")]).unwrap())
            .collect()
    }

    #[test]
    fn test_dispatch_does_not_wait() {
        let dispatcher = Dispatcher::new(ParkingPlatform::default());
        let handles = dispatcher.dispatch(batches(3)).unwrap();

        assert_eq!(handles.iter().map(|h| h.batch).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(handles.iter().all(|h| h.status() == TaskStatus::Pending));
        assert_eq!(dispatcher.platform().parked.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_submission_error_stops_dispatch() {
        let platform = ParkingPlatform {
            capacity: Some(2),
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(platform);
        assert!(matches!(
            dispatcher.dispatch(batches(3)),
            Err(Error::PlatformStopped)
        ));
    }
}
