use std::path::Path;
use std::sync::Arc;

use crate::collect::{Collector, RunSummary};
use crate::config::PipelineConfig;
use crate::dispatch::Dispatcher;
use crate::loader::load_sequences;
use crate::oracle::{CommandOracle, PredictionOracle};
use crate::partition::partition;
use crate::platform::{ExecutionPlatform, LocalPlatform};
use crate::writer::ResultWriter;
use crate::Result;

/// Load, partition, dispatch, then stream results to the output file.
pub struct Pipeline<P>
where
    P: ExecutionPlatform,
{
    config: Arc<PipelineConfig>,
    dispatcher: Dispatcher<P>,
}

impl Pipeline<LocalPlatform> {
    /// Run batches in this process, invoking the configured oracle command.
    pub fn local(config: PipelineConfig) -> Result<Self> {
        let oracle = CommandOracle::new(config.oracle.clone());
        Self::with_oracle(config, oracle)
    }

    pub fn with_oracle<O>(config: PipelineConfig, oracle: O) -> Result<Self>
    where
        O: PredictionOracle,
    {
        config.validate()?;
        let platform = LocalPlatform::new(oracle, config.workers)?;
        Ok(Self::new(config, platform))
    }
}

impl<P> Pipeline<P>
where
    P: ExecutionPlatform,
{
    pub fn new(config: impl Into<Arc<PipelineConfig>>, platform: P) -> Self {
        Self {
            config: config.into(),
            dispatcher: Dispatcher::new(platform),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Results are appended to `output`; existing content is kept.
    ///
    /// Load errors happen before anything is dispatched. Under
    /// [`FailurePolicy::Abort`](crate::FailurePolicy::Abort) the first failed
    /// batch ends the run with [`Error::BatchFailed`](crate::Error::BatchFailed),
    /// leaving already-written batches in place.
    pub async fn run<I, O>(&self, input: I, output: O) -> Result<RunSummary>
    where
        I: AsRef<Path>,
        O: AsRef<Path>,
    {
        let loaded = load_sequences(input)?;
        let batches = partition(loaded.records, self.config.workers, self.config.partition);

        let mut writer = ResultWriter::open(output)?;
        let handles = self.dispatcher.dispatch(batches)?;

        let summary = Collector::new(self.config.on_failure)
            .collect(handles, &mut writer)
            .await?;
        summary.log();

        Ok(summary)
    }
}
