//! # `psibatch`
//!
//! Splits a file of `<id>\t<sequence>` records into batches, runs every batch
//! through a structure predictor on a pool of workers, and appends each
//! finished batch to an output file as soon as it completes.
//!
//! ## Example
//!
//! ```no_run
//! use psibatch::{FnOracle, Pipeline, PipelineConfig};
//!
//! # async fn run() -> psibatch::Result<()> {
//! let oracle = FnOracle::from(|seq: &str| anyhow::Ok("C".repeat(seq.len())));
//! let pipeline = Pipeline::with_oracle(PipelineConfig::default(), oracle)?;
//!
//! let summary = pipeline.run("sequences.tsv", "structures.tsv").await?;
//! println!("{} predictions written", summary.items_written);
//! # Ok(())
//! # }
//! ```

pub mod collect;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod loader;
pub mod oracle;
pub mod partition;
pub mod pipeline;
pub mod platform;
pub mod record;
pub mod writer;

pub use collect::{Collector, FailurePolicy, RunSummary};
pub use config::PipelineConfig;
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use loader::{load_sequences, LoadedRecords};
pub use oracle::{CommandOracle, FnOracle, OracleCommand, PredictionOracle};
pub use partition::{partition, PartitionStrategy};
pub use pipeline::Pipeline;
pub use platform::{ExecutionPlatform, LocalPlatform, TaskHandle, TaskStatus};
pub use record::{Batch, ResultMap, SequenceRecord};
pub use writer::{ResultSink, ResultWriter};
