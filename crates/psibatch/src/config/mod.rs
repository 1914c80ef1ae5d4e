//! Run configuration, built once at startup and shared read-only.

#[cfg(feature = "clap")]
mod args;
mod parse;

#[cfg(feature = "clap")]
pub use args::PipelineArgs;

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::collect::FailurePolicy;
use crate::oracle::OracleCommand;
use crate::partition::PartitionStrategy;
use crate::{Error, Result};

const DEFAULT_WORKERS: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Target number of batches running in parallel
    pub workers: NonZeroUsize,
    pub partition: PartitionStrategy,
    pub on_failure: FailurePolicy,
    pub oracle: OracleCommand,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            partition: PartitionStrategy::default(),
            on_failure: FailurePolicy::default(),
            oracle: OracleCommand::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.oracle.program.trim().is_empty() {
            return Err(Error::InvalidArgument("oracle program must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.workers.get(), 10);
        assert_eq!(config.partition, PartitionStrategy::Balanced);
        assert_eq!(config.on_failure, FailurePolicy::Abort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_program_is_rejected() {
        let mut config = PipelineConfig::default();
        config.oracle.program = "  ".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidArgument(_))));
    }
}
