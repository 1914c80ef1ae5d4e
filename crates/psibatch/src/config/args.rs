use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Args;

use crate::collect::FailurePolicy;
use crate::config::PipelineConfig;
use crate::partition::PartitionStrategy;
use crate::Result;

/// Command-line overrides, applied on top of `--config` or the defaults.
#[derive(Debug, Default, Args)]
pub struct PipelineArgs {
    /// JSON file with pipeline settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of parallel workers (and target number of batches)
    #[arg(short, long)]
    pub workers: Option<NonZeroUsize>,

    /// How records are split into batches
    #[arg(long, value_enum)]
    pub partition: Option<PartitionStrategy>,

    /// What to do when a batch fails
    #[arg(long, value_enum)]
    pub on_failure: Option<FailurePolicy>,

    /// Predictor executable, invoked once per sequence
    #[arg(long, value_name = "PROGRAM")]
    pub oracle_program: Option<String>,

    /// Argument passed to the predictor before the sequence (repeatable)
    #[arg(long = "oracle-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub oracle_args: Option<Vec<String>>,
}

impl PipelineArgs {
    pub fn into_config(self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(partition) = self.partition {
            config.partition = partition;
        }
        if let Some(on_failure) = self.on_failure {
            config.on_failure = on_failure;
        }
        if let Some(program) = self.oracle_program {
            config.oracle.program = program;
        }
        if let Some(args) = self.oracle_args {
            config.oracle.args = args;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[clap(flatten)]
        args: PipelineArgs,
    }

    #[test]
    fn test_no_flags_gives_defaults() -> Result<()> {
        let cli = Cli::parse_from(["psibatch"]);
        assert_eq!(cli.args.into_config()?, PipelineConfig::default());
        Ok(())
    }

    #[test]
    fn test_flags_override() -> Result<()> {
        let cli = Cli::parse_from([
            "psibatch",
            "--workers",
            "3",
            "--partition",
            "fixed-chunk",
            "--on-failure",
            "continue",
            "--oracle-program",
            "psipred",
            "--oracle-arg",
            "-x",
            "--oracle-arg",
            "fast",
        ]);
        let config = cli.args.into_config()?;
        assert_eq!(config.workers.get(), 3);
        assert_eq!(config.partition, PartitionStrategy::FixedChunk);
        assert_eq!(config.on_failure, FailurePolicy::Continue);
        assert_eq!(config.oracle.program, "psipred");
        assert_eq!(config.oracle.args, vec!["-x", "fast"]);
        Ok(())
    }

    #[test]
    fn test_zero_workers_flag_is_rejected() {
        assert!(Cli::try_parse_from(["psibatch", "--workers", "0"]).is_err());
    }
}
