use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use psibatch::config::PipelineArgs;
use psibatch::Pipeline;

/// Exit status of a run that finished but skipped failed batches.
const EXIT_PARTIAL: u8 = 2;

/// Predict secondary structures for a file of protein sequences.
#[derive(Debug, Parser)]
#[command(name = "psibatch", version)]
pub struct App {
    /// Input file, one `<id>\t<sequence>` record per line
    pub input_file: PathBuf,

    /// Output file; `<id>\t<structure>` lines are appended
    pub output_file: PathBuf,

    #[clap(flatten)]
    pub pipeline: PipelineArgs,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<ExitCode> {
    let args = App::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "psibatch=info,psibatch_cli=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = args.pipeline.into_config()?;
    tracing::debug!("Running with {:?}", config);

    let pipeline = Pipeline::local(config)?;
    let summary = pipeline.run(&args.input_file, &args.output_file).await?;

    if summary.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(
            "{} batch(es) failed; their sequences are missing from {}",
            summary.batches_failed,
            args.output_file.display()
        );
        Ok(ExitCode::from(EXIT_PARTIAL))
    }
}
