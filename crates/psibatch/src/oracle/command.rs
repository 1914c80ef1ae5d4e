use std::process::Command;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::oracle::PredictionOracle;

const DEFAULT_PROGRAM: &str = "python";
const DEFAULT_SCRIPT: &str = "run_model.py";

/// External predictor invocation. The payload is appended as the last argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for OracleCommand {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: vec![DEFAULT_SCRIPT.to_string()],
        }
    }
}

/// Oracle that runs one external process per payload, without a shell.
///
/// Standard output is the structure, minus trailing line terminators so that
/// each result stays on one output line. A non-zero exit status fails the
/// prediction.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    command: OracleCommand,
}

impl CommandOracle {
    pub fn new(command: OracleCommand) -> Self {
        Self { command }
    }
}

impl From<OracleCommand> for CommandOracle {
    fn from(command: OracleCommand) -> Self {
        Self::new(command)
    }
}

impl PredictionOracle for CommandOracle {
    fn predict(&self, payload: &str) -> anyhow::Result<String> {
        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(payload)
            .output()
            .with_context(|| format!("failed to spawn `{}`", self.command.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "`{}` exited with {}: {}",
                self.command.program,
                output.status,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8(output.stdout)
            .with_context(|| format!("`{}` wrote non UTF-8 output", self.command.program))?;

        Ok(stdout.trim_end_matches(['\n', '\r']).to_string())
    }
}
