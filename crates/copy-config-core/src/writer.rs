//! Writing configuration values into the destination stack

use crate::error::{Error, Result};
use crate::runner::{Invocation, ToolRunner};
use crate::security::SecureString;
use crate::types::RunParameters;
use tracing::debug;

/// How the destination stores a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Encrypted with the destination passphrase
    Secret,
    /// Stored as plain text
    Plaintext,
}

impl StorageMode {
    pub fn from_secret_flag(secret: bool) -> Self {
        if secret {
            Self::Secret
        } else {
            Self::Plaintext
        }
    }

    pub fn as_flag(&self) -> &'static str {
        match self {
            Self::Secret => "--secret",
            Self::Plaintext => "--plaintext",
        }
    }
}

/// Verbosity passed to every `config set` so failures carry diagnostics
pub const SET_VERBOSITY: &str = "10";

/// Arguments for setting one key; the value itself is never an argument
pub fn set_args(stack: &str, key: &str, mode: StorageMode) -> Vec<String> {
    [
        "config",
        "set",
        "--stack",
        stack,
        key,
        mode.as_flag(),
        "-v",
        SET_VERBOSITY,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Sets configuration values on the destination stack, one invocation per key
pub struct ConfigWriter<'r> {
    runner: &'r dyn ToolRunner,
}

impl<'r> ConfigWriter<'r> {
    pub fn new(runner: &'r dyn ToolRunner) -> Self {
        Self { runner }
    }

    /// Write one value, feeding it to the tool on stdin
    pub async fn write_one(
        &self,
        params: &RunParameters,
        key: &str,
        value: &SecureString,
        secret: bool,
    ) -> Result<()> {
        let destination = &params.destination;
        let mode = StorageMode::from_secret_flag(secret);
        let args = set_args(&destination.stack, key, mode);
        let env = params.destination_overlay();

        debug!("Setting '{}' ({:?}) on stack '{}'", key, mode, destination.stack);

        let output = self
            .runner
            .run(Invocation {
                args: &args,
                cwd: &destination.path,
                env: &env,
                stdin: Some(value),
            })
            .await?;

        if !output.success() {
            return Err(Error::subprocess(
                self.runner.command_line(&args),
                output.exit_code,
                output.stderr.trim(),
            ));
        }

        Ok(())
    }
}
