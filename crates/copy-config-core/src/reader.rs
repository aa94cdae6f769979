//! Reading the full configuration of the source stack

use crate::error::{Error, Result};
use crate::runner::{Invocation, ToolRunner};
use crate::security::SecureString;
use crate::types::{ConfigValue, RunParameters, StackConfig};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Wire shape of one exported value
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(deny_unknown_fields)]
struct ExportedValue {
    value: String,
    #[zeroize(skip)]
    secret: bool,
}

/// Arguments for exporting a stack's configuration with secrets revealed
pub fn export_args(stack: &str) -> Vec<String> {
    ["config", "-j", "--show-secrets", "--stack", stack]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Validate the JSON exported by the tool
///
/// The document must be an object mapping each key to exactly
/// `{"value": <string>, "secret": <bool>}`. Surrounding whitespace is ignored.
pub fn parse_export(raw: &str) -> Result<StackConfig> {
    let exported: BTreeMap<String, ExportedValue> = serde_json::from_str(raw.trim())?;

    let values = exported
        .into_iter()
        .map(|(key, mut item)| {
            (
                key,
                ConfigValue {
                    value: SecureString::new(std::mem::take(&mut item.value)),
                    secret: item.secret,
                },
            )
        })
        .collect();

    Ok(StackConfig::new(values))
}

/// Validate an export held in `raw`, wiping the decrypted text afterwards
pub fn take_export(raw: &mut String) -> Result<StackConfig> {
    let parsed = parse_export(raw);
    raw.zeroize();
    parsed
}

/// Reads a stack's configuration through the external tool
pub struct ConfigReader<'r> {
    runner: &'r dyn ToolRunner,
}

impl<'r> ConfigReader<'r> {
    pub fn new(runner: &'r dyn ToolRunner) -> Self {
        Self { runner }
    }

    /// Export and validate all configuration of the source stack
    pub async fn read_all(&self, params: &RunParameters) -> Result<StackConfig> {
        let source = &params.source;
        info!(
            "Reading config of stack '{}' in {}",
            source.stack, source.path
        );

        let args = export_args(&source.stack);
        let env = params.source_overlay();
        let mut output = self
            .runner
            .run(Invocation {
                args: &args,
                cwd: &source.path,
                env: &env,
                stdin: None,
            })
            .await?;

        if !output.success() {
            output.stdout.zeroize();
            return Err(Error::subprocess(
                self.runner.command_line(&args),
                output.exit_code,
                output.stderr.trim(),
            ));
        }

        let config = take_export(&mut output.stdout)?;
        debug!("Read {} config values", config.len());
        Ok(config)
    }
}
