//! # copy-config-core
//!
//! Copies configuration from one Pulumi stack to another by driving the
//! `pulumi` CLI:
//! - **Read**: export the source stack with secrets revealed and validate it
//! - **Normalize**: drop the `<project>:` namespace from every key
//! - **Write**: `config set` each key on the destination, value on stdin,
//!   re-encrypted under the destination passphrase when flagged secret
//!
//! The run stops at the first failure; nothing is retried or rolled back.

pub mod copier;
pub mod error;
pub mod normalize;
pub mod reader;
pub mod runner;
pub mod security;
pub mod types;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

pub use copier::{ConfigCopier, CopyOptions, CopyPhase, CopyReport};
pub use error::{Error, Result};
pub use normalize::normalize;
pub use reader::ConfigReader;
pub use runner::{Invocation, ProcessRunner, ToolOutput, ToolRunner, DEFAULT_TOOL};
pub use security::SecureString;
pub use types::{
    BackendCredentials, ConfigEntry, ConfigValue, EnvOverlay, RunParameters, StackConfig,
    StackTarget,
};
pub use writer::{ConfigWriter, StorageMode};

use std::io::Write;

/// Copy all configuration described by `params` using the real `program`
pub async fn copy_config<W: Write>(
    program: &str,
    params: &RunParameters,
    options: CopyOptions,
    progress: &mut W,
) -> Result<CopyReport> {
    let runner = ProcessRunner::new(program);
    ConfigCopier::new(&runner)
        .with_options(options)
        .run(params, progress)
        .await
}
