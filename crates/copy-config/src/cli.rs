//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser};
use copy_config_core::{BackendCredentials, RunParameters, StackTarget, DEFAULT_TOOL};

/// Copy Pulumi config from one stack/project to another
#[derive(Parser, Debug)]
#[command(name = "copy-config")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub copy: CopyArgs,
}

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Source path
    #[arg(long = "pathFrom", value_name = "PATH")]
    pub path_from: Utf8PathBuf,

    /// Destination path
    #[arg(long = "pathTo", value_name = "PATH")]
    pub path_to: Utf8PathBuf,

    /// Source secret passphrase
    #[arg(long = "secretFrom", value_name = "SECRET")]
    pub secret_from: String,

    /// Destination secret passphrase
    #[arg(long = "secretTo", value_name = "SECRET")]
    pub secret_to: String,

    /// Source stack
    #[arg(long = "stackFrom", value_name = "STACK")]
    pub stack_from: String,

    /// Destination stack
    #[arg(long = "stackTo", value_name = "STACK")]
    pub stack_to: String,

    /// Pulumi backend URL
    #[arg(long = "pulumiBackendUrl", value_name = "URL")]
    pub pulumi_backend_url: String,

    /// AWS Access Key ID for S3 backend
    #[arg(long = "awsAccessKeyId", value_name = "KEY")]
    pub aws_access_key_id: String,

    /// AWS Secret Access Key for S3 backend
    #[arg(long = "awsSecretAccessKey", value_name = "KEY")]
    pub aws_secret_access_key: String,

    /// Pulumi executable to run
    #[arg(long, env = "COPY_CONFIG_TOOL", default_value = DEFAULT_TOOL, value_name = "PROGRAM")]
    pub tool: String,

    /// Read and list the keys that would be copied without setting anything
    #[arg(long = "dryRun")]
    pub dry_run: bool,
}

impl CopyArgs {
    /// Build the immutable run parameters, taking ownership of the secrets
    pub fn into_parameters(self) -> RunParameters {
        RunParameters {
            source: StackTarget {
                path: self.path_from,
                stack: self.stack_from,
                passphrase: self.secret_from.into(),
            },
            destination: StackTarget {
                path: self.path_to,
                stack: self.stack_to,
                passphrase: self.secret_to.into(),
            },
            backend: BackendCredentials {
                url: self.pulumi_backend_url,
                access_key_id: self.aws_access_key_id,
                secret_access_key: self.aws_secret_access_key.into(),
            },
        }
    }
}
