//! copy-config - copy Pulumi stack configuration, secrets included
//!
//! Reads every config value of the source stack through `pulumi config` and
//! sets it on the destination stack, re-encrypting secrets under the
//! destination passphrase.

mod cli;
mod commands;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Missing or malformed flags exit here with clap's usage message
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match commands::copy::run(cli.copy, cli.quiet).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // stdout carries the progress protocol, so logs stay quiet by default
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
