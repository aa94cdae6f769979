//! The copy command: read the source stack, replay every key on the destination

use anyhow::{Context, Result};
use copy_config_core::{copy_config, CopyOptions, CopyReport};
use indicatif::ProgressBar;
use std::io::{self, Write};
use tracing::debug;

use crate::cli::CopyArgs;
use crate::output;

pub async fn run(args: CopyArgs, quiet: bool) -> Result<()> {
    let options = CopyOptions {
        dry_run: args.dry_run,
    };
    let tool = args.tool.clone();
    let params = args.into_parameters();
    debug!("Copying with '{}' (dry run: {})", tool, options.dry_run);

    let spinner = output::spinner(
        &format!("Reading config of stack '{}'...", params.source.stack),
        quiet,
    );
    let mut progress = ProgressOut::new(spinner);

    let result = copy_config(&tool, &params, options, &mut progress).await;
    progress.clear_spinner();

    let report = result.with_context(|| {
        format!(
            "Failed to copy config from stack '{}' to stack '{}'",
            params.source.stack, params.destination.stack
        )
    })?;

    if !quiet {
        summarize(&report, &params.source.stack, &params.destination.stack);
    }
    Ok(())
}

fn summarize(report: &CopyReport, from: &str, to: &str) {
    if report.dry_run {
        output::warning(&format!(
            "Dry run: {} config values would be copied from '{}' to '{}'",
            report.total, from, to
        ));
    } else {
        output::success(&format!(
            "Copied {} config values from '{}' to '{}'",
            report.copied.len(),
            from,
            to
        ));
    }
}

/// Progress lines go to stdout; the read spinner is cleared before the first one
struct ProgressOut {
    spinner: Option<ProgressBar>,
    out: io::Stdout,
}

impl ProgressOut {
    fn new(spinner: ProgressBar) -> Self {
        Self {
            spinner: Some(spinner),
            out: io::stdout(),
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Write for ProgressOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.clear_spinner();
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
