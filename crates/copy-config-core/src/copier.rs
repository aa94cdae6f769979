//! Orchestrates a full copy: read the source once, then set every key on the
//! destination in order, stopping at the first failure.

use crate::error::Result;
use crate::normalize::normalize;
use crate::reader::ConfigReader;
use crate::runner::ToolRunner;
use crate::types::RunParameters;
use crate::writer::ConfigWriter;
use std::io::Write;
use tracing::{info, warn};

/// Where a copy run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPhase {
    Idle,
    Reading,
    /// About to write entry `index` (0-based) of `total`
    Writing { index: usize, total: usize },
    Done,
    Failed,
}

/// Options that change how a run behaves
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    /// Read, validate and report, but never set anything on the destination
    pub dry_run: bool,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Number of entries read from the source
    pub total: usize,
    /// Normalized keys, in the order they were written
    pub copied: Vec<String>,
    pub dry_run: bool,
}

/// Drives the read → normalize → write sequence
pub struct ConfigCopier<'r> {
    runner: &'r dyn ToolRunner,
    options: CopyOptions,
    phase: CopyPhase,
}

impl<'r> ConfigCopier<'r> {
    pub fn new(runner: &'r dyn ToolRunner) -> Self {
        Self {
            runner,
            options: CopyOptions::default(),
            phase: CopyPhase::Idle,
        }
    }

    pub fn with_options(mut self, options: CopyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn phase(&self) -> CopyPhase {
        self.phase
    }

    /// Copy every entry, writing a `"<i>/<N> <key>"` line to `progress` before
    /// each write is attempted
    pub async fn run<W: Write>(
        &mut self,
        params: &RunParameters,
        progress: &mut W,
    ) -> Result<CopyReport> {
        let result = self.copy(params, progress).await;
        if let Err(e) = &result {
            warn!("Copy aborted: {}", e);
            self.transition(CopyPhase::Failed);
        }
        result
    }

    async fn copy<W: Write>(
        &mut self,
        params: &RunParameters,
        progress: &mut W,
    ) -> Result<CopyReport> {
        self.transition(CopyPhase::Reading);
        let config = ConfigReader::new(self.runner).read_all(params).await?;

        let total = config.len();
        let writer = ConfigWriter::new(self.runner);
        let mut report = CopyReport {
            total,
            copied: Vec::with_capacity(total),
            dry_run: self.options.dry_run,
        };

        for (index, entry) in config.into_entries().enumerate() {
            self.transition(CopyPhase::Writing { index, total });

            let key = normalize(&entry.key);
            writeln!(progress, "{}/{} {}", index + 1, total, key)?;
            progress.flush()?;

            if !self.options.dry_run {
                writer
                    .write_one(params, key, &entry.value, entry.secret)
                    .await?;
            }
            report.copied.push(key.to_string());
        }

        self.transition(CopyPhase::Done);
        info!(
            "Copied {} config values from '{}' to '{}'",
            report.copied.len(),
            params.source.stack,
            params.destination.stack
        );
        Ok(report)
    }

    fn transition(&mut self, next: CopyPhase) {
        info!("Copy phase: {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}
