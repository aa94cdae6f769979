//! Process execution seam for the external configuration tool
//!
//! Everything that touches a child process goes through [`ToolRunner`], so the
//! reader and writer can be exercised against a scripted fake.

use crate::error::{Error, Result};
use crate::security::SecureString;
use crate::types::EnvOverlay;
use async_trait::async_trait;
use camino::Utf8Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tracing::debug;

/// Program invoked when no override is given
pub const DEFAULT_TOOL: &str = "pulumi";

/// A single invocation of the external tool
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub args: &'a [String],
    pub cwd: &'a Utf8Path,
    pub env: &'a EnvOverlay,
    /// Payload written to the child's stdin, which is then closed
    pub stdin: Option<&'a SecureString>,
}

/// Captured result of a finished invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the child was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs the external tool to completion
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Program name, used when rendering command lines
    fn program(&self) -> &str;

    /// Run the tool and capture its output
    ///
    /// A non-zero exit is not an error here; only failing to run the tool is.
    async fn run(&self, invocation: Invocation<'_>) -> Result<ToolOutput>;

    /// Render a command line for error messages
    fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.program())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// [`ToolRunner`] that spawns real child processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self, invocation: Invocation<'_>) -> Result<ToolOutput> {
        debug!(
            "Running: {} (cwd: {}, env: {:?})",
            self.command_line(invocation.args),
            invocation.cwd,
            invocation.env
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(invocation.args)
            .current_dir(invocation.cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for var in invocation.env.iter() {
            cmd.env(var.name, var.value.expose());
        }

        if invocation.stdin.is_some() {
            cmd.stdin(Stdio::piped());
        } else {
            cmd.stdin(Stdio::null());
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::spawn(self.program.clone(), e))?;

        // Feed stdin while draining stdout/stderr, so a chatty child cannot
        // block on a full output pipe before it reads its input
        let pipe = child.stdin.take();
        let (fed, output) = tokio::join!(
            feed_stdin(pipe, invocation.stdin),
            child.wait_with_output()
        );
        fed.or_else(ignore_broken_pipe)?;
        let output = output?;
        let result = ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success() {
            debug!(
                "Command failed: {}\nStderr: {}",
                self.command_line(invocation.args),
                result.stderr.trim()
            );
        }

        Ok(result)
    }
}

/// Write the payload and close the pipe so the child sees end of input
async fn feed_stdin(
    pipe: Option<ChildStdin>,
    payload: Option<&SecureString>,
) -> std::io::Result<()> {
    if let (Some(mut pipe), Some(payload)) = (pipe, payload) {
        pipe.write_all(payload.as_bytes()).await?;
        pipe.shutdown().await?;
    }
    Ok(())
}

/// A child may exit before reading its input; its exit status decides then
fn ignore_broken_pipe(err: std::io::Error) -> std::io::Result<()> {
    if err.kind() == std::io::ErrorKind::BrokenPipe {
        debug!("Child closed stdin before the payload was fully written");
        Ok(())
    } else {
        Err(err)
    }
}
