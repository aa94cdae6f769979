//! Scripted [`ToolRunner`] used by unit tests

use crate::error::Result;
use crate::runner::{Invocation, ToolOutput, ToolRunner};
use crate::types::{BackendCredentials, RunParameters, StackTarget};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::collections::HashMap;
use std::sync::Mutex;

/// What the fake saw for one call
#[derive(Debug, Clone)]
pub(crate) struct RecordedInvocation {
    pub args: Vec<String>,
    pub cwd: Utf8PathBuf,
    pub env: HashMap<String, String>,
    pub stdin: Option<String>,
}

impl RecordedInvocation {
    pub fn is_set(&self) -> bool {
        self.args.get(1).map(String::as_str) == Some("set")
    }
}

/// Answers `config -j` with a canned export and `config set` with success,
/// unless a specific set call is scripted to fail
pub(crate) struct FakeRunner {
    export: ToolOutput,
    set_failures: HashMap<usize, ToolOutput>,
    calls: Mutex<Vec<RecordedInvocation>>,
}

impl FakeRunner {
    pub fn exporting(json: &str) -> Self {
        Self {
            export: ToolOutput {
                exit_code: Some(0),
                stdout: json.to_string(),
                stderr: String::new(),
            },
            set_failures: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_export(exit_code: i32, stderr: &str) -> Self {
        let mut runner = Self::exporting("");
        runner.export = ToolOutput {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        };
        runner
    }

    /// Make the `n`th set call (1-based) exit with `exit_code`
    pub fn fail_set_call(mut self, n: usize, exit_code: i32, stderr: &str) -> Self {
        self.set_failures.insert(
            n,
            ToolOutput {
                exit_code: Some(exit_code),
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<RecordedInvocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_calls(&self) -> Vec<RecordedInvocation> {
        self.calls().into_iter().filter(|c| c.is_set()).collect()
    }
}

#[async_trait]
impl ToolRunner for FakeRunner {
    fn program(&self) -> &str {
        "pulumi"
    }

    async fn run(&self, invocation: Invocation<'_>) -> Result<ToolOutput> {
        let recorded = RecordedInvocation {
            args: invocation.args.to_vec(),
            cwd: invocation.cwd.to_owned(),
            env: invocation
                .env
                .iter()
                .map(|v| (v.name.to_string(), v.value.expose().to_string()))
                .collect(),
            stdin: invocation.stdin.map(|s| s.expose().to_string()),
        };
        let is_set = recorded.is_set();

        let mut calls = self.calls.lock().unwrap();
        calls.push(recorded);

        if !is_set {
            return Ok(self.export.clone());
        }

        let set_index = calls.iter().filter(|c| c.is_set()).count();
        Ok(self
            .set_failures
            .get(&set_index)
            .cloned()
            .unwrap_or(ToolOutput {
                exit_code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            }))
    }
}

pub(crate) fn sample_params() -> RunParameters {
    RunParameters {
        source: StackTarget {
            path: "/work/old-project".into(),
            stack: "staging".to_string(),
            passphrase: "old-passphrase".into(),
        },
        destination: StackTarget {
            path: "/work/new-project".into(),
            stack: "staging-v2".to_string(),
            passphrase: "new-passphrase".into(),
        },
        backend: BackendCredentials {
            url: "s3://pulumi-state".to_string(),
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "aws-secret".into(),
        },
    }
}
