//! Core types for copying stack configuration

use crate::security::{SecureString, REDACTED};
use camino::Utf8PathBuf;
use std::collections::BTreeMap;
use std::fmt;

/// Passphrase used by the external tool to decrypt and encrypt secrets
pub const ENV_CONFIG_PASSPHRASE: &str = "PULUMI_CONFIG_PASSPHRASE";
/// Location of the state backend
pub const ENV_BACKEND_URL: &str = "PULUMI_BACKEND_URL";
/// Access key id for an S3 state backend
pub const ENV_AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Secret access key for an S3 state backend
pub const ENV_AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// A single configuration value as exported from a stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue {
    pub value: SecureString,
    pub secret: bool,
}

/// A configuration entry ready to be replayed against the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: SecureString,
    pub secret: bool,
}

/// Validated configuration of one stack, keyed by the raw exported key
///
/// Iteration is in sorted key order, which is the order entries are copied in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl StackConfig {
    pub fn new(values: BTreeMap<String, ConfigValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Consume the configuration, yielding entries in copy order
    pub fn into_entries(self) -> impl Iterator<Item = ConfigEntry> {
        self.values.into_iter().map(|(key, v)| ConfigEntry {
            key,
            value: v.value,
            secret: v.secret,
        })
    }
}

/// One side of the copy: a stack inside a project directory
#[derive(Debug, Clone)]
pub struct StackTarget {
    /// Project directory the tool is run from
    pub path: Utf8PathBuf,
    /// Stack name
    pub stack: String,
    /// Secrets passphrase of this stack
    pub passphrase: SecureString,
}

/// State backend location and the storage credentials it needs
#[derive(Debug, Clone)]
pub struct BackendCredentials {
    pub url: String,
    pub access_key_id: String,
    pub secret_access_key: SecureString,
}

/// Inputs for one copy run, built once at startup
#[derive(Debug, Clone)]
pub struct RunParameters {
    pub source: StackTarget,
    pub destination: StackTarget,
    pub backend: BackendCredentials,
}

impl RunParameters {
    /// Environment for the export invocation against the source stack
    pub fn source_overlay(&self) -> EnvOverlay {
        EnvOverlay::for_stack(&self.source, &self.backend)
    }

    /// Environment for the set invocations against the destination stack
    pub fn destination_overlay(&self) -> EnvOverlay {
        EnvOverlay::for_stack(&self.destination, &self.backend)
    }
}

/// A variable layered over the inherited environment of a child process
#[derive(Clone)]
pub struct EnvVar {
    pub name: &'static str,
    pub value: SecureString,
    pub sensitive: bool,
}

/// Immutable set of variables applied to a single tool invocation
///
/// Sensitive values never appear in `Debug` output.
#[derive(Clone, Default)]
pub struct EnvOverlay {
    vars: Vec<EnvVar>,
}

impl EnvOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the overlay the external tool needs to open `target`
    pub fn for_stack(target: &StackTarget, backend: &BackendCredentials) -> Self {
        Self::new()
            .with_secret(ENV_CONFIG_PASSPHRASE, target.passphrase.clone())
            .with(ENV_BACKEND_URL, backend.url.as_str())
            .with(ENV_AWS_ACCESS_KEY_ID, backend.access_key_id.as_str())
            .with_secret(
                ENV_AWS_SECRET_ACCESS_KEY,
                backend.secret_access_key.clone(),
            )
    }

    /// Add a plain variable
    pub fn with(mut self, name: &'static str, value: impl Into<SecureString>) -> Self {
        self.push(name, value.into(), false);
        self
    }

    /// Add a variable whose value must never be printed
    pub fn with_secret(mut self, name: &'static str, value: impl Into<SecureString>) -> Self {
        self.push(name, value.into(), true);
        self
    }

    fn push(&mut self, name: &'static str, value: SecureString, sensitive: bool) {
        self.vars.retain(|v| v.name != name);
        self.vars.push(EnvVar {
            name,
            value,
            sensitive,
        });
    }

    pub fn get(&self, name: &str) -> Option<&SecureString> {
        self.vars.iter().find(|v| v.name == name).map(|v| &v.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvVar> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl fmt::Debug for EnvOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for var in &self.vars {
            if var.sensitive {
                map.entry(&var.name, &REDACTED);
            } else {
                map.entry(&var.name, &var.value.expose());
            }
        }
        map.finish()
    }
}
