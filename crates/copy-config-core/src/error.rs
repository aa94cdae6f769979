//! Error types for copy-config-core

use thiserror::Error;

/// Result type alias using copy-config-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or writing stack configuration
#[derive(Error, Debug)]
pub enum Error {
    /// The external tool ran and exited unsuccessfully
    #[error("Command failed with exit code {}: {command}: {stderr}", format_exit_code(.exit_code))]
    Subprocess {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The exported configuration is not valid JSON or has the wrong shape
    #[error("Error parsing config JSON or schema validation failed: {message}")]
    Schema { message: String },

    /// The external tool could not be started
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error while talking to a running child process
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a subprocess failure error
    pub fn subprocess(
        command: impl Into<String>,
        exit_code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Subprocess {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Create a schema validation error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a spawn error
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Whether this error came from a non-zero exit of the external tool
    pub fn is_subprocess(&self) -> bool {
        matches!(self, Self::Subprocess { .. })
    }

    /// Whether this error came from validating exported configuration
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}

fn format_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::schema(err.to_string())
    }
}
