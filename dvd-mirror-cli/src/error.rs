use thiserror::Error;

use dvd_mirror_lib::MirrorError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Reading the disc or writing the mirror failed
    #[error("{0}")]
    Mirror(#[from] MirrorError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Process exit code: 2 when no usable title name was found, 1 otherwise.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Self::Mirror(e) if e.is_title_name_error() => 2,
            _ => 1,
        }
    }
}
