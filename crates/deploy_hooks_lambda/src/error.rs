use std::io;
use std::path::PathBuf;

use deploy_hooks_core::archive::ArchiveError;
use deploy_hooks_core::contract::ContractError;
use thiserror::Error;

/// Every failure a hook can surface to the invoking environment.
///
/// Nothing here is retried: the handler logs the error once and returns it,
/// leaving retry policy to whatever invoked the function.
#[derive(Debug, Error)]
pub enum DeployHookError {
    #[error("{operation} failed: {message}")]
    Provider {
        operation: &'static str,
        message: String,
    },
    #[error("{0}")]
    InvalidInput(String),
    #[error("local I/O failure at '{}': {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Config(String),
}

impl DeployHookError {
    pub fn provider(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Provider {
            operation,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Provider { .. } => "provider_error",
            Self::InvalidInput(_) => "invalid_input",
            Self::LocalIo { .. } => "local_io",
            Self::Config(_) => "config",
        }
    }
}

impl From<ContractError> for DeployHookError {
    fn from(error: ContractError) -> Self {
        Self::InvalidInput(error.to_string())
    }
}

impl From<ArchiveError> for DeployHookError {
    fn from(error: ArchiveError) -> Self {
        match error {
            ArchiveError::UnsupportedFormat { .. } => Self::InvalidInput(error.to_string()),
            ArchiveError::SourceUnavailable { path, source }
            | ArchiveError::Read { path, source }
            | ArchiveError::Create { path, source } => Self::LocalIo { path, source },
            ArchiveError::Write { path, source } => Self::LocalIo {
                path,
                source: source.into(),
            },
        }
    }
}
