use std::path::PathBuf;

use prgate_core::CoreError;
use prgate_git::GitError;
use prgate_github::HostingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("hosting request failed: {0}")]
    Hosting(HostingError),

    #[error("working copy operation failed: {0}")]
    WorkingCopy(#[from] GitError),

    #[error("invalid version: {0}")]
    Decode(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl From<CoreError> for ResourceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EncodeResponses(source) => Self::Encode {
                what: "response list",
                source,
            },
            err if err.is_config() => Self::Config(err.to_string()),
            err => Self::Decode(err.to_string()),
        }
    }
}

impl From<HostingError> for ResourceError {
    fn from(err: HostingError) -> Self {
        match err {
            HostingError::InvalidRepository(_) => Self::Config(err.to_string()),
            other => Self::Hosting(other),
        }
    }
}
