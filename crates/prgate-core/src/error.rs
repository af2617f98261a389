use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid {list} pattern {pattern:?}: {source}")]
    InvalidPattern {
        list: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid integration tool specified: {0}")]
    UnknownIntegrationTool(String),

    #[error("invalid pull request id: {0:?}")]
    InvalidPrId(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("malformed response list: {0}")]
    MalformedResponses(#[from] serde_json::Error),

    #[error("failed to encode response list: {0}")]
    EncodeResponses(#[source] serde_json::Error),

    #[error("metadata index does not exist: {0}")]
    MissingField(String),
}

impl CoreError {
    /// Whether the error stems from the resource configuration rather than
    /// from a caller-supplied version token.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. } | Self::UnknownIntegrationTool(_)
        )
    }
}
