use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostingError {
    #[error("invalid repository {0:?}: expected owner/name")]
    InvalidRepository(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status} for {url}: {body}")]
    Server {
        status: u16,
        url: String,
        body: String,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
