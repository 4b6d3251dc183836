use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid request URL '{0}'")]
    InvalidUrl(String, #[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to create staging file '{0}'")]
    StagingCreate(PathBuf, #[source] std::io::Error),

    // Covers both a broken response stream and a failing disk write.
    #[error("Failed to stream response into '{0}'")]
    StreamWrite(PathBuf, #[source] std::io::Error),
}
