//! Error types for the content pipeline

use thiserror::Error;

/// Errors raised while talking to the document source
#[derive(Error, Debug)]
pub enum Error {
    #[error("Document not found: {doc_type}/{uid}")]
    NotFound { doc_type: String, uid: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API at {0} did not advertise a master ref")]
    MissingRef(String),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means the requested document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
