use thiserror::Error;

/// extm統一エラー型
#[derive(Debug, Error)]
pub enum ExtmError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {message} (status: {status})")]
    HttpStatus { status: u16, message: String },

    #[error("Invalid registry: {0}")]
    InvalidRegistry(String),

    #[error("Extension not found in registry: {0}")]
    ExtensionNotFound(String),

    #[error("Invalid extension archive: {0}")]
    InvalidArchive(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to open URL: {0}")]
    Opener(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, ExtmError>;
