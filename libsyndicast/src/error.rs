//! Error types for Syndicast

use std::path::PathBuf;

use thiserror::Error;

use crate::diagnostics::Diagnostic;

pub type Result<T> = std::result::Result<T, SyndicastError>;

#[derive(Error, Debug)]
pub enum SyndicastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Account resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Media upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Post submission failed: {0}")]
    Submission(#[from] SubmissionError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl SyndicastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SyndicastError::Validation(_) => 3,
            SyndicastError::Api(e) if e.is_auth() => 2,
            SyndicastError::Submission(e) if e.diagnostic().remote_error.is_auth() => 2,
            _ => 1,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        SyndicastError::Validation(message.into())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Requested platforms that have no matching connected account.
///
/// All misses are reported together, never just the first one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no connected account for {} (targeting: {hint})", .missing.join(", "))]
pub struct ResolutionError {
    pub missing: Vec<String>,
    pub hint: String,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Presign request for {filename} failed: {source}")]
    PresignFailed { filename: String, source: ApiError },

    #[error("Transfer of {filename} failed: {source}")]
    UploadFailed { filename: String, source: ApiError },
}

/// Remote post creation failed; carries the full diagnostic bundle.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct SubmissionError(Box<Diagnostic>);

impl SubmissionError {
    pub fn new(diagnostic: Diagnostic) -> Self {
        Self(Box::new(diagnostic))
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.0
    }
}

/// Errors returned by the remote publishing API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("{0}")]
    Remote(String),
}

impl ApiError {
    /// True for 401/403 responses (expired or under-scoped API key)
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            ApiError::Status {
                status: status.as_u16(),
                body: error.to_string(),
            }
        } else {
            ApiError::Network(error.to_string())
        }
    }
}
