//! Error types for typed error handling.
//!
//! This module provides structured errors for the sync client, the image
//! pipeline, and the local store, enabling better error handling and more
//! informative error messages at the CLI boundary.

/// Result type for lifelog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Lifelog errors with structured context.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No GitHub token configured (neither environment nor stored).
    #[error("GitHub token not configured")]
    TokenMissing,

    /// The remote store rejected a request with a non-success status.
    #[error("remote request failed: {status} {message}")]
    RemoteStatus { status: u16, message: String },

    /// Network-level failure talking to the remote store.
    #[error("transport error in {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// Remote file content could not be decoded.
    #[error("failed to decode remote content: {0}")]
    Decode(String),

    /// A remote file that an operation requires does not exist.
    #[error("remote file not found: {path}")]
    RemoteFileMissing { path: String },

    /// Imported data does not match the expected format.
    #[error("import failed: {0}")]
    ImportFormat(String),

    /// Export requested but nothing has been persisted.
    #[error("no data to export")]
    NoDataToExport,

    /// Unsupported image format.
    #[error("unsupported file format: {mime}")]
    UnsupportedImageFormat { mime: String },

    /// Input image exceeds the accepted size envelope.
    #[error("file too large: {size}, images must be under {limit}")]
    ImageTooLarge { size: String, limit: String },

    /// Image decode or encode failure.
    #[error("image processing failed: {0}")]
    Image(String),

    /// A record failed validation before persisting.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// The referenced record does not exist.
    #[error("no record with id {id}")]
    RecordNotFound { id: u64 },

    /// IO error with context.
    #[error("IO error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization or parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a transport error with context.
    pub fn transport(context: impl Into<String>, source: ureq::Error) -> Self {
        Self::Transport {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Create a remote status error.
    pub fn remote_status(status: u16, message: impl Into<String>) -> Self {
        Self::RemoteStatus {
            status,
            message: message.into(),
        }
    }
}
