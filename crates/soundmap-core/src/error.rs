//! Error types for SoundMap.
//!
//! Every failure the library can report is a variant of [`SoundMapError`].
//! Callers that present errors to a user can group them with
//! [`SoundMapError::category`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the SoundMap library.
#[derive(Debug, Error)]
pub enum SoundMapError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A sound metadata file is not valid JSON or has an unrecognized shape.
    #[error("Invalid sound metadata in {path}: {message}")]
    Metadata {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Score errors
    /// The score is not well-formed XML.
    #[error("Malformed score: {message}")]
    Format {
        message: String,
        #[source]
        source: Option<quick_xml::Error>,
    },

    #[error("score-part #{index} has no id attribute")]
    MissingPartId { index: usize },

    /// A mapping refers to a part the document does not contain.
    #[error("No score-part with id '{part_id}' in the document")]
    PartNotFound { part_id: String },

    /// A selection refers to a part the current session does not contain.
    #[error("Unknown part: {part_id}")]
    UnknownPart { part_id: String },

    // User input errors
    #[error("No score loaded, nothing to save")]
    NoDocument,

    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("A score is already being loaded")]
    LoadInProgress,

    // Environment errors
    #[error("Process launch failed for {app}: {message}")]
    LaunchFailed { app: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for SoundMap operations.
pub type Result<T> = std::result::Result<T, SoundMapError>;

/// Coarse grouping of errors by who can fix them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing selection or missing data; the operation was rejected untouched.
    UserInput,
    /// Malformed score or metadata.
    Parse,
    /// Missing files, directories or applications.
    Environment,
    Internal,
}

// Conversion implementations for common error types

impl From<std::io::Error> for SoundMapError {
    fn from(err: std::io::Error) -> Self {
        SoundMapError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<quick_xml::Error> for SoundMapError {
    fn from(err: quick_xml::Error) -> Self {
        SoundMapError::Format {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl SoundMapError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        SoundMapError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a format error without an underlying parser error.
    pub fn format(message: impl Into<String>) -> Self {
        SoundMapError::Format {
            message: message.into(),
            source: None,
        }
    }

    /// Classify this error for presentation.
    pub fn category(&self) -> ErrorCategory {
        match self {
            SoundMapError::NoDocument
            | SoundMapError::Validation { .. }
            | SoundMapError::LoadInProgress
            | SoundMapError::UnknownPart { .. } => ErrorCategory::UserInput,

            SoundMapError::Metadata { .. }
            | SoundMapError::Format { .. }
            | SoundMapError::MissingPartId { .. }
            | SoundMapError::PartNotFound { .. } => ErrorCategory::Parse,

            SoundMapError::Io { .. }
            | SoundMapError::FileNotFound(_)
            | SoundMapError::LaunchFailed { .. }
            | SoundMapError::Config { .. } => ErrorCategory::Environment,

            SoundMapError::Other(_) => ErrorCategory::Internal,
        }
    }
}
