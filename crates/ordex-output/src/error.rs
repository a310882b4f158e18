//! Error types for file generation and delivery.

use std::path::PathBuf;
use thiserror::Error;

use ordex_model::OutputFile;

/// Errors while rendering an order payload.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV payload: {0}")]
    Io(#[from] std::io::Error),

    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors reported by a file sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure reported by the remote end, message kept verbatim.
    #[error("{0}")]
    Rejected(String),
}

/// A failed batch delivery.
///
/// Carries the files back so the caller can keep them (for instance by
/// saving them locally) without transforming the source again.
#[derive(Debug, Error)]
#[error("delivery to {destination} failed: {message}")]
pub struct DeliveryError {
    pub destination: String,
    /// Sink message, verbatim.
    pub message: String,
    pub files: Vec<OutputFile>,
}
