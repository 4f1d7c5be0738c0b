//! Error types for transfer operations.

use thiserror::Error;

/// Errors reported by a [`StorageClient`](crate::StorageClient) implementation.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// Object not found.
    #[error("Object not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Access denied.
    #[error("Access denied to s3://{bucket}/{key}: {message}")]
    AccessDenied {
        bucket: String,
        key: String,
        message: String,
    },

    /// Network or service error.
    #[error("Network error: {message}")]
    NetworkError { message: String, retryable: bool },

    /// Local I/O error while producing or consuming a body.
    #[error("I/O error for {path}: {message}")]
    IoError { path: String, message: String },

    /// Invalid client configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl StorageError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            StorageError::NetworkError { retryable, .. } => *retryable,
            StorageError::NotFound { .. } => false,
            StorageError::AccessDenied { .. } => false,
            StorageError::IoError { .. } => false,
            StorageError::InvalidConfig { .. } => false,
            StorageError::Other { .. } => false,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::IoError {
            path: String::new(),
            message: err.to_string(),
        }
    }
}

/// Storage operation names used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    HeadObject,
    GetObject,
    PutObject,
    CreateMultipartUpload,
    UploadPart,
    CompleteMultipartUpload,
    AbortMultipartUpload,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &str = match self {
            Operation::HeadObject => "HeadObject",
            Operation::GetObject => "GetObject",
            Operation::PutObject => "PutObject",
            Operation::CreateMultipartUpload => "CreateMultipartUpload",
            Operation::UploadPart => "UploadPart",
            Operation::CompleteMultipartUpload => "CompleteMultipartUpload",
            Operation::AbortMultipartUpload => "AbortMultipartUpload",
        };
        f.write_str(name)
    }
}

/// Errors that terminate a transfer.
#[derive(Error, Debug, Clone)]
pub enum TransferError {
    /// The requested operation is not supported.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: &'static str },

    /// The object size is invalid.
    #[error("Invalid object size {size}: {reason}")]
    InvalidObjectSize { size: i64, reason: String },

    /// No explicit size was given and the body cannot report its length.
    #[error("Content length unknown: set an explicit size on the upload request")]
    UnknownContentLength,

    /// Invalid multipart configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A single part of a multipart transfer failed.
    #[error("Part {part_number} failed: {source}")]
    PartFailed {
        part_number: u32,
        #[source]
        source: Box<TransferError>,
    },

    /// A storage operation failed.
    #[error("{operation} failed: {source}")]
    Storage {
        operation: Operation,
        #[source]
        source: StorageError,
    },

    /// The service response lacked a field the transfer depends on.
    #[error("{operation} response missing {field}")]
    MissingResponseField {
        operation: Operation,
        field: &'static str,
    },

    /// Local I/O error in a body or sink adapter.
    #[error("I/O error for {path}: {message}")]
    Io { path: String, message: String },

    /// The transfer was cancelled.
    #[error("Transfer cancelled")]
    Cancelled,

    /// A spawned transfer task panicked.
    #[error("Transfer task failed: {message}")]
    TaskFailed { message: String },

    /// A transfer was submitted outside a Tokio runtime.
    #[error("No Tokio runtime available to run the transfer")]
    NoRuntime,
}

impl TransferError {
    /// Wrap a storage error with the operation that produced it.
    ///
    /// # Arguments
    /// * `operation` - The storage operation that failed
    /// * `source` - The underlying storage error
    pub fn storage(operation: Operation, source: StorageError) -> Self {
        TransferError::Storage { operation, source }
    }

    /// Attribute an error to a part of a multipart transfer.
    ///
    /// # Arguments
    /// * `part_number` - 1-based part number
    /// * `source` - The error raised while processing the part
    pub fn part_failed(part_number: u32, source: TransferError) -> Self {
        TransferError::PartFailed {
            part_number,
            source: Box::new(source),
        }
    }

    /// Create an I/O error for a path.
    ///
    /// # Arguments
    /// * `path` - Path where the error occurred
    /// * `err` - The underlying I/O error
    pub fn from_io(path: impl Into<String>, err: std::io::Error) -> Self {
        TransferError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Part number this error is attributed to, if any.
    pub fn part_number(&self) -> Option<u32> {
        match self {
            TransferError::PartFailed { part_number, .. } => Some(*part_number),
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for TransferError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            TransferError::Cancelled
        } else {
            TransferError::TaskFailed {
                message: err.to_string(),
            }
        }
    }
}
