//! Error mapping for the S3 backend.

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use rusty_transfer::StorageError;
use thiserror::Error;

/// Errors specific to the S3 backend.
#[derive(Error, Debug)]
pub enum S3Error {
    /// Error reported by the service or the SDK transport.
    #[error("AWS SDK error: {message}")]
    SdkError { message: String, retryable: bool },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<S3Error> for StorageError {
    fn from(err: S3Error) -> Self {
        match err {
            S3Error::SdkError { message, retryable } => {
                StorageError::NetworkError { message, retryable }
            }
            S3Error::ConfigError(message) => StorageError::InvalidConfig { message },
        }
    }
}

/// How a service error code should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorClass {
    NotFound,
    AccessDenied,
    Retryable,
    Fatal,
}

/// Classify an S3 error code.
pub(crate) fn classify_code(code: Option<&str>) -> ErrorClass {
    match code {
        Some("NoSuchKey") | Some("NotFound") | Some("NoSuchUpload") | Some("NoSuchBucket") => {
            ErrorClass::NotFound
        }
        Some("AccessDenied") | Some("Forbidden") => ErrorClass::AccessDenied,
        Some("SlowDown") | Some("InternalError") | Some("ServiceUnavailable")
        | Some("RequestTimeout") | Some("RequestTimeTooSkewed") => ErrorClass::Retryable,
        _ => ErrorClass::Fatal,
    }
}

/// Convert an SDK error into a [`StorageError`] for `bucket`/`key`.
pub(crate) fn from_sdk_error<E, R>(err: SdkError<E, R>, bucket: &str, key: &str) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message: String = DisplayErrorContext(&err).to_string();

    let class: ErrorClass = match &err {
        SdkError::ServiceError(service) => classify_code(service.err().code()),
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            ErrorClass::Retryable
        }
        _ => ErrorClass::Fatal,
    };

    match class {
        ErrorClass::NotFound => StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        ErrorClass::AccessDenied => StorageError::AccessDenied {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message,
        },
        ErrorClass::Retryable => S3Error::SdkError {
            message,
            retryable: true,
        }
        .into(),
        ErrorClass::Fatal => S3Error::SdkError {
            message,
            retryable: false,
        }
        .into(),
    }
}
