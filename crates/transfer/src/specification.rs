//! What object a transfer operates on.
//!
//! A specification is either a direct API request or a presigned URL.
//! Presigned URLs are not supported by the engine and are rejected at
//! submission.

use crate::error::TransferError;
use crate::model::{GetObjectRequest, PutObjectRequest};

/// Discriminator for specification variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecificationKind {
    /// Backed by an API-style request.
    ApiRequest,
    /// Backed by a presigned URL.
    PresignedUrl,
}

/// Object specification for a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadObjectSpecification {
    /// A `GetObject` request.
    ApiRequest(GetObjectRequest),
    /// A presigned `GET` URL.
    PresignedUrl(String),
}

impl DownloadObjectSpecification {
    /// The variant of this specification.
    pub fn kind(&self) -> SpecificationKind {
        match self {
            DownloadObjectSpecification::ApiRequest(_) => SpecificationKind::ApiRequest,
            DownloadObjectSpecification::PresignedUrl(_) => SpecificationKind::PresignedUrl,
        }
    }

    /// The underlying API request.
    ///
    /// # Returns
    /// `TransferError::Unsupported` for presigned URLs.
    pub fn as_api_request(&self) -> Result<&GetObjectRequest, TransferError> {
        match self {
            DownloadObjectSpecification::ApiRequest(request) => Ok(request),
            DownloadObjectSpecification::PresignedUrl(_) => Err(TransferError::Unsupported {
                operation: "presigned URL download",
            }),
        }
    }
}

impl From<GetObjectRequest> for DownloadObjectSpecification {
    fn from(request: GetObjectRequest) -> Self {
        DownloadObjectSpecification::ApiRequest(request)
    }
}

/// Object specification for an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadObjectSpecification {
    /// A `PutObject` request.
    ApiRequest(PutObjectRequest),
    /// A presigned `PUT` URL.
    PresignedUrl(String),
}

impl UploadObjectSpecification {
    /// The variant of this specification.
    pub fn kind(&self) -> SpecificationKind {
        match self {
            UploadObjectSpecification::ApiRequest(_) => SpecificationKind::ApiRequest,
            UploadObjectSpecification::PresignedUrl(_) => SpecificationKind::PresignedUrl,
        }
    }

    /// The underlying API request.
    ///
    /// # Returns
    /// `TransferError::Unsupported` for presigned URLs.
    pub fn as_api_request(&self) -> Result<&PutObjectRequest, TransferError> {
        match self {
            UploadObjectSpecification::ApiRequest(request) => Ok(request),
            UploadObjectSpecification::PresignedUrl(_) => Err(TransferError::Unsupported {
                operation: "presigned URL upload",
            }),
        }
    }
}

impl From<PutObjectRequest> for UploadObjectSpecification {
    fn from(request: PutObjectRequest) -> Self {
        UploadObjectSpecification::ApiRequest(request)
    }
}
