//! Caller-facing transfer requests.

use crate::config::TransferOverrideConfiguration;
use crate::error::TransferError;
use crate::model::{GetObjectRequest, PutObjectRequest};
use crate::specification::{DownloadObjectSpecification, UploadObjectSpecification};

/// Validate an explicit object size.
fn checked_size(size: Option<i64>) -> Result<Option<u64>, TransferError> {
    match size {
        Some(size) if size < 0 => Err(TransferError::InvalidObjectSize {
            size,
            reason: "size must not be negative".to_string(),
        }),
        Some(size) => Ok(Some(size as u64)),
        None => Ok(None),
    }
}

/// Request to upload one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    specification: UploadObjectSpecification,
    size: Option<u64>,
    override_configuration: Option<TransferOverrideConfiguration>,
}

impl UploadRequest {
    /// Start building an upload request.
    pub fn builder(specification: impl Into<UploadObjectSpecification>) -> UploadRequestBuilder {
        UploadRequestBuilder {
            specification: specification.into(),
            size: None,
            override_configuration: None,
        }
    }

    /// Upload request for a bucket and key with no other options.
    pub fn for_bucket_and_key(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            specification: PutObjectRequest::new(bucket, key).into(),
            size: None,
            override_configuration: None,
        }
    }

    /// What object is uploaded.
    pub fn specification(&self) -> &UploadObjectSpecification {
        &self.specification
    }

    /// Explicit object size, if given.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Per-request configuration overrides.
    pub fn override_configuration(&self) -> Option<&TransferOverrideConfiguration> {
        self.override_configuration.as_ref()
    }
}

/// Builder for [`UploadRequest`].
#[derive(Debug, Clone)]
pub struct UploadRequestBuilder {
    specification: UploadObjectSpecification,
    size: Option<i64>,
    override_configuration: Option<TransferOverrideConfiguration>,
}

impl UploadRequestBuilder {
    /// Set the object size, skipping the body's own length report.
    pub fn size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set per-request configuration overrides.
    pub fn override_configuration(mut self, overrides: TransferOverrideConfiguration) -> Self {
        self.override_configuration = Some(overrides);
        self
    }

    /// Build the request.
    ///
    /// # Returns
    /// `TransferError::InvalidObjectSize` for a negative size.
    pub fn build(self) -> Result<UploadRequest, TransferError> {
        Ok(UploadRequest {
            specification: self.specification,
            size: checked_size(self.size)?,
            override_configuration: self.override_configuration,
        })
    }
}

/// Request to download one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    specification: DownloadObjectSpecification,
    size: Option<u64>,
    override_configuration: Option<TransferOverrideConfiguration>,
}

impl DownloadRequest {
    /// Start building a download request.
    pub fn builder(
        specification: impl Into<DownloadObjectSpecification>,
    ) -> DownloadRequestBuilder {
        DownloadRequestBuilder {
            specification: specification.into(),
            size: None,
            override_configuration: None,
        }
    }

    /// Download request for a bucket and key with no other options.
    pub fn for_bucket_and_key(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            specification: GetObjectRequest::new(bucket, key).into(),
            size: None,
            override_configuration: None,
        }
    }

    /// What object is downloaded.
    pub fn specification(&self) -> &DownloadObjectSpecification {
        &self.specification
    }

    /// Explicit object size, if given.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Per-request configuration overrides.
    pub fn override_configuration(&self) -> Option<&TransferOverrideConfiguration> {
        self.override_configuration.as_ref()
    }
}

/// Builder for [`DownloadRequest`].
#[derive(Debug, Clone)]
pub struct DownloadRequestBuilder {
    specification: DownloadObjectSpecification,
    size: Option<i64>,
    override_configuration: Option<TransferOverrideConfiguration>,
}

impl DownloadRequestBuilder {
    /// Set the object size, skipping the `HeadObject` probe.
    pub fn size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set per-request configuration overrides.
    pub fn override_configuration(mut self, overrides: TransferOverrideConfiguration) -> Self {
        self.override_configuration = Some(overrides);
        self
    }

    /// Build the request.
    ///
    /// # Returns
    /// `TransferError::InvalidObjectSize` for a negative size.
    pub fn build(self) -> Result<DownloadRequest, TransferError> {
        Ok(DownloadRequest {
            specification: self.specification,
            size: checked_size(self.size)?,
            override_configuration: self.override_configuration,
        })
    }
}
