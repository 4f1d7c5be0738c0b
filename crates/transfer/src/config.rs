//! Multipart transfer configuration and per-transfer resolution.
//!
//! A [`TransferManagerConfiguration`] is fixed when the manager is built.
//! Individual requests may carry a [`TransferOverrideConfiguration`]; when an
//! override is present for a direction it replaces the global configuration
//! for that direction entirely. There is no field-level merge.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_PART_COUNT, DEFAULT_MIN_PART_SIZE, DEFAULT_MULTIPART_THRESHOLD};
use crate::error::TransferError;

/// Multipart policy for one transfer direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultipartConfiguration {
    /// Whether multipart transfer may be used at all.
    pub enable_multipart: bool,
    /// Objects of at least this size are transferred in parts.
    pub threshold_bytes: u64,
    /// Lower bound for the size of each part.
    pub min_part_size_bytes: u64,
    /// Upper bound for the number of parts.
    pub max_part_count: u32,
}

impl Default for MultipartConfiguration {
    fn default() -> Self {
        Self {
            enable_multipart: true,
            threshold_bytes: DEFAULT_MULTIPART_THRESHOLD,
            min_part_size_bytes: DEFAULT_MIN_PART_SIZE,
            max_part_count: DEFAULT_MAX_PART_COUNT,
        }
    }
}

impl MultipartConfiguration {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable multipart transfers.
    pub fn with_multipart_enabled(mut self, enabled: bool) -> Self {
        self.enable_multipart = enabled;
        self
    }

    /// Set the size at which multipart transfer kicks in.
    pub fn with_threshold(mut self, threshold_bytes: u64) -> Self {
        self.threshold_bytes = threshold_bytes;
        self
    }

    /// Set the minimum part size.
    pub fn with_min_part_size(mut self, min_part_size_bytes: u64) -> Self {
        self.min_part_size_bytes = min_part_size_bytes;
        self
    }

    /// Set the maximum part count.
    pub fn with_max_part_count(mut self, max_part_count: u32) -> Self {
        self.max_part_count = max_part_count;
        self
    }

    /// Check the bounds the sizing policy relies on.
    ///
    /// A minimum part size above the threshold is accepted: objects between
    /// the two are sent as a single part (see [`crate::sizing::compute_parts`]).
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.min_part_size_bytes == 0 {
            return Err(TransferError::InvalidConfig {
                message: "min_part_size_bytes must be greater than zero".to_string(),
            });
        }
        if self.max_part_count == 0 {
            return Err(TransferError::InvalidConfig {
                message: "max_part_count must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Whether an object of `size` bytes should be transferred in parts.
    pub fn use_multipart(&self, size: u64) -> bool {
        self.enable_multipart && size >= self.threshold_bytes
    }
}

/// Global configuration owned by the transfer manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferManagerConfiguration {
    /// Policy for uploads.
    pub upload: MultipartConfiguration,
    /// Policy for downloads.
    pub download: MultipartConfiguration,
}

impl TransferManagerConfiguration {
    /// Set the upload policy.
    pub fn with_upload(mut self, upload: MultipartConfiguration) -> Self {
        self.upload = upload;
        self
    }

    /// Set the download policy.
    pub fn with_download(mut self, download: MultipartConfiguration) -> Self {
        self.download = download;
        self
    }

    /// Validate both directions.
    pub fn validate(&self) -> Result<(), TransferError> {
        self.upload.validate()?;
        self.download.validate()
    }
}

/// Per-request configuration overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferOverrideConfiguration {
    /// Replaces the global upload policy when set.
    pub upload: Option<MultipartConfiguration>,
    /// Replaces the global download policy when set.
    pub download: Option<MultipartConfiguration>,
}

impl TransferOverrideConfiguration {
    /// Override the upload policy.
    pub fn with_upload(mut self, upload: MultipartConfiguration) -> Self {
        self.upload = Some(upload);
        self
    }

    /// Override the download policy.
    pub fn with_download(mut self, download: MultipartConfiguration) -> Self {
        self.download = Some(download);
        self
    }

    /// Validate whichever overrides are present.
    pub fn validate(&self) -> Result<(), TransferError> {
        if let Some(ref upload) = self.upload {
            upload.validate()?;
        }
        if let Some(ref download) = self.download {
            download.validate()?;
        }
        Ok(())
    }
}

/// Pick the effective configuration for one transfer.
///
/// The override wins entirely when present.
pub fn resolve(
    per_request: Option<&MultipartConfiguration>,
    global: &MultipartConfiguration,
) -> MultipartConfiguration {
    per_request.copied().unwrap_or(*global)
}
