//! Per-part work descriptors.
//!
//! A context is created for every part before any network call is issued.
//! It carries the originating request, where the part sits in the object,
//! and the part-level API request derived for it.

use std::sync::Arc;

use crate::model::{GetObjectRequest, PutObjectRequest, UploadPartRequest};
use crate::request::{DownloadRequest, UploadRequest};
use crate::sizing::PartInfo;

/// Whole-object upload work item.
#[derive(Debug, Clone)]
pub struct SinglePartUploadContext {
    /// The originating request.
    pub upload_request: Arc<UploadRequest>,
    /// Object size in bytes.
    pub size: u64,
}

/// One part of a multipart upload.
#[derive(Debug, Clone)]
pub struct MultipartUploadContext {
    /// The originating request.
    pub upload_request: Arc<UploadRequest>,
    /// 1-based part number.
    pub part_number: u32,
    /// Byte offset of this part within the object.
    pub part_offset: u64,
    /// Size of this part in bytes.
    pub size: u64,
    /// Whether this is the final part.
    pub is_last_part: bool,
    /// The `UploadPart` request for this part.
    pub upload_part_request: UploadPartRequest,
}

impl MultipartUploadContext {
    /// Create the context for one upload part.
    ///
    /// # Arguments
    /// * `upload_request` - The originating request
    /// * `put` - Object-level API request of the upload
    /// * `upload_id` - Multipart upload identifier
    /// * `part` - Part boundaries from the sizing policy
    pub fn new(
        upload_request: &Arc<UploadRequest>,
        put: &PutObjectRequest,
        upload_id: &str,
        part: PartInfo,
    ) -> Self {
        Self {
            upload_request: Arc::clone(upload_request),
            part_number: part.part_number,
            part_offset: part.offset,
            size: part.size,
            is_last_part: part.is_last,
            upload_part_request: UploadPartRequest::for_part(
                put,
                upload_id,
                part.part_number,
                part.size,
            ),
        }
    }
}

/// Whole-object download work item.
#[derive(Debug, Clone)]
pub struct SinglePartDownloadContext {
    /// The originating request.
    pub download_request: Arc<DownloadRequest>,
}

/// One ranged part of a multipart download.
#[derive(Debug, Clone)]
pub struct MultipartDownloadContext {
    /// The originating request.
    pub download_request: Arc<DownloadRequest>,
    /// 1-based part number.
    pub part_number: u32,
    /// Byte offset of this part within the object.
    pub part_offset: u64,
    /// Size of this part in bytes.
    pub size: u64,
    /// Whether this is the final part.
    pub is_last_part: bool,
    /// The ranged `GetObject` request for this part.
    pub part_download_specification: GetObjectRequest,
}

impl MultipartDownloadContext {
    /// Create the context for one download part.
    ///
    /// The part request is the original request with `Range` set to the
    /// part's inclusive byte range.
    pub fn new(
        download_request: &Arc<DownloadRequest>,
        get: &GetObjectRequest,
        part: PartInfo,
    ) -> Self {
        Self {
            download_request: Arc::clone(download_request),
            part_number: part.part_number,
            part_offset: part.offset,
            size: part.size,
            is_last_part: part.is_last,
            part_download_specification: get.clone().with_range(part.range_header()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_context_sets_range() {
        let request = Arc::new(DownloadRequest::for_bucket_and_key("bucket", "key"));
        let get = GetObjectRequest::new("bucket", "key").with_version_id("v1");
        let part = PartInfo {
            part_number: 2,
            offset: 5,
            size: 5,
            is_last: true,
        };

        let context = MultipartDownloadContext::new(&request, &get, part);
        assert_eq!(context.part_number, 2);
        assert_eq!(context.part_offset, 5);
        assert!(context.is_last_part);
        assert_eq!(context.part_download_specification.range.as_deref(), Some("bytes=5-9"));
        assert_eq!(context.part_download_specification.version_id.as_deref(), Some("v1"));
    }

    #[test]
    fn test_upload_context_builds_part_request() {
        let request = Arc::new(UploadRequest::for_bucket_and_key("bucket", "key"));
        let put = PutObjectRequest::new("bucket", "key");
        let part = PartInfo {
            part_number: 1,
            offset: 0,
            size: 8,
            is_last: false,
        };

        let context = MultipartUploadContext::new(&request, &put, "upload-7", part);
        assert_eq!(context.upload_part_request.upload_id, "upload-7");
        assert_eq!(context.upload_part_request.part_number, 1);
        assert_eq!(context.upload_part_request.content_length, 8);
        assert!(!context.is_last_part);
    }
}
