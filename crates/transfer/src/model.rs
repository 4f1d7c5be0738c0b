//! Object-level request and response values exchanged with the storage client.
//!
//! These mirror the S3 API fields the transfer engine reads or forwards.
//! Values are plain structs built with `new` plus `with_*` methods and are
//! never mutated once handed to the engine.

use std::collections::HashMap;

/// Request for `GetObject`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetObjectRequest {
    pub bucket: String,
    pub key: String,
    /// `Range` header value (`bytes=<start>-<end>`).
    pub range: Option<String>,
    pub part_number: Option<u32>,
    pub version_id: Option<String>,
    pub if_match: Option<String>,
    pub if_none_match: Option<String>,
    /// Epoch seconds.
    pub if_modified_since: Option<i64>,
    /// Epoch seconds.
    pub if_unmodified_since: Option<i64>,
    pub sse_customer_algorithm: Option<String>,
    pub sse_customer_key: Option<String>,
    pub sse_customer_key_md5: Option<String>,
    pub expected_bucket_owner: Option<String>,
    pub request_payer: Option<String>,
    pub checksum_mode: Option<String>,
}

impl GetObjectRequest {
    /// Create a request for a bucket and key.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            ..Default::default()
        }
    }

    /// Set the `Range` header.
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    /// Request a specific part of a multipart object.
    pub fn with_part_number(mut self, part_number: u32) -> Self {
        self.part_number = Some(part_number);
        self
    }

    /// Request a specific object version.
    pub fn with_version_id(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Only return the object if its ETag matches.
    pub fn with_if_match(mut self, etag: impl Into<String>) -> Self {
        self.if_match = Some(etag.into());
        self
    }

    /// Set SSE-C customer key fields.
    pub fn with_sse_customer_key(
        mut self,
        algorithm: impl Into<String>,
        key: impl Into<String>,
        key_md5: impl Into<String>,
    ) -> Self {
        self.sse_customer_algorithm = Some(algorithm.into());
        self.sse_customer_key = Some(key.into());
        self.sse_customer_key_md5 = Some(key_md5.into());
        self
    }
}

/// Request for `HeadObject`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadObjectRequest {
    pub bucket: String,
    pub key: String,
    pub part_number: Option<u32>,
    pub version_id: Option<String>,
    pub if_match: Option<String>,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<i64>,
    pub if_unmodified_since: Option<i64>,
    pub sse_customer_algorithm: Option<String>,
    pub sse_customer_key: Option<String>,
    pub sse_customer_key_md5: Option<String>,
    pub expected_bucket_owner: Option<String>,
    pub request_payer: Option<String>,
    pub checksum_mode: Option<String>,
}

/// Size probe for a download: every field except `range` carries over.
impl From<&GetObjectRequest> for HeadObjectRequest {
    fn from(get: &GetObjectRequest) -> Self {
        Self {
            bucket: get.bucket.clone(),
            key: get.key.clone(),
            part_number: get.part_number,
            version_id: get.version_id.clone(),
            if_match: get.if_match.clone(),
            if_none_match: get.if_none_match.clone(),
            if_modified_since: get.if_modified_since,
            if_unmodified_since: get.if_unmodified_since,
            sse_customer_algorithm: get.sse_customer_algorithm.clone(),
            sse_customer_key: get.sse_customer_key.clone(),
            sse_customer_key_md5: get.sse_customer_key_md5.clone(),
            expected_bucket_owner: get.expected_bucket_owner.clone(),
            request_payer: get.request_payer.clone(),
            checksum_mode: get.checksum_mode.clone(),
        }
    }
}

/// Object metadata returned by `HeadObject` and `GetObject`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Content length as reported by the service.
    pub content_length: Option<i64>,
    pub content_range: Option<String>,
    pub content_type: Option<String>,
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
    /// Epoch seconds.
    pub last_modified: Option<i64>,
    pub metadata: HashMap<String, String>,
}

/// Request for `PutObject`; also the template for multipart uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,
    pub metadata: HashMap<String, String>,
    pub server_side_encryption: Option<String>,
    pub ssekms_key_id: Option<String>,
    pub storage_class: Option<String>,
    pub sse_customer_algorithm: Option<String>,
    pub sse_customer_key: Option<String>,
    pub sse_customer_key_md5: Option<String>,
    pub expected_bucket_owner: Option<String>,
    pub request_payer: Option<String>,
}

impl PutObjectRequest {
    /// Create a request for a bucket and key.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            ..Default::default()
        }
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Add a user metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the storage class.
    pub fn with_storage_class(mut self, storage_class: impl Into<String>) -> Self {
        self.storage_class = Some(storage_class.into());
        self
    }

    /// Set SSE-C customer key fields.
    pub fn with_sse_customer_key(
        mut self,
        algorithm: impl Into<String>,
        key: impl Into<String>,
        key_md5: impl Into<String>,
    ) -> Self {
        self.sse_customer_algorithm = Some(algorithm.into());
        self.sse_customer_key = Some(key.into());
        self.sse_customer_key_md5 = Some(key_md5.into());
        self
    }
}

/// Result of `PutObject` or `CompleteMultipartUpload`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutObjectOutput {
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
}

/// Request for `CreateMultipartUpload`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateMultipartUploadRequest {
    pub bucket: String,
    pub key: String,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,
    pub metadata: HashMap<String, String>,
    pub server_side_encryption: Option<String>,
    pub ssekms_key_id: Option<String>,
    pub storage_class: Option<String>,
    pub sse_customer_algorithm: Option<String>,
    pub sse_customer_key: Option<String>,
    pub sse_customer_key_md5: Option<String>,
    pub expected_bucket_owner: Option<String>,
    pub request_payer: Option<String>,
}

impl From<&PutObjectRequest> for CreateMultipartUploadRequest {
    fn from(put: &PutObjectRequest) -> Self {
        Self {
            bucket: put.bucket.clone(),
            key: put.key.clone(),
            content_type: put.content_type.clone(),
            content_encoding: put.content_encoding.clone(),
            cache_control: put.cache_control.clone(),
            metadata: put.metadata.clone(),
            server_side_encryption: put.server_side_encryption.clone(),
            ssekms_key_id: put.ssekms_key_id.clone(),
            storage_class: put.storage_class.clone(),
            sse_customer_algorithm: put.sse_customer_algorithm.clone(),
            sse_customer_key: put.sse_customer_key.clone(),
            sse_customer_key_md5: put.sse_customer_key_md5.clone(),
            expected_bucket_owner: put.expected_bucket_owner.clone(),
            request_payer: put.request_payer.clone(),
        }
    }
}

/// Request for `UploadPart`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPartRequest {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub part_number: u32,
    pub content_length: u64,
    pub sse_customer_algorithm: Option<String>,
    pub sse_customer_key: Option<String>,
    pub sse_customer_key_md5: Option<String>,
    pub expected_bucket_owner: Option<String>,
    pub request_payer: Option<String>,
}

impl UploadPartRequest {
    /// Build the part request for one part of a multipart upload.
    ///
    /// # Arguments
    /// * `put` - The object-level request the upload was created from
    /// * `upload_id` - Multipart upload identifier
    /// * `part_number` - 1-based part number
    /// * `content_length` - Size of this part in bytes
    pub fn for_part(
        put: &PutObjectRequest,
        upload_id: &str,
        part_number: u32,
        content_length: u64,
    ) -> Self {
        Self {
            bucket: put.bucket.clone(),
            key: put.key.clone(),
            upload_id: upload_id.to_string(),
            part_number,
            content_length,
            sse_customer_algorithm: put.sse_customer_algorithm.clone(),
            sse_customer_key: put.sse_customer_key.clone(),
            sse_customer_key_md5: put.sse_customer_key_md5.clone(),
            expected_bucket_owner: put.expected_bucket_owner.clone(),
            request_payer: put.request_payer.clone(),
        }
    }
}

/// Integrity token for one uploaded part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPart {
    pub part_number: u32,
    pub e_tag: String,
}

/// Request for `CompleteMultipartUpload`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompleteMultipartUploadRequest {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    /// Parts in ascending part-number order.
    pub parts: Vec<CompletedPart>,
    pub sse_customer_algorithm: Option<String>,
    pub sse_customer_key: Option<String>,
    pub sse_customer_key_md5: Option<String>,
    pub expected_bucket_owner: Option<String>,
    pub request_payer: Option<String>,
}

/// Request for `AbortMultipartUpload`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbortMultipartUploadRequest {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub expected_bucket_owner: Option<String>,
    pub request_payer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_from_get_drops_range() {
        let get = GetObjectRequest::new("bucket", "key")
            .with_range("bytes=0-9")
            .with_version_id("v1")
            .with_if_match("\"etag\"")
            .with_sse_customer_key("AES256", "secret", "md5");

        let head = HeadObjectRequest::from(&get);
        assert_eq!(head.bucket, "bucket");
        assert_eq!(head.key, "key");
        assert_eq!(head.version_id.as_deref(), Some("v1"));
        assert_eq!(head.if_match.as_deref(), Some("\"etag\""));
        assert_eq!(head.sse_customer_algorithm.as_deref(), Some("AES256"));
        assert_eq!(head.sse_customer_key_md5.as_deref(), Some("md5"));
    }

    #[test]
    fn test_create_from_put_copies_object_fields() {
        let put = PutObjectRequest::new("bucket", "key")
            .with_content_type("text/plain")
            .with_metadata("owner", "me")
            .with_storage_class("STANDARD_IA");

        let create = CreateMultipartUploadRequest::from(&put);
        assert_eq!(create.content_type.as_deref(), Some("text/plain"));
        assert_eq!(create.metadata.get("owner").map(String::as_str), Some("me"));
        assert_eq!(create.storage_class.as_deref(), Some("STANDARD_IA"));
    }

    #[test]
    fn test_upload_part_carries_sse_customer_key() {
        let put = PutObjectRequest::new("bucket", "key")
            .with_sse_customer_key("AES256", "secret", "md5");
        let part = UploadPartRequest::for_part(&put, "upload-1", 3, 42);
        assert_eq!(part.upload_id, "upload-1");
        assert_eq!(part.part_number, 3);
        assert_eq!(part.content_length, 42);
        assert_eq!(part.sse_customer_key.as_deref(), Some("secret"));
    }
}
