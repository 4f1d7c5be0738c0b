//! Storage client interface consumed by the transfer engine.

use async_trait::async_trait;

use crate::body::RequestBody;
use crate::error::StorageError;
use crate::model::{
    AbortMultipartUploadRequest, CompleteMultipartUploadRequest, CreateMultipartUploadRequest,
    GetObjectRequest, HeadObjectRequest, ObjectMetadata, PutObjectOutput, PutObjectRequest,
    UploadPartRequest,
};
use crate::transformer::ResponseSink;

/// Low-level object operations - implemented by each backend.
///
/// Retries, signing and per-call timeouts are the implementation's concern;
/// the engine issues each call once.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Fetch object metadata without the body.
    async fn head_object(
        &self,
        request: &HeadObjectRequest,
    ) -> Result<ObjectMetadata, StorageError>;

    /// Stream an object (or the range named by the request) into `sink`.
    ///
    /// Implementations flush and shut down the sink once the body is written.
    async fn get_object(
        &self,
        request: &GetObjectRequest,
        sink: ResponseSink,
    ) -> Result<ObjectMetadata, StorageError>;

    /// Upload a whole object in one call.
    async fn put_object(
        &self,
        request: &PutObjectRequest,
        body: RequestBody,
    ) -> Result<PutObjectOutput, StorageError>;

    /// Start a multipart upload.
    ///
    /// # Returns
    /// The upload identifier.
    async fn create_multipart_upload(
        &self,
        request: &CreateMultipartUploadRequest,
    ) -> Result<String, StorageError>;

    /// Upload one part.
    ///
    /// # Returns
    /// The part's ETag.
    async fn upload_part(
        &self,
        request: &UploadPartRequest,
        body: RequestBody,
    ) -> Result<String, StorageError>;

    /// Assemble uploaded parts into the final object.
    async fn complete_multipart_upload(
        &self,
        request: &CompleteMultipartUploadRequest,
    ) -> Result<PutObjectOutput, StorageError>;

    /// Discard a multipart upload and its uploaded parts.
    async fn abort_multipart_upload(
        &self,
        request: &AbortMultipartUploadRequest,
    ) -> Result<(), StorageError>;
}
