//! Upload orchestration.
//!
//! An upload either goes out as one `PutObject` call or as a multipart
//! upload:
//!
//! 1. `CreateMultipartUpload` obtains an upload id.
//! 2. The object is partitioned by [`compute_parts`].
//! 3. Every part is read from the body strategy and sent with `UploadPart`
//!    concurrently; each ETag lands in its slot of a [`PartResultTable`].
//! 4. Once all parts succeed, `CompleteMultipartUpload` is sent with the
//!    parts ordered by part number.
//!
//! Any failure in steps 3-4 triggers a best-effort `AbortMultipartUpload`.
//! The original failure is reported whether or not the abort succeeds.

use std::sync::Arc;

use crate::body::{RequestBody, TransferRequestBody};
use crate::config::{resolve, MultipartConfiguration};
use crate::context::{MultipartUploadContext, SinglePartUploadContext};
use crate::error::{Operation, TransferError};
use crate::handle::{CompletedUpload, UploadHandle};
use crate::join::join_all_or_cancel;
use crate::model::{
    AbortMultipartUploadRequest, CompleteMultipartUploadRequest, CreateMultipartUploadRequest,
    PutObjectOutput, PutObjectRequest,
};
use crate::part_table::PartResultTable;
use crate::request::UploadRequest;
use crate::sizing::compute_parts;
use crate::traits::StorageClient;

/// Uploads an object with a single `PutObject` call.
pub struct SinglePartUploadManager {
    client: Arc<dyn StorageClient>,
}

impl SinglePartUploadManager {
    /// Create a manager over `client`.
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }

    /// Upload the whole object.
    ///
    /// # Arguments
    /// * `request` - The originating request
    /// * `put` - Object-level API request
    /// * `size` - Object size in bytes
    /// * `body` - Byte source strategy
    pub async fn upload(
        &self,
        request: Arc<UploadRequest>,
        put: &PutObjectRequest,
        size: u64,
        body: &dyn TransferRequestBody,
    ) -> Result<CompletedUpload, TransferError> {
        let context = SinglePartUploadContext {
            upload_request: request,
            size,
        };
        let object_body: RequestBody = body.request_body_for_object(&context).await?;

        let output: PutObjectOutput = self
            .client
            .put_object(put, object_body)
            .await
            .map_err(|e| TransferError::storage(Operation::PutObject, e))?;

        log::debug!("Uploaded s3://{}/{} in a single part ({} bytes)", put.bucket, put.key, size);

        Ok(CompletedUpload {
            e_tag: output.e_tag,
            version_id: output.version_id,
            part_count: 1,
        })
    }
}

/// Uploads an object as a multipart upload.
pub struct MultipartUploadManager {
    client: Arc<dyn StorageClient>,
}

impl MultipartUploadManager {
    /// Create a manager over `client`.
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }

    /// Run create, part uploads and completion, aborting on failure.
    ///
    /// # Arguments
    /// * `request` - The originating request
    /// * `put` - Object-level API request
    /// * `size` - Object size in bytes
    /// * `config` - Effective multipart configuration
    /// * `body` - Byte source strategy
    pub async fn upload(
        &self,
        request: Arc<UploadRequest>,
        put: &PutObjectRequest,
        size: u64,
        config: &MultipartConfiguration,
        body: Arc<dyn TransferRequestBody>,
    ) -> Result<CompletedUpload, TransferError> {
        let upload_id: String = self
            .client
            .create_multipart_upload(&CreateMultipartUploadRequest::from(put))
            .await
            .map_err(|e| TransferError::storage(Operation::CreateMultipartUpload, e))?;

        log::debug!(
            "Created multipart upload {} for s3://{}/{}",
            upload_id,
            put.bucket,
            put.key
        );

        match self
            .upload_parts_and_complete(request, put, &upload_id, size, config, body)
            .await
        {
            Ok(completed) => Ok(completed),
            Err(err) => {
                log::warn!(
                    "Multipart upload {} for s3://{}/{} failed, aborting: {}",
                    upload_id,
                    put.bucket,
                    put.key,
                    err
                );
                self.abort(put, &upload_id).await;
                Err(err)
            }
        }
    }

    async fn upload_parts_and_complete(
        &self,
        request: Arc<UploadRequest>,
        put: &PutObjectRequest,
        upload_id: &str,
        size: u64,
        config: &MultipartConfiguration,
        body: Arc<dyn TransferRequestBody>,
    ) -> Result<CompletedUpload, TransferError> {
        let contexts: Vec<MultipartUploadContext> =
            compute_parts(size, config.min_part_size_bytes, config.max_part_count)
                .into_iter()
                .map(|part| MultipartUploadContext::new(&request, put, upload_id, part))
                .collect();
        let part_count: u32 = contexts.len() as u32;

        log::debug!(
            "Uploading {} bytes to s3://{}/{} in {} parts",
            size,
            put.bucket,
            put.key,
            part_count
        );

        let table = Arc::new(PartResultTable::new(contexts.len()));
        let operations = contexts.into_iter().map(|context| {
            let client = Arc::clone(&self.client);
            let body = Arc::clone(&body);
            let table = Arc::clone(&table);
            async move {
                let part_number: u32 = context.part_number;
                upload_part(client.as_ref(), body.as_ref(), &context, &table)
                    .await
                    .map_err(|e| TransferError::part_failed(part_number, e))
            }
        });
        join_all_or_cancel(operations).await?;

        let parts = table
            .ordered_parts()
            .ok_or(TransferError::MissingResponseField {
                operation: Operation::UploadPart,
                field: "ETag",
            })?;

        let complete = CompleteMultipartUploadRequest {
            bucket: put.bucket.clone(),
            key: put.key.clone(),
            upload_id: upload_id.to_string(),
            parts,
            sse_customer_algorithm: put.sse_customer_algorithm.clone(),
            sse_customer_key: put.sse_customer_key.clone(),
            sse_customer_key_md5: put.sse_customer_key_md5.clone(),
            expected_bucket_owner: put.expected_bucket_owner.clone(),
            request_payer: put.request_payer.clone(),
        };
        let output: PutObjectOutput = self
            .client
            .complete_multipart_upload(&complete)
            .await
            .map_err(|e| TransferError::storage(Operation::CompleteMultipartUpload, e))?;

        log::debug!("Completed multipart upload {}", upload_id);

        Ok(CompletedUpload {
            e_tag: output.e_tag,
            version_id: output.version_id,
            part_count,
        })
    }

    /// Best-effort cleanup; failure is logged only.
    async fn abort(&self, put: &PutObjectRequest, upload_id: &str) {
        let abort = AbortMultipartUploadRequest {
            bucket: put.bucket.clone(),
            key: put.key.clone(),
            upload_id: upload_id.to_string(),
            expected_bucket_owner: put.expected_bucket_owner.clone(),
            request_payer: put.request_payer.clone(),
        };
        if let Err(e) = self.client.abort_multipart_upload(&abort).await {
            log::warn!("Failed to abort multipart upload {}: {}", upload_id, e);
        }
    }
}

/// Upload one part and record its ETag.
async fn upload_part(
    client: &dyn StorageClient,
    body: &dyn TransferRequestBody,
    context: &MultipartUploadContext,
    table: &PartResultTable,
) -> Result<(), TransferError> {
    let part_body: RequestBody = body.request_body_for_part(context).await?;

    log::trace!(
        "Uploading part {} ({} bytes at offset {})",
        context.part_number,
        context.size,
        context.part_offset
    );

    let e_tag: String = client
        .upload_part(&context.upload_part_request, part_body)
        .await
        .map_err(|e| TransferError::storage(Operation::UploadPart, e))?;

    if !table.record(context.part_number, e_tag) {
        log::warn!("Duplicate result for part {} ignored", context.part_number);
    }
    Ok(())
}

/// Entry point for uploads: picks the single-part or multipart path.
pub struct UploadManager {
    configuration: MultipartConfiguration,
    single_part: Arc<SinglePartUploadManager>,
    multipart: Arc<MultipartUploadManager>,
}

impl UploadManager {
    /// Create a manager with the global upload configuration.
    pub fn new(client: Arc<dyn StorageClient>, configuration: MultipartConfiguration) -> Self {
        Self {
            configuration,
            single_part: Arc::new(SinglePartUploadManager::new(Arc::clone(&client))),
            multipart: Arc::new(MultipartUploadManager::new(client)),
        }
    }

    /// Validate the request and start the upload on the runtime.
    ///
    /// Unsupported specifications, invalid override configuration, unknown
    /// sizes, sizes larger than the body and a missing runtime are reported
    /// here, before any network call. Every later failure surfaces through
    /// the returned handle.
    ///
    /// # Arguments
    /// * `request` - What to upload
    /// * `body` - Byte source strategy
    pub fn upload_object(
        &self,
        request: UploadRequest,
        body: Arc<dyn TransferRequestBody>,
    ) -> Result<UploadHandle, TransferError> {
        let put: PutObjectRequest = request.specification().as_api_request()?.clone();

        let config: MultipartConfiguration = resolve(
            request.override_configuration().and_then(|o| o.upload.as_ref()),
            &self.configuration,
        );
        config.validate()?;

        let size: u64 = match (request.size(), body.content_length()) {
            (Some(size), Some(available)) if size > available => {
                return Err(TransferError::InvalidObjectSize {
                    size: i64::try_from(size).unwrap_or(i64::MAX),
                    reason: format!("exceeds the {} bytes the body provides", available),
                });
            }
            (Some(size), _) => size,
            (None, Some(available)) => available,
            (None, None) => return Err(TransferError::UnknownContentLength),
        };

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| TransferError::NoRuntime)?;

        let request = Arc::new(request);
        let single_part = Arc::clone(&self.single_part);
        let multipart = Arc::clone(&self.multipart);

        let task = runtime.spawn(async move {
            if size > 0 && config.use_multipart(size) {
                multipart.upload(request, &put, size, &config, body).await
            } else {
                single_part.upload(request, &put, size, body.as_ref()).await
            }
        });

        Ok(UploadHandle::new(task))
    }
}
