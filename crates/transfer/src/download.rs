//! Download orchestration.
//!
//! The object size comes from the request or, failing that, a `HeadObject`
//! call. Objects at or above the multipart threshold are fetched as
//! concurrent ranged `GetObject` calls, each written by its own sink;
//! anything else is one plain `GetObject`.

use std::sync::Arc;

use crate::config::{resolve, MultipartConfiguration};
use crate::context::{MultipartDownloadContext, SinglePartDownloadContext};
use crate::error::{Operation, TransferError};
use crate::handle::{CompletedDownload, DownloadHandle};
use crate::join::join_all_or_cancel;
use crate::model::{GetObjectRequest, HeadObjectRequest, ObjectMetadata};
use crate::request::DownloadRequest;
use crate::sizing::compute_parts;
use crate::traits::StorageClient;
use crate::transformer::{ResponseSink, TransferResponseTransformer};

/// Downloads an object with a single `GetObject` call.
pub struct SinglePartDownloadManager {
    client: Arc<dyn StorageClient>,
}

impl SinglePartDownloadManager {
    /// Create a manager over `client`.
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }

    /// Fetch the object as specified by `get`; no range is added.
    ///
    /// # Arguments
    /// * `request` - The originating request
    /// * `get` - Object-level API request
    /// * `size` - Known object size, if any
    /// * `transformer` - Sink strategy
    pub async fn download(
        &self,
        request: Arc<DownloadRequest>,
        get: &GetObjectRequest,
        size: Option<u64>,
        transformer: &dyn TransferResponseTransformer,
    ) -> Result<CompletedDownload, TransferError> {
        let context = SinglePartDownloadContext {
            download_request: request,
        };
        let sink: ResponseSink = transformer.transformer_for_object(&context).await?;

        let response: ObjectMetadata = self
            .client
            .get_object(get, sink)
            .await
            .map_err(|e| TransferError::storage(Operation::GetObject, e))?;

        let object_size: u64 = match size {
            Some(size) => size,
            None => response
                .content_length
                .and_then(|len| u64::try_from(len).ok())
                .unwrap_or(0),
        };

        log::debug!(
            "Downloaded s3://{}/{} in a single part ({} bytes)",
            get.bucket,
            get.key,
            object_size
        );

        Ok(CompletedDownload {
            response,
            object_size,
            part_count: 1,
        })
    }
}

/// Downloads an object as concurrent ranged `GetObject` calls.
pub struct MultipartDownloadManager {
    client: Arc<dyn StorageClient>,
}

impl MultipartDownloadManager {
    /// Create a manager over `client`.
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }

    /// Fetch every part of a `size`-byte object.
    ///
    /// The first failing part cancels the rest and is returned.
    ///
    /// # Arguments
    /// * `request` - The originating request
    /// * `get` - Object-level API request; each part copies it with a range
    /// * `size` - Object size in bytes
    /// * `config` - Effective multipart configuration
    /// * `transformer` - Sink strategy
    pub async fn download(
        &self,
        request: Arc<DownloadRequest>,
        get: &GetObjectRequest,
        size: u64,
        config: &MultipartConfiguration,
        transformer: Arc<dyn TransferResponseTransformer>,
    ) -> Result<CompletedDownload, TransferError> {
        transformer.prepare(size).await?;

        let contexts: Vec<MultipartDownloadContext> =
            compute_parts(size, config.min_part_size_bytes, config.max_part_count)
                .into_iter()
                .map(|part| MultipartDownloadContext::new(&request, get, part))
                .collect();
        let part_count: u32 = contexts.len() as u32;

        log::debug!(
            "Downloading {} bytes from s3://{}/{} in {} parts",
            size,
            get.bucket,
            get.key,
            part_count
        );

        let operations = contexts.into_iter().map(|context| {
            let client = Arc::clone(&self.client);
            let transformer = Arc::clone(&transformer);
            async move {
                let part_number: u32 = context.part_number;
                download_part(client.as_ref(), transformer.as_ref(), &context)
                    .await
                    .map_err(|e| TransferError::part_failed(part_number, e))
            }
        });
        let responses: Vec<ObjectMetadata> = join_all_or_cancel(operations).await?;

        let mut response: ObjectMetadata = responses.into_iter().next().unwrap_or_default();
        response.content_length = i64::try_from(size).ok();
        response.content_range = None;

        Ok(CompletedDownload {
            response,
            object_size: size,
            part_count,
        })
    }
}

async fn download_part(
    client: &dyn StorageClient,
    transformer: &dyn TransferResponseTransformer,
    context: &MultipartDownloadContext,
) -> Result<ObjectMetadata, TransferError> {
    let sink: ResponseSink = transformer.transformer_for_object_part(context).await?;

    log::trace!(
        "Downloading part {} ({} bytes at offset {})",
        context.part_number,
        context.size,
        context.part_offset
    );

    client
        .get_object(&context.part_download_specification, sink)
        .await
        .map_err(|e| TransferError::storage(Operation::GetObject, e))
}

/// Entry point for downloads: discovers the size and picks a path.
pub struct DownloadManager {
    client: Arc<dyn StorageClient>,
    configuration: MultipartConfiguration,
    single_part: Arc<SinglePartDownloadManager>,
    multipart: Arc<MultipartDownloadManager>,
}

impl DownloadManager {
    /// Create a manager with the global download configuration.
    pub fn new(client: Arc<dyn StorageClient>, configuration: MultipartConfiguration) -> Self {
        Self {
            configuration,
            single_part: Arc::new(SinglePartDownloadManager::new(Arc::clone(&client))),
            multipart: Arc::new(MultipartDownloadManager::new(Arc::clone(&client))),
            client,
        }
    }

    /// Validate the request and start the download on the runtime.
    ///
    /// Unsupported specifications, invalid override configuration and a
    /// missing runtime are reported here. Every later failure, including a
    /// failed size lookup, surfaces through the returned handle.
    ///
    /// # Arguments
    /// * `request` - What to download
    /// * `transformer` - Sink strategy
    pub fn download_object(
        &self,
        request: DownloadRequest,
        transformer: Arc<dyn TransferResponseTransformer>,
    ) -> Result<DownloadHandle, TransferError> {
        let get: GetObjectRequest = request.specification().as_api_request()?.clone();

        let config: MultipartConfiguration = resolve(
            request.override_configuration().and_then(|o| o.download.as_ref()),
            &self.configuration,
        );
        config.validate()?;

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| TransferError::NoRuntime)?;

        let request = Arc::new(request);
        let client = Arc::clone(&self.client);
        let single_part = Arc::clone(&self.single_part);
        let multipart = Arc::clone(&self.multipart);

        let task = runtime.spawn(async move {
            // A caller-chosen range or part is fetched exactly as asked.
            if get.range.is_some() || get.part_number.is_some() {
                return single_part
                    .download(request, &get, None, transformer.as_ref())
                    .await;
            }

            let size: u64 = match request.size() {
                Some(size) => size,
                None => object_size(client.as_ref(), &get).await?,
            };

            if size > 0 && config.use_multipart(size) {
                multipart.download(request, &get, size, &config, transformer).await
            } else {
                single_part
                    .download(request, &get, Some(size), transformer.as_ref())
                    .await
            }
        });

        Ok(DownloadHandle::new(task))
    }
}

/// Discover the object size with `HeadObject`.
async fn object_size(
    client: &dyn StorageClient,
    get: &GetObjectRequest,
) -> Result<u64, TransferError> {
    let metadata: ObjectMetadata = client
        .head_object(&HeadObjectRequest::from(get))
        .await
        .map_err(|e| TransferError::storage(Operation::HeadObject, e))?;

    let length: i64 = metadata.content_length.ok_or(TransferError::MissingResponseField {
        operation: Operation::HeadObject,
        field: "ContentLength",
    })?;

    u64::try_from(length).map_err(|_| TransferError::InvalidObjectSize {
        size: length,
        reason: "HeadObject reported a negative content length".to_string(),
    })
}
