//! Public transfer entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::body::{FileRequestBody, TransferRequestBody};
use crate::config::TransferManagerConfiguration;
use crate::download::DownloadManager;
use crate::error::TransferError;
use crate::handle::{DownloadHandle, UploadHandle};
use crate::request::{DownloadRequest, UploadRequest};
use crate::traits::StorageClient;
use crate::transformer::{FileResponseTransformer, TransferResponseTransformer};
use crate::upload::UploadManager;

/// Uploads and downloads objects through a [`StorageClient`].
///
/// Every transfer runs as a task on the current Tokio runtime and is tracked
/// through the returned handle.
pub struct TransferManager {
    client: Arc<dyn StorageClient>,
    configuration: TransferManagerConfiguration,
    uploads: UploadManager,
    downloads: DownloadManager,
}

impl TransferManager {
    /// Start building a manager.
    pub fn builder() -> TransferManagerBuilder {
        TransferManagerBuilder::default()
    }

    /// Create a manager with the default configuration.
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self::from_parts(client, TransferManagerConfiguration::default())
    }

    fn from_parts(
        client: Arc<dyn StorageClient>,
        configuration: TransferManagerConfiguration,
    ) -> Self {
        Self {
            uploads: UploadManager::new(Arc::clone(&client), configuration.upload),
            downloads: DownloadManager::new(Arc::clone(&client), configuration.download),
            client,
            configuration,
        }
    }

    /// The storage client transfers run against.
    pub fn client(&self) -> &Arc<dyn StorageClient> {
        &self.client
    }

    /// Global configuration applied when a request carries no override.
    pub fn configuration(&self) -> &TransferManagerConfiguration {
        &self.configuration
    }

    /// Start an upload.
    ///
    /// # Arguments
    /// * `request` - Target object, optional size and override configuration
    /// * `body` - Byte source for the object
    ///
    /// # Returns
    /// A handle to the running upload, or an error when the request is
    /// rejected before any network call.
    pub fn upload_object(
        &self,
        request: UploadRequest,
        body: impl TransferRequestBody + 'static,
    ) -> Result<UploadHandle, TransferError> {
        self.uploads.upload_object(request, Arc::new(body))
    }

    /// Start a download.
    ///
    /// # Arguments
    /// * `request` - Source object, optional size and override configuration
    /// * `transformer` - Sink strategy for the object bytes
    pub fn download_object(
        &self,
        request: DownloadRequest,
        transformer: impl TransferResponseTransformer + 'static,
    ) -> Result<DownloadHandle, TransferError> {
        self.downloads.download_object(request, Arc::new(transformer))
    }

    /// Upload a local file.
    pub async fn upload_file(
        &self,
        request: UploadRequest,
        path: impl AsRef<Path>,
    ) -> Result<UploadHandle, TransferError> {
        let body: FileRequestBody = FileRequestBody::from_path(path).await?;
        self.upload_object(request, body)
    }

    /// Download an object into a local file, creating parent directories.
    pub fn download_file(
        &self,
        request: DownloadRequest,
        path: impl Into<PathBuf>,
    ) -> Result<DownloadHandle, TransferError> {
        self.download_object(request, FileResponseTransformer::new(path))
    }
}

/// Builder for [`TransferManager`].
#[derive(Default)]
pub struct TransferManagerBuilder {
    client: Option<Arc<dyn StorageClient>>,
    configuration: TransferManagerConfiguration,
}

impl TransferManagerBuilder {
    /// Set the storage client (required).
    pub fn client(mut self, client: Arc<dyn StorageClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the global configuration.
    pub fn configuration(mut self, configuration: TransferManagerConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Validate the configuration and build the manager.
    pub fn build(self) -> Result<TransferManager, TransferError> {
        let client: Arc<dyn StorageClient> =
            self.client.ok_or_else(|| TransferError::InvalidConfig {
                message: "a storage client is required".to_string(),
            })?;
        self.configuration.validate()?;
        Ok(TransferManager::from_parts(client, self.configuration))
    }
}
