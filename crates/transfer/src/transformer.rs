//! Byte sinks for downloads.
//!
//! A [`TransferResponseTransformer`] hands out one [`ResponseSink`] per
//! ranged part (or one for the whole object). Part sinks cover disjoint
//! byte ranges of the destination, so no coordination between them is
//! needed.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::{AsyncSeekExt, AsyncWrite};

use crate::context::{MultipartDownloadContext, SinglePartDownloadContext};
use crate::error::TransferError;

/// Destination the storage client streams a `GetObject` body into.
pub type ResponseSink = Pin<Box<dyn AsyncWrite + Send>>;

/// Strategy producing download sinks.
#[async_trait]
pub trait TransferResponseTransformer: Send + Sync {
    /// Called once before part sinks are requested on the multipart path.
    ///
    /// # Arguments
    /// * `object_size` - Total size of the object being downloaded
    async fn prepare(&self, _object_size: u64) -> Result<(), TransferError> {
        Ok(())
    }

    /// Sink writing `[part_offset, part_offset + size)` of the destination.
    async fn transformer_for_object_part(
        &self,
        context: &MultipartDownloadContext,
    ) -> Result<ResponseSink, TransferError>;

    /// Sink for the entire object.
    async fn transformer_for_object(
        &self,
        context: &SinglePartDownloadContext,
    ) -> Result<ResponseSink, TransferError>;
}

/// Download destination on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileResponseTransformer {
    path: PathBuf,
}

impl FileResponseTransformer {
    /// Write downloads to `path`, creating parent directories as needed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }

    async fn create_parent_dirs(&self) -> Result<(), TransferError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TransferError::from_io(parent.display().to_string(), e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl TransferResponseTransformer for FileResponseTransformer {
    async fn prepare(&self, object_size: u64) -> Result<(), TransferError> {
        self.create_parent_dirs().await?;
        let file = tokio::fs::File::create(&self.path)
            .await
            .map_err(|e| TransferError::from_io(self.display(), e))?;
        file.set_len(object_size)
            .await
            .map_err(|e| TransferError::from_io(self.display(), e))?;
        Ok(())
    }

    async fn transformer_for_object_part(
        &self,
        context: &MultipartDownloadContext,
    ) -> Result<ResponseSink, TransferError> {
        // Open without truncating so sibling parts keep their bytes
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await
            .map_err(|e| TransferError::from_io(self.display(), e))?;

        file.seek(SeekFrom::Start(context.part_offset))
            .await
            .map_err(|e| TransferError::from_io(self.display(), e))?;

        Ok(Box::pin(file))
    }

    async fn transformer_for_object(
        &self,
        _context: &SinglePartDownloadContext,
    ) -> Result<ResponseSink, TransferError> {
        self.create_parent_dirs().await?;
        let file = tokio::fs::File::create(&self.path)
            .await
            .map_err(|e| TransferError::from_io(self.display(), e))?;
        Ok(Box::pin(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::io::AsyncWriteExt;

    use crate::model::GetObjectRequest;
    use crate::request::DownloadRequest;
    use crate::sizing::compute_parts;

    #[tokio::test]
    async fn test_part_writes_land_at_offsets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.bin");
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();

        let transformer = FileResponseTransformer::new(&path);
        transformer.prepare(1000).await.unwrap();

        let request = Arc::new(DownloadRequest::for_bucket_and_key("bucket", "key"));
        let get = GetObjectRequest::new("bucket", "key");
        let contexts: Vec<MultipartDownloadContext> = compute_parts(1000, 300, 10_000)
            .into_iter()
            .map(|part| MultipartDownloadContext::new(&request, &get, part))
            .collect();

        // Write parts in reverse to show arrival order does not matter
        for context in contexts.iter().rev() {
            let mut sink = transformer.transformer_for_object_part(context).await.unwrap();
            let start: usize = context.part_offset as usize;
            let end: usize = start + context.size as usize;
            sink.write_all(&data[start..end]).await.unwrap();
            sink.shutdown().await.unwrap();
        }

        assert_eq!(std::fs::read(&path).unwrap(), data);
    }

    #[tokio::test]
    async fn test_whole_object_truncates_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, b"previous longer content").unwrap();

        let transformer = FileResponseTransformer::new(&path);
        let context = SinglePartDownloadContext {
            download_request: Arc::new(DownloadRequest::for_bucket_and_key("bucket", "key")),
        };
        let mut sink = transformer.transformer_for_object(&context).await.unwrap();
        sink.write_all(b"new").await.unwrap();
        sink.shutdown().await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
