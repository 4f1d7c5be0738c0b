//! Byte sources for uploads.
//!
//! A [`TransferRequestBody`] hands out one [`RequestBody`] per part (or one
//! for the whole object on the single-part path). Calls for different parts
//! may run concurrently and in any order.

use std::fmt;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};

use crate::constants::MAX_BODY_PREALLOCATION;
use crate::context::{MultipartUploadContext, SinglePartUploadContext};
use crate::error::TransferError;

/// A sized byte stream sent as the body of one upload call.
pub struct RequestBody {
    content_length: u64,
    reader: Pin<Box<dyn AsyncRead + Send>>,
}

impl RequestBody {
    /// Wrap a reader that yields exactly `content_length` bytes.
    pub fn new(content_length: u64, reader: impl AsyncRead + Send + 'static) -> Self {
        Self {
            content_length,
            reader: Box::pin(reader),
        }
    }

    /// Body backed by in-memory bytes.
    pub fn from_bytes(data: Bytes) -> Self {
        let content_length: u64 = data.len() as u64;
        Self::new(content_length, std::io::Cursor::new(data))
    }

    /// Number of bytes in this body.
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Take the underlying reader.
    pub fn into_reader(self) -> Pin<Box<dyn AsyncRead + Send>> {
        self.reader
    }

    /// Read the whole body into memory.
    ///
    /// The declared length only sizes the initial reservation, capped at
    /// [`MAX_BODY_PREALLOCATION`]; the result holds what the reader yields.
    pub async fn collect(mut self) -> std::io::Result<Vec<u8>> {
        let reserve: u64 = self.content_length.min(MAX_BODY_PREALLOCATION);
        let mut buffer: Vec<u8> = Vec::with_capacity(reserve as usize);
        self.reader.read_to_end(&mut buffer).await?;
        Ok(buffer)
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBody")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Strategy producing upload bodies.
#[async_trait]
pub trait TransferRequestBody: Send + Sync {
    /// Total object length, or `None` if the source cannot report it.
    fn content_length(&self) -> Option<u64>;

    /// Body covering `[part_offset, part_offset + size)` of the object.
    async fn request_body_for_part(
        &self,
        context: &MultipartUploadContext,
    ) -> Result<RequestBody, TransferError>;

    /// Body covering the entire object.
    async fn request_body_for_object(
        &self,
        context: &SinglePartUploadContext,
    ) -> Result<RequestBody, TransferError>;
}

/// Upload source reading from a local file.
#[derive(Debug, Clone)]
pub struct FileRequestBody {
    path: PathBuf,
    content_length: u64,
}

impl FileRequestBody {
    /// Create a source for the file at `path`, reading its length from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, TransferError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| TransferError::from_io(path.display().to_string(), e))?;
        Ok(Self {
            path,
            content_length: metadata.len(),
        })
    }

    /// Path of the source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open_range(&self, offset: u64, length: u64) -> Result<RequestBody, TransferError> {
        let display: String = self.path.display().to_string();
        let mut file = tokio::fs::File::open(&self.path)
            .await
            .map_err(|e| TransferError::from_io(display.clone(), e))?;
        file.seek(SeekFrom::Start(offset))
            .await
            .map_err(|e| TransferError::from_io(display, e))?;
        Ok(RequestBody::new(length, file.take(length)))
    }
}

#[async_trait]
impl TransferRequestBody for FileRequestBody {
    fn content_length(&self) -> Option<u64> {
        Some(self.content_length)
    }

    async fn request_body_for_part(
        &self,
        context: &MultipartUploadContext,
    ) -> Result<RequestBody, TransferError> {
        self.open_range(context.part_offset, context.size).await
    }

    async fn request_body_for_object(
        &self,
        context: &SinglePartUploadContext,
    ) -> Result<RequestBody, TransferError> {
        self.open_range(0, context.size).await
    }
}

/// Upload source over in-memory bytes.
#[derive(Debug, Clone)]
pub struct BytesRequestBody {
    data: Bytes,
}

impl BytesRequestBody {
    /// Create a source over `data`.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    fn slice(&self, offset: u64, length: u64) -> Result<RequestBody, TransferError> {
        let end: u64 = offset + length;
        if end > self.data.len() as u64 {
            return Err(TransferError::Io {
                path: "<memory>".to_string(),
                message: format!(
                    "range {}..{} exceeds body length {}",
                    offset,
                    end,
                    self.data.len()
                ),
            });
        }
        Ok(RequestBody::from_bytes(
            self.data.slice(offset as usize..end as usize),
        ))
    }
}

#[async_trait]
impl TransferRequestBody for BytesRequestBody {
    fn content_length(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }

    async fn request_body_for_part(
        &self,
        context: &MultipartUploadContext,
    ) -> Result<RequestBody, TransferError> {
        self.slice(context.part_offset, context.size)
    }

    async fn request_body_for_object(
        &self,
        context: &SinglePartUploadContext,
    ) -> Result<RequestBody, TransferError> {
        self.slice(0, context.size)
    }
}
