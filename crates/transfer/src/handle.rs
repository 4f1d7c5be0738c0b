//! Handles to transfers running on the async runtime.

use tokio::task::JoinHandle;

use crate::error::TransferError;
use crate::model::ObjectMetadata;

/// Outcome of a finished upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedUpload {
    /// ETag of the stored object.
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
    /// 1 for a single-part upload.
    pub part_count: u32,
}

/// Outcome of a finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedDownload {
    /// Response metadata. For a multipart download this is the first part's
    /// response with `content_length` set to the whole object size.
    pub response: ObjectMetadata,
    /// Bytes delivered to the sink(s).
    pub object_size: u64,
    /// 1 for a single-part download.
    pub part_count: u32,
}

/// Handle to an in-flight transfer.
///
/// Dropping the handle detaches the transfer; it keeps running to completion.
#[derive(Debug)]
pub struct TransferHandle<T> {
    task: JoinHandle<Result<T, TransferError>>,
}

/// Handle to an in-flight upload.
pub type UploadHandle = TransferHandle<CompletedUpload>;

/// Handle to an in-flight download.
pub type DownloadHandle = TransferHandle<CompletedDownload>;

impl<T> TransferHandle<T> {
    pub(crate) fn new(task: JoinHandle<Result<T, TransferError>>) -> Self {
        Self { task }
    }

    /// Wait for the transfer to finish.
    ///
    /// # Returns
    /// The transfer result, or `TransferError::Cancelled` / `TaskFailed` when
    /// the task did not run to completion.
    pub async fn completion(self) -> Result<T, TransferError> {
        self.task.await?
    }

    /// Whether the transfer has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Pausing is not supported.
    pub fn pause(&self) -> Result<(), TransferError> {
        Err(TransferError::Unsupported { operation: "pause" })
    }

    /// Cancel the transfer. `completion` then reports `Cancelled`.
    ///
    /// A multipart upload cancelled this way is not aborted on the service.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn done_upload() -> CompletedUpload {
        CompletedUpload {
            e_tag: Some("\"etag\"".to_string()),
            version_id: None,
            part_count: 1,
        }
    }

    #[tokio::test]
    async fn test_completion_returns_result() {
        let handle = UploadHandle::new(tokio::spawn(async { Ok(done_upload()) }));
        assert_eq!(handle.completion().await.unwrap(), done_upload());
    }

    #[tokio::test]
    async fn test_completion_propagates_error() {
        let handle: UploadHandle =
            TransferHandle::new(tokio::spawn(async { Err(TransferError::UnknownContentLength) }));
        assert!(matches!(
            handle.completion().await,
            Err(TransferError::UnknownContentLength)
        ));
    }

    #[tokio::test]
    async fn test_pause_unsupported() {
        let handle = UploadHandle::new(tokio::spawn(async { Ok(done_upload()) }));
        assert!(matches!(
            handle.pause(),
            Err(TransferError::Unsupported { operation: "pause" })
        ));
        // The transfer is unaffected.
        assert!(handle.completion().await.is_ok());
    }

    #[tokio::test]
    async fn test_cancel_reports_cancelled() {
        let handle = UploadHandle::new(tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            Ok(done_upload())
        }));
        handle.cancel();
        assert!(matches!(handle.completion().await, Err(TransferError::Cancelled)));
    }
}
