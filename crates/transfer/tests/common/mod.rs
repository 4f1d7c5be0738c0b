//! In-memory storage client shared by the integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use rusty_transfer::{
    AbortMultipartUploadRequest, CompleteMultipartUploadRequest, CreateMultipartUploadRequest,
    GetObjectRequest, HeadObjectRequest, MultipartConfiguration, ObjectMetadata, PutObjectOutput,
    PutObjectRequest, RequestBody, ResponseSink, StorageClient, StorageError, TransferManager,
    TransferManagerConfiguration, UploadPartRequest,
};

/// One recorded client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    HeadObject { key: String },
    GetObject { key: String, range: Option<String> },
    PutObject { key: String, content_length: u64 },
    CreateMultipartUpload { key: String },
    UploadPart { upload_id: String, part_number: u32, content_length: u64 },
    CompleteMultipartUpload { upload_id: String, part_numbers: Vec<u32> },
    AbortMultipartUpload { upload_id: String },
}

#[derive(Debug, Default)]
struct Failures {
    head_object: Option<StorageError>,
    head_without_length: bool,
    get_object_at_offset: Option<u64>,
    upload_part: Option<u32>,
    upload_part_after_successes: usize,
    complete: bool,
    abort: bool,
}

#[derive(Debug)]
struct PendingUpload {
    key: String,
    parts: BTreeMap<u32, Vec<u8>>,
}

/// Object store held in memory that records every call it receives.
#[derive(Default)]
pub struct MockStorageClient {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    uploads: Mutex<HashMap<String, PendingUpload>>,
    calls: Mutex<Vec<Call>>,
    stored_parts: Mutex<Vec<u32>>,
    failures: Mutex<Failures>,
    next_upload_id: AtomicU32,
}

impl MockStorageClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_object(self: Arc<Self>, key: &str, data: Vec<u8>) -> Arc<Self> {
        self.objects.lock().unwrap().insert(key.to_string(), data);
        self
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    pub fn get_ranges(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::GetObject { range, .. } => Some(range),
                _ => None,
            })
            .collect()
    }

    pub fn fail_head_object(&self, error: StorageError) {
        self.failures.lock().unwrap().head_object = Some(error);
    }

    pub fn omit_head_content_length(&self) {
        self.failures.lock().unwrap().head_without_length = true;
    }

    pub fn fail_get_object_at_offset(&self, offset: u64) {
        self.failures.lock().unwrap().get_object_at_offset = Some(offset);
    }

    pub fn fail_upload_part(&self, part_number: u32) {
        self.failures.lock().unwrap().upload_part = Some(part_number);
    }

    /// Fail `part_number` only once `successes` other parts have been stored.
    pub fn fail_upload_part_after(&self, part_number: u32, successes: usize) {
        let mut failures = self.failures.lock().unwrap();
        failures.upload_part = Some(part_number);
        failures.upload_part_after_successes = successes;
    }

    /// Part numbers stored successfully, in completion order.
    pub fn stored_parts(&self) -> Vec<u32> {
        self.stored_parts.lock().unwrap().clone()
    }

    pub fn fail_complete(&self) {
        self.failures.lock().unwrap().complete = true;
    }

    pub fn fail_abort(&self) {
        self.failures.lock().unwrap().abort = true;
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn injected(message: &str) -> StorageError {
        StorageError::NetworkError {
            message: message.to_string(),
            retryable: false,
        }
    }
}

/// Parse `bytes=a-b` into an inclusive range.
fn parse_range(range: &str) -> (u64, u64) {
    let (start, end) = range
        .strip_prefix("bytes=")
        .and_then(|r| r.split_once('-'))
        .expect("malformed range");
    (start.parse().unwrap(), end.parse().unwrap())
}

#[async_trait]
impl StorageClient for MockStorageClient {
    async fn head_object(
        &self,
        request: &HeadObjectRequest,
    ) -> Result<ObjectMetadata, StorageError> {
        self.record(Call::HeadObject {
            key: request.key.clone(),
        });
        let (failure, without_length) = {
            let failures = self.failures.lock().unwrap();
            (failures.head_object.clone(), failures.head_without_length)
        };
        if let Some(err) = failure {
            return Err(err);
        }
        let len: usize = self
            .object(&request.key)
            .ok_or_else(|| StorageError::NotFound {
                bucket: request.bucket.clone(),
                key: request.key.clone(),
            })?
            .len();
        Ok(ObjectMetadata {
            content_length: if without_length { None } else { Some(len as i64) },
            e_tag: Some("\"mock\"".to_string()),
            ..Default::default()
        })
    }

    async fn get_object(
        &self,
        request: &GetObjectRequest,
        mut sink: ResponseSink,
    ) -> Result<ObjectMetadata, StorageError> {
        self.record(Call::GetObject {
            key: request.key.clone(),
            range: request.range.clone(),
        });
        let data: Vec<u8> = self.object(&request.key).ok_or_else(|| StorageError::NotFound {
            bucket: request.bucket.clone(),
            key: request.key.clone(),
        })?;

        let (start, end) = match &request.range {
            Some(range) => parse_range(range),
            None => (0, (data.len() as u64).saturating_sub(1)),
        };
        if self.failures.lock().unwrap().get_object_at_offset == Some(start) {
            return Err(Self::injected("injected GetObject failure"));
        }
        let body: &[u8] = if data.is_empty() {
            &[]
        } else {
            &data[start as usize..=end as usize]
        };

        sink.write_all(body).await?;
        sink.shutdown().await?;

        Ok(ObjectMetadata {
            content_length: Some(body.len() as i64),
            content_range: request
                .range
                .as_ref()
                .map(|_| format!("bytes {}-{}/{}", start, end, data.len())),
            e_tag: Some("\"mock\"".to_string()),
            ..Default::default()
        })
    }

    async fn put_object(
        &self,
        request: &PutObjectRequest,
        body: RequestBody,
    ) -> Result<PutObjectOutput, StorageError> {
        let content_length: u64 = body.content_length();
        self.record(Call::PutObject {
            key: request.key.clone(),
            content_length,
        });
        let data: Vec<u8> = body.collect().await?;
        assert_eq!(data.len() as u64, content_length);
        self.objects.lock().unwrap().insert(request.key.clone(), data);
        Ok(PutObjectOutput {
            e_tag: Some("\"single\"".to_string()),
            version_id: None,
        })
    }

    async fn create_multipart_upload(
        &self,
        request: &CreateMultipartUploadRequest,
    ) -> Result<String, StorageError> {
        self.record(Call::CreateMultipartUpload {
            key: request.key.clone(),
        });
        let upload_id = format!("upload-{}", self.next_upload_id.fetch_add(1, Ordering::SeqCst));
        self.uploads.lock().unwrap().insert(
            upload_id.clone(),
            PendingUpload {
                key: request.key.clone(),
                parts: BTreeMap::new(),
            },
        );
        Ok(upload_id)
    }

    async fn upload_part(
        &self,
        request: &UploadPartRequest,
        body: RequestBody,
    ) -> Result<String, StorageError> {
        self.record(Call::UploadPart {
            upload_id: request.upload_id.clone(),
            part_number: request.part_number,
            content_length: request.content_length,
        });
        let (failing_part, wait_for) = {
            let failures = self.failures.lock().unwrap();
            (failures.upload_part, failures.upload_part_after_successes)
        };
        if failing_part == Some(request.part_number) {
            for _ in 0..5_000 {
                if self.stored_parts.lock().unwrap().len() >= wait_for {
                    break;
                }
                tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            }
            return Err(Self::injected("injected UploadPart failure"));
        }
        let data: Vec<u8> = body.collect().await?;
        assert_eq!(data.len() as u64, request.content_length);
        let mut uploads = self.uploads.lock().unwrap();
        let pending = uploads.get_mut(&request.upload_id).ok_or_else(|| StorageError::Other {
            message: format!("no such upload {}", request.upload_id),
        })?;
        pending.parts.insert(request.part_number, data);
        drop(uploads);
        self.stored_parts.lock().unwrap().push(request.part_number);
        Ok(format!("\"etag-{}\"", request.part_number))
    }

    async fn complete_multipart_upload(
        &self,
        request: &CompleteMultipartUploadRequest,
    ) -> Result<PutObjectOutput, StorageError> {
        self.record(Call::CompleteMultipartUpload {
            upload_id: request.upload_id.clone(),
            part_numbers: request.parts.iter().map(|p| p.part_number).collect(),
        });
        if self.failures.lock().unwrap().complete {
            return Err(Self::injected("injected CompleteMultipartUpload failure"));
        }
        let pending = self
            .uploads
            .lock()
            .unwrap()
            .remove(&request.upload_id)
            .ok_or_else(|| StorageError::Other {
                message: format!("no such upload {}", request.upload_id),
            })?;
        let mut data: Vec<u8> = Vec::new();
        for part in &request.parts {
            assert_eq!(part.e_tag, format!("\"etag-{}\"", part.part_number));
            data.extend_from_slice(&pending.parts[&part.part_number]);
        }
        self.objects.lock().unwrap().insert(pending.key, data);
        Ok(PutObjectOutput {
            e_tag: Some("\"multipart\"".to_string()),
            version_id: Some("v1".to_string()),
        })
    }

    async fn abort_multipart_upload(
        &self,
        request: &AbortMultipartUploadRequest,
    ) -> Result<(), StorageError> {
        self.record(Call::AbortMultipartUpload {
            upload_id: request.upload_id.clone(),
        });
        if self.failures.lock().unwrap().abort {
            return Err(Self::injected("injected AbortMultipartUpload failure"));
        }
        self.uploads.lock().unwrap().remove(&request.upload_id);
        Ok(())
    }
}

/// Deterministic test payload.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Multipart policy with byte-sized thresholds for small payloads.
pub fn small_parts(threshold: u64, min_part_size: u64) -> MultipartConfiguration {
    MultipartConfiguration::default()
        .with_threshold(threshold)
        .with_min_part_size(min_part_size)
}

pub fn manager(
    client: &Arc<MockStorageClient>,
    configuration: TransferManagerConfiguration,
) -> TransferManager {
    TransferManager::builder()
        .client(client.clone())
        .configuration(configuration)
        .build()
        .unwrap()
}
