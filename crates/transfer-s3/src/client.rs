//! AWS SDK S3 client implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::{ByteStream, DateTime};
use aws_sdk_s3::types::{
    ChecksumMode, CompletedMultipartUpload, CompletedPart, RequestPayer, ServerSideEncryption,
    StorageClass,
};
use aws_sdk_s3::Client as S3Client;
use tokio::io::AsyncWriteExt;

use rusty_transfer::{
    AbortMultipartUploadRequest, CompleteMultipartUploadRequest, CreateMultipartUploadRequest,
    GetObjectRequest, HeadObjectRequest, ObjectMetadata, PutObjectOutput, PutObjectRequest,
    RequestBody, ResponseSink, StorageClient, StorageError, UploadPartRequest,
};

use crate::error::{from_sdk_error, S3Error};
use crate::settings::StorageSettings;

/// StorageClient implementation using AWS SDK for Rust.
///
/// Retries are delegated to the SDK's standard retry strategy.
pub struct S3StorageClient {
    /// The underlying S3 client.
    s3_client: S3Client,
    /// Used when a request does not carry its own expected owner.
    expected_bucket_owner: Option<String>,
}

impl S3StorageClient {
    /// Create a new client from settings, falling back to the default
    /// credential chain when no static credentials are given.
    ///
    /// # Arguments
    /// * `settings` - Region, credentials, endpoint and retry settings
    pub async fn new(settings: StorageSettings) -> Result<Self, StorageError> {
        if settings.max_attempts == 0 {
            return Err(S3Error::ConfigError("max_attempts must be at least 1".to_string()).into());
        }

        let config_loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(settings.region.clone()))
            .retry_config(RetryConfig::standard().with_max_attempts(settings.max_attempts));

        let config_loader = if let Some(ref creds) = settings.credentials {
            let credentials = Credentials::new(
                &creds.access_key_id,
                &creds.secret_access_key,
                creds.session_token.clone(),
                None,
                "rusty-transfer",
            );
            config_loader.credentials_provider(credentials)
        } else {
            config_loader
        };

        let config_loader = match settings.endpoint_url {
            Some(ref url) => config_loader.endpoint_url(url),
            None => config_loader,
        };

        let sdk_config = config_loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(settings.force_path_style)
            .build();

        log::debug!(
            "Created S3 client for region {} (endpoint: {:?})",
            settings.region,
            settings.endpoint_url
        );

        Ok(Self {
            s3_client: S3Client::from_conf(s3_config),
            expected_bucket_owner: settings.expected_bucket_owner,
        })
    }

    /// Wrap an existing S3 client.
    ///
    /// # Arguments
    /// * `s3_client` - Pre-configured S3 client
    /// * `expected_bucket_owner` - Optional default expected bucket owner
    pub fn from_client(s3_client: S3Client, expected_bucket_owner: Option<String>) -> Self {
        Self {
            s3_client,
            expected_bucket_owner,
        }
    }

    fn owner(&self, requested: &Option<String>) -> Option<String> {
        requested.clone().or_else(|| self.expected_bucket_owner.clone())
    }
}

fn payer(value: &Option<String>) -> Option<RequestPayer> {
    value.as_deref().map(RequestPayer::from)
}

fn timestamp(secs: Option<i64>) -> Option<DateTime> {
    secs.map(DateTime::from_secs)
}

fn non_empty(metadata: &HashMap<String, String>) -> Option<HashMap<String, String>> {
    if metadata.is_empty() {
        None
    } else {
        Some(metadata.clone())
    }
}

fn part_number_i32(part_number: u32) -> Result<i32, StorageError> {
    i32::try_from(part_number).map_err(|_| StorageError::InvalidConfig {
        message: format!("part number {} out of range", part_number),
    })
}

fn length_i64(length: u64) -> Result<i64, StorageError> {
    i64::try_from(length).map_err(|_| StorageError::InvalidConfig {
        message: format!("content length {} out of range", length),
    })
}

/// Buffer a body, rejecting one that yields a different length than declared.
async fn into_byte_stream(body: RequestBody) -> Result<ByteStream, StorageError> {
    let declared: u64 = body.content_length();
    let data: Vec<u8> = body.collect().await?;
    if data.len() as u64 != declared {
        return Err(StorageError::IoError {
            path: String::new(),
            message: format!("body yielded {} bytes, declared {}", data.len(), declared),
        });
    }
    Ok(ByteStream::from(data))
}

#[async_trait]
impl StorageClient for S3StorageClient {
    async fn head_object(
        &self,
        request: &HeadObjectRequest,
    ) -> Result<ObjectMetadata, StorageError> {
        let part_number: Option<i32> = request.part_number.map(part_number_i32).transpose()?;

        let output = self
            .s3_client
            .head_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_part_number(part_number)
            .set_version_id(request.version_id.clone())
            .set_if_match(request.if_match.clone())
            .set_if_none_match(request.if_none_match.clone())
            .set_if_modified_since(timestamp(request.if_modified_since))
            .set_if_unmodified_since(timestamp(request.if_unmodified_since))
            .set_sse_customer_algorithm(request.sse_customer_algorithm.clone())
            .set_sse_customer_key(request.sse_customer_key.clone())
            .set_sse_customer_key_md5(request.sse_customer_key_md5.clone())
            .set_expected_bucket_owner(self.owner(&request.expected_bucket_owner))
            .set_request_payer(payer(&request.request_payer))
            .set_checksum_mode(request.checksum_mode.as_deref().map(ChecksumMode::from))
            .send()
            .await
            .map_err(|err| from_sdk_error(err, &request.bucket, &request.key))?;

        Ok(ObjectMetadata {
            content_length: output.content_length(),
            content_range: None,
            content_type: output.content_type().map(|s| s.to_string()),
            e_tag: output.e_tag().map(|s| s.to_string()),
            version_id: output.version_id().map(|s| s.to_string()),
            last_modified: output.last_modified().map(|dt| dt.secs()),
            metadata: output.metadata().cloned().unwrap_or_default(),
        })
    }

    async fn get_object(
        &self,
        request: &GetObjectRequest,
        mut sink: ResponseSink,
    ) -> Result<ObjectMetadata, StorageError> {
        let part_number: Option<i32> = request.part_number.map(part_number_i32).transpose()?;

        let response = self
            .s3_client
            .get_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_range(request.range.clone())
            .set_part_number(part_number)
            .set_version_id(request.version_id.clone())
            .set_if_match(request.if_match.clone())
            .set_if_none_match(request.if_none_match.clone())
            .set_if_modified_since(timestamp(request.if_modified_since))
            .set_if_unmodified_since(timestamp(request.if_unmodified_since))
            .set_sse_customer_algorithm(request.sse_customer_algorithm.clone())
            .set_sse_customer_key(request.sse_customer_key.clone())
            .set_sse_customer_key_md5(request.sse_customer_key_md5.clone())
            .set_expected_bucket_owner(self.owner(&request.expected_bucket_owner))
            .set_request_payer(payer(&request.request_payer))
            .set_checksum_mode(request.checksum_mode.as_deref().map(ChecksumMode::from))
            .send()
            .await
            .map_err(|err| from_sdk_error(err, &request.bucket, &request.key))?;

        let metadata = ObjectMetadata {
            content_length: response.content_length(),
            content_range: response.content_range().map(|s| s.to_string()),
            content_type: response.content_type().map(|s| s.to_string()),
            e_tag: response.e_tag().map(|s| s.to_string()),
            version_id: response.version_id().map(|s| s.to_string()),
            last_modified: response.last_modified().map(|dt| dt.secs()),
            metadata: response.metadata().cloned().unwrap_or_default(),
        };

        let mut body = response.body;
        while let Some(chunk) = body.try_next().await.map_err(|e| StorageError::NetworkError {
            message: e.to_string(),
            retryable: true,
        })? {
            sink.write_all(&chunk).await?;
        }
        sink.shutdown().await?;

        Ok(metadata)
    }

    async fn put_object(
        &self,
        request: &PutObjectRequest,
        body: RequestBody,
    ) -> Result<PutObjectOutput, StorageError> {
        let content_length: i64 = length_i64(body.content_length())?;
        let body: ByteStream = into_byte_stream(body).await?;

        let output = self
            .s3_client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .content_length(content_length)
            .body(body)
            .set_content_type(request.content_type.clone())
            .set_content_encoding(request.content_encoding.clone())
            .set_cache_control(request.cache_control.clone())
            .set_metadata(non_empty(&request.metadata))
            .set_server_side_encryption(
                request
                    .server_side_encryption
                    .as_deref()
                    .map(ServerSideEncryption::from),
            )
            .set_ssekms_key_id(request.ssekms_key_id.clone())
            .set_storage_class(request.storage_class.as_deref().map(StorageClass::from))
            .set_sse_customer_algorithm(request.sse_customer_algorithm.clone())
            .set_sse_customer_key(request.sse_customer_key.clone())
            .set_sse_customer_key_md5(request.sse_customer_key_md5.clone())
            .set_expected_bucket_owner(self.owner(&request.expected_bucket_owner))
            .set_request_payer(payer(&request.request_payer))
            .send()
            .await
            .map_err(|err| from_sdk_error(err, &request.bucket, &request.key))?;

        Ok(PutObjectOutput {
            e_tag: output.e_tag().map(|s| s.to_string()),
            version_id: output.version_id().map(|s| s.to_string()),
        })
    }

    async fn create_multipart_upload(
        &self,
        request: &CreateMultipartUploadRequest,
    ) -> Result<String, StorageError> {
        let output = self
            .s3_client
            .create_multipart_upload()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_content_type(request.content_type.clone())
            .set_content_encoding(request.content_encoding.clone())
            .set_cache_control(request.cache_control.clone())
            .set_metadata(non_empty(&request.metadata))
            .set_server_side_encryption(
                request
                    .server_side_encryption
                    .as_deref()
                    .map(ServerSideEncryption::from),
            )
            .set_ssekms_key_id(request.ssekms_key_id.clone())
            .set_storage_class(request.storage_class.as_deref().map(StorageClass::from))
            .set_sse_customer_algorithm(request.sse_customer_algorithm.clone())
            .set_sse_customer_key(request.sse_customer_key.clone())
            .set_sse_customer_key_md5(request.sse_customer_key_md5.clone())
            .set_expected_bucket_owner(self.owner(&request.expected_bucket_owner))
            .set_request_payer(payer(&request.request_payer))
            .send()
            .await
            .map_err(|err| from_sdk_error(err, &request.bucket, &request.key))?;

        output
            .upload_id()
            .map(|id| id.to_string())
            .ok_or_else(|| StorageError::Other {
                message: "CreateMultipartUpload response has no upload id".to_string(),
            })
    }

    async fn upload_part(
        &self,
        request: &UploadPartRequest,
        body: RequestBody,
    ) -> Result<String, StorageError> {
        let part_number: i32 = part_number_i32(request.part_number)?;
        let content_length: i64 = length_i64(request.content_length)?;
        let body: ByteStream = into_byte_stream(body).await?;

        let output = self
            .s3_client
            .upload_part()
            .bucket(&request.bucket)
            .key(&request.key)
            .upload_id(&request.upload_id)
            .part_number(part_number)
            .content_length(content_length)
            .body(body)
            .set_sse_customer_algorithm(request.sse_customer_algorithm.clone())
            .set_sse_customer_key(request.sse_customer_key.clone())
            .set_sse_customer_key_md5(request.sse_customer_key_md5.clone())
            .set_expected_bucket_owner(self.owner(&request.expected_bucket_owner))
            .set_request_payer(payer(&request.request_payer))
            .send()
            .await
            .map_err(|err| from_sdk_error(err, &request.bucket, &request.key))?;

        output
            .e_tag()
            .map(|s| s.to_string())
            .ok_or_else(|| StorageError::Other {
                message: format!(
                    "UploadPart response for part {} has no ETag",
                    request.part_number
                ),
            })
    }

    async fn complete_multipart_upload(
        &self,
        request: &CompleteMultipartUploadRequest,
    ) -> Result<PutObjectOutput, StorageError> {
        let mut parts: Vec<CompletedPart> = Vec::with_capacity(request.parts.len());
        for part in &request.parts {
            parts.push(
                CompletedPart::builder()
                    .part_number(part_number_i32(part.part_number)?)
                    .e_tag(&part.e_tag)
                    .build(),
            );
        }

        let output = self
            .s3_client
            .complete_multipart_upload()
            .bucket(&request.bucket)
            .key(&request.key)
            .upload_id(&request.upload_id)
            .multipart_upload(CompletedMultipartUpload::builder().set_parts(Some(parts)).build())
            .set_sse_customer_algorithm(request.sse_customer_algorithm.clone())
            .set_sse_customer_key(request.sse_customer_key.clone())
            .set_sse_customer_key_md5(request.sse_customer_key_md5.clone())
            .set_expected_bucket_owner(self.owner(&request.expected_bucket_owner))
            .set_request_payer(payer(&request.request_payer))
            .send()
            .await
            .map_err(|err| from_sdk_error(err, &request.bucket, &request.key))?;

        Ok(PutObjectOutput {
            e_tag: output.e_tag().map(|s| s.to_string()),
            version_id: output.version_id().map(|s| s.to_string()),
        })
    }

    async fn abort_multipart_upload(
        &self,
        request: &AbortMultipartUploadRequest,
    ) -> Result<(), StorageError> {
        self.s3_client
            .abort_multipart_upload()
            .bucket(&request.bucket)
            .key(&request.key)
            .upload_id(&request.upload_id)
            .set_expected_bucket_owner(self.owner(&request.expected_bucket_owner))
            .set_request_payer(payer(&request.request_payer))
            .send()
            .await
            .map_err(|err| from_sdk_error(err, &request.bucket, &request.key))?;
        Ok(())
    }
}
