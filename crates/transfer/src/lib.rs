//! Multipart object transfer engine for blob storage.
//!
//! This crate moves whole objects between local byte sources/sinks and an
//! S3-compatible store. Small objects go out in a single call; large objects
//! are split into parts that transfer concurrently:
//!
//! - **Uploads** - `CreateMultipartUpload`, concurrent `UploadPart` calls,
//!   then `CompleteMultipartUpload`. Any failure aborts the upload.
//! - **Downloads** - optional `HeadObject` to learn the size, then concurrent
//!   ranged `GetObject` calls, each written by its own sink.
//!
//! The store is reached through the [`StorageClient`] trait; the
//! `rusty-transfer-s3` crate provides an AWS SDK implementation.
//!
//! # Sizing
//!
//! Part sizes come from [`compute_parts`]: at least the configured minimum
//! part size, at most the configured part count, with no empty parts.
//!
//! # Sources and sinks
//!
//! Upload bytes come from a [`TransferRequestBody`] and download bytes go to a
//! [`TransferResponseTransformer`]. File and in-memory versions are included.

mod body;
mod config;
mod constants;
mod context;
mod download;
mod error;
mod handle;
mod join;
mod manager;
mod model;
mod part_table;
mod request;
mod sizing;
mod specification;
mod traits;
mod transformer;
mod upload;

pub use body::{BytesRequestBody, FileRequestBody, RequestBody, TransferRequestBody};
pub use config::{
    resolve, MultipartConfiguration, TransferManagerConfiguration, TransferOverrideConfiguration,
};
pub use constants::{
    DEFAULT_MAX_PART_COUNT, DEFAULT_MIN_PART_SIZE, DEFAULT_MULTIPART_THRESHOLD, GIB, KIB,
    MAX_BODY_PREALLOCATION, MIB,
};
pub use context::{
    MultipartDownloadContext, MultipartUploadContext, SinglePartDownloadContext,
    SinglePartUploadContext,
};
pub use download::{DownloadManager, MultipartDownloadManager, SinglePartDownloadManager};
pub use error::{Operation, StorageError, TransferError};
pub use handle::{CompletedDownload, CompletedUpload, DownloadHandle, TransferHandle, UploadHandle};
pub use join::join_all_or_cancel;
pub use manager::{TransferManager, TransferManagerBuilder};
pub use model::{
    AbortMultipartUploadRequest, CompleteMultipartUploadRequest, CompletedPart,
    CreateMultipartUploadRequest, GetObjectRequest, HeadObjectRequest, ObjectMetadata,
    PutObjectOutput, PutObjectRequest, UploadPartRequest,
};
pub use part_table::PartResultTable;
pub use request::{DownloadRequest, DownloadRequestBuilder, UploadRequest, UploadRequestBuilder};
pub use sizing::{compute_parts, part_count, range_header_value, PartInfo};
pub use specification::{DownloadObjectSpecification, SpecificationKind, UploadObjectSpecification};
pub use traits::StorageClient;
pub use transformer::{FileResponseTransformer, ResponseSink, TransferResponseTransformer};
pub use upload::{MultipartUploadManager, SinglePartUploadManager, UploadManager};
