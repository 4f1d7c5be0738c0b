//! AWS SDK S3 backend for rusty-transfer.
//!
//! This crate provides a `StorageClient` implementation using the AWS SDK for
//! Rust, covering every call the transfer engine issues.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rusty_transfer::{BytesRequestBody, TransferManager, UploadRequest};
//! use rusty_transfer_s3::{S3StorageClient, StorageSettings};
//!
//! let client = S3StorageClient::new(StorageSettings::for_region("us-east-1")).await?;
//! let manager = TransferManager::builder().client(Arc::new(client)).build()?;
//!
//! let handle = manager.upload_object(
//!     UploadRequest::for_bucket_and_key("my-bucket", "data.bin"),
//!     BytesRequestBody::new(vec![0u8; 1024]),
//! )?;
//! let completed = handle.completion().await?;
//! ```

mod client;
mod error;
mod settings;

pub use client::S3StorageClient;
pub use error::S3Error;
pub use settings::{AwsCredentials, StorageSettings};
