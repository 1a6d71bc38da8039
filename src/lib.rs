//! Cloudflare R2 storage client.
//!
//! This crate provides:
//! - Signed upload URL generation (presigned PUT)
//! - Two-step uploads: presign, then raw HTTPS transfer
//! - Bucket and object listing
//! - Guarded deletion (existence probe before the delete)
//! - Signed + permanent download URL resolution
//! - Endpoint health checks

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::R2Client;
pub use config::R2Config;
pub use error::{StorageError, StorageResult};
pub use types::{
    BucketSummary, DeleteResult, ObjectReference, ObjectSummary, PingResult, UploadResult,
    DEFAULT_CONTENT_TYPE, DEFAULT_URL_TTL,
};
