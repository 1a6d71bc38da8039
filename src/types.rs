//! Transient value objects returned by storage operations.
//!
//! Every value here is created fresh per call; the client keeps no cache and
//! no object identity beyond bucket + key strings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default time-to-live for signed URLs (7 days, the R2 presign maximum).
pub const DEFAULT_URL_TTL: Duration = Duration::from_secs(604_800);

/// Content type used when the caller does not supply one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Summary of a bucket from `list_buckets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketSummary {
    /// Bucket name
    pub name: String,
    /// Creation timestamp (milliseconds since epoch)
    pub created_at: Option<u64>,
}

/// Summary of a stored object from `list_objects`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSummary {
    /// Object key
    pub key: String,
    /// Size in bytes
    pub size: u64,
    /// Last modified timestamp (milliseconds since epoch)
    pub last_modified: Option<u64>,
}

/// Download reference for an object: a time-limited signed URL plus an
/// optional permanent URL under the configured public domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectReference {
    /// Bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
    /// Signed GET URL (expires after `expires_in_secs`)
    pub url: String,
    /// Stable URL under the public domain, if one is configured
    pub permanent_url: Option<String>,
    /// When the signed URL expires (ISO 8601)
    pub expires_at: String,
    /// Expiry in seconds from issuance
    pub expires_in_secs: u64,
}

/// Outcome of a two-step upload.
///
/// The transfer and the follow-up URL resolution are reported separately:
/// `reference` is `None` with `resolve_error` set when the bytes were stored
/// but a download URL could not be produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    /// HTTP status of the raw transfer (200 on success)
    pub status: u16,
    /// Download reference resolved right after the upload
    pub reference: Option<ObjectReference>,
    /// Set when the upload succeeded but URL resolution failed
    pub resolve_error: Option<String>,
}

/// Outcome of a guarded delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResult {
    /// Whether the object was deleted (true iff the store reported 204)
    pub deleted: bool,
    /// Human-readable outcome
    pub message: String,
    /// Nominal protocol status of the delete call, when one was issued
    /// (204 per the S3 contract; the SDK does not hand back the raw status)
    pub status_code: Option<u16>,
    /// Primary request identifier from the store
    pub request_id: Option<String>,
    /// Extended request identifier from the store
    pub extended_request_id: Option<String>,
    /// Retry attempt count; not exposed by the SDK on successful responses
    pub attempts: Option<u32>,
    /// Accumulated retry delay; not exposed by the SDK on successful responses
    pub total_retry_delay_ms: Option<u64>,
}

impl DeleteResult {
    /// Result for a delete whose existence probe found nothing.
    pub fn not_found() -> Self {
        Self {
            deleted: false,
            message: "Object does not exist".to_string(),
            status_code: None,
            request_id: None,
            extended_request_id: None,
            attempts: None,
            total_retry_delay_ms: None,
        }
    }
}

/// Outcome of a health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResult {
    /// Whether the round trip completed without error
    pub success: bool,
    /// Wall-clock latency of the round trip in milliseconds
    pub latency_ms: u64,
    /// Error detail on failure
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_delete_result_shape() {
        let result = DeleteResult::not_found();
        assert!(!result.deleted);
        assert_eq!(result.message, "Object does not exist");
        assert!(result.status_code.is_none());

        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["deleted"], false);
        assert_eq!(json["message"], "Object does not exist");
    }

    #[test]
    fn upload_result_serializes_resolve_gap() {
        let result = UploadResult {
            status: 200,
            reference: None,
            resolve_error: Some("presign failed".to_string()),
        };

        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["status"], 200);
        assert!(json["reference"].is_null());
        assert_eq!(json["resolve_error"], "presign failed");
    }
}
