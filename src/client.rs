//! R2 client implementation.

use std::path::Path;
use std::time::{Duration, Instant};

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::operation::{RequestId, RequestIdExt};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use tracing::{debug, info, warn};

use crate::config::R2Config;
use crate::error::{StorageError, StorageResult};
use crate::types::{
    BucketSummary, DeleteResult, ObjectReference, ObjectSummary, PingResult, UploadResult,
    DEFAULT_URL_TTL,
};

/// Cloudflare R2 storage client.
///
/// Every operation is an independent round trip; no call depends on prior
/// client state besides the configured public domain. The client stays usable
/// after any failure.
#[derive(Clone)]
pub struct R2Client {
    client: Client,
    http: reqwest::Client,
    public_domain: Option<String>,
}

impl R2Client {
    /// Create a new R2 client from configuration.
    ///
    /// Credentials are not validated here; malformed credentials surface on
    /// the first signed or sent request.
    pub async fn new(config: R2Config) -> StorageResult<Self> {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "r2",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(sdk_config),
            http: reqwest::Client::new(),
            public_domain: config.public_domain,
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> StorageResult<Self> {
        let config = R2Config::from_env()?;
        Self::new(config).await
    }

    /// Set the public domain used for permanent URLs.
    ///
    /// Takes `&mut self`: a cloned handle shared across tasks cannot be
    /// reconfigured underneath an in-flight call.
    pub fn set_public_domain(&mut self, domain: impl Into<String>) {
        self.public_domain = Some(domain.into());
    }

    /// Generate a presigned URL granting a PUT on `bucket/key`.
    ///
    /// Valid for `expires_in` from issuance (or until credential rotation).
    /// Signing failures are propagated as-is; nothing is retried.
    pub async fn generate_signed_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::presign_failed(e.to_string()))?;

        let presigned = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| StorageError::presign_failed(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    /// Upload bytes via a signed URL.
    ///
    /// Two-step: presign a PUT, then transfer the payload over raw HTTPS with
    /// the given content type, bypassing the SDK signer. Success is strictly
    /// HTTP 200. On success a download reference for the same key is resolved
    /// immediately; if that resolution fails the result still reports the
    /// stored bytes, with `resolve_error` set.
    pub async fn put(
        &self,
        bucket: &str,
        key: &str,
        payload: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<UploadResult> {
        debug!("Uploading {} bytes to {}/{}", payload.len(), bucket, key);

        let signed_url = self.generate_signed_url(bucket, key, DEFAULT_URL_TTL).await?;

        let response = self
            .http
            .put(&signed_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            warn!("Upload of {}/{} rejected with status {}", bucket, key, status);
            return Err(StorageError::TransferFailed { status, message });
        }

        info!("Uploaded {}/{}", bucket, key);

        match self.resolve_object_url(bucket, key, DEFAULT_URL_TTL).await {
            Ok(reference) => Ok(UploadResult {
                status,
                reference: Some(reference),
                resolve_error: None,
            }),
            Err(e) => {
                warn!(
                    "Uploaded {}/{} but failed to resolve a download URL: {}",
                    bucket, key, e
                );
                Ok(UploadResult {
                    status,
                    reference: None,
                    resolve_error: Some(e.to_string()),
                })
            }
        }
    }

    /// Upload a file via a signed URL.
    pub async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: impl AsRef<Path>,
        content_type: &str,
    ) -> StorageResult<UploadResult> {
        let path = path.as_ref();
        debug!("Uploading {} to {}/{}", path.display(), bucket, key);

        let payload = tokio::fs::read(path).await?;
        self.put(bucket, key, payload, content_type).await
    }

    /// List all buckets for the account.
    pub async fn list_buckets(&self) -> StorageResult<Vec<BucketSummary>> {
        debug!("Listing buckets");

        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| StorageError::list_failed(e.to_string()))?;

        let mut buckets = Vec::new();
        if let Some(ref contents) = response.buckets {
            for b in contents {
                buckets.push(BucketSummary {
                    name: b.name.clone().unwrap_or_default(),
                    created_at: b
                        .creation_date
                        .as_ref()
                        .and_then(|t| t.to_millis().ok())
                        .map(|ms| ms as u64),
                });
            }
        }

        Ok(buckets)
    }

    /// List objects in a bucket.
    ///
    /// Single page only: callers with more than one page of objects get a
    /// truncated view.
    pub async fn list_objects(&self, bucket: &str) -> StorageResult<Vec<ObjectSummary>> {
        debug!("Listing objects in {}", bucket);

        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| StorageError::list_failed(e.to_string()))?;

        let mut objects = Vec::new();
        if let Some(ref contents) = response.contents {
            for obj in contents {
                objects.push(ObjectSummary {
                    key: obj.key.clone().unwrap_or_default(),
                    size: obj.size.unwrap_or(0) as u64,
                    last_modified: obj
                        .last_modified
                        .as_ref()
                        .and_then(|t| t.to_millis().ok())
                        .map(|ms| ms as u64),
                });
            }
        }

        Ok(objects)
    }

    /// Check if an object exists via a metadata-only request.
    pub async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        match self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(StorageError::AwsSdk(service_err.to_string()))
                }
            }
        }
    }

    /// Delete an object, probing for existence first.
    ///
    /// An absent object is reported as a non-deleted result, not an error.
    /// The probe can race with another deleter; an object removed between the
    /// probe and the delete surfaces as a delete error.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<DeleteResult> {
        debug!("Deleting {}/{}", bucket, key);

        if !self.exists(bucket, key).await? {
            return Ok(DeleteResult::not_found());
        }

        let response = self
            .client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::delete_failed(e.to_string()))?;

        info!("Deleted {}/{}", bucket, key);

        // A successful S3 DeleteObject is always 204; the SDK does not hand
        // back the raw status or retry telemetry on the success path.
        Ok(DeleteResult {
            deleted: true,
            message: "Object has been deleted".to_string(),
            status_code: Some(204),
            request_id: response.request_id().map(str::to_string),
            extended_request_id: response.extended_request_id().map(str::to_string),
            attempts: None,
            total_retry_delay_ms: None,
        })
    }

    /// Resolve a download reference for an object.
    ///
    /// Produces a presigned GET URL and, when a public domain is configured,
    /// a permanent URL of `domain + "/" + key`. Neither checks that the
    /// object exists.
    pub async fn resolve_object_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<ObjectReference> {
        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::presign_failed(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| StorageError::presign_failed(e.to_string()))?;

        let permanent_url = self
            .public_domain
            .as_ref()
            .map(|domain| format!("{}/{}", domain, key));

        let expires_at =
            chrono::Utc::now() + chrono::Duration::from_std(expires_in).unwrap_or_default();

        Ok(ObjectReference {
            bucket: bucket.to_string(),
            key: key.to_string(),
            url: presigned.uri().to_string(),
            permanent_url,
            expires_at: expires_at.to_rfc3339(),
            expires_in_secs: expires_in.as_secs(),
        })
    }

    /// Health-check the endpoint by timing a bucket-list round trip.
    ///
    /// Errors are caught and reported in the result, never propagated.
    pub async fn ping(&self) -> PingResult {
        let start = Instant::now();
        let outcome = self.client.list_buckets().send().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(_) => PingResult {
                success: true,
                latency_ms,
                error: None,
            },
            Err(e) => {
                warn!("Ping failed after {}ms: {}", latency_ms, e);
                PingResult {
                    success: false,
                    latency_ms,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
