//! Client configuration.

use crate::error::{StorageError, StorageResult};

/// Cloudflare R2 serves its S3 API on a per-account hostname.
const R2_ENDPOINT_SUFFIX: &str = "r2.cloudflarestorage.com";

/// Configuration for the R2 client.
///
/// The endpoint is derived from the account id; `with_endpoint_url` overrides
/// it, which is mainly useful for pointing tests at a local server.
#[derive(Debug, Clone)]
pub struct R2Config {
    /// Cloudflare account identifier
    pub account_id: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Region (usually "auto" for R2)
    pub region: String,
    /// R2 endpoint URL (S3 API endpoint)
    pub endpoint_url: String,
    /// Public domain mapped to the bucket, used for permanent URLs.
    /// Not validated; permanent URLs are plain `domain + "/" + key`.
    pub public_domain: Option<String>,
}

impl R2Config {
    /// Create a config for an account, deriving the S3 API endpoint.
    pub fn new(
        account_id: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        let account_id = account_id.into();
        let endpoint_url = format!("https://{}.{}", account_id, R2_ENDPOINT_SUFFIX);

        Self {
            account_id,
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: "auto".to_string(),
            endpoint_url,
            public_domain: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_public_domain(mut self, domain: impl Into<String>) -> Self {
        self.public_domain = Some(domain.into());
        self
    }

    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = url.into();
        self
    }

    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let account_id = std::env::var("R2_ACCOUNT_ID")
            .map_err(|_| StorageError::config_error("R2_ACCOUNT_ID not set"))?;
        let access_key_id = std::env::var("R2_ACCESS_KEY_ID")
            .map_err(|_| StorageError::config_error("R2_ACCESS_KEY_ID not set"))?;
        let secret_access_key = std::env::var("R2_SECRET_ACCESS_KEY")
            .map_err(|_| StorageError::config_error("R2_SECRET_ACCESS_KEY not set"))?;

        let mut config = Self::new(account_id, access_key_id, secret_access_key);
        if let Ok(region) = std::env::var("R2_REGION") {
            config.region = region;
        }
        if let Ok(domain) = std::env::var("R2_PUBLIC_DOMAIN") {
            config.public_domain = Some(domain);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_derived_from_account_id() {
        let config = R2Config::new("abc123", "key", "secret");
        assert_eq!(config.endpoint_url, "https://abc123.r2.cloudflarestorage.com");
        assert_eq!(config.region, "auto");
        assert!(config.public_domain.is_none());
    }

    // Single test for all env behavior: the process environment is shared,
    // so splitting these across test functions would race under the parallel
    // harness.
    #[test]
    fn from_env_reads_vars_and_reports_missing_ones() {
        std::env::set_var("R2_ACCOUNT_ID", "env-account");
        std::env::set_var("R2_ACCESS_KEY_ID", "env-key");
        std::env::set_var("R2_SECRET_ACCESS_KEY", "env-secret");
        std::env::remove_var("R2_REGION");
        std::env::remove_var("R2_PUBLIC_DOMAIN");

        let config = R2Config::from_env().expect("config");
        assert_eq!(config.account_id, "env-account");
        assert_eq!(config.access_key_id, "env-key");
        assert_eq!(
            config.endpoint_url,
            "https://env-account.r2.cloudflarestorage.com"
        );
        assert_eq!(config.region, "auto");
        assert!(config.public_domain.is_none());

        std::env::set_var("R2_REGION", "wnam");
        std::env::set_var("R2_PUBLIC_DOMAIN", "https://cdn.example.com");

        let config = R2Config::from_env().expect("config");
        assert_eq!(config.region, "wnam");
        assert_eq!(config.public_domain.as_deref(), Some("https://cdn.example.com"));

        std::env::remove_var("R2_ACCOUNT_ID");
        let err = R2Config::from_env().expect_err("missing account id");
        assert_eq!(
            err.to_string(),
            "Failed to configure storage client: R2_ACCOUNT_ID not set"
        );

        std::env::remove_var("R2_ACCESS_KEY_ID");
        std::env::remove_var("R2_SECRET_ACCESS_KEY");
        std::env::remove_var("R2_REGION");
        std::env::remove_var("R2_PUBLIC_DOMAIN");
    }

    #[test]
    fn builders_override_defaults() {
        let config = R2Config::new("abc123", "key", "secret")
            .with_region("wnam")
            .with_public_domain("https://cdn.example.com")
            .with_endpoint_url("http://127.0.0.1:9000");

        assert_eq!(config.region, "wnam");
        assert_eq!(config.public_domain.as_deref(), Some("https://cdn.example.com"));
        assert_eq!(config.endpoint_url, "http://127.0.0.1:9000");
    }
}
