//! Connection settings for the S3 backend.

/// Static AWS credentials.
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

/// Settings used to build an S3 client.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// AWS region.
    pub region: String,
    /// Static credentials; the default provider chain is used when `None`.
    pub credentials: Option<AwsCredentials>,
    /// Applied to every request that does not set its own owner.
    pub expected_bucket_owner: Option<String>,
    /// Custom endpoint, e.g. for S3-compatible stores.
    pub endpoint_url: Option<String>,
    /// Use path-style addressing (`endpoint/bucket/key`).
    pub force_path_style: bool,
    /// Maximum attempts per call, including the first.
    pub max_attempts: u32,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            region: "us-west-2".into(),
            credentials: None,
            expected_bucket_owner: None,
            endpoint_url: None,
            force_path_style: false,
            max_attempts: 3,
        }
    }
}

impl StorageSettings {
    /// Settings for a region with everything else defaulted.
    pub fn for_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    /// Use static credentials.
    pub fn with_credentials(mut self, credentials: AwsCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Send requests to a custom endpoint with path-style addressing.
    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self.force_path_style = true;
        self
    }

    /// Set the expected bucket owner.
    pub fn with_expected_bucket_owner(mut self, owner: impl Into<String>) -> Self {
        self.expected_bucket_owner = Some(owner.into());
        self
    }

    /// Set the maximum attempts per call.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = StorageSettings::default();
        assert_eq!(settings.region, "us-west-2");
        assert!(settings.credentials.is_none());
        assert!(!settings.force_path_style);
        assert_eq!(settings.max_attempts, 3);
    }

    #[test]
    fn test_with_endpoint_enables_path_style() {
        let settings =
            StorageSettings::for_region("eu-west-1").with_endpoint("http://localhost:9000");
        assert_eq!(settings.region, "eu-west-1");
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert!(settings.force_path_style);
    }
}
