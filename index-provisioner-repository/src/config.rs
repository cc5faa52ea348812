//! Configuration types for the Pinecone provider.

use std::time::Duration;

/// Default control-plane URL.
pub const DEFAULT_CONTROLLER_HOST: &str = "https://api.pinecone.io";

/// API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "2024-07";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the Pinecone control plane.
///
/// The credential is not part of this struct; it is handed to the provider
/// separately so that configuration can be logged freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PineconeConfig {
    /// Control-plane base URL (e.g., "https://api.pinecone.io").
    pub base_url: String,
    /// Value of the `X-Pinecone-API-Version` header.
    pub api_version: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CONTROLLER_HOST.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl PineconeConfig {
    /// Create a config pointing at a custom control-plane URL.
    ///
    /// Used for tests against a local mock server and for proxies.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The control-plane URL, with or without a trailing slash
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
