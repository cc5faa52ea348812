//! Selection between the live Pinecone API and the in-memory mock.

use secrecy::SecretString;

use crate::config::PineconeConfig;
use crate::errors::IndexProviderError;
use crate::interfaces::IndexProvider;
use crate::mock::MockIndexProvider;
use crate::pinecone::PineconeProvider;

/// Configuration for where index operations are sent.
///
/// # Example
///
/// ```ignore
/// use index_provisioner_repository::{MockIndexProvider, PineconeConfig, ProviderSource};
///
/// // Development/testing: in-memory indexes
/// let source = ProviderSource::mock(MockIndexProvider::new());
///
/// // Production: the Pinecone control plane
/// let source = ProviderSource::live(PineconeConfig::default());
///
/// let provider = source.connect(api_key)?;
/// ```
#[derive(Debug, Clone)]
pub enum ProviderSource {
    /// Use an in-memory mock. The credential is accepted but ignored.
    Mock(MockIndexProvider),

    /// Talk to the Pinecone control plane.
    Live(PineconeConfig),
}

impl ProviderSource {
    /// Create a mock source backed by the given mock.
    pub fn mock(provider: MockIndexProvider) -> Self {
        Self::Mock(provider)
    }

    /// Create a live source with the given connection settings.
    pub fn live(config: PineconeConfig) -> Self {
        Self::Live(config)
    }

    /// Create the `IndexProvider` for this source, authorized with `api_key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Box<dyn IndexProvider>)` - A provider ready for use
    /// * `Err(IndexProviderError)` - If the live client cannot be configured
    pub fn connect(&self, api_key: SecretString) -> Result<Box<dyn IndexProvider>, IndexProviderError> {
        match self {
            Self::Mock(provider) => Ok(Box::new(provider.clone())),
            Self::Live(config) => Ok(Box::new(PineconeProvider::new(api_key, config.clone())?)),
        }
    }
}

impl Default for ProviderSource {
    fn default() -> Self {
        Self::Live(PineconeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use index_provisioner_shared::IndexDescriptor;

    #[tokio::test]
    async fn test_mock_source_shares_state() {
        let mock = MockIndexProvider::new();
        let source = ProviderSource::mock(mock.clone());

        let provider = source
            .connect(SecretString::from("ignored".to_string()))
            .unwrap();
        provider
            .create_index(&IndexDescriptor::snapconnect_default())
            .await
            .unwrap();

        assert!(mock.has_index("snaps-prod"));
    }

    #[test]
    fn test_live_source_rejects_bad_url() {
        let source = ProviderSource::live(PineconeConfig::with_base_url("::not-a-url::"));

        let result = source.connect(SecretString::from("key".to_string()));

        assert!(matches!(
            result,
            Err(IndexProviderError::ConnectionError(_))
        ));
    }

    #[test]
    fn test_default_is_live() {
        assert!(matches!(
            ProviderSource::default(),
            ProviderSource::Live(config) if config == PineconeConfig::default()
        ));
    }
}
