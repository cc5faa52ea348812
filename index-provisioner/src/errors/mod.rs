//! Error types for the provisioning flow.

use index_provisioner_repository::IndexProviderError;
use thiserror::Error;

/// Errors that can occur while ensuring an index exists.
///
/// Each variant corresponds to one call site of the flow, so callers can
/// match on where the run stopped rather than on a catch-all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProvisionError {
    /// Missing credential, invalid target or unusable client settings.
    /// No remote call was made.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The existence check (list or describe) failed.
    #[error("Failed to check existing indexes: {0}")]
    QueryError(IndexProviderError),

    /// The create call failed. Never retried.
    #[error("Failed to create index: {0}")]
    CreationError(IndexProviderError),
}

impl ProvisionError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Wrap a failed existence check.
    pub fn query(err: IndexProviderError) -> Self {
        Self::QueryError(err)
    }

    /// Wrap a failed create call.
    pub fn creation(err: IndexProviderError) -> Self {
        Self::CreationError(err)
    }

    /// The remote error behind this failure, if any.
    pub fn provider_error(&self) -> Option<&IndexProviderError> {
        match self {
            Self::ConfigurationError(_) => None,
            Self::QueryError(err) | Self::CreationError(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ProvisionError::configuration("PINECONE_API_KEY is not set").to_string(),
            "Configuration error: PINECONE_API_KEY is not set"
        );
        assert_eq!(
            ProvisionError::creation(IndexProviderError::forbidden("quota")).to_string(),
            "Failed to create index: Forbidden: quota"
        );
    }

    #[test]
    fn test_provider_error() {
        let remote = IndexProviderError::unauthorized("bad key");
        assert_eq!(
            ProvisionError::query(remote.clone()).provider_error(),
            Some(&remote)
        );
        assert_eq!(ProvisionError::configuration("x").provider_error(), None);
    }
}
