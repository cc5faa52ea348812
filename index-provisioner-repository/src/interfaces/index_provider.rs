//! Index provider trait definition.
//!
//! This module defines the abstract interface for the administrative API
//! operations the provisioner consumes, allowing the live Pinecone client and
//! the mock to be used interchangeably.

use async_trait::async_trait;
use index_provisioner_shared::{IndexDescription, IndexDescriptor, IndexSummary};

use crate::errors::IndexProviderError;

/// Abstracts the vector database's administrative API.
///
/// Implementations are injected into the provisioner to enable dependency
/// injection and easy testing with mock implementations. All methods return
/// `Result<T, IndexProviderError>` for consistent error handling across
/// backends.
///
/// The provisioner only ever reads and creates. There is deliberately no
/// configure or delete operation.
#[async_trait]
pub trait IndexProvider: Send + Sync {
    /// List every index visible to the credential.
    ///
    /// Entries carry only the name; use `describe_index` for the full model.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<IndexSummary>)` - All indexes in the project (possibly empty)
    /// * `Err(IndexProviderError)` - If the listing fails
    async fn list_indexes(&self) -> Result<Vec<IndexSummary>, IndexProviderError>;

    /// Describe a single index by name.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    ///
    /// # Returns
    ///
    /// * `Ok(IndexDescription)` - The index as reported by the service
    /// * `Err(IndexProviderError)` - `NotFound` if absent, or any other failure
    async fn describe_index(&self, name: &str) -> Result<IndexDescription, IndexProviderError>;

    /// Create an index with exactly the descriptor's parameters.
    ///
    /// Implementations must not retry: a failed create is reported once.
    ///
    /// # Arguments
    ///
    /// * `descriptor` - The target index configuration
    ///
    /// # Returns
    ///
    /// * `Ok(IndexDescription)` - The newly created index (usually not yet ready)
    /// * `Err(IndexProviderError)` - If the service rejects the request
    async fn create_index(
        &self,
        descriptor: &IndexDescriptor,
    ) -> Result<IndexDescription, IndexProviderError>;
}
