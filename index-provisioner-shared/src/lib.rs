//! # Index Provisioner Shared
//!
//! This crate defines the data structures shared across the index provisioner:
//! the target [`IndexDescriptor`] an operator wants to exist, and the
//! [`IndexDescription`] the remote service reports back for an existing index.

pub mod types;

pub use types::index_description::{IndexDescription, IndexStatus, IndexSummary};
pub use types::index_descriptor::{
    Cloud, DeploymentSpec, DescriptorError, IndexDescriptor, Metric, MAX_DIMENSION,
    MAX_INDEX_NAME_LEN,
};
