//! Core data structures used across the index provisioner.
//! Re-exports the descriptor (what we want) and description (what exists) types.

pub mod index_description;
pub mod index_descriptor;

pub use index_description::{IndexDescription, IndexStatus, IndexSummary};
pub use index_descriptor::{Cloud, DeploymentSpec, DescriptorError, IndexDescriptor, Metric};
