//! Remote index descriptions.
//!
//! This module defines what the remote service reports for an index that
//! already exists. Describe responses deserialize straight into
//! [`IndexDescription`]; list entries only need to yield an [`IndexSummary`].

use serde::{Deserialize, Serialize};

use crate::types::index_descriptor::{DeploymentSpec, IndexDescriptor, Metric};

/// Readiness of a remote index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct IndexStatus {
    /// Whether the index accepts reads and writes.
    #[serde(default)]
    pub ready: bool,
    /// Lifecycle state as reported by the service (e.g., "Initializing", "Ready").
    #[serde(default)]
    pub state: String,
}

/// One entry of an index listing.
///
/// Only the name is decoded, so indexes of kinds this crate does not model
/// cannot fail the listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexSummary {
    /// Index name.
    pub name: String,
}

impl From<&IndexDescription> for IndexSummary {
    fn from(description: &IndexDescription) -> Self {
        Self {
            name: description.name.clone(),
        }
    }
}

/// An index as reported by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexDescription {
    /// Index name.
    pub name: String,
    /// Vector width. Absent for sparse indexes.
    #[serde(default)]
    pub dimension: Option<u32>,
    /// Similarity function.
    pub metric: Metric,
    /// Data-plane host, assigned once the index is provisioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Hosting mode and location.
    pub spec: DeploymentSpec,
    /// Readiness status.
    #[serde(default)]
    pub status: IndexStatus,
    /// Deletion protection setting ("enabled" or "disabled").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_protection: Option<String>,
}

impl IndexDescription {
    /// Build the description the service would report right after creating
    /// `descriptor`, before the index becomes ready.
    pub fn initializing(descriptor: &IndexDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            dimension: Some(descriptor.dimension),
            metric: descriptor.metric,
            host: None,
            spec: descriptor.spec.clone(),
            status: IndexStatus {
                ready: false,
                state: "Initializing".to_string(),
            },
            deletion_protection: Some("disabled".to_string()),
        }
    }

    /// Whether the reported dimension and metric agree with `target`.
    pub fn matches(&self, target: &IndexDescriptor) -> bool {
        self.dimension == Some(target.dimension) && self.metric == target.metric
    }

    /// Human-readable dimension, "unknown" when the service omitted it.
    pub fn dimension_label(&self) -> String {
        match self.dimension {
            Some(dimension) => dimension.to_string(),
            None => "unknown".to_string(),
        }
    }
}
