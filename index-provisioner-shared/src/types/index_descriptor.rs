//! Target index configuration.
//!
//! An [`IndexDescriptor`] names every parameter the provisioner passes to the
//! remote create call. The SnapConnect production target is enumerated once in
//! [`IndexDescriptor::snapconnect_default`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of an index name accepted by the remote service.
pub const MAX_INDEX_NAME_LEN: usize = 45;

/// Maximum vector dimension accepted by the remote service for dense indexes.
pub const MAX_DIMENSION: u32 = 20_000;

/// Default index name used by the SnapConnect AI pipeline.
const DEFAULT_INDEX_NAME: &str = "snaps-prod";

/// Output width of `text-embedding-3-small`.
const DEFAULT_DIMENSION: u32 = 1536;

const DEFAULT_REGION: &str = "us-east-1";

/// Errors raised when a descriptor or one of its parts is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// The index name does not satisfy the remote naming rules.
    #[error("Invalid index name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The dimension is zero or above [`MAX_DIMENSION`].
    #[error("Invalid dimension {0}: must be between 1 and 20000")]
    InvalidDimension(u32),

    /// Unknown similarity metric.
    #[error("Unknown metric '{0}': expected one of cosine, dotproduct, euclidean")]
    UnknownMetric(String),

    /// Unknown cloud provider.
    #[error("Unknown cloud '{0}': expected one of aws, gcp, azure")]
    UnknownCloud(String),

    /// Region must not be empty.
    #[error("Region must not be empty")]
    EmptyRegion,
}

/// Similarity function used to compare vectors in an index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cosine similarity.
    #[default]
    Cosine,
    /// Dot product.
    DotProduct,
    /// Euclidean distance.
    Euclidean,
}

impl Metric {
    /// Wire name of the metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
            Metric::DotProduct => "dotproduct",
            Metric::Euclidean => "euclidean",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cosine" => Ok(Metric::Cosine),
            "dotproduct" | "dot-product" | "dot_product" => Ok(Metric::DotProduct),
            "euclidean" => Ok(Metric::Euclidean),
            other => Err(DescriptorError::UnknownMetric(other.to_string())),
        }
    }
}

/// Cloud provider hosting a serverless index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Cloud {
    #[default]
    Aws,
    Gcp,
    Azure,
}

impl Cloud {
    /// Wire name of the cloud provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cloud::Aws => "aws",
            Cloud::Gcp => "gcp",
            Cloud::Azure => "azure",
        }
    }
}

impl fmt::Display for Cloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cloud {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aws" => Ok(Cloud::Aws),
            "gcp" => Ok(Cloud::Gcp),
            "azure" => Ok(Cloud::Azure),
            other => Err(DescriptorError::UnknownCloud(other.to_string())),
        }
    }
}

/// Hosting mode and location of an index.
///
/// Serializes in the remote service's externally tagged form, e.g.
/// `{"serverless": {"cloud": "aws", "region": "us-east-1"}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentSpec {
    /// Provider-managed compute in the given cloud and region.
    Serverless { cloud: Cloud, region: String },

    /// Legacy pod-based deployment. Only ever read from the remote service;
    /// the provisioner never creates pod indexes.
    Pod {
        environment: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pod_type: Option<String>,
    },
}

impl DeploymentSpec {
    /// Create a serverless deployment spec.
    pub fn serverless(cloud: Cloud, region: impl Into<String>) -> Self {
        Self::Serverless {
            cloud,
            region: region.into(),
        }
    }
}

impl fmt::Display for DeploymentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentSpec::Serverless { cloud, region } => {
                write!(f, "{} {}", cloud.as_str().to_uppercase(), region)
            }
            DeploymentSpec::Pod {
                environment,
                pod_type,
            } => match pod_type {
                Some(pod_type) => write!(f, "pod {} ({})", environment, pod_type),
                None => write!(f, "pod {}", environment),
            },
        }
    }
}

/// The index an operator wants to exist.
///
/// Field names match the body of the remote create call, so the descriptor
/// serializes directly into the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexDescriptor {
    /// Index name, unique within the project.
    pub name: String,
    /// Length of every vector stored in the index.
    pub dimension: u32,
    /// Similarity function.
    pub metric: Metric,
    /// Hosting mode and location.
    pub spec: DeploymentSpec,
}

impl IndexDescriptor {
    /// Create a new serverless index descriptor.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    /// * `dimension` - The vector width
    /// * `metric` - The similarity function
    /// * `cloud` - The cloud provider
    /// * `region` - The cloud region (e.g., "us-east-1")
    pub fn serverless(
        name: impl Into<String>,
        dimension: u32,
        metric: Metric,
        cloud: Cloud,
        region: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dimension,
            metric,
            spec: DeploymentSpec::serverless(cloud, region),
        }
    }

    /// The SnapConnect production index: `snaps-prod`, 1536 dimensions,
    /// cosine metric, serverless on AWS us-east-1.
    pub fn snapconnect_default() -> Self {
        Self::serverless(
            DEFAULT_INDEX_NAME,
            DEFAULT_DIMENSION,
            Metric::Cosine,
            Cloud::Aws,
            DEFAULT_REGION,
        )
    }

    /// Validate the descriptor against the remote naming and sizing rules.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the descriptor can be sent to the remote service
    /// * `Err(DescriptorError)` - The first rule that is violated
    pub fn validate(&self) -> Result<(), DescriptorError> {
        validate_index_name(&self.name)?;

        if self.dimension == 0 || self.dimension > MAX_DIMENSION {
            return Err(DescriptorError::InvalidDimension(self.dimension));
        }

        if let DeploymentSpec::Serverless { region, .. } = &self.spec {
            if region.trim().is_empty() {
                return Err(DescriptorError::EmptyRegion);
            }
        }

        Ok(())
    }
}

impl Default for IndexDescriptor {
    fn default() -> Self {
        Self::snapconnect_default()
    }
}

impl fmt::Display for IndexDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dimensions, {} metric, {}",
            self.dimension, self.metric, self.spec
        )
    }
}

/// Check an index name against the remote naming rules.
///
/// Names are 1 to 45 characters of lowercase ASCII letters, digits and `-`,
/// and may not start or end with `-`.
fn validate_index_name(name: &str) -> Result<(), DescriptorError> {
    let invalid = |reason: &str| DescriptorError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name must not be empty"));
    }

    if name.len() > MAX_INDEX_NAME_LEN {
        return Err(invalid(&format!(
            "name must be at most {} characters",
            MAX_INDEX_NAME_LEN
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid(
            "only lowercase alphanumeric characters and '-' are allowed",
        ));
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err(invalid("name must not start or end with '-'"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapconnect_default() {
        let descriptor = IndexDescriptor::snapconnect_default();

        assert_eq!(descriptor.name, "snaps-prod");
        assert_eq!(descriptor.dimension, 1536);
        assert_eq!(descriptor.metric, Metric::Cosine);
        assert_eq!(
            descriptor.spec,
            DeploymentSpec::Serverless {
                cloud: Cloud::Aws,
                region: "us-east-1".to_string()
            }
        );
        assert_eq!(descriptor, IndexDescriptor::default());
    }

    #[test]
    fn test_descriptor_serializes_as_create_body() {
        let body = serde_json::to_value(IndexDescriptor::snapconnect_default()).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "name": "snaps-prod",
                "dimension": 1536,
                "metric": "cosine",
                "spec": {
                    "serverless": {
                        "cloud": "aws",
                        "region": "us-east-1"
                    }
                }
            })
        );
    }

    #[test]
    fn test_display() {
        let descriptor = IndexDescriptor::snapconnect_default();
        assert_eq!(
            descriptor.to_string(),
            "1536 dimensions, cosine metric, AWS us-east-1"
        );
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);
        assert_eq!("COSINE".parse::<Metric>().unwrap(), Metric::Cosine);
        assert_eq!("dotproduct".parse::<Metric>().unwrap(), Metric::DotProduct);
        assert_eq!("dot-product".parse::<Metric>().unwrap(), Metric::DotProduct);
        assert_eq!("euclidean".parse::<Metric>().unwrap(), Metric::Euclidean);
        assert_eq!(
            "manhattan".parse::<Metric>(),
            Err(DescriptorError::UnknownMetric("manhattan".to_string()))
        );
    }

    #[test]
    fn test_metric_wire_names() {
        assert_eq!(
            serde_json::to_value(Metric::DotProduct).unwrap(),
            serde_json::json!("dotproduct")
        );
        let metric: Metric = serde_json::from_str("\"euclidean\"").unwrap();
        assert_eq!(metric, Metric::Euclidean);
    }

    #[test]
    fn test_cloud_parsing() {
        assert_eq!("aws".parse::<Cloud>().unwrap(), Cloud::Aws);
        assert_eq!(" GCP ".parse::<Cloud>().unwrap(), Cloud::Gcp);
        assert_eq!("azure".parse::<Cloud>().unwrap(), Cloud::Azure);
        assert!("oracle".parse::<Cloud>().is_err());
    }

    #[test]
    fn test_validate_default_is_valid() {
        assert!(IndexDescriptor::snapconnect_default().validate().is_ok());
    }

    #[test]
    fn test_validate_name_rules() {
        let with_name = |name: &str| {
            let mut descriptor = IndexDescriptor::snapconnect_default();
            descriptor.name = name.to_string();
            descriptor.validate()
        };

        assert!(with_name("snaps-dev-2").is_ok());
        assert!(with_name(&"a".repeat(MAX_INDEX_NAME_LEN)).is_ok());

        assert!(matches!(
            with_name(""),
            Err(DescriptorError::InvalidName { .. })
        ));
        assert!(matches!(
            with_name("Snaps"),
            Err(DescriptorError::InvalidName { .. })
        ));
        assert!(matches!(
            with_name("snaps_prod"),
            Err(DescriptorError::InvalidName { .. })
        ));
        assert!(matches!(
            with_name("-snaps"),
            Err(DescriptorError::InvalidName { .. })
        ));
        assert!(matches!(
            with_name("snaps-"),
            Err(DescriptorError::InvalidName { .. })
        ));
        assert!(matches!(
            with_name(&"a".repeat(MAX_INDEX_NAME_LEN + 1)),
            Err(DescriptorError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_validate_dimension_bounds() {
        let mut descriptor = IndexDescriptor::snapconnect_default();

        descriptor.dimension = 0;
        assert_eq!(
            descriptor.validate(),
            Err(DescriptorError::InvalidDimension(0))
        );

        descriptor.dimension = MAX_DIMENSION + 1;
        assert_eq!(
            descriptor.validate(),
            Err(DescriptorError::InvalidDimension(MAX_DIMENSION + 1))
        );

        descriptor.dimension = MAX_DIMENSION;
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_region() {
        let descriptor =
            IndexDescriptor::serverless("snaps-prod", 1536, Metric::Cosine, Cloud::Aws, " ");
        assert_eq!(descriptor.validate(), Err(DescriptorError::EmptyRegion));
    }

    #[test]
    fn test_pod_spec_deserializes() {
        let spec: DeploymentSpec = serde_json::from_value(serde_json::json!({
            "pod": {
                "environment": "us-east1-gcp",
                "pod_type": "p1.x1",
                "replicas": 1
            }
        }))
        .unwrap();

        assert_eq!(
            spec,
            DeploymentSpec::Pod {
                environment: "us-east1-gcp".to_string(),
                pod_type: Some("p1.x1".to_string())
            }
        );
        assert_eq!(spec.to_string(), "pod us-east1-gcp (p1.x1)");
    }
}
