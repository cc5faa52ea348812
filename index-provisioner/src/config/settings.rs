//! Settings for the provisioner binary, read from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use index_provisioner_repository::config::{DEFAULT_CONTROLLER_HOST, DEFAULT_TIMEOUT_SECS};
use index_provisioner_repository::PineconeConfig;
use index_provisioner_shared::{Cloud, DeploymentSpec, IndexDescriptor, Metric};
use secrecy::SecretString;
use tracing::info;

use crate::provisioner::{ProvisionerOptions, DEFAULT_CREDENTIAL_VARIABLE};
use crate::ApplicationError;

/// Default readiness timeout in seconds.
const DEFAULT_READY_TIMEOUT_SECS: u64 = 300;

/// Everything the binary needs for one run.
#[derive(Debug)]
pub struct ProvisionerSettings {
    /// The API key, if one was found.
    pub api_key: Option<SecretString>,
    /// The index to ensure.
    pub target: IndexDescriptor,
    /// Control-plane connection settings.
    pub pinecone: PineconeConfig,
    /// Provisioner behavior.
    pub options: ProvisionerOptions,
}

impl ProvisionerSettings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `PINECONE_API_KEY`: API key (required at provisioning time, not here)
    /// - `PINECONE_INDEX_NAME`: Index name (default: snaps-prod)
    /// - `PINECONE_INDEX_DIMENSION`: Vector width (default: 1536)
    /// - `PINECONE_INDEX_METRIC`: cosine, dotproduct or euclidean (default: cosine)
    /// - `PINECONE_CLOUD`: aws, gcp or azure (default: aws)
    /// - `PINECONE_REGION`: Cloud region (default: us-east-1)
    /// - `PINECONE_CONTROLLER_HOST`: Control-plane URL (default: https://api.pinecone.io)
    /// - `PINECONE_TIMEOUT_SECS`: Request timeout (default: 30)
    /// - `PINECONE_WAIT_UNTIL_READY`: Poll until the new index is ready (default: false)
    /// - `PINECONE_READY_TIMEOUT_SECS`: Readiness timeout (default: 300)
    ///
    /// # Returns
    ///
    /// * `Ok(ProvisionerSettings)` - Parsed settings
    /// * `Err(ApplicationError)` - If an override is present but unparseable
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup function.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApplicationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let defaults = IndexDescriptor::snapconnect_default();
        let (default_cloud, default_region) = match &defaults.spec {
            DeploymentSpec::Serverless { cloud, region } => (*cloud, region.clone()),
            DeploymentSpec::Pod { .. } => (Cloud::default(), String::new()),
        };

        let name = get("PINECONE_INDEX_NAME").unwrap_or(defaults.name);
        let dimension =
            parse_or("PINECONE_INDEX_DIMENSION", get("PINECONE_INDEX_DIMENSION"), defaults.dimension)?;
        let metric: Metric =
            parse_or("PINECONE_INDEX_METRIC", get("PINECONE_INDEX_METRIC"), defaults.metric)?;
        let cloud: Cloud = parse_or("PINECONE_CLOUD", get("PINECONE_CLOUD"), default_cloud)?;
        let region = get("PINECONE_REGION").unwrap_or(default_region);

        let target = IndexDescriptor::serverless(name, dimension, metric, cloud, region);

        let base_url =
            get("PINECONE_CONTROLLER_HOST").unwrap_or_else(|| DEFAULT_CONTROLLER_HOST.to_string());
        let timeout_secs =
            parse_or("PINECONE_TIMEOUT_SECS", get("PINECONE_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;
        let pinecone =
            PineconeConfig::with_base_url(base_url).timeout(Duration::from_secs(timeout_secs));

        let wait_until_ready = match get("PINECONE_WAIT_UNTIL_READY") {
            Some(value) => parse_bool("PINECONE_WAIT_UNTIL_READY", &value)?,
            None => false,
        };
        let ready_timeout_secs = parse_or(
            "PINECONE_READY_TIMEOUT_SECS",
            get("PINECONE_READY_TIMEOUT_SECS"),
            DEFAULT_READY_TIMEOUT_SECS,
        )?;
        let options = ProvisionerOptions {
            wait_until_ready,
            ready_timeout: Duration::from_secs(ready_timeout_secs),
            credential_variable: DEFAULT_CREDENTIAL_VARIABLE.to_string(),
            ..Default::default()
        };

        let api_key = lookup(DEFAULT_CREDENTIAL_VARIABLE).map(SecretString::from);

        info!(
            index = %target.name,
            dimension = target.dimension,
            metric = %target.metric,
            spec = %target.spec,
            controller_host = %pinecone.base_url,
            wait_until_ready = options.wait_until_ready,
            api_key_present = api_key.is_some(),
            "Loaded provisioner settings"
        );

        Ok(Self {
            api_key,
            target,
            pinecone,
            options,
        })
    }
}

/// Parse an optional value, falling back to `default` when unset.
fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, ApplicationError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ApplicationError::config(format!("Invalid {}='{}': {}", key, raw, e))),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ApplicationError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ApplicationError::config(format!(
            "Invalid {}='{}': expected true or false",
            key, raw
        ))),
    }
}
