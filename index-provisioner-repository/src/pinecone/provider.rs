//! Pinecone provider implementation.
//!
//! This module provides the concrete implementation of `IndexProvider` on top
//! of the Pinecone control-plane REST API, using `reqwest` for transport.

use async_trait::async_trait;
use index_provisioner_shared::{IndexDescription, IndexDescriptor, IndexSummary};
use reqwest::{header::ACCEPT, Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info};
use url::Url;

use crate::config::PineconeConfig;
use crate::errors::IndexProviderError;
use crate::interfaces::IndexProvider;

/// Header carrying the credential.
pub const API_KEY_HEADER: &str = "Api-Key";

/// Header pinning the control-plane API version.
pub const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";

/// Body of `GET /indexes`.
#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexSummary>,
}

/// Error body returned by the control plane, e.g.
/// `{"error": {"code": "ALREADY_EXISTS", "message": "..."}, "status": 409}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

/// Pinecone provider implementation.
///
/// # Example
///
/// ```ignore
/// use index_provisioner_repository::{PineconeConfig, PineconeProvider, IndexProvider};
/// use secrecy::SecretString;
///
/// let api_key = SecretString::from(std::env::var("PINECONE_API_KEY")?);
/// let provider = PineconeProvider::new(api_key, PineconeConfig::default())?;
///
/// for index in provider.list_indexes().await? {
///     let description = provider.describe_index(&index.name).await?;
///     println!("{} ({} dims)", index.name, description.dimension_label());
/// }
/// ```
pub struct PineconeProvider {
    client: Client,
    base_url: Url,
    api_key: SecretString,
    api_version: String,
}

impl PineconeProvider {
    /// Create a new Pinecone provider.
    ///
    /// No request is made here; the credential is first used by the initial
    /// API call.
    ///
    /// # Arguments
    ///
    /// * `api_key` - The project API key
    /// * `config` - Control-plane URL, API version and timeout
    ///
    /// # Returns
    ///
    /// * `Ok(PineconeProvider)` - A new provider instance
    /// * `Err(IndexProviderError)` - If the URL is invalid or the HTTP client cannot be built
    pub fn new(api_key: SecretString, config: PineconeConfig) -> Result<Self, IndexProviderError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| IndexProviderError::connection(format!("Invalid base URL: {}", e)))?;

        if base_url.cannot_be_a_base() {
            return Err(IndexProviderError::connection(format!(
                "Invalid base URL: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IndexProviderError::connection(e.to_string()))?;

        info!(
            base_url = %base_url,
            api_version = %config.api_version,
            timeout_secs = config.timeout.as_secs(),
            "Created Pinecone provider"
        );

        Ok(Self {
            client,
            base_url,
            api_key,
            api_version: config.api_version,
        })
    }

    /// Build an endpoint URL by appending path segments to the base URL.
    ///
    /// Segments are percent-encoded, so an index name can never escape its
    /// path position.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, IndexProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| IndexProviderError::connection("Base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach the credential and versioning headers.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .header(API_VERSION_HEADER, &self.api_version)
            .header(ACCEPT, "application/json")
    }

    /// Turn a response into `T`, mapping non-success statuses to errors.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, IndexProviderError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = Self::error_detail(&body);
            error!(status = %status, detail = %detail, "Pinecone request failed");
            return Err(IndexProviderError::from_status(status.as_u16(), detail));
        }

        serde_json::from_str(&body).map_err(|e| {
            IndexProviderError::parse(format!("Failed to parse response: {}: {}", e, body))
        })
    }

    /// Extract the service's error message from a response body.
    ///
    /// Falls back to the raw body when it is not the structured error format.
    fn error_detail(body: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => match parsed.error.code {
                Some(code) => format!("{}: {}", code, parsed.error.message),
                None => parsed.error.message,
            },
            Err(_) => body.trim().to_string(),
        }
    }
}

#[async_trait]
impl IndexProvider for PineconeProvider {
    async fn list_indexes(&self) -> Result<Vec<IndexSummary>, IndexProviderError> {
        let url = self.endpoint(&["indexes"])?;
        debug!(url = %url, "Listing indexes");

        let response = self.authorized(self.client.get(url)).send().await?;
        let list: IndexList = Self::read_json(response).await?;

        debug!(count = list.indexes.len(), "Listed indexes");
        Ok(list.indexes)
    }

    async fn describe_index(&self, name: &str) -> Result<IndexDescription, IndexProviderError> {
        let url = self.endpoint(&["indexes", name])?;
        debug!(url = %url, index = %name, "Describing index");

        let response = self.authorized(self.client.get(url)).send().await?;
        Self::read_json(response).await
    }

    async fn create_index(
        &self,
        descriptor: &IndexDescriptor,
    ) -> Result<IndexDescription, IndexProviderError> {
        let url = self.endpoint(&["indexes"])?;
        debug!(
            url = %url,
            index = %descriptor.name,
            dimension = descriptor.dimension,
            metric = %descriptor.metric,
            "Creating index"
        );

        let response = self
            .authorized(self.client.post(url))
            .json(descriptor)
            .send()
            .await?;
        let created: IndexDescription = Self::read_json(response).await?;

        info!(index = %created.name, state = %created.status.state, "Index created");
        Ok(created)
    }
}
