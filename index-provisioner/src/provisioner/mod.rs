//! The provisioning flow.
//!
//! [`IndexProvisioner::ensure_index`] makes sure exactly one remote index
//! matching a target descriptor exists:
//!
//! 1. **Credential**: a missing or blank credential fails before any remote call
//! 2. **Existence check**: list indexes, describe the target if present
//! 3. **Create**: when the target is absent or the check could not complete
//!
//! Running it again is safe. An existing index is only read and reported,
//! never mutated or deleted.

use std::sync::Arc;
use std::time::Duration;

use index_provisioner_repository::{IndexProvider, IndexProviderError, ProviderSource};
use index_provisioner_shared::{IndexDescription, IndexDescriptor};
use secrecy::{ExposeSecret, SecretString};
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::errors::ProvisionError;
use crate::reporter::{ProgressEvent, ProgressReporter, StdoutReporter};

/// Environment variable operators are told to set when the credential is missing.
pub const DEFAULT_CREDENTIAL_VARIABLE: &str = "PINECONE_API_KEY";

/// Default interval between readiness polls.
const DEFAULT_READY_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default upper bound on waiting for readiness.
const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(300);

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionStatus {
    /// The index was already present; carries what the service reported.
    AlreadyExists(IndexDescription),
    /// The index was created by this run.
    Created(IndexDescription),
}

impl ProvisionStatus {
    /// The reported description of the index.
    pub fn description(&self) -> &IndexDescription {
        match self {
            Self::AlreadyExists(description) | Self::Created(description) => description,
        }
    }
}

/// Result of the existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existence {
    /// The target name is present; carries its description.
    Found(IndexDescription),
    /// The target name is absent.
    Missing,
}

/// Behavior switches for the provisioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionerOptions {
    /// Return `QueryError` when the existence check fails instead of
    /// continuing to the create call.
    pub strict_existence_check: bool,
    /// Poll the new index until it reports ready.
    pub wait_until_ready: bool,
    /// Interval between readiness polls.
    pub ready_poll_interval: Duration,
    /// Upper bound on waiting for readiness.
    pub ready_timeout: Duration,
    /// Variable name shown in the missing-credential hint.
    pub credential_variable: String,
}

impl Default for ProvisionerOptions {
    fn default() -> Self {
        Self {
            strict_existence_check: false,
            wait_until_ready: false,
            ready_poll_interval: DEFAULT_READY_POLL_INTERVAL,
            ready_timeout: DEFAULT_READY_TIMEOUT,
            credential_variable: DEFAULT_CREDENTIAL_VARIABLE.to_string(),
        }
    }
}

/// Ensures a remote index exists.
///
/// # Example
///
/// ```ignore
/// use index_provisioner::{IndexProvisioner, ProvisionStatus};
/// use index_provisioner_repository::{PineconeConfig, ProviderSource};
/// use index_provisioner_shared::IndexDescriptor;
///
/// let provisioner = IndexProvisioner::new(ProviderSource::live(PineconeConfig::default()));
/// let credential = std::env::var("PINECONE_API_KEY").ok().map(SecretString::from);
///
/// match provisioner.ensure_index(credential, &IndexDescriptor::snapconnect_default()).await? {
///     ProvisionStatus::AlreadyExists(_) => println!("nothing to do"),
///     ProvisionStatus::Created(_) => println!("created"),
/// }
/// ```
pub struct IndexProvisioner {
    source: ProviderSource,
    options: ProvisionerOptions,
    reporter: Arc<dyn ProgressReporter>,
}

impl IndexProvisioner {
    /// Create a provisioner with default options, reporting to stdout.
    pub fn new(source: ProviderSource) -> Self {
        Self::with_options(source, ProvisionerOptions::default())
    }

    /// Create a provisioner with custom options, reporting to stdout.
    pub fn with_options(source: ProviderSource, options: ProvisionerOptions) -> Self {
        Self {
            source,
            options,
            reporter: Arc::new(StdoutReporter),
        }
    }

    /// Replace the progress reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Ensure an index matching `target` exists.
    ///
    /// # Arguments
    ///
    /// * `credential` - The API key, `None` if the caller could not find one
    /// * `target` - The index configuration to ensure
    ///
    /// # Returns
    ///
    /// * `Ok(ProvisionStatus::AlreadyExists)` - The index was present; nothing was created
    /// * `Ok(ProvisionStatus::Created)` - The index was created by this call
    /// * `Err(ProvisionError::ConfigurationError)` - Missing credential or invalid target; no remote call made
    /// * `Err(ProvisionError::QueryError)` - Only with `strict_existence_check`
    /// * `Err(ProvisionError::CreationError)` - The create call failed
    #[instrument(skip(self, credential, target), fields(index = %target.name))]
    pub async fn ensure_index(
        &self,
        credential: Option<SecretString>,
        target: &IndexDescriptor,
    ) -> Result<ProvisionStatus, ProvisionError> {
        let api_key = self.require_credential(credential)?;

        if let Err(e) = target.validate() {
            self.reporter.report(ProgressEvent::InvalidTarget {
                reason: e.to_string(),
            });
            return Err(ProvisionError::configuration(e.to_string()));
        }

        let provider = self.source.connect(api_key).map_err(|e| {
            error!(error = %e, "Failed to configure index provider");
            ProvisionError::configuration(format!("Failed to configure index provider: {}", e))
        })?;

        self.reporter.report(ProgressEvent::CheckingExisting {
            name: target.name.clone(),
        });

        match self.check_existing(provider.as_ref(), target).await {
            Ok(Existence::Found(description)) => {
                return Ok(self.report_existing(target, description));
            }
            Ok(Existence::Missing) => {
                info!("Index not found");
                self.reporter.report(ProgressEvent::NotFound {
                    name: target.name.clone(),
                });
            }
            Err(e) => {
                warn!(error = %e, "Existence check failed");
                self.reporter.report(ProgressEvent::QueryFailed {
                    error: e.provider_error().map_or_else(|| e.to_string(), ToString::to_string),
                });
                if self.options.strict_existence_check {
                    return Err(e);
                }
            }
        }

        let created = self.create(provider.as_ref(), target).await?;

        if self.options.wait_until_ready && !created.status.ready {
            let ready = self.wait_until_ready(provider.as_ref(), &target.name).await;
            return Ok(ProvisionStatus::Created(ready.unwrap_or(created)));
        }

        Ok(ProvisionStatus::Created(created))
    }

    /// Check that a credential was supplied and is not blank.
    fn require_credential(
        &self,
        credential: Option<SecretString>,
    ) -> Result<SecretString, ProvisionError> {
        match credential {
            Some(key) if !key.expose_secret().trim().is_empty() => Ok(key),
            _ => {
                let variable = &self.options.credential_variable;
                error!(variable = %variable, "Credential not provided");
                self.reporter.report(ProgressEvent::MissingCredential {
                    variable: variable.clone(),
                });
                Err(ProvisionError::configuration(format!(
                    "{} is not set",
                    variable
                )))
            }
        }
    }

    /// Look the target up by name.
    ///
    /// Listing and describing are one step: a failure of either is a
    /// `QueryError`.
    pub async fn check_existing(
        &self,
        provider: &dyn IndexProvider,
        target: &IndexDescriptor,
    ) -> Result<Existence, ProvisionError> {
        let indexes = provider
            .list_indexes()
            .await
            .map_err(ProvisionError::query)?;

        debug!(count = indexes.len(), "Listed existing indexes");

        if !indexes.iter().any(|index| index.name == target.name) {
            return Ok(Existence::Missing);
        }

        let description = provider
            .describe_index(&target.name)
            .await
            .map_err(ProvisionError::query)?;

        Ok(Existence::Found(description))
    }

    /// Report an existing index and warn when it differs from the target.
    fn report_existing(
        &self,
        target: &IndexDescriptor,
        description: IndexDescription,
    ) -> ProvisionStatus {
        info!(
            dimension = ?description.dimension,
            metric = %description.metric,
            ready = description.status.ready,
            "Index already exists"
        );
        self.reporter.report(ProgressEvent::AlreadyExists {
            name: target.name.clone(),
        });
        self.reporter.report(ProgressEvent::ExistingDetails {
            dimension: description.dimension,
            metric: description.metric,
        });

        if !description.matches(target) {
            warn!(
                expected_dimension = target.dimension,
                expected_metric = %target.metric,
                actual_dimension = ?description.dimension,
                actual_metric = %description.metric,
                "Existing index does not match requested configuration"
            );
            self.reporter.report(ProgressEvent::ConfigurationMismatch {
                name: target.name.clone(),
                expected: target.clone(),
                actual: description.clone(),
            });
        }

        ProvisionStatus::AlreadyExists(description)
    }

    /// Issue exactly one create call.
    async fn create(
        &self,
        provider: &dyn IndexProvider,
        target: &IndexDescriptor,
    ) -> Result<IndexDescription, ProvisionError> {
        self.reporter.report(ProgressEvent::Creating {
            name: target.name.clone(),
        });

        match provider.create_index(target).await {
            Ok(created) => {
                info!(
                    dimension = target.dimension,
                    metric = %target.metric,
                    spec = %target.spec,
                    "Index created"
                );
                self.reporter.report(ProgressEvent::Created {
                    descriptor: target.clone(),
                });
                Ok(created)
            }
            Err(e) => {
                error!(error = %e, "Index creation failed");
                self.reporter
                    .report(ProgressEvent::CreationFailed { error: e.to_string() });
                Err(ProvisionError::creation(e))
            }
        }
    }

    /// Poll `describe_index` until the index is ready or the timeout elapses.
    ///
    /// Returns the last description when the index became ready. Failures are
    /// reported and swallowed: the index exists either way.
    async fn wait_until_ready(
        &self,
        provider: &dyn IndexProvider,
        name: &str,
    ) -> Option<IndexDescription> {
        self.reporter.report(ProgressEvent::WaitingForReady {
            name: name.to_string(),
        });

        let started = Instant::now();
        loop {
            let not_ready = |reason: String| {
                warn!(reason = %reason, "Index did not become ready");
                self.reporter.report(ProgressEvent::NotReady {
                    name: name.to_string(),
                    reason,
                });
            };

            match provider.describe_index(name).await {
                Ok(description) if description.status.ready => {
                    info!(elapsed_ms = started.elapsed().as_millis() as u64, "Index ready");
                    self.reporter.report(ProgressEvent::Ready {
                        name: name.to_string(),
                    });
                    return Some(description);
                }
                Ok(description) => {
                    debug!(state = %description.status.state, "Index not ready yet");
                }
                Err(IndexProviderError::NotFound(_)) => {
                    // Freshly created indexes can briefly be missing from describe.
                    debug!("Index not visible yet");
                }
                Err(e) => {
                    not_ready(format!("failed to poll status: {}", e));
                    return None;
                }
            }

            if started.elapsed() >= self.options.ready_timeout {
                not_ready(format!(
                    "still initializing after {}s",
                    self.options.ready_timeout.as_secs()
                ));
                return None;
            }

            sleep(self.options.ready_poll_interval).await;
        }
    }
}
