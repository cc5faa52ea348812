//! # Index Provisioner
//!
//! Idempotent setup of the Pinecone index used by the SnapConnect AI pipeline.
//! Checks whether the target index exists and creates it with fixed
//! parameters if it does not.
//!
//! ## Flow
//!
//! 1. **Credential**: required; a missing key fails before any remote call
//! 2. **Existence check**: list and describe; failures are reported and skipped
//! 3. **Create**: exactly one create call, never retried
//!
//! ## Modules
//!
//! - [`config`]: Settings read from environment variables
//! - [`provisioner`]: The `ensure_index` flow
//! - [`reporter`]: Operator-facing progress messages
//! - [`errors`]: Error types for the flow

pub mod config;
pub mod errors;
pub mod provisioner;
pub mod reporter;

pub use config::ProvisionerSettings;
pub use errors::ProvisionError;
pub use provisioner::{Existence, IndexProvisioner, ProvisionStatus, ProvisionerOptions};
pub use reporter::{ProgressEvent, ProgressReporter, RecordingReporter, StdoutReporter};

use thiserror::Error;

use provisioner::DEFAULT_CREDENTIAL_VARIABLE;

/// Process exit status of a successful run.
pub const EXIT_SUCCESS: u8 = 0;

/// Process exit status of a failed run.
pub const EXIT_FAILURE: u8 = 1;

/// Errors that can end a run of the provisioner binary.
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Provisioning error.
    #[error("Provisioning error: {0}")]
    ProvisionError(#[from] ProvisionError),
}

impl ApplicationError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Closing operator messages and exit status for a finished run.
///
/// The provisioner reports its own failures as they happen. Settings errors
/// occur before it runs, so they are reported here ahead of the final hint.
pub fn completion(result: &Result<ProvisionStatus, ApplicationError>) -> (Vec<ProgressEvent>, u8) {
    match result {
        Ok(_) => (vec![ProgressEvent::SetupComplete], EXIT_SUCCESS),
        Err(e) => {
            let mut events = Vec::new();
            if let ApplicationError::ConfigError(reason) = e {
                events.push(ProgressEvent::InvalidSettings {
                    reason: reason.clone(),
                });
            }
            events.push(ProgressEvent::SetupFailed {
                variable: DEFAULT_CREDENTIAL_VARIABLE.to_string(),
            });
            (events, EXIT_FAILURE)
        }
    }
}
