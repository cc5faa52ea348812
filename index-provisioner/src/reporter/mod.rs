//! Operator-facing progress messages.
//!
//! Operators read these lines to diagnose setup problems, so their wording is
//! part of the tool's contract. Diagnostics for machines go through `tracing`
//! instead.

use std::fmt;
use std::sync::Mutex;

use index_provisioner_shared::{IndexDescription, IndexDescriptor, Metric};

/// A decision point in the provisioning flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// No credential was supplied.
    MissingCredential { variable: String },
    /// An environment override could not be parsed.
    InvalidSettings { reason: String },
    /// The target descriptor failed validation.
    InvalidTarget { reason: String },
    /// Starting the existence check.
    CheckingExisting { name: String },
    /// The index already exists.
    AlreadyExists { name: String },
    /// Reported configuration of the existing index.
    ExistingDetails {
        dimension: Option<u32>,
        metric: Metric,
    },
    /// The existing index differs from the requested configuration.
    ConfigurationMismatch {
        name: String,
        expected: IndexDescriptor,
        actual: IndexDescription,
    },
    /// The index was not found.
    NotFound { name: String },
    /// The existence check failed; provisioning continues.
    QueryFailed { error: String },
    /// Starting the create call.
    Creating { name: String },
    /// The index was created.
    Created { descriptor: IndexDescriptor },
    /// The create call failed.
    CreationFailed { error: String },
    /// Polling until the new index reports ready.
    WaitingForReady { name: String },
    /// The new index is ready.
    Ready { name: String },
    /// The index did not become ready in time, or polling failed.
    NotReady { name: String, reason: String },
    /// Final line of a successful run.
    SetupComplete,
    /// Final line of a failed run.
    SetupFailed { variable: String },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential { variable } => write!(
                f,
                "❌ {variable} environment variable not set\n\
                 💡 Make sure to set it in your .env file and source it:\n   \
                 export {variable}=your_api_key_here"
            ),
            Self::InvalidSettings { reason } => write!(f, "❌ {reason}"),
            Self::InvalidTarget { reason } => write!(f, "❌ Invalid index configuration: {reason}"),
            Self::CheckingExisting { name } => {
                write!(f, "🔍 Checking for existing index '{name}'")
            }
            Self::AlreadyExists { name } => write!(f, "✅ Index '{name}' already exists"),
            Self::ExistingDetails { dimension, metric } => {
                let dimension = match dimension {
                    Some(dimension) => dimension.to_string(),
                    None => "unknown".to_string(),
                };
                write!(f, "📊 Index details: {dimension} dimensions, {metric} metric")
            }
            Self::ConfigurationMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "⚠️ Index '{name}' does not match the requested configuration: \
                 expected {} dimensions / {} metric, found {} dimensions / {} metric. \
                 The existing index was left unchanged",
                expected.dimension,
                expected.metric,
                actual.dimension_label(),
                actual.metric
            ),
            Self::NotFound { name } => write!(f, "🔎 Index '{name}' not found"),
            Self::QueryFailed { error } => {
                write!(f, "⚠️ Error checking existing indexes: {error}")
            }
            Self::Creating { name } => write!(f, "🔧 Creating Pinecone index: {name}"),
            Self::Created { descriptor } => write!(
                f,
                "✅ Index '{}' created successfully!\n📊 Configuration: {}",
                descriptor.name, descriptor
            ),
            Self::CreationFailed { error } => write!(f, "❌ Failed to create index: {error}"),
            Self::WaitingForReady { name } => {
                write!(f, "⏳ Waiting for index '{name}' to become ready")
            }
            Self::Ready { name } => write!(f, "✅ Index '{name}' is ready"),
            Self::NotReady { name, reason } => {
                write!(f, "⚠️ Index '{name}' is not ready yet: {reason}")
            }
            Self::SetupComplete => write!(
                f,
                "\n🎉 Pinecone setup complete! You can now run: ./setup_cloud_run_env.sh"
            ),
            Self::SetupFailed { variable } => {
                write!(f, "\n💡 Please check your {variable} and try again")
            }
        }
    }
}

/// Sink for progress events.
pub trait ProgressReporter: Send + Sync {
    /// Report one event.
    fn report(&self, event: ProgressEvent);
}

/// Prints every event to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutReporter;

impl ProgressReporter for StdoutReporter {
    fn report(&self, event: ProgressEvent) {
        println!("{event}");
    }
}

/// Keeps events in memory so callers can inspect them.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingReporter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events reported so far, in order.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Rendered messages reported so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: ProgressEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
