//! Mock index provider for testing and dry runs.
//!
//! The `MockIndexProvider` keeps indexes in memory and records every call it
//! receives, so tests can assert exactly which remote operations a flow
//! performed. Clones share state: hand one clone to the code under test and
//! inspect the other.
//!
//! # Example
//!
//! ```ignore
//! use index_provisioner_repository::{IndexProvider, MockIndexProvider};
//! use index_provisioner_shared::IndexDescriptor;
//!
//! let mock = MockIndexProvider::new();
//! mock.create_index(&IndexDescriptor::snapconnect_default()).await?;
//!
//! assert_eq!(mock.create_calls().len(), 1);
//! assert!(mock.has_index("snaps-prod"));
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use index_provisioner_shared::{IndexDescription, IndexDescriptor, IndexStatus, IndexSummary};

use crate::errors::IndexProviderError;
use crate::interfaces::IndexProvider;

#[derive(Debug, Default)]
struct MockState {
    indexes: Vec<IndexDescription>,
    list_calls: usize,
    describe_calls: Vec<String>,
    create_calls: Vec<IndexDescriptor>,
    list_error: Option<IndexProviderError>,
    describe_error: Option<IndexProviderError>,
    create_error: Option<IndexProviderError>,
    /// Number of describe calls a newly created index stays not-ready for.
    ready_after_describes: Option<usize>,
    /// Index another run creates just before our next create call lands.
    racing_create: Option<IndexDescription>,
    /// Panic on any call.
    deny_calls: bool,
}

/// In-memory index provider that records calls.
#[derive(Debug, Clone, Default)]
pub struct MockIndexProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockIndexProvider {
    /// Create a new mock with no indexes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock pre-populated with the given indexes.
    pub fn with_indexes(indexes: Vec<IndexDescription>) -> Self {
        let mock = Self::new();
        mock.state().indexes = indexes;
        mock
    }

    /// Create a mock that panics if any operation is attempted.
    ///
    /// Use this to prove that a code path makes no remote calls.
    pub fn deny_all() -> Self {
        let mock = Self::new();
        mock.state().deny_calls = true;
        mock
    }

    /// Make every `list_indexes` call fail with `error`.
    pub fn fail_list(self, error: IndexProviderError) -> Self {
        self.state().list_error = Some(error);
        self
    }

    /// Make every `describe_index` call fail with `error`.
    pub fn fail_describe(self, error: IndexProviderError) -> Self {
        self.state().describe_error = Some(error);
        self
    }

    /// Make every `create_index` call fail with `error`.
    pub fn fail_create(self, error: IndexProviderError) -> Self {
        self.state().create_error = Some(error);
        self
    }

    /// Report newly created indexes as initializing until they have been
    /// described `describes` times.
    pub fn ready_after_describes(self, describes: usize) -> Self {
        self.state().ready_after_describes = Some(describes);
        self
    }

    /// Simulate a concurrent run whose create of `winner` lands between this
    /// run's existence check and its own create call.
    pub fn lose_creation_race(self, winner: IndexDescription) -> Self {
        self.state().racing_create = Some(winner);
        self
    }

    /// Check if an index with the given name exists in the mock.
    pub fn has_index(&self, name: &str) -> bool {
        self.state().indexes.iter().any(|index| index.name == name)
    }

    /// Number of `list_indexes` calls received.
    pub fn list_calls(&self) -> usize {
        self.state().list_calls
    }

    /// Names passed to `describe_index`, in call order.
    pub fn describe_calls(&self) -> Vec<String> {
        self.state().describe_calls.clone()
    }

    /// Descriptors passed to `create_index`, in call order.
    pub fn create_calls(&self) -> Vec<IndexDescriptor> {
        self.state().create_calls.clone()
    }

    /// Total number of calls of any kind.
    pub fn total_calls(&self) -> usize {
        let state = self.state();
        state.list_calls + state.describe_calls.len() + state.create_calls.len()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the recorded calls from others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn guard(state: &MockState, operation: &str) {
        if state.deny_calls {
            panic!("MockIndexProvider::deny_all received unexpected {} call", operation);
        }
    }
}

#[async_trait]
impl IndexProvider for MockIndexProvider {
    async fn list_indexes(&self) -> Result<Vec<IndexSummary>, IndexProviderError> {
        let mut state = self.state();
        Self::guard(&state, "list_indexes");
        state.list_calls += 1;

        if let Some(error) = &state.list_error {
            return Err(error.clone());
        }
        Ok(state.indexes.iter().map(IndexSummary::from).collect())
    }

    async fn describe_index(&self, name: &str) -> Result<IndexDescription, IndexProviderError> {
        let mut state = self.state();
        Self::guard(&state, "describe_index");
        state.describe_calls.push(name.to_string());

        if let Some(error) = &state.describe_error {
            return Err(error.clone());
        }

        if let Some(remaining) = state.ready_after_describes.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        let now_ready = state.ready_after_describes.map_or(true, |r| r == 0);

        let index = state
            .indexes
            .iter_mut()
            .find(|index| index.name == name)
            .ok_or_else(|| IndexProviderError::not_found(name))?;

        if now_ready && !index.status.ready {
            index.status = IndexStatus {
                ready: true,
                state: "Ready".to_string(),
            };
        }
        Ok(index.clone())
    }

    async fn create_index(
        &self,
        descriptor: &IndexDescriptor,
    ) -> Result<IndexDescription, IndexProviderError> {
        let mut state = self.state();
        Self::guard(&state, "create_index");
        state.create_calls.push(descriptor.clone());

        if let Some(error) = &state.create_error {
            return Err(error.clone());
        }

        if let Some(winner) = state.racing_create.take() {
            state.indexes.push(winner);
        }

        if state.indexes.iter().any(|index| index.name == descriptor.name) {
            return Err(IndexProviderError::already_exists(format!(
                "Resource {} already exists",
                descriptor.name
            )));
        }

        let mut created = IndexDescription::initializing(descriptor);
        if state.ready_after_describes.is_none() {
            created.status = IndexStatus {
                ready: true,
                state: "Ready".to_string(),
            };
        }
        state.indexes.push(created.clone());
        Ok(created)
    }
}
