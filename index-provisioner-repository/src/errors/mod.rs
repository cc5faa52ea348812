//! Error types for the index provisioner repository.
//!
//! This module provides a unified error type for all administrative API calls.

mod index_provider_error;

pub use index_provider_error::IndexProviderError;
