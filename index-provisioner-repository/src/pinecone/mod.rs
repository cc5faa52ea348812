//! Pinecone implementation of the index provider.
//!
//! This module provides a concrete implementation of `IndexProvider` using the
//! Pinecone control-plane REST API.

mod provider;

pub use provider::{PineconeProvider, API_KEY_HEADER, API_VERSION_HEADER};
