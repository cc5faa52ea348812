//! # Index Provisioner Repository
//!
//! This crate provides the trait and implementations for talking to the
//! vector database's administrative API. It includes the error type, the
//! [`IndexProvider`] interface, a concrete implementation for Pinecone and an
//! in-memory mock for tests and dry runs.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod mock;
pub mod pinecone;
pub mod source;

pub use config::PineconeConfig;
pub use errors::IndexProviderError;
pub use interfaces::IndexProvider;
pub use mock::MockIndexProvider;
pub use pinecone::PineconeProvider;
pub use source::ProviderSource;
