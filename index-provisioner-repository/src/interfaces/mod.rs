//! Interface definitions for the administrative API.
//!
//! This module defines the abstract `IndexProvider` trait that allows the
//! provisioner to run against the live service or a mock.

mod index_provider;

pub use index_provider::IndexProvider;
