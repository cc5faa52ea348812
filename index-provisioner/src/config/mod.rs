//! Configuration loading for the provisioner binary.

mod settings;

pub use settings::ProvisionerSettings;
