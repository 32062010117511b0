//! Metadata fetchers for package registries

pub mod npm;

pub use npm::{registry_link, PackageMetadata, RegistryClient};
