//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod artifact;
pub mod composer;
pub mod config;
pub mod context;
pub mod dialect;
pub mod error;
pub mod options;
pub mod phase;
pub mod platform;
pub mod template;

pub use config::{ProvisionConfig, ProvisionerFile, ProvisionerInput, TransportConfig, TransportKind};
pub use context::{RunContext, TargetArtifact};
pub use error::{ConfigError, ProvisionError};
pub use phase::Phase;
pub use platform::Platform;
