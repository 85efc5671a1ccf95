//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod stage;
pub mod template;
pub mod unit;

pub use config::{ConfigField, DeploymentConfig};
pub use error::{DeployError, DeployFailure};
pub use stage::DeployStage;
pub use template::{RenderedUnit, UnitTemplate};
pub use unit::InstalledUnitPath;
