//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, unit
//! file installation, template loading, and the `systemctl` client.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod installer;
pub mod launcher;
pub mod recording;
pub mod systemctl;
pub mod templates;
