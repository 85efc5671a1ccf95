//! Unit tests for the unitdeploy CLI
//!
//! These tests use in-memory service controllers and temporary unit
//! directories; nothing touches the host service manager.

mod helpers;
