//! Command implementations

pub mod deploy;
pub mod dev;
pub mod render;
pub mod version;
