//! CLI command implementations

pub mod build;
pub mod cache;
pub mod install;
pub mod platform;
