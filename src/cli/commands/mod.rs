//! CLI command implementations

pub mod build;
pub mod completions;
pub mod config;
pub mod install;
pub mod sizes;
