//! Subcommand implementations

pub mod cluster;
pub mod cost;
pub mod security;
