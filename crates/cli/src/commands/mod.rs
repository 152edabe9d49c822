//! Subcommand implementations

pub mod config;
pub mod doctor;
pub mod hash;
pub mod import;
pub mod status;
pub mod update;
