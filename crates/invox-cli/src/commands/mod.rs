//! Subcommands.

pub mod config;
pub mod extract;
pub mod models;
pub mod show;
