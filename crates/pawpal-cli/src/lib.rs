//! PawPal CLI library.
//!
//! This crate provides the `pawpal` command-line interface over the
//! scheduling engine and its `SQLite` store.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, PetAction, TaskAction};
pub use config::Config;
