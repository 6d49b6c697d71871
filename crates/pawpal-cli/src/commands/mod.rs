//! CLI subcommand implementations.

pub mod conflicts;
pub mod export;
pub mod import;
pub mod pet;
pub mod plan;
pub mod status;
pub mod task;
pub mod util;
