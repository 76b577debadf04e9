//! CLI argument parsing and command dispatch.

pub mod args;
pub mod context;
pub mod providers;
pub mod sites;
pub mod tokens;

pub use args::{Cli, Commands, OutputFormat};
pub use context::CommandContext;
