//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod check_options;
mod completions;
mod config;
mod generate;
mod utils;

pub use check_options::handle_check_options;
pub use completions::handle_completions;
pub use config::handle_config;
pub use generate::handle_generate;
