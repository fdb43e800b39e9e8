//! CLI module for tasktrack - command-line interface and interactive menu.
//!
//! Provides the main entry point with subcommands for one-shot operations and
//! the line-based login/menu session used when no subcommand is given.

pub mod commands;
pub mod menu;
pub mod prompt;
pub mod render;

pub use commands::Cli;
