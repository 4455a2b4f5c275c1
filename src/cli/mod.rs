//! CLI interface and argument parsing
//!
//! This module handles command-line parsing, output formatting, and shell
//! completion for the inspection binary.

pub mod app;

// Re-export main types
pub use app::*;
