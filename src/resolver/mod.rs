//! Variable resolution and condition evaluation
//!
//! This module substitutes placeholders in command lines and evaluates the
//! guard conditions that decide whether a command runs.

pub mod condition;
pub mod context;
pub mod interpolate;

// Re-export main types
pub use condition::*;
pub use context::*;
pub use interpolate::*;
