//! Configuration loading and validation
//!
//! This module reads yrun.yml and its environment file, and resolves the
//! command lines they define.

pub mod assemble;
pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use assemble::*;
pub use parse::*;
pub use schema::*;
pub use types::*;
