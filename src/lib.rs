//! yrun - variable resolution and guard evaluation for YAML task definitions
//!
//! yrun loads a `yrun.yml` project document and its sibling `.env` file,
//! substitutes `$VAR` / `${VAR}` placeholders in command lines, and evaluates
//! the small condition language that decides whether a command runs.
//! Executing the commands is left to the caller.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod resolver;

// Re-export commonly used types
pub use config::{load_configuration, Command, Config};
pub use error::{ConfigError, Error, InterpolationError, Result};
pub use resolver::{evaluate_condition, resolve_variables, ResolutionContext};

/// Current version of yrun
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
