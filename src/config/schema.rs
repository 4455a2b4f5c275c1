//! Configuration validation
//!
//! Loading accepts any well-formed document. Callers that want stricter
//! checks can run [`validate_config`] afterwards. Dependency names are not
//! checked here; dangling names, self-references and cycles are left to the
//! executor.

use crate::config::types::{Command, Config};
use crate::error::{ConfigError, ConfigResult};
use std::time::Duration;

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    for name in config.command_names() {
        validate_command(name, &config.commands[name])?;
    }
    Ok(())
}

/// Validate a single command
pub fn validate_command(name: &str, command: &Command) -> ConfigResult<()> {
    if command.run.trim().is_empty() && command.commands.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "Command '{}' has nothing to run",
            name
        )));
    }

    if command.parallel && command.commands.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "Command '{}' is parallel but defines no commands",
            name
        )));
    }

    if let Some(timeout) = &command.timeout {
        parse_timeout(timeout).map_err(|e| {
            ConfigError::Invalid(format!("Command '{}': {}", name, e))
        })?;
    }

    Ok(())
}

/// Parse a timeout such as `500ms`, `30s`, `5m`, `2h` or a bare number of seconds
pub fn parse_timeout(value: &str) -> ConfigResult<Duration> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);

    let amount: u64 = digits.parse().map_err(|_| {
        ConfigError::Invalid(format!("Invalid timeout '{}'", value))
    })?;

    let duration = match unit.trim() {
        "ms" => Duration::from_millis(amount),
        "" | "s" => Duration::from_secs(amount),
        "m" => Duration::from_secs(amount.saturating_mul(60)),
        "h" => Duration::from_secs(amount.saturating_mul(3600)),
        other => {
            return Err(ConfigError::Invalid(format!(
                "Invalid timeout unit '{}' in '{}'. Must be one of: ms, s, m, h",
                other, value
            )))
        }
    };

    Ok(duration)
}
