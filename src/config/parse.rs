//! Configuration file discovery and loading

use crate::config::assemble::assemble;
use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, Result};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file names to look for, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["yrun.yml", "yrun.yaml"];

/// Environment file expected next to the configuration file
pub const ENV_FILE_NAME: &str = ".env";

/// Find the configuration file in a directory (parents are not searched)
pub fn find_config_file_in(dir: &Path) -> ConfigResult<PathBuf> {
    let mut searched_paths = Vec::new();

    for file_name in CONFIG_FILE_NAMES {
        let config_path = dir.join(file_name);
        if config_path.is_file() {
            return Ok(config_path);
        }
        searched_paths.push(config_path.display().to_string());
    }

    Err(ConfigError::NotFound(searched_paths.join(", ")))
}

/// Load the configuration from the current working directory
pub fn load_configuration() -> Result<Config> {
    let dir = env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?;
    load_configuration_in(&dir)
}

/// Load the configuration found in `dir`
pub fn load_configuration_in(dir: &Path) -> Result<Config> {
    let config_path = find_config_file_in(dir)?;
    load_configuration_from(&config_path)
}

/// Load a configuration file and the `.env` file beside it
pub fn load_configuration_from(path: &Path) -> Result<Config> {
    load_configuration_with(path, None)
}

/// Load a configuration file with an explicit environment file
///
/// With `env_path` unset the sibling `.env` is used if present. An explicit
/// environment file must exist.
pub fn load_configuration_with(path: &Path, env_path: Option<&Path>) -> Result<Config> {
    let mut config = parse_config_file(path)?;

    config.env = match env_path {
        Some(env_path) => load_env_file(env_path)?,
        None => {
            let sibling = env_file_beside(path);
            if sibling.is_file() {
                load_env_file(&sibling)?
            } else {
                debug!(path = %sibling.display(), "no environment file");
                HashMap::new()
            }
        }
    };

    assemble(&mut config);

    debug!(
        path = %path.display(),
        commands = config.commands.len(),
        variables = config.variables.len(),
        env_vars = config.env.len(),
        "loaded configuration"
    );

    Ok(config)
}

/// Path of the environment file that accompanies a configuration file
pub fn env_file_beside(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(ENV_FILE_NAME)
}

/// Parse a configuration file without reading its environment file or resolving it
pub fn parse_config_file(path: &Path) -> ConfigResult<Config> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> ConfigResult<Config> {
    serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
        path: PathBuf::from("<string>"),
        source,
    })
}

/// Read a `KEY=VALUE` environment file into a map
///
/// The process environment is left untouched.
pub fn load_env_file(path: &Path) -> ConfigResult<HashMap<String, String>> {
    let env_error = |source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(env_error)? {
        let (key, value) = item.map_err(env_error)?;
        vars.insert(key, value);
    }

    debug!(path = %path.display(), count = vars.len(), "read environment file");
    Ok(vars)
}
