//! Core configuration types
//!
//! This module defines the data structures that represent a yrun.yml document.

use crate::resolver::{evaluate_condition, resolve_variables, EnvLookup, ResolutionContext};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Project name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Variables declared in the document; highest precedence
    #[serde(
        default,
        alias = "vars",
        skip_serializing_if = "HashMap::is_empty",
        deserialize_with = "deserialize_variables"
    )]
    pub variables: HashMap<String, String>,

    /// Commands defined in the configuration
    #[serde(default)]
    pub commands: HashMap<String, Command>,

    /// Variables read from the environment file; filled in at load time
    #[serde(skip)]
    pub env: HashMap<String, String>,
}

/// A command definition
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Command {
    /// Command line to execute
    #[serde(default)]
    pub run: String,

    /// Names of commands this one depends on, unchecked
    #[serde(
        default,
        alias = "deps",
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_dependencies"
    )]
    pub dependencies: Vec<String>,

    /// Description for listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Guard condition; absent or blank means the command always runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Command line to run before `run`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<String>,

    /// Command line to run after `run`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<String>,

    /// Timeout such as `30s` or `5m`, enforced by the executor
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_scalar"
    )]
    pub timeout: Option<String>,

    /// Whether the entries of `commands` may run concurrently
    #[serde(default)]
    pub parallel: bool,

    /// Named sub-command lines
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub commands: HashMap<String, String>,
}

impl Config {
    /// Resolution context over this configuration and the live process environment
    pub fn context(&self) -> ResolutionContext<'_> {
        ResolutionContext::new(&self.variables, &self.env)
    }

    /// Look up a command by name
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Command names in sorted order
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Substitute placeholders in `input` using this configuration's variables
    pub fn resolve_variables(&self, input: &str) -> String {
        resolve_variables(&self.context(), input)
    }

    /// Evaluate a guard condition using this configuration's variables
    pub fn evaluate_condition(&self, condition: &str) -> bool {
        evaluate_condition(&self.context(), condition)
    }

    /// Whether the named command's guard currently allows it to run
    ///
    /// Returns `None` if no such command is defined.
    pub fn should_run(&self, name: &str) -> Option<bool> {
        let ctx = self.context();
        self.command(name).map(|command| command.is_enabled(&ctx))
    }
}

impl Command {
    /// Evaluate this command's guard
    pub fn is_enabled<E: EnvLookup>(&self, ctx: &ResolutionContext<'_, E>) -> bool {
        match &self.condition {
            Some(condition) => evaluate_condition(ctx, condition),
            None => true,
        }
    }

    /// Whether the command lists itself as a dependency
    pub fn depends_on_itself(&self, name: &str) -> bool {
        self.dependencies.iter().any(|dep| dep == name)
    }
}

/// Render a YAML scalar as a string, rejecting collections
fn scalar_to_string(value: serde_yaml::Value) -> Result<Option<String>, String> {
    use serde_yaml::Value;

    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Tagged(tagged) => scalar_to_string(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err("expected a scalar value".to_string()),
    }
}

/// Custom deserializer for variables that accepts any scalar value
fn deserialize_variables<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = Option::<HashMap<String, serde_yaml::Value>>::deserialize(deserializer)?;

    let mut vars = HashMap::new();
    for (name, value) in raw.unwrap_or_default() {
        let value = scalar_to_string(value)
            .map_err(|e| D::Error::custom(format!("variable '{}': {}", name, e)))?;
        vars.insert(name, value.unwrap_or_default());
    }
    Ok(vars)
}

/// Custom deserializer for dependencies that handles both single values and arrays
fn deserialize_dependencies<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![s]),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| String::deserialize(item).map_err(D::Error::custom))
            .collect(),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("dependencies must be a string or array")),
    }
}

/// Custom deserializer for optional fields written as any scalar
fn deserialize_optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_yaml::Value::deserialize(deserializer)?;
    scalar_to_string(value).map_err(D::Error::custom)
}
