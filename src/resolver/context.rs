//! Resolution context
//!
//! A read-only view over the three variable sources consulted when a
//! placeholder is resolved: variables declared in the document, the
//! environment-file overlay, and the process environment.

use std::borrow::Cow;
use std::collections::HashMap;
use std::env;
use std::fmt;

/// Lowest-precedence variable source
pub trait EnvLookup {
    /// Look up a variable by name
    fn lookup(&self, name: &str) -> Option<String>;
}

/// The live process environment, read on every lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<E: EnvLookup + ?Sized> EnvLookup for &E {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }
}

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarSource {
    Declared,
    Overlay,
    Environment,
}

impl fmt::Display for VarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VarSource::Declared => "declared",
            VarSource::Overlay => "env-file",
            VarSource::Environment => "environment",
        };
        f.write_str(label)
    }
}

/// Ephemeral view combining the variable sources of one configuration
///
/// The two maps are borrowed, never merged: precedence is decided per lookup
/// so that variables missing from both still see the current environment.
#[derive(Debug, Clone)]
pub struct ResolutionContext<'a, E = ProcessEnv> {
    declared: &'a HashMap<String, String>,
    overlay: &'a HashMap<String, String>,
    env: E,
}

impl<'a> ResolutionContext<'a, ProcessEnv> {
    /// Create a context backed by the live process environment
    pub fn new(
        declared: &'a HashMap<String, String>,
        overlay: &'a HashMap<String, String>,
    ) -> Self {
        ResolutionContext {
            declared,
            overlay,
            env: ProcessEnv,
        }
    }
}

impl<'a, E: EnvLookup> ResolutionContext<'a, E> {
    /// Replace the environment source
    pub fn with_env<F: EnvLookup>(self, env: F) -> ResolutionContext<'a, F> {
        ResolutionContext {
            declared: self.declared,
            overlay: self.overlay,
            env,
        }
    }

    /// Resolve a variable name, reporting which source supplied it
    pub fn lookup(&self, name: &str) -> Option<(Cow<'a, str>, VarSource)> {
        if let Some(value) = self.declared.get(name) {
            return Some((Cow::Borrowed(value.as_str()), VarSource::Declared));
        }
        if let Some(value) = self.overlay.get(name) {
            return Some((Cow::Borrowed(value.as_str()), VarSource::Overlay));
        }
        self.env
            .lookup(name)
            .map(|value| (Cow::Owned(value), VarSource::Environment))
    }

    /// Resolve a variable name to its value
    pub fn get(&self, name: &str) -> Option<Cow<'a, str>> {
        self.lookup(name).map(|(value, _)| value)
    }

    /// Whether any source defines the variable
    pub fn is_defined(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Variables declared in the document
    pub fn declared(&self) -> &'a HashMap<String, String> {
        self.declared
    }

    /// Variables read from the environment file
    pub fn overlay(&self) -> &'a HashMap<String, String> {
        self.overlay
    }
}
