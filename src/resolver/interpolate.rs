//! Variable interpolation for strings
//!
//! Placeholders take two forms that share one namespace:
//! - `$NAME` - the longest run of letters, digits and underscores after `$`
//! - `${NAME}` - the same identifier class between braces
//!
//! Each placeholder is looked up independently through the
//! [`ResolutionContext`]. Unknown placeholders are left exactly as written so
//! a shell further down the line can still expand them. Substitution is a
//! single left-to-right pass; inserted values are never re-scanned.

use crate::error::{InterpolationError, InterpolationResult};
use crate::resolver::context::{EnvLookup, ResolutionContext};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::trace;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{([A-Za-z0-9_]+)\}|([A-Za-z0-9_]+))").expect("placeholder pattern")
});

/// Identifier inside a placeholder match, braces already stripped
fn placeholder_name<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

/// Substitute every resolvable placeholder in `input`
pub fn resolve_variables<E: EnvLookup>(ctx: &ResolutionContext<'_, E>, input: &str) -> String {
    PLACEHOLDER
        .replace_all(input, |caps: &Captures| {
            let name = placeholder_name(caps);
            match ctx.get(name) {
                Some(value) => value.into_owned(),
                None => {
                    trace!(variable = name, "leaving unresolved placeholder in place");
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

/// Substitute placeholders, failing on the first one no source defines
pub fn resolve_strict<E: EnvLookup>(
    ctx: &ResolutionContext<'_, E>,
    input: &str,
) -> InterpolationResult<String> {
    if let Some(name) = unresolved_placeholders(ctx, input).into_iter().next() {
        return Err(InterpolationError::UndefinedVariable(name));
    }
    Ok(resolve_variables(ctx, input))
}

/// Names of placeholders in `input` that would be left verbatim
///
/// Names are reported once each, in order of first appearance.
pub fn unresolved_placeholders<E: EnvLookup>(
    ctx: &ResolutionContext<'_, E>,
    input: &str,
) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(input) {
        let name = placeholder_name(&caps);
        if !ctx.is_defined(name) && !missing.iter().any(|m| m == name) {
            missing.push(name.to_string());
        }
    }
    missing
}

/// Substitute placeholders in every value of a map
pub fn resolve_map<E: EnvLookup>(
    ctx: &ResolutionContext<'_, E>,
    map: &HashMap<String, String>,
) -> HashMap<String, String> {
    map.iter()
        .map(|(key, value)| (key.clone(), resolve_variables(ctx, value)))
        .collect()
}
