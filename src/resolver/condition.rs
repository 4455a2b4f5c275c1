//! Guard condition evaluation
//!
//! A condition is resolved through the variable resolver first, then matched
//! against a fixed, ordered list of predicate forms:
//!
//! 1. `<left> == <right>`
//! 2. `<left> != <right>`
//! 3. `<left> contains <right>`
//! 4. `exists <path>`
//!
//! The first form that matches decides the result. Anything else is false.
//! New operators must not contain the text of an existing one, or the order
//! above starts to matter.

use crate::resolver::context::{EnvLookup, ResolutionContext};
use crate::resolver::interpolate::resolve_variables;
use regex::{Captures, Regex};
use std::fs;
use std::sync::LazyLock;
use tracing::debug;

/// A parsed predicate with whitespace-trimmed operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition<'a> {
    Equal { left: &'a str, right: &'a str },
    NotEqual { left: &'a str, right: &'a str },
    Contains { haystack: &'a str, needle: &'a str },
    Exists(&'a str),
}

impl Condition<'_> {
    /// Evaluate the predicate
    pub fn holds(&self) -> bool {
        match *self {
            Condition::Equal { left, right } => left == right,
            Condition::NotEqual { left, right } => left != right,
            Condition::Contains { haystack, needle } => haystack.contains(needle),
            Condition::Exists(path) => fs::symlink_metadata(path).is_ok(),
        }
    }

    /// Short name of the predicate form
    pub fn kind(&self) -> &'static str {
        match self {
            Condition::Equal { .. } => "equal",
            Condition::NotEqual { .. } => "not-equal",
            Condition::Contains { .. } => "contains",
            Condition::Exists(_) => "exists",
        }
    }
}

type Build = for<'t> fn(&Captures<'t>) -> Condition<'t>;

struct Rule {
    pattern: Regex,
    build: Build,
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let rule = |pattern: &str, build: Build| Rule {
        pattern: Regex::new(pattern).expect("condition pattern"),
        build,
    };
    vec![
        rule(r"(?s)^(.+)==(.+)$", equal),
        rule(r"(?s)^(.+)!=(.+)$", not_equal),
        rule(r"(?s)^(.+)\s+contains\s+(.+)$", contains),
        rule(r"(?s)^\s*exists\s+(.+)$", exists),
    ]
});

fn operand<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str().trim())
}

fn equal<'t>(caps: &Captures<'t>) -> Condition<'t> {
    Condition::Equal {
        left: operand(caps, 1),
        right: operand(caps, 2),
    }
}

fn not_equal<'t>(caps: &Captures<'t>) -> Condition<'t> {
    Condition::NotEqual {
        left: operand(caps, 1),
        right: operand(caps, 2),
    }
}

fn contains<'t>(caps: &Captures<'t>) -> Condition<'t> {
    Condition::Contains {
        haystack: operand(caps, 1),
        needle: operand(caps, 2),
    }
}

fn exists<'t>(caps: &Captures<'t>) -> Condition<'t> {
    Condition::Exists(operand(caps, 1))
}

/// Match an already-resolved condition against the predicate forms, in order
pub fn parse_condition(resolved: &str) -> Option<Condition<'_>> {
    RULES.iter().find_map(|rule| {
        rule.pattern
            .captures(resolved)
            .map(|caps| (rule.build)(&caps))
    })
}

/// Evaluate a guard condition
///
/// Blank conditions always hold. Conditions that match no predicate form
/// evaluate to `false`.
pub fn evaluate_condition<E: EnvLookup>(ctx: &ResolutionContext<'_, E>, condition: &str) -> bool {
    if condition.trim().is_empty() {
        return true;
    }

    let resolved = resolve_variables(ctx, condition);
    match parse_condition(&resolved) {
        Some(parsed) => {
            let result = parsed.holds();
            debug!(condition = %resolved, kind = parsed.kind(), result, "evaluated condition");
            result
        }
        None => {
            debug!(condition = %resolved, "condition matches no known form, treating as false");
            false
        }
    }
}
