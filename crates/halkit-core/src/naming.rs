//! Key naming transforms applied while encoding.
//!
//! The encoder passes every relation name, link field name and property
//! name (nested ones included) through a [`NameTransform`]. The reserved
//! `_links` / `_embedded` keys are never transformed.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HalError;

/// Turns a key as stored into the key written on the wire.
pub trait NameTransform {
    fn transform<'a>(&self, name: &'a str) -> Cow<'a, str>;
}

impl<F> NameTransform for F
where
    F: Fn(&str) -> String,
{
    fn transform<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Owned(self(name))
    }
}

/// Built-in naming conventions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// Keys are written as stored.
    #[default]
    Identity,
    /// `FirstName` → `firstName`, `URLValue` → `urlValue`.
    CamelCase,
    /// `FirstName` → `first_name`.
    SnakeCase,
    /// `FirstName` → `first-name`.
    KebabCase,
}

impl NameTransform for NamingPolicy {
    fn transform<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self {
            NamingPolicy::Identity => Cow::Borrowed(name),
            NamingPolicy::CamelCase => camel_case(name),
            NamingPolicy::SnakeCase => separated(name, '_'),
            NamingPolicy::KebabCase => separated(name, '-'),
        }
    }
}

impl fmt::Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamingPolicy::Identity => "identity",
            NamingPolicy::CamelCase => "camel_case",
            NamingPolicy::SnakeCase => "snake_case",
            NamingPolicy::KebabCase => "kebab_case",
        };
        f.write_str(name)
    }
}

impl FromStr for NamingPolicy {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "identity" | "none" => Ok(NamingPolicy::Identity),
            "camel_case" | "camelcase" | "camel" => Ok(NamingPolicy::CamelCase),
            "snake_case" | "snakecase" | "snake" => Ok(NamingPolicy::SnakeCase),
            "kebab_case" | "kebabcase" | "kebab" => Ok(NamingPolicy::KebabCase),
            other => Err(HalError::InvalidArgument(format!(
                "unknown naming policy '{other}': expected identity, camel_case, snake_case or kebab_case"
            ))),
        }
    }
}

/// Lowercase the leading run of uppercase characters. When the run is
/// followed by a lowercase letter, its last character starts the next word
/// and stays uppercase.
fn camel_case(name: &str) -> Cow<'_, str> {
    if !name.chars().next().is_some_and(char::is_uppercase) {
        return Cow::Borrowed(name);
    }

    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len());
    let mut lowering = true;
    for (i, &c) in chars.iter().enumerate() {
        if lowering && c.is_uppercase() {
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if i > 0 && next_is_lower {
                lowering = false;
                out.push(c);
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            lowering = false;
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Split on case boundaries and `_`/`-`/space, lowercase, and join with
/// `sep`. Leading underscores are kept.
fn separated(name: &str, sep: char) -> Cow<'_, str> {
    let body = name.trim_start_matches('_');
    let prefix = &name[..name.len() - body.len()];

    let chars: Vec<char> = body.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut out = String::with_capacity(name.len() + words.len());
    out.push_str(prefix);
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        out.push_str(word);
    }

    if out == name {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(out)
    }
}
