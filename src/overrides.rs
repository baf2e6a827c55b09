//! Command-line override tokens
//!
//! An override is a `name=value` token. The token must contain exactly one
//! `=`; anything else is rejected before the document is touched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between name and value
pub const SEPARATOR: char = '=';

/// Error raised for an override token that cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum OverrideError {
    /// Zero or more than one separator
    #[error("malformed override '{token}': expected exactly one '=' as in name=value")]
    Malformed { token: String },
    /// Empty property name (strict mode only)
    #[error("override '{token}' has an empty property name")]
    EmptyName { token: String },
}

/// How much checking is applied to override tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Accept any name and value, including empty ones
    #[default]
    Lenient,
    /// Additionally reject empty property names
    Strict,
}

impl Strictness {
    pub fn from_flag(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// A single `name=value` pair to upsert into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub name: String,
    pub value: String,
}

impl Override {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    /// Split a token on its single separator.
    pub fn parse(token: &str, strictness: Strictness) -> Result<Self, OverrideError> {
        let malformed = || OverrideError::Malformed { token: token.to_string() };

        let (name, value) = token.split_once(SEPARATOR).ok_or_else(malformed)?;
        if value.contains(SEPARATOR) {
            return Err(malformed());
        }
        if strictness == Strictness::Strict && name.is_empty() {
            return Err(OverrideError::EmptyName { token: token.to_string() });
        }

        Ok(Self::new(name, value))
    }
}

impl FromStr for Override {
    type Err = OverrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, Strictness::Lenient)
    }
}

impl fmt::Display for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, SEPARATOR, self.value)
    }
}

/// Parse every token, failing on the first bad one.
///
/// Nothing is applied until all tokens are known to be valid.
pub fn parse_overrides<S: AsRef<str>>(
    tokens: &[S],
    strictness: Strictness,
) -> Result<Vec<Override>, OverrideError> {
    tokens.iter().map(|t| Override::parse(t.as_ref(), strictness)).collect()
}
