//! Strongly-typed variable name wrapper.

use crate::error::{CoreError, CoreResult};
use crate::reference::{is_valid_variable_name, VARIABLE_NAME_PATTERN};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// A dashboard variable name that matches `^[a-zA-Z0-9_-]+$`.
///
/// Only [`parse`](Self::parse) and deserialization construct it, so holding a
/// `VariableName` means the naming rule has already been checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VariableName(String);

impl VariableName {
    /// Validate `name` against the naming rule.
    pub fn parse(name: impl Into<String>) -> CoreResult<Self> {
        let s = name.into();
        if is_valid_variable_name(&s) {
            Ok(Self(s))
        } else {
            Err(CoreError::InvalidVariableName {
                name: s,
                pattern: VARIABLE_NAME_PATTERN.to_string(),
            })
        }
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for VariableName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        VariableName::parse(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VariableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for VariableName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VariableName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for VariableName {
    type Error = CoreError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl PartialEq<str> for VariableName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for VariableName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "variable_name_test.rs"]
mod tests;
