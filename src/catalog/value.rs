// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 policygen contributors

//! Setting values and the types rules declare for them

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_yaml::Value;

use crate::errors::ConfigIssue;

/// Declared type of a rule's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// `true` / `false`
    Boolean,
    /// Whole number within an inclusive range
    Integer { min: i64, max: i64 },
    /// Free text, quoted for the target dialect when rendered
    Text,
    /// One of a fixed set of literal options
    Choice(&'static [&'static str]),
}

impl ValueType {
    /// Human-readable description of the accepted values
    pub fn describe(&self) -> String {
        match self {
            Self::Boolean => "boolean".into(),
            Self::Integer { min, max } => format!("integer in {}..={}", min, max),
            Self::Text => "string".into(),
            Self::Choice(options) => format!("one of [{}]", options.join(", ")),
        }
    }

    /// Short name used in listings
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer { .. } => "integer",
            Self::Text => "string",
            Self::Choice(_) => "enum",
        }
    }

    /// Check an already-typed value against this type
    pub fn check(&self, key: &str, value: &SettingValue) -> Result<(), ConfigIssue> {
        match (self, value) {
            (Self::Boolean, SettingValue::Bool(_)) => Ok(()),
            (Self::Integer { min, max }, SettingValue::Integer(n)) => {
                if (*min..=*max).contains(n) {
                    Ok(())
                } else {
                    Err(ConfigIssue::OutOfRange {
                        key: key.to_string(),
                        value: *n,
                        min: *min,
                        max: *max,
                    })
                }
            }
            (Self::Text, SettingValue::Text(s)) => {
                if s.chars().any(|c| c.is_control() && c != '\n' && c != '\t') {
                    Err(ConfigIssue::ControlCharacter {
                        key: key.to_string(),
                    })
                } else {
                    Ok(())
                }
            }
            (Self::Choice(options), SettingValue::Text(s)) => {
                if options.contains(&s.as_ref()) {
                    Ok(())
                } else {
                    Err(ConfigIssue::NotAllowed {
                        key: key.to_string(),
                        value: s.to_string(),
                        allowed: options.join(", "),
                    })
                }
            }
            _ => Err(ConfigIssue::TypeMismatch {
                key: key.to_string(),
                expected: self.describe(),
                found: value.type_name().to_string(),
            }),
        }
    }

    /// Convert a raw YAML value into a setting of this type
    ///
    /// No coercion between kinds: `"true"` is a string, not a boolean, and
    /// `4.0` is not an integer.
    pub fn coerce(&self, key: &str, raw: &Value) -> Result<SettingValue, ConfigIssue> {
        let value = SettingValue::from_yaml(raw).ok_or_else(|| ConfigIssue::TypeMismatch {
            key: key.to_string(),
            expected: self.describe(),
            found: yaml_kind(raw).to_string(),
        })?;

        self.check(key, &value)?;

        // Choice values are interned to the catalog's own option strings
        if let (Self::Choice(options), SettingValue::Text(s)) = (self, &value) {
            if let Some(option) = options.iter().find(|o| **o == s.as_ref()) {
                return Ok(SettingValue::Text(Cow::Borrowed(option)));
            }
        }

        Ok(value)
    }
}

/// A concrete setting value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Integer(i64),
    Text(Cow<'static, str>),
}

impl SettingValue {
    /// Static text value, usable in const catalog data
    pub const fn text(s: &'static str) -> Self {
        Self::Text(Cow::Borrowed(s))
    }

    /// Convert a YAML scalar; `None` for anything that is not a bool,
    /// an integer, or a string
    pub fn from_yaml(raw: &Value) -> Option<Self> {
        match raw {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n.as_i64().map(Self::Integer),
            Value::String(s) => Some(Self::Text(Cow::Owned(s.clone()))),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Text(_) => "string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Values display on one line; text is escaped so it can never break out of
/// a comment in the generated document.
impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Name of a YAML node's kind, for error messages
pub fn yaml_kind(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(n) if n.is_u64() => "integer too large",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
