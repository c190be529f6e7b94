//! Leaf secret records.
//!
//! Store values are loosely typed; they are converted once, at the store
//! boundary, into the closed [`SecretValue`] variant and rendered to display
//! strings from there.

use std::collections::BTreeMap;
use std::fmt;

use chrono::DateTime;

use crate::core::constants::{DATE_FORMAT, NA_VALUE};
use crate::core::types::SecretData;

/// A single value of a leaf secret.
#[derive(Debug, Clone, PartialEq)]
pub enum SecretValue {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    Null,
}

impl SecretValue {
    /// Convert to a TOML value for persistence. `Null` has no TOML form.
    pub fn to_toml(&self) -> Option<toml::Value> {
        match self {
            SecretValue::String(s) => Some(toml::Value::String(s.clone())),
            SecretValue::Number(n) => n
                .as_i64()
                .map(toml::Value::Integer)
                .or_else(|| n.as_f64().map(toml::Value::Float)),
            SecretValue::Bool(b) => Some(toml::Value::Boolean(*b)),
            SecretValue::Null => None,
        }
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretValue::String(s) => f.write_str(s),
            SecretValue::Number(n) => write!(f, "{}", n),
            SecretValue::Bool(b) => write!(f, "{}", b),
            SecretValue::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for SecretValue {
    fn from(s: &str) -> Self {
        SecretValue::String(s.to_string())
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue::String(s)
    }
}

impl From<serde_json::Value> for SecretValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::String(s) => SecretValue::String(s),
            Value::Number(n) => SecretValue::Number(n),
            Value::Bool(b) => SecretValue::Bool(b),
            Value::Null => SecretValue::Null,
            nested @ (Value::Array(_) | Value::Object(_)) => {
                SecretValue::String(nested.to_string())
            }
        }
    }
}

impl From<toml::Value> for SecretValue {
    fn from(value: toml::Value) -> Self {
        use toml::Value;
        match value {
            Value::String(s) => SecretValue::String(s),
            Value::Integer(i) => SecretValue::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(SecretValue::Number)
                .unwrap_or_else(|| SecretValue::String(f.to_string())),
            Value::Boolean(b) => SecretValue::Bool(b),
            Value::Datetime(dt) => SecretValue::String(dt.to_string()),
            nested @ (Value::Array(_) | Value::Table(_)) => {
                let text =
                    serde_json::to_string(&nested).unwrap_or_else(|_| nested.to_string());
                SecretValue::String(text)
            }
        }
    }
}

/// Version information attached to a leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub version: u64,
    /// RFC 3339 creation time of this version, if the store reports one.
    pub created_time: Option<String>,
}

impl Metadata {
    pub fn new(version: u64, created_time: Option<String>) -> Self {
        Self {
            version,
            created_time,
        }
    }

    /// Creation time as `Jan 2, 2006 3:04 PM`, or `n/a`.
    pub fn created_display(&self) -> String {
        self.created_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| NA_VALUE.to_string())
    }
}

/// A leaf secret as read from the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecretRecord {
    pub data: BTreeMap<String, SecretValue>,
    pub metadata: Metadata,
}

impl SecretRecord {
    pub fn new(data: BTreeMap<String, SecretValue>, metadata: Metadata) -> Self {
        Self { data, metadata }
    }

    /// Values rendered as display strings, which is what gets edited.
    pub fn display_data(&self) -> SecretData {
        self.data
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}
