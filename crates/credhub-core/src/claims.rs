//! Claim values carried in a credential subject.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Claim names mapped to claim values, ordered by name.
pub type ClaimMap = BTreeMap<String, ClaimValue>;

/// A single claim value. Serialized as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<ClaimValue>),
    Map(ClaimMap),
}

impl ClaimValue {
    /// The JSON Schema type name of the value.
    pub fn json_type(&self) -> &'static str {
        match self {
            ClaimValue::Null => "null",
            ClaimValue::Bool(_) => "boolean",
            ClaimValue::Number(n) if n.is_f64() => "number",
            ClaimValue::Number(_) => "integer",
            ClaimValue::String(_) => "string",
            ClaimValue::Array(_) => "array",
            ClaimValue::Map(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Number(value.into())
    }
}

impl From<ClaimMap> for ClaimValue {
    fn from(value: ClaimMap) -> Self {
        ClaimValue::Map(value)
    }
}

impl From<Vec<ClaimValue>> for ClaimValue {
    fn from(value: Vec<ClaimValue>) -> Self {
        ClaimValue::Array(value)
    }
}
