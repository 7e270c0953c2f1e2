//! Request Parameters
//!
//! Key-value parameter maps and their scalar/JSON value representation.

use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Parameter map. Keys are unique and iterate in sorted order.
pub type Parameters = BTreeMap<String, ParameterValue>;

/// Single parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParameterValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    /// Arbitrary JSON. Arrays and objects can only be sent in a JSON body.
    Json(Value),
}

impl ParameterValue {
    /// String form for a query string, or `None` for arrays and objects.
    pub fn to_query_value(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null => Some(String::new()),
            Self::Json(value) => match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                Value::Null => Some(String::new()),
                Value::Array(_) | Value::Object(_) => None,
            },
        }
    }

    /// JSON form, or `None` for non-finite floats.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::String(s) => Some(Value::String(s.clone())),
            Self::Integer(i) => Some(Value::from(*i)),
            Self::Float(f) => Number::from_f64(*f).map(Value::Number),
            Self::Bool(b) => Some(Value::Bool(*b)),
            Self::Null => Some(Value::Null),
            Self::Json(value) => Some(value.clone()),
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for ParameterValue {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for ParameterValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Value> for ParameterValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<ParameterValue>> From<Option<T>> for ParameterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Build a parameter map from key-value pairs.
///
/// ```rust,ignore
/// let params = parameters([("username", "jane"), ("scope", "api")]);
/// ```
pub fn parameters<I, K, V>(pairs: I) -> Parameters
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ParameterValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
