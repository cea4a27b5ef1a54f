//! Form value types.
//!
//! Values arrive as loosely typed JSON; they are narrowed to a closed set of
//! kinds so list rules and scalar rules are selected by `match`.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// == Field Value ==
/// A single submitted form value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Multi-select style list
    List(Vec<String>),
}

impl FieldValue {
    /// Narrows a JSON value. `null` means the field was not supplied.
    ///
    /// Objects, and lists holding objects or lists, have no form reading and
    /// are rejected rather than flattened to text.
    pub fn from_json(value: &Value) -> Result<Option<Self>, UnsupportedValue> {
        let narrowed = match value {
            Value::Null => return Ok(None),
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => match n.as_f64() {
                Some(n) => FieldValue::Number(n),
                None => return Ok(None),
            },
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Array(items) => FieldValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s.clone()),
                        Value::Array(_) | Value::Object(_) => Err(UnsupportedValue::NestedList),
                        other => Ok(other.to_string()),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(_) => return Err(UnsupportedValue::Object),
        };
        Ok(Some(narrowed))
    }

    /// Blank text or an empty list. Numbers and booleans are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Number(_) | FieldValue::Bool(_) => false,
        }
    }

    /// String form used by length, pattern, and membership checks.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
            FieldValue::Number(n) => Cow::Owned(format_number(*n)),
            FieldValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            FieldValue::List(items) => Cow::Owned(items.join(",")),
        }
    }

    /// Numeric reading of the value, if one can be parsed from its start.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => parse_leading_float(s),
            FieldValue::Bool(_) | FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(str::to_string).collect())
    }
}

// == Unsupported Values ==
/// JSON shapes that cannot be submitted as a form value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnsupportedValue {
    #[error("an object")]
    Object,
    #[error("a list containing an object or list")]
    NestedList,
}

/// A submitted field whose JSON value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' holds {kind}, which is not a form value")]
pub struct InvalidFormValue {
    pub field: String,
    pub kind: UnsupportedValue,
}

// == Form Values ==
/// Submitted values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Value>")]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Text form of a field, if present.
    pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.0.get(field).map(FieldValue::as_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Value>> for FormValues {
    type Error = InvalidFormValue;

    /// Drops `null` fields and rejects the first unsupported one.
    fn try_from(raw: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        let mut values = BTreeMap::new();
        for (field, value) in raw {
            match FieldValue::from_json(&value) {
                Ok(Some(narrowed)) => {
                    values.insert(field, narrowed);
                }
                Ok(None) => {}
                Err(kind) => return Err(InvalidFormValue { field, kind }),
            }
        }
        Ok(Self(values))
    }
}

impl FromIterator<(String, FieldValue)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// == Utility Functions ==
/// Formats a number the way a form field would show it (`45`, not `45.0`).
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parses the longest numeric prefix of `s`, ignoring leading whitespace.
///
/// `"45kg"` reads as 45; `"abc"` reads as nothing.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
