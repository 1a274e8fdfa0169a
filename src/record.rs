//! Submission records and their attribute values.
//!
//! A [`Record`] is an immutable mapping from attribute name to [`Value`]. Two
//! records may carry different attribute sets; nothing about the shape is
//! declared up front. Typed accessors ([`Record::int`], [`Record::text`]) do the
//! coercion at the record boundary so that analyses see either a value of the
//! right type or a precise [`Error`].
//!
//! Records are reference counted internally, so cloning one (which every
//! element-wise transform does) never copies its attributes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::sync::Arc;

/// Unix creation time in seconds.
pub const CREATED_AT: &str = "created_at_i";
/// Score of the submission.
pub const POINTS: &str = "points";
/// Submission title.
pub const TITLE: &str = "title";
/// Identifier used to point at a record in error messages.
pub const OBJECT_ID: &str = "objectID";

/// The set of attribute names carried by a record.
pub type AttributeSet = BTreeSet<String>;

/// A single attribute value.
///
/// JSON `null` maps to [`Value::Absent`]; arrays and objects are kept verbatim
/// in [`Value::Structured`] since no analysis looks inside them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Structured(serde_json::Value),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Structured(_) => "structured value",
        }
    }

    /// Integer view. Floats are accepted when they carry no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => {
                let i = *f as i64;
                (i as f64 == *f).then_some(i)
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Absent, Into::into)
    }
}

/// An immutable submission record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    attrs: Arc<BTreeMap<String, Value>>,
}

impl Record {
    /// Build a record from `(name, value)` pairs. Later duplicates win.
    pub fn new<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        pairs.into_iter().collect()
    }

    /// Raw lookup. `None` means the attribute is not present at all.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Attribute names in sorted order, including those whose value is null.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }

    pub fn attribute_set(&self) -> AttributeSet {
        self.attrs.keys().cloned().collect()
    }

    /// Exact match of this record's attribute names against `reference`.
    pub fn has_exact_attributes(&self, reference: &AttributeSet) -> bool {
        self.attrs.len() == reference.len() && self.attrs.keys().all(|k| reference.contains(k))
    }

    /// Lookup that treats a missing attribute and an explicit null alike.
    pub fn require(&self, name: &str) -> Result<&Value> {
        match self.attrs.get(name) {
            Some(v) if !v.is_absent() => Ok(v),
            _ => Err(Error::MissingAttribute {
                attribute: name.to_string(),
                record: self.to_string(),
            }),
        }
    }

    /// Integer attribute; fails if missing or not integral.
    pub fn int(&self, name: &str) -> Result<i64> {
        let v = self.require(name)?;
        v.as_i64().ok_or_else(|| self.invalid(name, "integer", v.kind()))
    }

    /// Numeric attribute, integer or float; fails if missing or not numeric.
    pub fn number(&self, name: &str) -> Result<f64> {
        let v = self.require(name)?;
        v.as_f64().ok_or_else(|| self.invalid(name, "number", v.kind()))
    }

    /// Optional text attribute: `Ok(None)` when missing or null.
    pub fn text(&self, name: &str) -> Result<Option<&str>> {
        match self.attrs.get(name) {
            None | Some(Value::Absent) => Ok(None),
            Some(v) => v
                .as_str()
                .map(Some)
                .ok_or_else(|| self.invalid(name, "text", v.kind())),
        }
    }

    pub(crate) fn invalid(&self, name: &str, expected: &'static str, found: impl Into<String>) -> Error {
        Error::InvalidRecord {
            attribute: name.to_string(),
            record: self.to_string(),
            expected,
            found: found.into(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let attrs = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<BTreeMap<_, _>>();
        Self {
            attrs: Arc::new(attrs),
        }
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(attrs: BTreeMap<String, Value>) -> Self {
        Self {
            attrs: Arc::new(attrs),
        }
    }
}

/// Compact identification for error messages: the object id when there is one,
/// otherwise the attribute names.
impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match self.attrs.get(OBJECT_ID) {
            Some(Value::Text(id)) => write!(f, "{OBJECT_ID}={id}"),
            Some(Value::Int(id)) => write!(f, "{OBJECT_ID}={id}"),
            _ => {
                let names = self.attribute_names().collect::<Vec<_>>().join(", ");
                write!(f, "{{{names}}}")
            }
        }
    }
}
