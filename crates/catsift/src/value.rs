//! Runtime value types for field access and filter arguments.
//!
//! [`Value`] is the field value a row exposes to the engine, borrowed from
//! the row itself. [`ArgValue`] is the owned literal a caller supplies in a
//! request. The attribute's declared kind, not the runtime shape of either
//! enum, decides which predicate semantics apply.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The key/value representation backing semi-structured map columns.
///
/// Keys are open-ended strings; values are stored as text. A `BTreeMap`
/// keeps the serialized form deterministic.
pub type KeyValueMap = BTreeMap<String, String>;

/// Runtime value of a field, borrowed from the source row.
///
/// The accessor implemented via the [`Row`](crate::Row) trait returns this
/// type for every attribute the engine asks about.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Textual value. Also used for full-text-indexed documents.
    Text(&'a str),
    /// Numeric value.
    Number(Number),
    /// Semi-structured key/value map.
    Map(&'a KeyValueMap),
    /// Field not present, null, or not exposed by the row.
    Absent,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is an `Absent` value.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Extracts the text value, if present.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the numeric value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the map value, if present.
    pub fn as_map(&self) -> Option<&'a KeyValueMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Numeric value supporting the common integer and float widths.
///
/// Same-variant comparisons are exact; mixed-variant comparisons go
/// through f64.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for mixed-type comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed variants.
    ///
    /// Returns `None` when a NaN is involved.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number::F64(n as f64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

/// Owned literal supplied by a caller for one named argument.
///
/// Wire literals are flat scalars; the classifier decides whether each one
/// is a control argument or a per-attribute filter.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Integer literal.
    Int(i64),
    /// Floating-point literal.
    Float(f64),
    /// String literal.
    Text(String),
    /// Boolean literal.
    Bool(bool),
}

impl ArgValue {
    /// Extracts the string content, if this is a text literal.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts a numeric view, if this is an integer or float literal.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            ArgValue::Int(n) => Some(Number::I64(*n)),
            ArgValue::Float(n) => Some(Number::F64(*n)),
            _ => None,
        }
    }

    /// Extracts the boolean, if this is a boolean literal.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the literal's type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ArgValue::Int(_) => "integer",
            ArgValue::Float(_) => "float",
            ArgValue::Text(_) => "string",
            ArgValue::Bool(_) => "boolean",
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Text(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Text(s)
    }
}

impl From<i32> for ArgValue {
    fn from(n: i32) -> Self {
        ArgValue::Int(n as i64)
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        ArgValue::Int(n)
    }
}

impl From<u32> for ArgValue {
    fn from(n: u32) -> Self {
        ArgValue::Int(n as i64)
    }
}

impl From<f32> for ArgValue {
    fn from(n: f32) -> Self {
        ArgValue::Float(n as f64)
    }
}

impl From<f64> for ArgValue {
    fn from(n: f64) -> Self {
        ArgValue::Float(n)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}
