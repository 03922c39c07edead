//! Declared attribute types and the coercions applied when assigning them.
//!
//! Input arrives as text (canonical update) or as loosely-typed JSON (bulk update, persisted
//! records). Each declared attribute carries an [`AttrType`] whose coercion mirrors the
//! `str`/`int`/`float`/`list` conversions of a dynamically typed object model.

use serde_json::{Number, Value};

use hbnb_core::repr::value_repr;
use hbnb_core::{DomainError, DomainResult};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AttrType {
    Str,
    Int,
    Float,
    List,
}

impl AttrType {
    pub fn name(self) -> &'static str {
        match self {
            AttrType::Str => "str",
            AttrType::Int => "int",
            AttrType::Float => "float",
            AttrType::List => "list",
        }
    }

    /// Convert `value` into this type.
    pub fn coerce(self, value: &Value) -> DomainResult<Value> {
        match self {
            AttrType::Str => Ok(Value::String(to_text(value))),
            AttrType::Int => to_int(value).map(Value::from),
            AttrType::Float => to_float(value).and_then(float_value),
            AttrType::List => to_list(value).map(Value::Array),
        }
    }
}

/// A Rust type that can back a declared attribute.
pub trait FieldValue: Clone + Default {
    const ATTR_TYPE: AttrType;

    fn from_value(value: &Value) -> DomainResult<Self>;

    fn to_value(&self) -> Value;
}

impl FieldValue for String {
    const ATTR_TYPE: AttrType = AttrType::Str;

    fn from_value(value: &Value) -> DomainResult<Self> {
        Ok(to_text(value))
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FieldValue for i64 {
    const ATTR_TYPE: AttrType = AttrType::Int;

    fn from_value(value: &Value) -> DomainResult<Self> {
        to_int(value)
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl FieldValue for f64 {
    const ATTR_TYPE: AttrType = AttrType::Float;

    fn from_value(value: &Value) -> DomainResult<Self> {
        let f = to_float(value)?;
        if f.is_finite() {
            Ok(f)
        } else {
            Err(DomainError::coercion("float", value_repr(value)))
        }
    }

    fn to_value(&self) -> Value {
        Number::from_f64(*self)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl FieldValue for Vec<String> {
    const ATTR_TYPE: AttrType = AttrType::List;

    fn from_value(value: &Value) -> DomainResult<Self> {
        Ok(to_list(value)?.iter().map(to_text).collect())
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().cloned().map(Value::String).collect())
    }
}

fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => value_repr(other),
    }
}

fn to_int(value: &Value) -> DomainResult<i64> {
    let fail = || DomainError::coercion("int", value_repr(value));
    match value {
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64().filter(|f| f.is_finite()) {
                let t = f.trunc();
                if t >= i64::MIN as f64 && t < i64::MAX as f64 {
                    Ok(t as i64)
                } else {
                    Err(fail())
                }
            } else {
                Err(fail())
            }
        }
        Value::String(s) => parse_int(s).ok_or_else(fail),
        _ => Err(fail()),
    }
}

/// Integer literal with optional sign, surrounding whitespace and `_` digit separators.
fn parse_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let digits = raw.trim_start_matches(['+', '-']);
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
        || raw.len() - digits.len() > 1
    {
        return None;
    }
    raw.replace('_', "").parse().ok()
}

fn to_float(value: &Value) -> DomainResult<f64> {
    let fail = || DomainError::coercion("float", value_repr(value));
    match value {
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64().ok_or_else(fail),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| fail()),
        _ => Err(fail()),
    }
}

fn float_value(f: f64) -> DomainResult<Value> {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| DomainError::coercion("float", f.to_string()))
}

fn to_list(value: &Value) -> DomainResult<Vec<Value>> {
    let fail = || DomainError::coercion("list", value_repr(value));
    match value {
        Value::Array(items) => Ok(items.clone()),
        Value::String(s) => {
            let trimmed = s.trim();
            if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
                return Err(fail());
            }
            match serde_json::from_str::<Value>(&trimmed.replace('\'', "\"")) {
                Ok(Value::Array(items)) => Ok(items),
                _ => Err(fail()),
            }
        }
        _ => Err(fail()),
    }
}
