//! # Value Module
//!
//! World variables hold heterogeneous scalars under one key space. [`Value`]
//! is the tagged variant used for every precondition, effect and state entry.
//!
//! ```
//! use regressive_goap::Value;
//!
//! let gold = Value::from(10);
//! assert_eq!(gold, Value::Int(10));
//! assert!(Value::from(false).is_default());
//! assert_eq!(Value::from(10).distance(&Value::from(5)), 0.5);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single world variable value.
///
/// Equality is variant-strict: `Int(5)` and `Float(5.0)` are different values.
/// Floats compare so that `0.0 == -0.0` and `NaN == NaN`, which keeps
/// equality in line with hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Whether this value counts as "absent" for the containment rule.
    ///
    /// `false`, `0` and `0.0` are defaults. Text never is.
    pub fn is_default(&self) -> bool {
        match self {
            Value::Bool(b) => !*b,
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Text(_) => false,
        }
    }

    /// Normalized divergence between two values.
    ///
    /// Equal values are `0`. Numbers of the same variant yield
    /// `|a - b| / max(|a|, |b|)`. Every other mismatch is a full penalty of `1`.
    pub fn distance(&self, other: &Value) -> f32 {
        if self == other {
            return 0.0;
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => {
                let (a, b) = (*a as f64, *b as f64);
                ((a - b).abs() / a.abs().max(b.abs())) as f32
            }
            (Value::Float(a), Value::Float(b)) if a.is_finite() && b.is_finite() => {
                ((a - b).abs() / a.abs().max(b.abs())) as f32
            }
            _ => 1.0,
        }
    }

    fn float_bits(f: f64) -> u64 {
        if f == 0.0 {
            0.0f64.to_bits()
        } else if f.is_nan() {
            f64::NAN.to_bits()
        } else {
            f.to_bits()
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => Self::float_bits(*a) == Self::float_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => Self::float_bits(*f).hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Typed extraction of a [`Value`]. Returns `None` on a variant mismatch.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f as f32),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}
