//! Key-wise merging of maps with numeric summation.
//!
//! [`merge`] takes the union of two maps. Keys present on both sides are
//! summed when the two values are summable (see [`Summable`]); otherwise the
//! value from the second map wins. Nothing here knows about components, so
//! the same primitive serves collapse results and loosely typed attribute
//! maps alike.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Summable
// ---------------------------------------------------------------------------

/// A value that may be combined with another value of the same type.
///
/// `None` means the pair has no meaningful sum; [`merge`] then keeps the
/// merged-in value.
pub trait Summable: Sized {
    fn try_sum(&self, other: &Self) -> Option<Self>;
}

impl Summable for u64 {
    fn try_sum(&self, other: &Self) -> Option<Self> {
        Some(self.saturating_add(*other))
    }
}

impl Summable for u32 {
    fn try_sum(&self, other: &Self) -> Option<Self> {
        Some(self.saturating_add(*other))
    }
}

impl Summable for i64 {
    fn try_sum(&self, other: &Self) -> Option<Self> {
        Some(self.saturating_add(*other))
    }
}

impl Summable for f64 {
    fn try_sum(&self, other: &Self) -> Option<Self> {
        Some(self + other)
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A loosely typed scalar. `Int` and `Float` are numeric; the rest are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Value {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl Summable for Value {
    fn try_sum(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(
                a.checked_add(*b)
                    .map(Value::Int)
                    .unwrap_or(Value::Float(*a as f64 + *b as f64)),
            ),
            (Value::Int(a), Value::Float(b)) => Some(Value::Float(*a as f64 + b)),
            (Value::Float(a), Value::Int(b)) => Some(Value::Float(a + *b as f64)),
            (Value::Float(a), Value::Float(b)) => Some(Value::Float(a + b)),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// String-keyed map of loosely typed values.
pub type ValueMap = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Merge two maps into a new one. Neither input is modified.
pub fn merge<K, V>(a: &BTreeMap<K, V>, b: &BTreeMap<K, V>) -> BTreeMap<K, V>
where
    K: Ord + Clone,
    V: Summable + Clone,
{
    let mut result = a.clone();
    merge_into(&mut result, b);
    result
}

/// Merge `b` into `acc` in place.
pub fn merge_into<K, V>(acc: &mut BTreeMap<K, V>, b: &BTreeMap<K, V>)
where
    K: Ord + Clone,
    V: Summable + Clone,
{
    for (key, incoming) in b {
        match acc.get_mut(key) {
            Some(existing) => {
                *existing = existing.try_sum(incoming).unwrap_or_else(|| incoming.clone());
            }
            None => {
                acc.insert(key.clone(), incoming.clone());
            }
        }
    }
}

/// Add `value` under `key`, summing with any value already there.
///
/// Non-summable collisions keep the new value, as in [`merge_into`].
pub fn accumulate<K, V>(acc: &mut BTreeMap<K, V>, key: K, value: V)
where
    K: Ord,
    V: Summable,
{
    match acc.get_mut(&key) {
        Some(existing) => {
            if let Some(sum) = existing.try_sum(&value) {
                *existing = sum;
            } else {
                *existing = value;
            }
        }
        None => {
            acc.insert(key, value);
        }
    }
}

/// True if `map` is present, non-empty, and holds `key`.
pub fn contains_key<K, Q, V>(key: &Q, map: Option<&BTreeMap<K, V>>) -> bool
where
    K: Ord + std::borrow::Borrow<Q>,
    Q: Ord + ?Sized,
{
    match map {
        Some(m) if !m.is_empty() => m.contains_key(key),
        _ => false,
    }
}

/// Insert or overwrite a single entry. No summation.
pub fn add_or_update<K: Ord, V>(key: K, value: V, map: &mut BTreeMap<K, V>) {
    map.insert(key, value);
}
