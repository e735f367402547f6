//! Tuples and their values.
//!
//! A tuple is an immutable attribute → value mapping. Values carry a total
//! order (nulls first, floats via `total_cmp`, mixed variants by rank) so
//! tuples can key ordered sets and sort deterministically under paging.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::AttrList;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Tuple),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_tuple(&self) -> Option<&Tuple> {
        match self {
            Value::Tuple(t) => Some(t),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::Str(_) => 4,
            Value::Tuple(_) => 5,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Str(a), Str(b)) => a.cmp(b),
            (Tuple(a), Tuple(b)) => a.cmp(b),
            // Mixed variants: order by rank (nulls first).
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "nil"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Tuple(t) => write!(f, "{t}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
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

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Tuple> for Value {
    fn from(v: Tuple) -> Self {
        Value::Tuple(v)
    }
}

/// An attribute → value mapping with deterministic attribute order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Tuple(BTreeMap<String, Value>);

impl Tuple {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.0.get(attr)
    }

    pub fn contains(&self, attr: &str) -> bool {
        self.0.contains_key(attr)
    }

    pub fn insert(&mut self, attr: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(attr.into(), value.into());
    }

    pub fn remove(&mut self, attr: &str) -> Option<Value> {
        self.0.remove(attr)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn attrs(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The attributes actually present, as an attribute list.
    pub fn heading(&self) -> AttrList {
        self.attrs().collect()
    }

    /// Keeps the listed attributes (mapping-slice semantics: attributes the
    /// tuple lacks are silently absent from the result).
    pub fn project(&self, attrs: &AttrList) -> Tuple {
        self.iter()
            .filter(|(k, _)| attrs.contains(k))
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Drops the listed attributes.
    pub fn allbut(&self, butlist: &AttrList) -> Tuple {
        self.iter()
            .filter(|(k, _)| !butlist.contains(k))
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Applies an old → new name mapping; unmapped attributes pass through.
    pub fn renamed(&self, mapping: &BTreeMap<String, String>) -> Tuple {
        self.iter()
            .map(|(k, v)| {
                let name = mapping.get(k).cloned().unwrap_or_else(|| k.to_string());
                (name, v.clone())
            })
            .collect()
    }

    /// Right-biased merge: on shared attributes, `other` wins.
    pub fn merged(&self, other: &Tuple) -> Tuple {
        let mut merged = self.0.clone();
        merged.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Tuple(merged)
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        write!(f, "}}")
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Tuple {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Tuple(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Tuple {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Builds a [`Tuple`] literal; values go through `Into<Value>`.
///
/// ```
/// use relvar_core::tuple::Value;
///
/// let t = relvar_core::tuple! { "a" => 1, "b" => "x", "c" => Value::Null };
/// assert_eq!(t.len(), 3);
/// ```
#[macro_export]
macro_rules! tuple {
    () => { $crate::tuple::Tuple::new() };
    ($($attr:expr => $value:expr),+ $(,)?) => {{
        let mut t = $crate::tuple::Tuple::new();
        $( t.insert($attr, $value); )+
        t
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_order_with_nulls_first() {
        let mut vs = vec![Value::from(2), Value::Null, Value::from(1)];
        vs.sort();
        assert_eq!(vs, vec![Value::Null, Value::from(1), Value::from(2)]);
    }

    #[test]
    fn tuple_equality_ignores_insertion_order() {
        let a = tuple! { "x" => 1, "y" => 2 };
        let b = tuple! { "y" => 2, "x" => 1 };
        assert_eq!(a, b);
    }

    #[test]
    fn project_slices_silently() {
        let t = tuple! { "a" => 1, "b" => 2 };
        let p = t.project(&AttrList::from(["a", "zz"]));
        assert_eq!(p, tuple! { "a" => 1 });
    }

    #[test]
    fn merged_lets_the_right_side_win() {
        let l = tuple! { "a" => 1, "b" => 2 };
        let r = tuple! { "b" => 20, "c" => 3 };
        assert_eq!(l.merged(&r), tuple! { "a" => 1, "b" => 20, "c" => 3 });
        assert_eq!(l.merged(&Tuple::new()), l);
    }
}
