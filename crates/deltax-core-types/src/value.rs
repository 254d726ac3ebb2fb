//! Dynamic value model for structural comparison.
//!
//! [`Value`] is a closed enumeration of the value shapes the structural
//! comparator understands: scalars, sequences, unordered and keyed
//! collections, single entries, identity-bearing and plain value wrappers,
//! and an opaque escape hatch for everything else. Each value reports a
//! [`Category`] tag, computed once and dispatched exhaustively by the
//! comparator.

use serde::{Deserialize, Serialize};

/// Category tag of a [`Value`], driving comparator dispatch.
///
/// `Null` is handled before category dispatch but is included so that
/// `category()` is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// The null value
    Null,
    /// Integers and floating-point numbers
    Numeric,
    /// Scalars with a native total order (text, booleans)
    NativelyOrdered,
    /// Ordered, list-like collection
    Sequence,
    /// Unordered collection compared in natural iteration order
    UnorderedCollection,
    /// Key/value mapping in insertion order
    Mapping,
    /// Key/value mapping in ascending key order
    SortedMapping,
    /// A single key/value pair
    Entry,
    /// A wrapper exposing an inner value
    ValueHolder,
    /// Anything else, carrying only a type name and rendered text
    Opaque,
}

/// A dynamically-shaped value.
///
/// Domain code converts property values or entity projections into `Value`
/// (usually via the `ToValue` bridge in the core crate) to obtain a total,
/// deterministic ordering over mixed shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absent value; sorts before everything else
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Single-precision float, compared with a relative epsilon of 1e-5
    Float32(f32),
    /// Double-precision float, compared with a relative epsilon of 1e-14
    Float64(f64),
    /// Text scalar
    Text(String),
    /// Ordered sequence of values
    Seq(Vec<Value>),
    /// Unordered collection, kept in its natural iteration order
    Set(Vec<Value>),
    /// Mapping entries in insertion order
    Map(Vec<(Value, Value)>),
    /// Mapping entries in ascending key order (callers sort; see
    /// `compare::into_sorted_map` in the core crate)
    SortedMap(Vec<(Value, Value)>),
    /// A single key/value entry
    Entry(Box<(Value, Value)>),
    /// An identity-bearing wrapper: `key` is the cheap identity used by the
    /// comparator's identity fast path, `value` the wrapped content
    Keyed { key: Box<Value>, value: Box<Value> },
    /// A plain value holder exposing an inner value
    Holder(Box<Value>),
    /// A value the model cannot decompose, identified by its runtime type
    /// name and rendered display text
    Opaque { type_name: String, rendered: String },
}

impl Value {
    /// The category tag of this value.
    pub fn category(&self) -> Category {
        match self {
            Value::Null => Category::Null,
            Value::Int(_) | Value::Float32(_) | Value::Float64(_) => Category::Numeric,
            Value::Bool(_) | Value::Text(_) => Category::NativelyOrdered,
            Value::Seq(_) => Category::Sequence,
            Value::Set(_) => Category::UnorderedCollection,
            Value::Map(_) => Category::Mapping,
            Value::SortedMap(_) => Category::SortedMapping,
            Value::Entry(_) => Category::Entry,
            Value::Keyed { .. } | Value::Holder(_) => Category::ValueHolder,
            Value::Opaque { .. } => Category::Opaque,
        }
    }

    /// Runtime type name used by the comparator's tie-break rule.
    ///
    /// Opaque values report the type name they carry; every other variant
    /// reports a canonical name.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::Text(_) => "text",
            Value::Seq(_) => "seq",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::SortedMap(_) => "sorted_map",
            Value::Entry(_) => "entry",
            Value::Keyed { .. } => "keyed",
            Value::Holder(_) => "holder",
            Value::Opaque { type_name, .. } => type_name,
        }
    }

    /// The identity key, if this value exposes one.
    pub fn identity_key(&self) -> Option<&Value> {
        match self {
            Value::Keyed { key, .. } => Some(key),
            _ => None,
        }
    }

    /// The inner value, if this value is a holder.
    pub fn unwrapped(&self) -> Option<&Value> {
        match self {
            Value::Keyed { value, .. } => Some(value),
            Value::Holder(inner) => Some(inner),
            _ => None,
        }
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Build an [`Value::Entry`] from a key and a value.
    pub fn entry(key: Value, value: Value) -> Self {
        Value::Entry(Box::new((key, value)))
    }

    /// Build a [`Value::Keyed`] identity-bearing wrapper.
    pub fn keyed(key: Value, value: Value) -> Self {
        Value::Keyed {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Build a [`Value::Holder`] around an inner value.
    pub fn holder(inner: Value) -> Self {
        Value::Holder(Box::new(inner))
    }

    /// Build a [`Value::Opaque`] from a type name and rendered text.
    pub fn opaque(type_name: impl Into<String>, rendered: impl Into<String>) -> Self {
        Value::Opaque {
            type_name: type_name.into(),
            rendered: rendered.into(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float32(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float64(f)
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

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

fn write_entries(
    f: &mut std::fmt::Formatter<'_>,
    entries: &[(Value, Value)],
) -> std::fmt::Result {
    write!(f, "{{")?;
    for (i, (k, v)) in entries.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}={}", k, v)?;
    }
    write!(f, "}}")
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float32(x) => write!(f, "{}", x),
            Value::Float64(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Set(items) => {
                write!(f, "{{")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "}}")
            }
            Value::Map(entries) | Value::SortedMap(entries) => write_entries(f, entries),
            Value::Entry(pair) => write!(f, "{}={}", pair.0, pair.1),
            Value::Keyed { key, value } => write!(f, "{}={}", key, value),
            Value::Holder(inner) => write!(f, "{}", inner),
            Value::Opaque { rendered, .. } => write!(f, "{}", rendered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tags() {
        assert_eq!(Value::Null.category(), Category::Null);
        assert_eq!(Value::Int(1).category(), Category::Numeric);
        assert_eq!(Value::Float64(1.0).category(), Category::Numeric);
        assert_eq!(Value::Bool(true).category(), Category::NativelyOrdered);
        assert_eq!(Value::from("x").category(), Category::NativelyOrdered);
        assert_eq!(Value::Seq(vec![]).category(), Category::Sequence);
        assert_eq!(Value::Set(vec![]).category(), Category::UnorderedCollection);
        assert_eq!(Value::Map(vec![]).category(), Category::Mapping);
        assert_eq!(Value::SortedMap(vec![]).category(), Category::SortedMapping);
        assert_eq!(
            Value::entry(Value::from("k"), Value::Int(1)).category(),
            Category::Entry
        );
        assert_eq!(
            Value::keyed(Value::from("id"), Value::Null).category(),
            Category::ValueHolder
        );
        assert_eq!(Value::holder(Value::Int(1)).category(), Category::ValueHolder);
        assert_eq!(Value::opaque("Widget", "Widget@1").category(), Category::Opaque);
    }

    #[test]
    fn test_opaque_reports_carried_type_name() {
        let v = Value::opaque("Widget", "Widget@1f2e");
        assert_eq!(v.type_name(), "Widget");
    }

    #[test]
    fn test_identity_key_and_unwrapped() {
        let keyed = Value::keyed(Value::from("id1"), Value::Int(7));
        assert_eq!(keyed.identity_key(), Some(&Value::from("id1")));
        assert_eq!(keyed.unwrapped(), Some(&Value::Int(7)));

        let holder = Value::holder(Value::Int(7));
        assert_eq!(holder.identity_key(), None);
        assert_eq!(holder.unwrapped(), Some(&Value::Int(7)));

        assert_eq!(Value::Int(7).unwrapped(), None);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(
            Value::Seq(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "[1, 2]"
        );
        assert_eq!(
            Value::Map(vec![(Value::from("a"), Value::Int(1))]).to_string(),
            "{a=1}"
        );
        assert_eq!(
            Value::entry(Value::from("k"), Value::from("v")).to_string(),
            "k=v"
        );
        assert_eq!(Value::opaque("Widget", "Widget@42").to_string(), "Widget@42");
    }

    #[test]
    fn test_serde_round_trip() {
        let v = Value::Map(vec![
            (Value::from("a"), Value::Float64(1.5)),
            (Value::from("b"), Value::holder(Value::Int(3))),
        ]);
        let json = serde_json::to_string(&v).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
