//! Generic structural comparison.
//!
//! [`compare_values`] imposes a total, deterministic order on arbitrary
//! [`Value`] pairs. Resolution walks a fixed ladder: identity, null
//! handling, the identity-key fast path, numeric promotion with relative
//! epsilons, native scalar orders, a runtime type-name tie-break, structural
//! recursion per category, value-holder unwrapping, and finally a rendered-
//! text comparison that neutralizes printed identity-hash suffixes.
//!
//! Recursion only ever descends into structurally smaller children of an
//! owned value tree, so every call terminates.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use deltax_core_types::{Category, Value};

/// Compare two values, returning a total, deterministic ordering.
///
/// With `use_key_hint` set, values exposing an identity key are ordered by
/// that key alone — the fast path for entities with cheap keys. The ordering
/// is anti-symmetric except within the floating-point tolerance band (see
/// [`Value::Float64`] / [`Value::Float32`]).
pub fn compare_values(a: &Value, b: &Value, use_key_hint: bool) -> Ordering {
    // 1. Reference or value identity
    if std::ptr::eq(a, b) || a == b {
        return Ordering::Equal;
    }

    // 2. Null sorts before non-null
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    // 3. Identity fast path. The key recursion runs with the hint off, as
    // identity keys are plain values.
    if use_key_hint {
        if let (Some(key_a), Some(key_b)) = (a.identity_key(), b.identity_key()) {
            return compare_values(key_a, key_b, false);
        }
    }

    // 4. Numeric promotion to the widest present kind
    if let (Some(n1), Some(n2)) = (as_numeric(a), as_numeric(b)) {
        return compare_numeric(n1, n2);
    }

    // 5. Native total orders; type-incompatible operands fall through
    match (a, b) {
        (Value::Text(s1), Value::Text(s2)) => return s1.cmp(s2),
        (Value::Bool(b1), Value::Bool(b2)) => return b1.cmp(b2),
        _ => {}
    }

    // 6. Runtime type-name tie-break stabilizes mixed-type collections
    let by_name = a.type_name().cmp(b.type_name());
    if by_name != Ordering::Equal {
        return by_name;
    }

    // 7./8. Structural recursion per category, holder unwrapping
    match (a, b) {
        (Value::Seq(x), Value::Seq(y)) | (Value::Set(x), Value::Set(y)) => {
            compare_elements(x, y, use_key_hint)
        }
        (Value::Map(x), Value::Map(y)) => compare_mappings(x, y, use_key_hint),
        (Value::SortedMap(x), Value::SortedMap(y)) => compare_entry_lists(x, y, use_key_hint),
        (Value::Entry(p1), Value::Entry(p2)) => compare_entry_lists(
            std::slice::from_ref(p1.as_ref()),
            std::slice::from_ref(p2.as_ref()),
            use_key_hint,
        ),
        _ if a.category() == Category::ValueHolder || b.category() == Category::ValueHolder => {
            compare_unwrapped(a, b, use_key_hint)
        }
        // 9. Rendered-text fallback
        _ => compare_rendered(a, b),
    }
}

#[derive(Clone, Copy)]
enum Numeric {
    Int(i64),
    F32(f32),
    F64(f64),
}

impl Numeric {
    fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::F32(f) => f64::from(f),
            Numeric::F64(f) => f,
        }
    }

    fn as_f32(self) -> f32 {
        match self {
            Numeric::Int(i) => i as f32,
            Numeric::F32(f) => f,
            Numeric::F64(f) => f as f32,
        }
    }
}

fn as_numeric(value: &Value) -> Option<Numeric> {
    match value {
        Value::Int(i) => Some(Numeric::Int(*i)),
        Value::Float32(f) => Some(Numeric::F32(*f)),
        Value::Float64(f) => Some(Numeric::F64(*f)),
        _ => None,
    }
}

fn compare_numeric(n1: Numeric, n2: Numeric) -> Ordering {
    match (n1, n2) {
        (Numeric::Int(a), Numeric::Int(b)) => a.cmp(&b),
        (Numeric::F64(_), _) | (_, Numeric::F64(_)) => compare_f64(n1.as_f64(), n2.as_f64()),
        (Numeric::F32(_), _) | (_, Numeric::F32(_)) => compare_f32(n1.as_f32(), n2.as_f32()),
    }
}

/// Double comparison with a relative epsilon of `|d1| * 1e-14`.
///
/// NaN operands fall back to the IEEE total order so the result stays
/// deterministic.
pub fn compare_f64(d1: f64, d2: f64) -> Ordering {
    if d1 == d2 {
        return Ordering::Equal;
    }
    let diff = (d1 - d2).abs();
    let epsilon = (d1 * 1.0e-14).abs();
    if diff < epsilon {
        return Ordering::Equal;
    }
    d1.total_cmp(&d2)
}

/// Float comparison with a relative epsilon of `|f1| * 1e-5`.
pub fn compare_f32(f1: f32, f2: f32) -> Ordering {
    if f1 == f2 {
        return Ordering::Equal;
    }
    let diff = (f1 - f2).abs();
    let epsilon = (f1 * 1.0e-5).abs();
    if diff < epsilon {
        return Ordering::Equal;
    }
    f1.total_cmp(&f2)
}

/// Element-wise comparison; on a full shared prefix the shorter side sorts
/// first.
fn compare_elements(items1: &[Value], items2: &[Value], use_key_hint: bool) -> Ordering {
    for (v1, v2) in items1.iter().zip(items2) {
        let ord = compare_values(v1, v2, use_key_hint);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    items1.len().cmp(&items2.len())
}

/// Compare mappings by the values at each key of the first mapping (absent
/// values read as null); when all of those agree but sizes differ, fall back
/// to comparing the key sequences.
fn compare_mappings(
    entries1: &[(Value, Value)],
    entries2: &[(Value, Value)],
    use_key_hint: bool,
) -> Ordering {
    for (key, v1) in entries1 {
        let v2 = entries2
            .iter()
            .find(|(other, _)| other == key)
            .map(|(_, v)| v)
            .unwrap_or(&Value::Null);
        let ord = compare_values(v1, v2, use_key_hint);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    if entries1.len() == entries2.len() {
        return Ordering::Equal;
    }
    let keys1: Vec<Value> = entries1.iter().map(|(k, _)| k.clone()).collect();
    let keys2: Vec<Value> = entries2.iter().map(|(k, _)| k.clone()).collect();
    compare_elements(&keys1, &keys2, use_key_hint)
}

/// Compare ordered entry lists pair-wise: key first, then value; shorter
/// sorts first.
fn compare_entry_lists(
    entries1: &[(Value, Value)],
    entries2: &[(Value, Value)],
    use_key_hint: bool,
) -> Ordering {
    for ((k1, v1), (k2, v2)) in entries1.iter().zip(entries2) {
        let ord = compare_values(k1, k2, use_key_hint);
        if ord != Ordering::Equal {
            return ord;
        }
        let ord = compare_values(v1, v2, use_key_hint);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    entries1.len().cmp(&entries2.len())
}

/// Holder unwrapping: raw equality between either wrapped value and the
/// other operand short-circuits to equal, otherwise recurse on the
/// unwrapped pair.
fn compare_unwrapped(a: &Value, b: &Value, use_key_hint: bool) -> Ordering {
    if let Some(inner) = a.unwrapped() {
        if inner == b {
            return Ordering::Equal;
        }
    }
    if let Some(inner) = b.unwrapped() {
        if inner == a {
            return Ordering::Equal;
        }
    }
    compare_values(
        a.unwrapped().unwrap_or(a),
        b.unwrapped().unwrap_or(b),
        use_key_hint,
    )
}

fn compare_rendered(a: &Value, b: &Value) -> Ordering {
    compare_text_no_hash(&a.to_string(), &b.to_string())
}

/// Lexicographic text comparison that neutralizes printed identity-hash
/// suffixes: when both strings reach a `@` together and a digit follows in
/// either, the remainder compares equal. Default object renderings would
/// otherwise drive nondeterministic orderings.
pub fn compare_text_no_hash(s1: &str, s2: &str) -> Ordering {
    let mut chars1 = s1.chars();
    let mut chars2 = s2.chars();
    let mut got_at = false;
    loop {
        match (chars1.next(), chars2.next()) {
            (Some(c1), Some(c2)) => {
                if got_at {
                    if c1.is_ascii_digit() || c2.is_ascii_digit() {
                        tracing::debug!(
                            component = module_path!(),
                            "assumed identity-hash suffix; treating remainder as equal"
                        );
                        return Ordering::Equal;
                    }
                    got_at = false;
                }
                match c1.cmp(&c2) {
                    Ordering::Equal => {}
                    other => return other,
                }
                if c1 == '@' {
                    got_at = true;
                }
            }
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// Bridge from domain types into the dynamic [`Value`] model.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for i32 {
    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }
}

impl ToValue for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float32(*self)
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float64(*self)
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

/// Convenience total order with the identity fast path enabled.
///
/// This is the default ordering whenever an entity collection is
/// materialized into an ordered container and an ordering is requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericComparator;

impl GenericComparator {
    /// Compare two values with the identity fast path enabled.
    pub fn compare(a: &Value, b: &Value) -> Ordering {
        compare_values(a, b, true)
    }

    /// An ordering closure over any [`ToValue`] type, suitable for the diff
    /// engine's entity comparator.
    pub fn ordering<T: ToValue>() -> impl Fn(&T, &T) -> Ordering {
        |a, b| compare_values(&a.to_value(), &b.to_value(), true)
    }
}

/// Orders keys by the values they map to in a backing map; keys without a
/// mapped value sort first.
pub struct MappedValueComparator<'a, K, V> {
    map: &'a BTreeMap<K, V>,
}

impl<'a, K, V> MappedValueComparator<'a, K, V>
where
    K: Ord,
    V: ToValue,
{
    pub fn new(map: &'a BTreeMap<K, V>) -> Self {
        Self { map }
    }

    pub fn compare(&self, a: &K, b: &K) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let value_a = self.map.get(a).map(ToValue::to_value).unwrap_or(Value::Null);
        let value_b = self.map.get(b).map(ToValue::to_value).unwrap_or(Value::Null);
        compare_values(&value_a, &value_b, true)
    }
}

/// Sort mapping entries by key under the generic order and build a
/// [`Value::SortedMap`].
pub fn into_sorted_map(mut entries: Vec<(Value, Value)>) -> Value {
    entries.sort_by(|(k1, _), (k2, _)| compare_values(k1, k2, true));
    Value::SortedMap(entries)
}
