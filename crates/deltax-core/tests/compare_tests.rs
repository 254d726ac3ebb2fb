//! Structural comparator tests — one section per resolution rule.

use deltax_core::compare::{compare_text_no_hash, compare_values, GenericComparator};
use deltax_core_types::Value;
use proptest::prelude::*;
use std::cmp::Ordering;

fn cmp(a: &Value, b: &Value) -> Ordering {
    compare_values(a, b, false)
}

// Rule 1: identity
#[test]
fn test_reflexive_for_every_shape() {
    let samples = vec![
        Value::Null,
        Value::Bool(true),
        Value::Int(-3),
        Value::Float32(2.5),
        Value::Float64(1.0e100),
        Value::from("text"),
        Value::Seq(vec![Value::Int(1), Value::from("x")]),
        Value::Set(vec![Value::Int(1)]),
        Value::Map(vec![(Value::from("k"), Value::Int(1))]),
        Value::SortedMap(vec![(Value::from("k"), Value::Int(1))]),
        Value::entry(Value::from("k"), Value::Int(1)),
        Value::keyed(Value::from("id"), Value::Int(1)),
        Value::holder(Value::Int(1)),
        Value::opaque("Widget", "Widget@17"),
    ];
    for value in &samples {
        assert_eq!(cmp(value, value), Ordering::Equal, "not reflexive: {:?}", value);
        assert_eq!(cmp(value, &value.clone()), Ordering::Equal);
    }
}

// Rule 2: null sorts before non-null
#[test]
fn test_null_sorts_first() {
    assert_eq!(cmp(&Value::Null, &Value::Int(0)), Ordering::Less);
    assert_eq!(cmp(&Value::Int(0), &Value::Null), Ordering::Greater);
    assert_eq!(cmp(&Value::Null, &Value::Null), Ordering::Equal);
}

// Rule 3: identity fast path
#[test]
fn test_identity_hint_compares_keys() {
    let a = Value::keyed(Value::from("a"), Value::Int(100));
    let b = Value::keyed(Value::from("b"), Value::Int(100));
    assert_eq!(compare_values(&a, &b, true), Ordering::Less);
    // same key, different content: the hint decides equality
    let c = Value::keyed(Value::from("a"), Value::Int(999));
    assert_eq!(compare_values(&a, &c, true), Ordering::Equal);
    // without the hint both fall through to the unwrapped content
    assert_eq!(compare_values(&a, &b, false), Ordering::Equal);
    assert_eq!(compare_values(&a, &c, false), Ordering::Less);
}

// Rule 4: numeric tolerance
#[test]
fn test_double_tolerance_band() {
    assert_eq!(
        cmp(&Value::Float64(1.0), &Value::Float64(1.0 + 1e-15)),
        Ordering::Equal
    );
    assert_ne!(
        cmp(&Value::Float64(1.0), &Value::Float64(1.1)),
        Ordering::Equal
    );
    assert_eq!(
        cmp(&Value::Float64(1.0), &Value::Float64(1.1)),
        Ordering::Less
    );
    // relative, not absolute: large magnitudes widen the band
    assert_eq!(
        cmp(&Value::Float64(1.0e100), &Value::Float64(1.0e100 + 1.0)),
        Ordering::Equal
    );
}

#[test]
fn test_float_tolerance_band() {
    assert_eq!(
        cmp(&Value::Float32(1.0), &Value::Float32(1.000_001)),
        Ordering::Equal
    );
    assert_eq!(
        cmp(&Value::Float32(1.0), &Value::Float32(1.1)),
        Ordering::Less
    );
}

#[test]
fn test_numeric_promotion() {
    assert_eq!(cmp(&Value::Int(2), &Value::Float64(2.0)), Ordering::Equal);
    assert_eq!(cmp(&Value::Int(2), &Value::Float32(2.0)), Ordering::Equal);
    assert_eq!(cmp(&Value::Float32(1.5), &Value::Float64(1.5)), Ordering::Equal);
    assert_eq!(cmp(&Value::Int(3), &Value::Float64(2.5)), Ordering::Greater);
}

#[test]
fn test_nan_is_deterministic() {
    let nan = Value::Float64(f64::NAN);
    let one = Value::Float64(1.0);
    let first = cmp(&nan, &one);
    assert_eq!(cmp(&nan, &one), first);
    assert_eq!(cmp(&one, &nan), first.reverse());
}

// Rule 5: native total orders
#[test]
fn test_native_orders() {
    assert_eq!(cmp(&Value::from("apple"), &Value::from("banana")), Ordering::Less);
    assert_eq!(cmp(&Value::Bool(false), &Value::Bool(true)), Ordering::Less);
}

// Rule 6: type-name tie-break for mixed types
#[test]
fn test_mixed_types_order_by_type_name() {
    // "int" < "text"
    assert_eq!(cmp(&Value::Int(9), &Value::from("a")), Ordering::Less);
    assert_eq!(cmp(&Value::from("a"), &Value::Int(9)), Ordering::Greater);
    // "bool" < "seq"
    assert_eq!(cmp(&Value::Bool(true), &Value::Seq(vec![])), Ordering::Less);
    // opaque values with different carried names
    assert_eq!(
        cmp(&Value::opaque("Alpha", "x"), &Value::opaque("Beta", "x")),
        Ordering::Less
    );
}

// Rule 7: sequences
#[test]
fn test_sequences_element_wise_then_shorter_first() {
    let short = Value::Seq(vec![Value::Int(1), Value::Int(2)]);
    let long = Value::Seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    let bigger = Value::Seq(vec![Value::Int(1), Value::Int(5)]);
    assert_eq!(cmp(&short, &long), Ordering::Less);
    assert_eq!(cmp(&long, &short), Ordering::Greater);
    assert_eq!(cmp(&short, &bigger), Ordering::Less);
}

// Rule 7: unordered collections keep natural iteration order
#[test]
fn test_sets_compare_in_iteration_order() {
    let a = Value::Set(vec![Value::Int(1), Value::Int(2)]);
    let b = Value::Set(vec![Value::Int(2), Value::Int(1)]);
    // no sorting happens: first elements decide
    assert_eq!(cmp(&a, &b), Ordering::Less);
}

// Rule 7: mappings
#[test]
fn test_mappings_compare_values_then_key_sets() {
    let a = Value::Map(vec![(Value::from("k"), Value::Int(1))]);
    let b = Value::Map(vec![(Value::from("k"), Value::Int(2))]);
    assert_eq!(cmp(&a, &b), Ordering::Less);

    // equal shared values, different sizes: the key sequences decide
    let small = Value::Map(vec![(Value::from("a"), Value::Int(1))]);
    let large = Value::Map(vec![
        (Value::from("a"), Value::Int(1)),
        (Value::from("b"), Value::Int(2)),
    ]);
    assert_eq!(cmp(&small, &large), Ordering::Less);

    // a key absent from the second mapping reads as null
    let only_a = Value::Map(vec![(Value::from("a"), Value::Int(1))]);
    let only_b = Value::Map(vec![(Value::from("b"), Value::Int(1))]);
    assert_eq!(cmp(&only_a, &only_b), Ordering::Greater);
}

// Rule 7: sorted mappings compare full entry sequences
#[test]
fn test_sorted_mappings_compare_entries() {
    let a = Value::SortedMap(vec![
        (Value::from("a"), Value::Int(1)),
        (Value::from("b"), Value::Int(2)),
    ]);
    let b = Value::SortedMap(vec![
        (Value::from("a"), Value::Int(1)),
        (Value::from("c"), Value::Int(2)),
    ]);
    assert_eq!(cmp(&a, &b), Ordering::Less);
}

// Rule 7: entries compare key first, then value
#[test]
fn test_entries_key_then_value() {
    let a = Value::entry(Value::from("a"), Value::Int(9));
    let b = Value::entry(Value::from("b"), Value::Int(1));
    assert_eq!(cmp(&a, &b), Ordering::Less);

    let c = Value::entry(Value::from("a"), Value::Int(1));
    assert_eq!(cmp(&c, &a), Ordering::Less);
}

// Rule 8: holder unwrapping
#[test]
fn test_holders_compare_unwrapped() {
    let five = Value::holder(Value::Int(5));
    let seven = Value::holder(Value::Int(7));
    assert_eq!(cmp(&five, &seven), Ordering::Less);

    // raw equality between a holder's inner value and the other operand
    // short-circuits to equal
    let nested = Value::holder(Value::holder(Value::Int(5)));
    assert_eq!(cmp(&nested, &five), Ordering::Equal);
}

// Rule 9: rendered-text fallback and the identity-hash heuristic
#[test]
fn test_opaque_hash_suffix_treated_equal() {
    let a = Value::opaque("Widget", "Widget@123abc");
    let b = Value::opaque("Widget", "Widget@456def");
    assert_eq!(cmp(&a, &b), Ordering::Equal);
}

#[test]
fn test_opaque_non_hash_suffix_compares_lexicographically() {
    let a = Value::opaque("Widget", "Widget@abc");
    let b = Value::opaque("Widget", "Widget@abd");
    assert_eq!(cmp(&a, &b), Ordering::Less);
}

#[test]
fn test_text_no_hash_plain_strings() {
    assert_eq!(compare_text_no_hash("abc", "abd"), Ordering::Less);
    assert_eq!(compare_text_no_hash("abc", "abc"), Ordering::Equal);
    assert_eq!(compare_text_no_hash("abc", "abcd"), Ordering::Less);
    assert_eq!(compare_text_no_hash("abcd", "abc"), Ordering::Greater);
}

// GenericComparator is the hint-enabled convenience order
#[test]
fn test_generic_comparator_uses_identity_hint() {
    let a = Value::keyed(Value::from("a"), Value::Int(9));
    let b = Value::keyed(Value::from("b"), Value::Int(1));
    assert_eq!(GenericComparator::compare(&a, &b), Ordering::Less);

    let order = GenericComparator::ordering::<i64>();
    assert_eq!(order(&1, &2), Ordering::Less);
}

proptest! {
    // Anti-symmetry outside the tolerance band
    #[test]
    fn prop_int_compare_antisymmetric(a in any::<i64>(), b in any::<i64>()) {
        let forward = compare_values(&Value::Int(a), &Value::Int(b), false);
        let backward = compare_values(&Value::Int(b), &Value::Int(a), false);
        prop_assert_eq!(forward, backward.reverse());
    }

    #[test]
    fn prop_text_compare_antisymmetric(a in ".{0,12}", b in ".{0,12}") {
        let left = Value::from(a.as_str());
        let right = Value::from(b.as_str());
        let forward = compare_values(&left, &right, false);
        let backward = compare_values(&right, &left, false);
        prop_assert_eq!(forward, backward.reverse());
    }

    #[test]
    fn prop_compare_reflexive(a in any::<i64>()) {
        prop_assert_eq!(
            compare_values(&Value::Int(a), &Value::Int(a), false),
            Ordering::Equal
        );
    }
}
