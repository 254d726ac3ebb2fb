//! Three-way key-set partitioning.
//!
//! Given two key-indexed views, [`partition_keys`] splits the union of
//! their key sets into keys only in the second view, keys only in the
//! first, and keys present in both. The diff engine runs this once at the
//! entity level and once per common entity at the property level.

use std::collections::{BTreeMap, BTreeSet};

/// The three-way partition of two key universes.
///
/// The sets are pairwise disjoint and their union is exactly
/// `keys(first) ∪ keys(second)`. Note that `in_both` carries *all* common
/// keys; whether a common key's values actually differ is the caller's
/// decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPartition<ID> {
    /// Keys present only in the second view ("added")
    pub only_in_second: BTreeSet<ID>,
    /// Keys present only in the first view ("removed")
    pub only_in_first: BTreeSet<ID>,
    /// Keys present in both views (update candidates)
    pub in_both: BTreeSet<ID>,
}

impl<ID> KeyPartition<ID> {
    /// True when both key universes were empty.
    pub fn is_empty(&self) -> bool {
        self.only_in_second.is_empty() && self.only_in_first.is_empty() && self.in_both.is_empty()
    }
}

/// Partition the keys of two maps into added / removed / common sets.
///
/// The value types of the two maps are independent; only keys are examined.
pub fn partition_keys<ID, A, B>(
    first: &BTreeMap<ID, A>,
    second: &BTreeMap<ID, B>,
) -> KeyPartition<ID>
where
    ID: Ord + Clone,
{
    let mut only_in_second = BTreeSet::new();
    let mut only_in_first = BTreeSet::new();
    let mut in_both = BTreeSet::new();

    for key in second.keys() {
        if !first.contains_key(key) {
            only_in_second.insert(key.clone());
        }
    }
    for key in first.keys() {
        if second.contains_key(key) {
            in_both.insert(key.clone());
        } else {
            only_in_first.insert(key.clone());
        }
    }

    KeyPartition {
        only_in_second,
        only_in_first,
        in_both,
    }
}
