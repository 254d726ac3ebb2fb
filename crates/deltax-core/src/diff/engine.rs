//! Two-level diff computation engine.
//!
//! [`DiffEngine`] compares two labeled collections of entities: entity keys
//! are partitioned into added/removed/common, and each common entity's
//! property keys are partitioned again to produce per-property old/new
//! change pairs. Callers describe their entity type through a
//! [`DiffAdapter`](super::DiffAdapter); the engine never mutates caller
//! data.
//!
//! The engine is synchronous and **not** thread-safe: `diff()` rebuilds the
//! whole result in place, and accessors that look like reads lazily
//! materialize internal views. Every such accessor takes `&mut self` so the
//! mutation is visible in the signature. Use one engine per thread, or
//! serialize access externally.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::time::Instant;

use crate::diagnostics::{DiagnosticSink, NoopSink};
use crate::diff::adapter::DiffAdapter;
use crate::diff::model::{DiffResult, DiffState, PropertyChange};
use crate::errors::DeltaXError;
use crate::keyset::partition_keys;
use crate::{log_op_end, log_op_error, log_op_start};

/// Ordering used when materializing entity collections.
pub type EntityComparator<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// Value-equality predicate deciding whether a common property key counts
/// as changed.
pub type PropertyEquivalence<P> = Box<dyn Fn(&P, &P) -> bool>;

/// Computes and caches the difference between two sides.
///
/// Side 1 is the "before" snapshot, side 2 the "after". Each side is held
/// as an ordered collection (`Vec<T>`), a keyed view (`BTreeMap<ID, T>`),
/// or both; whichever representation is missing is derived lazily through
/// the adapter.
pub struct DiffEngine<T, P, ID, A> {
    adapter: A,
    set1: Option<Vec<T>>,
    set2: Option<Vec<T>>,
    map1: Option<BTreeMap<ID, T>>,
    map2: Option<BTreeMap<ID, T>>,
    entity_comparator: Option<EntityComparator<T>>,
    property_equivalence: Option<PropertyEquivalence<P>>,
    ignore_removed_properties: bool,
    property_ids_to_ignore: BTreeSet<ID>,
    sink: Box<dyn DiagnosticSink>,
    state: DiffState<T, P, ID>,
}

impl<T, P, ID, A> DiffEngine<T, P, ID, A>
where
    T: Clone,
    P: Clone + PartialEq,
    ID: Ord + Clone + Debug,
    A: DiffAdapter<T, P, ID>,
{
    fn new(
        adapter: A,
        set1: Option<Vec<T>>,
        set2: Option<Vec<T>>,
        map1: Option<BTreeMap<ID, T>>,
        map2: Option<BTreeMap<ID, T>>,
    ) -> Self {
        Self {
            adapter,
            set1,
            set2,
            map1,
            map2,
            entity_comparator: None,
            property_equivalence: None,
            ignore_removed_properties: false,
            property_ids_to_ignore: BTreeSet::new(),
            sink: Box::new(NoopSink),
            state: DiffState::Uncomputed,
        }
    }

    /// Construct from two entity collections; keyed views are derived
    /// lazily via the adapter's key extractor.
    pub fn from_sets(side1: Vec<T>, side2: Vec<T>, adapter: A) -> Self {
        Self::new(adapter, Some(side1), Some(side2), None, None)
    }

    /// Construct from two keyed views; entity collections are derived
    /// lazily when requested.
    pub fn from_maps(map1: BTreeMap<ID, T>, map2: BTreeMap<ID, T>, adapter: A) -> Self {
        Self::new(adapter, None, None, Some(map1), Some(map2))
    }

    /// Ordering for materialized entity collections. Absent means
    /// insertion-order semantics.
    pub fn with_entity_comparator(
        mut self,
        comparator: impl Fn(&T, &T) -> Ordering + 'static,
    ) -> Self {
        self.entity_comparator = Some(Box::new(comparator));
        self
    }

    /// Value-equality predicate for common property keys; defaults to
    /// `PartialEq`. Plug `compare_values` here for tolerant comparison of
    /// dynamic values.
    pub fn with_property_equivalence(
        mut self,
        equivalence: impl Fn(&P, &P) -> bool + 'static,
    ) -> Self {
        self.property_equivalence = Some(Box::new(equivalence));
        self
    }

    /// When set, removed properties are not recorded at all.
    pub fn with_ignore_removed_properties(mut self, ignore: bool) -> Self {
        self.ignore_removed_properties = ignore;
        self
    }

    /// Inject the diagnostic sink; the default discards all reports.
    pub fn with_diagnostic_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Append property keys to exclude from every diff computation.
    /// Appendable after construction; applied on the next `diff()`.
    pub fn add_property_ids_to_ignore(&mut self, ids: impl IntoIterator<Item = ID>) {
        self.property_ids_to_ignore.extend(ids);
    }

    /// The configured ignore-list.
    pub fn property_ids_to_ignore(&self) -> &BTreeSet<ID> {
        &self.property_ids_to_ignore
    }

    /// The adapter supplied at construction.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    fn ensure_map1(&mut self) {
        if self.map1.is_some() {
            return;
        }
        let mut map = BTreeMap::new();
        if let Some(entities) = &self.set1 {
            for entity in entities {
                map.insert(self.adapter.entity_id(entity), entity.clone());
            }
        }
        self.map1 = Some(map);
    }

    fn ensure_map2(&mut self) {
        if self.map2.is_some() {
            return;
        }
        let mut map = BTreeMap::new();
        if let Some(entities) = &self.set2 {
            for entity in entities {
                map.insert(self.adapter.entity_id(entity), entity.clone());
            }
        }
        self.map2 = Some(map);
    }

    fn ensure_set1(&mut self) {
        if self.set1.is_some() {
            return;
        }
        let mut entities: Vec<T> = self
            .map1
            .as_ref()
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        if let Some(comparator) = &self.entity_comparator {
            entities.sort_by(|a, b| comparator(a, b));
        }
        self.set1 = Some(entities);
    }

    fn ensure_set2(&mut self) {
        if self.set2.is_some() {
            return;
        }
        let mut entities: Vec<T> = self
            .map2
            .as_ref()
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        if let Some(comparator) = &self.entity_comparator {
            entities.sort_by(|a, b| comparator(a, b));
        }
        self.set2 = Some(entities);
    }

    /// Side 1 as a keyed view, materialized on first access.
    pub fn map1(&mut self) -> &BTreeMap<ID, T> {
        self.ensure_map1();
        self.map1.get_or_insert_with(BTreeMap::new)
    }

    /// Side 2 as a keyed view, materialized on first access.
    pub fn map2(&mut self) -> &BTreeMap<ID, T> {
        self.ensure_map2();
        self.map2.get_or_insert_with(BTreeMap::new)
    }

    /// Side 1 as an ordered collection, materialized on first access.
    pub fn side1(&mut self) -> &[T] {
        self.ensure_set1();
        self.set1.get_or_insert_with(Vec::new)
    }

    /// Side 2 as an ordered collection, materialized on first access.
    pub fn side2(&mut self) -> &[T] {
        self.ensure_set2();
        self.set2.get_or_insert_with(Vec::new)
    }

    /// Fetch a side-1 entity by key.
    pub fn get1(&mut self, id: &ID) -> Option<&T> {
        self.ensure_map1();
        self.map1.as_ref().and_then(|m| m.get(id))
    }

    /// Fetch a side-2 entity by key.
    pub fn get2(&mut self, id: &ID) -> Option<&T> {
        self.ensure_map2();
        self.map2.as_ref().and_then(|m| m.get(id))
    }

    /// Fetch a single side-1 property; absent entity or property yields
    /// `None`.
    pub fn get1_property(&mut self, entity_id: &ID, property_id: &ID) -> Option<P> {
        self.ensure_map1();
        let entity = self.map1.as_ref().and_then(|m| m.get(entity_id))?;
        self.adapter.property(entity, property_id)
    }

    /// Fetch a single side-2 property; absent entity or property yields
    /// `None`.
    pub fn get2_property(&mut self, entity_id: &ID, property_id: &ID) -> Option<P> {
        self.ensure_map2();
        let entity = self.map2.as_ref().and_then(|m| m.get(entity_id))?;
        self.adapter.property(entity, property_id)
    }

    /// An entity's properties indexed by key, with ignored keys removed.
    pub fn property_map(&self, entity: &T) -> BTreeMap<ID, P> {
        let mut map = BTreeMap::new();
        for property in self.adapter.properties(entity) {
            map.insert(self.adapter.property_id(&property), property);
        }
        map.retain(|id, _| !self.property_ids_to_ignore.contains(id));
        map
    }

    fn properties_equivalent(&self, old: &P, new: &P) -> bool {
        match &self.property_equivalence {
            Some(equivalence) => equivalence(old, new),
            None => old == new,
        }
    }

    /// Recompute the diff from scratch, discarding any cached result.
    pub fn diff(&mut self) -> &DiffResult<T, P, ID> {
        let started = Instant::now();
        self.ensure_map1();
        self.ensure_map2();
        // Own the maps locally so the loops below can use the adapter and
        // sink freely; restored before returning.
        let map1 = self.map1.take().unwrap_or_default();
        let map2 = self.map2.take().unwrap_or_default();
        log_op_start!("diff", entities_1 = map1.len(), entities_2 = map2.len());

        let mut result = DiffResult::default();
        let partition = partition_keys(&map1, &map2);

        for id in &partition.only_in_second {
            match map2.get(id) {
                Some(entity) => result.added.push(entity.clone()),
                None => self.sink.report(&format!(
                    "diff: added key {:?} has no side-2 entity; skipping",
                    id
                )),
            }
        }

        for id in &partition.only_in_first {
            match map1.get(id) {
                Some(entity) => result.removed.push(entity.clone()),
                None => self.sink.report(&format!(
                    "diff: removed key {:?} has no side-1 entity; skipping",
                    id
                )),
            }
        }

        for id in &partition.in_both {
            let (entity1, entity2) = match (map1.get(id), map2.get(id)) {
                (Some(e1), Some(e2)) => (e1, e2),
                _ => {
                    self.sink.report(&format!(
                        "diff: common key {:?} missing from a side; skipping",
                        id
                    ));
                    continue;
                }
            };

            let properties1 = self.property_map(entity1);
            let properties2 = self.property_map(entity2);
            let property_partition = partition_keys(&properties1, &properties2);

            let mut added_here: BTreeMap<ID, P> = BTreeMap::new();
            let mut removed_here: BTreeMap<ID, P> = BTreeMap::new();
            let mut updated_here: BTreeMap<ID, PropertyChange<P>> = BTreeMap::new();
            let mut changes_here: BTreeMap<ID, PropertyChange<P>> = BTreeMap::new();

            for pid in &property_partition.only_in_second {
                if let Some(new_value) = properties2.get(pid) {
                    changes_here.insert(pid.clone(), PropertyChange::added(new_value.clone()));
                    added_here.insert(pid.clone(), new_value.clone());
                }
            }
            if !self.ignore_removed_properties {
                for pid in &property_partition.only_in_first {
                    if let Some(old_value) = properties1.get(pid) {
                        changes_here
                            .insert(pid.clone(), PropertyChange::removed(old_value.clone()));
                        removed_here.insert(pid.clone(), old_value.clone());
                    }
                }
            }
            for pid in &property_partition.in_both {
                let (old_value, new_value) = match (properties1.get(pid), properties2.get(pid)) {
                    (Some(old), Some(new)) => (old, new),
                    _ => continue,
                };
                if self.properties_equivalent(old_value, new_value) {
                    continue;
                }
                let change = PropertyChange::updated(old_value.clone(), new_value.clone());
                changes_here.insert(pid.clone(), change.clone());
                updated_here.insert(pid.clone(), change);
            }

            // Removed properties alone never make an entity "updated".
            if !added_here.is_empty() || !updated_here.is_empty() {
                result.updated.push(entity2.clone());
            }
            if !added_here.is_empty() {
                result.added_properties.insert(id.clone(), added_here);
            }
            if !removed_here.is_empty() {
                result.removed_properties.insert(id.clone(), removed_here);
            }
            if !updated_here.is_empty() {
                result.updated_properties.insert(id.clone(), updated_here);
            }
            if !changes_here.is_empty() {
                result.property_changes.insert(id.clone(), changes_here);
            }
        }

        if let Some(comparator) = &self.entity_comparator {
            result.added.sort_by(|a, b| comparator(a, b));
            result.removed.sort_by(|a, b| comparator(a, b));
            result.updated.sort_by(|a, b| comparator(a, b));
        }

        self.map1 = Some(map1);
        self.map2 = Some(map2);

        log_op_end!(
            "diff",
            duration_ms = started.elapsed().as_millis() as u64,
            added_len = result.added.len(),
            removed_len = result.removed.len(),
            updated_len = result.updated.len()
        );
        self.state.set(result)
    }

    /// The cached result, computing it on first demand.
    pub fn result(&mut self) -> &DiffResult<T, P, ID> {
        if !self.state.is_computed() {
            self.diff();
        }
        match &self.state {
            DiffState::Computed(result) => result,
            // diff() always leaves the state computed
            DiffState::Uncomputed => unreachable!(),
        }
    }

    fn result_mut(&mut self) -> &mut DiffResult<T, P, ID> {
        if !self.state.is_computed() {
            self.diff();
        }
        match &mut self.state {
            DiffState::Computed(result) => result,
            DiffState::Uncomputed => unreachable!(),
        }
    }

    /// Entities present only on side 2.
    pub fn added(&mut self) -> &[T] {
        &self.result().added
    }

    /// Entities present only on side 1.
    pub fn removed(&mut self) -> &[T] {
        &self.result().removed
    }

    /// Side-2 entities with added or updated properties.
    pub fn updated(&mut self) -> &[T] {
        &self.result().updated
    }

    /// All recorded property changes, keyed by entity then property.
    pub fn property_changes(&mut self) -> &BTreeMap<ID, BTreeMap<ID, PropertyChange<P>>> {
        &self.result().property_changes
    }

    /// Added properties for one entity, auto-creating an empty stored map
    /// when none exists yet.
    pub fn added_properties_for(&mut self, id: &ID) -> &BTreeMap<ID, P> {
        self.result_mut()
            .added_properties
            .entry(id.clone())
            .or_default()
    }

    /// Removed properties for one entity, auto-creating an empty stored map
    /// when none exists yet.
    pub fn removed_properties_for(&mut self, id: &ID) -> &BTreeMap<ID, P> {
        self.result_mut()
            .removed_properties
            .entry(id.clone())
            .or_default()
    }

    /// Updated properties for one entity, auto-creating an empty stored map
    /// when none exists yet.
    pub fn updated_properties_for(&mut self, id: &ID) -> &BTreeMap<ID, PropertyChange<P>> {
        self.result_mut()
            .updated_properties
            .entry(id.clone())
            .or_default()
    }

    /// All property changes for one entity, auto-creating an empty stored
    /// map when none exists yet.
    pub fn property_changes_for(&mut self, id: &ID) -> &BTreeMap<ID, PropertyChange<P>> {
        self.result_mut()
            .property_changes
            .entry(id.clone())
            .or_default()
    }

    /// True when no entity present on both sides changed. Wholesale entity
    /// additions and removals are deliberately not considered.
    pub fn are_same(&mut self) -> bool {
        self.result()
            .property_changes
            .values()
            .all(|changes| changes.is_empty())
    }

    /// Negation of [`DiffEngine::are_same`].
    pub fn are_different(&mut self) -> bool {
        !self.are_same()
    }

    /// Verify the computed result against the engine's invariants:
    /// partition exact cover and disjointness, `added ∩ removed = ∅`, the
    /// update criterion, ignore-list exclusion, and
    /// `updated_properties ⊆ property_changes`.
    ///
    /// Computes the diff first if needed.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant, with the offending keys
    /// rendered into the error.
    pub fn verify(&mut self) -> Result<(), DeltaXError> {
        let started = Instant::now();
        if !self.state.is_computed() {
            self.diff();
        }
        self.ensure_map1();
        self.ensure_map2();
        let outcome = self.check_invariants();
        if let Err(err) = &outcome {
            log_op_error!(
                "verify",
                err.clone(),
                duration_ms = started.elapsed().as_millis() as u64
            );
        }
        outcome
    }

    fn check_invariants(&self) -> Result<(), DeltaXError> {
        let result = match self.state.computed() {
            Some(result) => result,
            None => return Ok(()),
        };
        let empty = BTreeMap::new();
        let map1 = self.map1.as_ref().unwrap_or(&empty);
        let map2 = self.map2.as_ref().unwrap_or(&empty);
        let partition = partition_keys(map1, map2);

        // Pairwise disjointness
        let overlapping = partition
            .only_in_second
            .intersection(&partition.only_in_first)
            .chain(partition.only_in_second.intersection(&partition.in_both))
            .chain(partition.only_in_first.intersection(&partition.in_both))
            .next();
        if let Some(key) = overlapping {
            return Err(DeltaXError::PartitionOverlap {
                key: format!("{:?}", key),
            });
        }

        // Exact cover of both key universes
        for key in map1.keys().chain(map2.keys()) {
            let covered = partition.only_in_second.contains(key)
                || partition.only_in_first.contains(key)
                || partition.in_both.contains(key);
            if !covered {
                return Err(DeltaXError::PartitionGap {
                    key: format!("{:?}", key),
                });
            }
        }

        // added ∩ removed = ∅ over entity keys
        let added_ids: BTreeSet<ID> = result
            .added
            .iter()
            .map(|entity| self.adapter.entity_id(entity))
            .collect();
        let removed_ids: BTreeSet<ID> = result
            .removed
            .iter()
            .map(|entity| self.adapter.entity_id(entity))
            .collect();
        if let Some(key) = added_ids.intersection(&removed_ids).next() {
            return Err(DeltaXError::PartitionOverlap {
                key: format!("{:?}", key),
            });
        }

        // Update criterion: membership in `updated` iff added or updated
        // properties are non-empty for that key
        let updated_ids: BTreeSet<ID> = result
            .updated
            .iter()
            .map(|entity| self.adapter.entity_id(entity))
            .collect();
        for id in &partition.in_both {
            let has_added = result
                .added_properties
                .get(id)
                .is_some_and(|m| !m.is_empty());
            let has_updated = result
                .updated_properties
                .get(id)
                .is_some_and(|m| !m.is_empty());
            if (has_added || has_updated) != updated_ids.contains(id) {
                return Err(DeltaXError::UpdateCriterionViolated {
                    entity_id: format!("{:?}", id),
                });
            }
        }

        // Ignore-list exclusion across every output container
        for ignored in &self.property_ids_to_ignore {
            for (entity_id, properties) in &result.added_properties {
                if properties.contains_key(ignored) {
                    return Err(leaked(entity_id, ignored, "added_properties"));
                }
            }
            for (entity_id, properties) in &result.removed_properties {
                if properties.contains_key(ignored) {
                    return Err(leaked(entity_id, ignored, "removed_properties"));
                }
            }
            for (entity_id, changes) in &result.updated_properties {
                if changes.contains_key(ignored) {
                    return Err(leaked(entity_id, ignored, "updated_properties"));
                }
            }
            for (entity_id, changes) in &result.property_changes {
                if changes.contains_key(ignored) {
                    return Err(leaked(entity_id, ignored, "property_changes"));
                }
            }
        }

        // Every updated property has a matching change entry
        for (entity_id, changes) in &result.updated_properties {
            for property_id in changes.keys() {
                let present = result
                    .property_changes
                    .get(entity_id)
                    .is_some_and(|m| m.contains_key(property_id));
                if !present {
                    return Err(DeltaXError::MissingChangeEntry {
                        entity_id: format!("{:?}", entity_id),
                        property_id: format!("{:?}", property_id),
                    });
                }
            }
        }

        Ok(())
    }
}

fn leaked<ID: Debug>(entity_id: &ID, property_id: &ID, container: &'static str) -> DeltaXError {
    DeltaXError::IgnoredKeyLeaked {
        entity_id: format!("{:?}", entity_id),
        property_id: format!("{:?}", property_id),
        container,
    }
}
