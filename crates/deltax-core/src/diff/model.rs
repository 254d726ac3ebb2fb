//! Diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Collections use `BTreeMap` for deterministic iteration and
//! serialization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Old/new values for one changed property.
///
/// `old` is absent for an added property, `new` for a removed one; an
/// updated property carries both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyChange<P> {
    /// Value on side 1, if the property existed there
    pub old: Option<P>,
    /// Value on side 2, if the property exists there
    pub new: Option<P>,
}

impl<P> PropertyChange<P> {
    /// Change record for a property present only on side 2.
    pub fn added(new: P) -> Self {
        Self {
            old: None,
            new: Some(new),
        }
    }

    /// Change record for a property present only on side 1.
    pub fn removed(old: P) -> Self {
        Self {
            old: Some(old),
            new: None,
        }
    }

    /// Change record for a property present on both sides with different
    /// values.
    pub fn updated(old: P, new: P) -> Self {
        Self {
            old: Some(old),
            new: Some(new),
        }
    }

    /// True when the property was added on side 2.
    pub fn is_addition(&self) -> bool {
        self.old.is_none() && self.new.is_some()
    }

    /// True when the property was removed on side 2.
    pub fn is_removal(&self) -> bool {
        self.old.is_some() && self.new.is_none()
    }

    /// True when the property changed value.
    pub fn is_update(&self) -> bool {
        self.old.is_some() && self.new.is_some()
    }
}

/// The computed output of one `diff()` run.
///
/// `added`/`updated` hold side-2 entities, `removed` side-1 entities.
/// `property_changes` is the superset of added/removed/updated property
/// changes for each entity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize, P: Serialize, ID: Serialize",
    deserialize = "T: Deserialize<'de>, P: Deserialize<'de>, ID: Deserialize<'de> + Ord"
))]
pub struct DiffResult<T, P, ID> {
    /// Entities present only on side 2
    pub added: Vec<T>,
    /// Entities present only on side 1
    pub removed: Vec<T>,
    /// Side-2 entities whose added or updated property maps are non-empty
    pub updated: Vec<T>,
    /// Per-entity properties present only on side 2
    pub added_properties: BTreeMap<ID, BTreeMap<ID, P>>,
    /// Per-entity properties present only on side 1 (empty when removed
    /// properties are ignored)
    pub removed_properties: BTreeMap<ID, BTreeMap<ID, P>>,
    /// Per-entity properties present on both sides with different values
    pub updated_properties: BTreeMap<ID, BTreeMap<ID, PropertyChange<P>>>,
    /// Per-entity superset of all recorded property changes
    pub property_changes: BTreeMap<ID, BTreeMap<ID, PropertyChange<P>>>,
}

impl<T, P, ID> Default for DiffResult<T, P, ID> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            updated: Vec::new(),
            added_properties: BTreeMap::new(),
            removed_properties: BTreeMap::new(),
            updated_properties: BTreeMap::new(),
            property_changes: BTreeMap::new(),
        }
    }
}

/// Explicit result lifecycle: a diff is either not yet computed or fully
/// computed — never partially populated.
#[derive(Debug, Clone)]
pub enum DiffState<T, P, ID> {
    /// No diff has been computed yet
    Uncomputed,
    /// A fully-populated result from the most recent `diff()`
    Computed(DiffResult<T, P, ID>),
}

impl<T, P, ID> DiffState<T, P, ID> {
    /// True once a result has been computed.
    pub fn is_computed(&self) -> bool {
        matches!(self, DiffState::Computed(_))
    }

    /// The computed result, if any.
    pub fn computed(&self) -> Option<&DiffResult<T, P, ID>> {
        match self {
            DiffState::Computed(result) => Some(result),
            DiffState::Uncomputed => None,
        }
    }

    /// Replace the state with a freshly computed result and return a
    /// reference to it.
    pub fn set(&mut self, result: DiffResult<T, P, ID>) -> &DiffResult<T, P, ID> {
        *self = DiffState::Computed(result);
        match self {
            DiffState::Computed(result) => result,
            // the assignment above always produces Computed
            DiffState::Uncomputed => unreachable!(),
        }
    }
}

impl<T, P, ID> Default for DiffState<T, P, ID> {
    fn default() -> Self {
        DiffState::Uncomputed
    }
}
