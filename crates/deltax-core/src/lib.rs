//! DeltaX Core - generic two-level structural diff kernel
//!
//! This crate provides the foundational machinery for change detection over
//! arbitrary domain models, including:
//! - A two-level diff engine (entity level, then property level) driven by a
//!   caller-supplied capability trait
//! - A generic structural comparator imposing a total, deterministic order
//!   over dynamic value shapes
//! - Three-way key-set partitioning
//! - An injected diagnostic sink for non-fatal skip-and-report handling
//! - Canonical error and logging facilities
//!
//! Domain models stay untouched: callers implement [`DiffAdapter`] to expose
//! entity and property keys, and the engine does the rest.

pub mod compare;
pub mod diagnostics;
pub mod diff;
pub mod errors;
pub mod keyset;
pub mod logging_facility;

// Re-export commonly used types
pub use compare::{compare_values, GenericComparator, MappedValueComparator, ToValue};
pub use diagnostics::{DiagnosticSink, MemorySink, NoopSink, TracingSink};
pub use diff::{DiffAdapter, DiffEngine, DiffResult, DiffState, PropertyChange};
pub use errors::{DeltaXError, DxError, DxErrorKind, Result};
pub use keyset::{partition_keys, KeyPartition};
