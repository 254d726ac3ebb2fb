//! Two-level structural diff engine.
//!
//! Compares two labeled entity collections and produces a structured,
//! deterministic account of added, removed, and updated entities with
//! per-property old/new change pairs.
//!
//! ## Entry point
//!
//! ```ignore
//! use deltax_core::diff::{DiffAdapter, DiffEngine};
//!
//! let mut engine = DiffEngine::from_sets(before, after, adapter);
//! let result = engine.diff();
//! let summary = engine.render_summary();
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce field-for-field identical
//!   results; all result collections iterate in key order.
//! - **Skip-and-report**: malformed or inconsistent inputs degrade to a
//!   diagnostic through the injected sink, never a failure.
//! - **Ignore-list exclusion**: ignored property keys appear in no output
//!   container.
//! - **Single computation**: the result is computed once per explicit or
//!   first-demanded `diff()` and cached until the next explicit `diff()`.

pub mod adapter;
pub mod engine;
pub mod model;
pub mod summary;

pub use adapter::DiffAdapter;
pub use engine::{DiffEngine, EntityComparator, PropertyEquivalence};
pub use model::{DiffResult, DiffState, PropertyChange};
