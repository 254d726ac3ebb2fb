//! Core types shared across DeltaX facilities
//!
//! This crate provides foundational types used by the diff kernel and its
//! logging facility:
//!
//! - **Value model**: the closed [`Value`] enum the structural comparator
//!   operates on, with per-value [`Category`] tags
//! - **Schema constants**: canonical field keys and event names

pub mod schema;
pub mod value;

pub use value::{Category, Value};
