//! Common types and utilities for the cxxtraits type-trait engine.
//!
//! This crate provides foundational types used across all cxxtraits crates:
//! - Name interning (`Atom`, `ShardedInterner`)
//! - Engine limits and thresholds
//! - Target data model (`TargetInfo`) describing scalar sizes and alignments

// Name interning for record and enumeration identifiers
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Centralized limits and thresholds
pub mod limits;

// Target data model (LP64, LLP64, ILP32)
pub mod target;
pub use target::{ScalarLayout, TargetInfo, TargetInfoError};
