//! Centralized limits and thresholds for the trait engine.
//!
//! These constants bound the work a single query may do and define the
//! contract limits that callers must respect. Exceeding a recursion limit
//! makes the affected expression inapplicable; exceeding a contract limit
//! is reported as an error at the query entry point.
//!
//! # Solver recursion limits
//!
//! The recursion guards in the solver are constructed from
//! `cxxtraits_solver::recursion::RecursionProfile`, which reads the depth
//! values defined here.

// =============================================================================
// Contract Limits
// =============================================================================

/// Maximum number of argument types in one trait query.
///
/// Variadic traits (`is_constructible<T, Args...>`, `is_invocable<F, Args...>`,
/// `common_type<Ts...>`) are keyed by an inline argument pack of this
/// capacity. A query with more arguments is a caller error and is rejected
/// with `TraitError::ArityExceeded` before any evaluation happens.
///
/// ```text
/// is_constructible<T, A1, ..., A16>   // accepted
/// is_constructible<T, A1, ..., A17>   // rejected: arity 17 > 16
/// ```
pub const MAX_TRAIT_ARITY: usize = 16;

/// Largest alignment accepted by `aligned_storage` and `aligned_union`.
///
/// Alignments are powers of two from 1 up to and including this value.
pub const MAX_ALIGNMENT: u64 = 0x4000;

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting of initialization sub-problems in one query.
///
/// Constructing a record may require initializing its parameters, which may
/// select a converting constructor, which binds a reference to a temporary,
/// and so on. Real programs stay far below this bound.
pub const MAX_INITIALIZATION_DEPTH: u32 = 64;

/// Maximum depth of a base-class walk.
///
/// Inheritance chains are acyclic by construction (a base must be complete
/// when it is named), so this only protects against pathological depth.
pub const MAX_HIERARCHY_DEPTH: u32 = 256;

/// Maximum number of steps one guarded computation may take in total.
pub const MAX_GUARD_ITERATIONS: u32 = 100_000;
