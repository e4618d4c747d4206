//! Boolean and integral constants.
//!
//! Every predicate answers with a `BoolConstant`, every numeric query with an
//! `IntegralConstant`, every transformation with a `TransformResult`. The
//! `Bool<B>` markers lift a known answer into the Rust type system for code
//! that wants to dispatch on it statically.

use crate::types::TypeId;
use std::fmt;

/// A predicate's answer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoolConstant {
    pub value: bool,
}

pub const TRUE_TYPE: BoolConstant = BoolConstant { value: true };
pub const FALSE_TYPE: BoolConstant = BoolConstant { value: false };

impl BoolConstant {
    #[inline]
    pub const fn new(value: bool) -> Self {
        Self { value }
    }
}

impl From<bool> for BoolConstant {
    #[inline]
    fn from(value: bool) -> Self {
        Self { value }
    }
}

impl From<BoolConstant> for bool {
    #[inline]
    fn from(constant: BoolConstant) -> bool {
        constant.value
    }
}

impl fmt::Display for BoolConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A numeric answer together with the type of the value (`std::size_t` for
/// `rank`, `extent` and `alignment_of`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntegralConstant {
    pub value: u64,
    pub ty: TypeId,
}

impl IntegralConstant {
    #[inline]
    pub const fn new(value: u64, ty: TypeId) -> Self {
        Self { value, ty }
    }
}

/// A transformation's answer: the resulting type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransformResult {
    pub ty: TypeId,
}

impl From<TypeId> for TransformResult {
    #[inline]
    fn from(ty: TypeId) -> Self {
        Self { ty }
    }
}

// =============================================================================
// Type-level markers
// =============================================================================

/// A boolean known to the Rust type system.
pub trait ConstBool {
    const VALUE: bool;

    fn constant() -> BoolConstant {
        BoolConstant::new(Self::VALUE)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bool<const B: bool>;

impl<const B: bool> ConstBool for Bool<B> {
    const VALUE: bool = B;
}

pub type True = Bool<true>;
pub type False = Bool<false>;

// =============================================================================
// Logic
// =============================================================================

/// `true` unless some predicate is `false`; evaluation stops at the first
/// `false`, later predicates are never run.
pub fn conjunction<I, F>(predicates: I) -> BoolConstant
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> bool,
{
    BoolConstant::new(predicates.into_iter().all(|predicate| predicate()))
}

/// `false` unless some predicate is `true`; evaluation stops at the first
/// `true`.
pub fn disjunction<I, F>(predicates: I) -> BoolConstant
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> bool,
{
    BoolConstant::new(predicates.into_iter().any(|predicate| predicate()))
}

#[inline]
pub fn negation(constant: BoolConstant) -> BoolConstant {
    BoolConstant::new(!constant.value)
}

#[cfg(test)]
#[path = "../tests/constant_tests.rs"]
mod tests;
