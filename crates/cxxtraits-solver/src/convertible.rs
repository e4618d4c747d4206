//! `is_convertible` and `is_nothrow_convertible`.
//!
//! `From` converts to `To` when `To test() { return declval<From>(); }` is
//! well-formed: copy-initialization of a `To` from the `declval` expression.
//! Among the degenerate kinds (arrays, functions, `void`) only `void` to
//! `void` converts; arrays and functions are never targets, but as sources
//! they decay like any other expression.

use crate::capabilities::{Builtins, Features};
use crate::trait_queries::TraitSolver;
use crate::transform::remove_cvref;
use crate::type_queries::{array_parts, is_function, is_scalar, is_void};
use crate::types::TypeId;

/// Degenerate conversion endpoints.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Endpoint {
    Void,
    Array,
    Function,
    Other,
}

impl<'a> TraitSolver<'a> {
    fn endpoint(&self, ty: TypeId) -> Endpoint {
        if is_void(self.db, ty) {
            Endpoint::Void
        } else if array_parts(self.db, ty).is_some() {
            Endpoint::Array
        } else if is_function(self.db, ty) {
            Endpoint::Function
        } else {
            Endpoint::Other
        }
    }

    pub fn is_convertible(&self, from: TypeId, to: TypeId) -> bool {
        if let Some(answer) = self.intrinsic(Builtins::IS_CONVERTIBLE_TO, "is_convertible", |p| {
            p.is_convertible(self.db, from, to)
        }) {
            return answer;
        }
        match (self.endpoint(from), self.endpoint(to)) {
            (Endpoint::Void, target) | (target, Endpoint::Void) => {
                return target == Endpoint::Void;
            }
            (_, Endpoint::Array | Endpoint::Function) => return false,
            _ => {}
        }
        let sema = self.sema();
        let Ok(source) = sema.declval(from) else {
            return false;
        };
        sema.copy_initialize(to, source).is_ok()
    }

    /// Convertible, and the conversion cannot throw.
    ///
    /// Without `noexcept` queries only `void` to `void` and conversions
    /// between scalars qualify.
    pub fn is_nothrow_convertible(&self, from: TypeId, to: TypeId) -> bool {
        if is_void(self.db, from) && is_void(self.db, to) {
            return true;
        }
        if !self.is_convertible(from, to) {
            return false;
        }
        if !self.has_feature(Features::NOEXCEPT) {
            return is_scalar(self.db, remove_cvref(self.db, from))
                && is_scalar(self.db, remove_cvref(self.db, to));
        }
        let sema = self.sema();
        let Ok(source) = sema.declval(from) else {
            return false;
        };
        sema.copy_initialize(to, source)
            .is_ok_and(|effects| effects.nothrow)
    }
}

#[cfg(test)]
#[path = "../tests/convertible_tests.rs"]
mod tests;
