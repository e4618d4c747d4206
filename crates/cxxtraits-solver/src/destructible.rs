//! `is_destructible` and its trivial and nothrow variants.
//!
//! References are always destructible; `void`, functions and arrays of
//! unknown bound never are. Anything else asks whether
//! `declval<U&>().~U()` is well-formed for `U = remove_all_extents<T>`.

use crate::capabilities::{Builtins, Features};
use crate::expr::{Effects, Formed, Inapplicable};
use crate::trait_queries::TraitSolver;
use crate::transform::remove_all_extents;
use crate::type_queries::{is_function, is_reference, is_unbounded_array, is_void};
use crate::types::TypeId;

impl<'a> TraitSolver<'a> {
    fn destruction(&self, ty: TypeId) -> Formed<Effects> {
        let db = self.db;
        if is_reference(db, ty) {
            return Ok(Effects::NONE);
        }
        if is_void(db, ty) || is_function(db, ty) || is_unbounded_array(db, ty) {
            return Err(Inapplicable::NotAnObject);
        }
        self.sema().destroy(remove_all_extents(db, ty))
    }

    pub fn is_destructible(&self, ty: TypeId) -> bool {
        if let Some(answer) = self.intrinsic(Builtins::IS_DESTRUCTIBLE, "is_destructible", |p| {
            p.is_destructible(self.db, ty)
        }) {
            return answer;
        }
        self.destruction(ty).is_ok()
    }

    pub fn is_trivially_destructible(&self, ty: TypeId) -> bool {
        if let Some(answer) = self.intrinsic(
            Builtins::IS_TRIVIALLY_DESTRUCTIBLE,
            "is_trivially_destructible",
            |p| p.is_trivially_destructible(self.db, ty),
        ) {
            return answer;
        }
        if !self.is_destructible(ty) {
            return false;
        }
        if is_reference(self.db, ty) {
            return true;
        }
        let element = remove_all_extents(self.db, ty);
        if let Some(answer) =
            self.intrinsic(Builtins::HAS_TRIVIAL_DESTRUCTOR, "has_trivial_destructor", |p| {
                p.has_trivial_destructor(self.db, element)
            })
        {
            return answer;
        }
        self.destruction(ty).is_ok_and(|effects| effects.trivial)
    }

    pub fn is_nothrow_destructible(&self, ty: TypeId) -> bool {
        if !self.is_destructible(ty) {
            return false;
        }
        if is_reference(self.db, ty) {
            return true;
        }
        if !self.has_feature(Features::NOEXCEPT) {
            return self.is_trivially_destructible(ty);
        }
        if let Some(answer) = self.intrinsic(Builtins::IS_DESTRUCTIBLE, "is_nothrow_destructible", |p| {
            p.is_nothrow_destructible(self.db, ty)
        }) {
            return answer;
        }
        self.destruction(ty)
            .is_ok_and(|effects| effects.nothrow)
    }
}

#[cfg(test)]
#[path = "../tests/destructible_tests.rs"]
mod tests;
