//! `is_swappable_with` and friends: `using std::swap; swap(t, u);` and
//! `swap(u, t);` are both well-formed.

use crate::capabilities::Features;
use crate::classify::is_referenceable;
use crate::expr::{Effects, Formed};
use crate::trait_queries::TraitSolver;
use crate::transform::{add_lvalue_reference, remove_cvref};
use crate::type_queries::is_scalar;
use crate::types::TypeId;

impl<'a> TraitSolver<'a> {
    fn swap_both_ways(&self, t: TypeId, u: TypeId) -> Formed<Effects> {
        let sema = self.sema();
        let a = sema.declval(t)?;
        let b = sema.declval(u)?;
        let forward = sema.swap(a, b)?;
        let backward = sema.swap(b, a)?;
        Ok(forward.and(backward))
    }

    pub fn is_swappable_with(&self, t: TypeId, u: TypeId) -> bool {
        self.swap_both_ways(t, u).is_ok()
    }

    pub fn is_swappable(&self, ty: TypeId) -> bool {
        if !is_referenceable(self.db, ty) {
            return false;
        }
        let reference = add_lvalue_reference(self.db, ty);
        self.is_swappable_with(reference, reference)
    }

    /// Without `noexcept` queries, only swaps of scalars count as
    /// non-throwing.
    pub fn is_nothrow_swappable_with(&self, t: TypeId, u: TypeId) -> bool {
        let Ok(effects) = self.swap_both_ways(t, u) else {
            return false;
        };
        if !self.has_feature(Features::NOEXCEPT) {
            return is_scalar(self.db, remove_cvref(self.db, t))
                && is_scalar(self.db, remove_cvref(self.db, u));
        }
        effects.nothrow
    }

    pub fn is_nothrow_swappable(&self, ty: TypeId) -> bool {
        if !is_referenceable(self.db, ty) {
            return false;
        }
        let reference = add_lvalue_reference(self.db, ty);
        self.is_nothrow_swappable_with(reference, reference)
    }
}

#[cfg(test)]
#[path = "../tests/swappable_tests.rs"]
mod tests;
