//! `is_assignable` and its trivial and nothrow variants.

use crate::capabilities::{Builtins, Features};
use crate::expr::{Effects, Formed, Inapplicable};
use crate::trait_queries::TraitSolver;
use crate::transform::{add_const, add_lvalue_reference, add_rvalue_reference, remove_cvref};
use crate::type_queries::{is_scalar, is_void, referent, split_cv};
use crate::types::{CvQualifiers, TypeId};

impl<'a> TraitSolver<'a> {
    /// `declval<To>() = declval<From>()`.
    fn assignment(&self, to: TypeId, from: TypeId) -> Formed<Effects> {
        if is_void(self.db, to) || is_void(self.db, from) {
            return Err(Inapplicable::VoidExpression);
        }
        let sema = self.sema();
        let lhs = sema.declval(to)?;
        let rhs = sema.declval(from)?;
        sema.assign(lhs, rhs)
    }

    pub fn is_assignable(&self, to: TypeId, from: TypeId) -> bool {
        if let Some(answer) = self.intrinsic(Builtins::IS_ASSIGNABLE, "is_assignable", |p| {
            p.is_assignable(self.db, to, from)
        }) {
            return answer;
        }
        self.assignment(to, from).is_ok()
    }

    /// Without an intrinsic: a non-const scalar lvalue assigned from its own
    /// type.
    fn trivially_assignable_fallback(&self, to: TypeId, from: TypeId) -> bool {
        let db = self.db;
        let Some((target, false)) = referent(db, to) else {
            return false;
        };
        let (unqualified, cv) = split_cv(db, target);
        !cv.contains(CvQualifiers::CONST)
            && remove_cvref(db, from) == unqualified
            && is_scalar(db, unqualified)
    }

    pub fn is_trivially_assignable(&self, to: TypeId, from: TypeId) -> bool {
        if let Some(answer) = self.intrinsic(
            Builtins::IS_TRIVIALLY_ASSIGNABLE,
            "is_trivially_assignable",
            |p| p.is_trivially_assignable(self.db, to, from),
        ) {
            return answer;
        }
        self.is_assignable(to, from) && self.trivially_assignable_fallback(to, from)
    }

    pub fn is_nothrow_assignable(&self, to: TypeId, from: TypeId) -> bool {
        if !self.is_assignable(to, from) {
            return false;
        }
        if let Some(answer) =
            self.intrinsic(Builtins::IS_NOTHROW_ASSIGNABLE, "is_nothrow_assignable", |p| {
                p.is_nothrow_assignable(self.db, to, from)
            })
        {
            return answer;
        }
        if !self.has_feature(Features::NOEXCEPT) {
            return self.is_trivially_assignable(to, from);
        }
        self.assignment(to, from)
            .is_ok_and(|effects| effects.nothrow)
    }

    fn assignment_target(&self, ty: TypeId) -> TypeId {
        add_lvalue_reference(self.db, ty)
    }

    fn copy_assignment_source(&self, ty: TypeId) -> TypeId {
        add_lvalue_reference(self.db, add_const(self.db, ty))
    }

    pub fn is_copy_assignable(&self, ty: TypeId) -> bool {
        self.is_assignable(self.assignment_target(ty), self.copy_assignment_source(ty))
    }

    pub fn is_trivially_copy_assignable(&self, ty: TypeId) -> bool {
        self.is_trivially_assignable(self.assignment_target(ty), self.copy_assignment_source(ty))
    }

    pub fn is_nothrow_copy_assignable(&self, ty: TypeId) -> bool {
        self.is_nothrow_assignable(self.assignment_target(ty), self.copy_assignment_source(ty))
    }

    pub fn is_move_assignable(&self, ty: TypeId) -> bool {
        self.is_assignable(self.assignment_target(ty), add_rvalue_reference(self.db, ty))
    }

    pub fn is_trivially_move_assignable(&self, ty: TypeId) -> bool {
        self.is_trivially_assignable(self.assignment_target(ty), add_rvalue_reference(self.db, ty))
    }

    pub fn is_nothrow_move_assignable(&self, ty: TypeId) -> bool {
        self.is_nothrow_assignable(self.assignment_target(ty), add_rvalue_reference(self.db, ty))
    }
}

#[cfg(test)]
#[path = "../tests/assignable_tests.rs"]
mod tests;
