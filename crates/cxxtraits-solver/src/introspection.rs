//! Introspection providers.
//!
//! Some questions have no portable formulation in terms of expressions:
//! whether a class is abstract or final, whether its destructor is
//! virtual, what an enumeration's underlying type is. Others have one, but
//! a front end answers them faster and more precisely. An
//! `IntrospectionProvider` is where those answers come from.
//!
//! Every method returns `None` for "unknown". `NoIntrospection` knows
//! nothing; `DeclIntrospection` answers from the modeled declarations and
//! the expression engine, the way a compiler's own builtins would.

use crate::TypeDatabase;
use crate::def::RecordDecl;
use crate::expr::{Effects, Expr, Sema};
use crate::layout::has_unique_representation;
use crate::type_queries::{
    array_parts, class_record, complete_record, enum_decl, is_function, is_reference, is_scalar,
    is_void, record_decl, strip_all_extents,
};
use crate::types::TypeId;

/// Source of compiler-intrinsic answers.
#[allow(unused_variables)]
pub trait IntrospectionProvider: Send + Sync {
    fn is_abstract(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn is_final(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn has_virtual_destructor(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn is_polymorphic(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn is_empty(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn is_standard_layout(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn is_trivially_copyable(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn is_trivial(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn is_aggregate(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn is_literal_type(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn has_unique_object_representations(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn underlying_type(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<TypeId> {
        None
    }
    fn is_constructible(&self, db: &dyn TypeDatabase, ty: TypeId, args: &[TypeId]) -> Option<bool> {
        None
    }
    fn is_trivially_constructible(
        &self,
        db: &dyn TypeDatabase,
        ty: TypeId,
        args: &[TypeId],
    ) -> Option<bool> {
        None
    }
    fn is_nothrow_constructible(
        &self,
        db: &dyn TypeDatabase,
        ty: TypeId,
        args: &[TypeId],
    ) -> Option<bool> {
        None
    }
    fn is_assignable(&self, db: &dyn TypeDatabase, to: TypeId, from: TypeId) -> Option<bool> {
        None
    }
    fn is_trivially_assignable(&self, db: &dyn TypeDatabase, to: TypeId, from: TypeId) -> Option<bool> {
        None
    }
    fn is_nothrow_assignable(&self, db: &dyn TypeDatabase, to: TypeId, from: TypeId) -> Option<bool> {
        None
    }
    fn is_destructible(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn is_trivially_destructible(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn is_nothrow_destructible(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn is_convertible(&self, db: &dyn TypeDatabase, from: TypeId, to: TypeId) -> Option<bool> {
        None
    }
    fn has_trivial_constructor(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
    fn has_trivial_destructor(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        None
    }
}

/// Knows nothing; every question is "unknown".
#[derive(Copy, Clone, Debug, Default)]
pub struct NoIntrospection;

impl IntrospectionProvider for NoIntrospection {}

/// Answers from record declarations and the expression engine.
#[derive(Copy, Clone, Debug, Default)]
pub struct DeclIntrospection;

fn declvals(sema: &Sema<'_>, args: &[TypeId]) -> Option<Vec<Expr>> {
    args.iter().map(|arg| sema.declval(*arg).ok()).collect()
}

/// `Some(answer)` from the complete record of `ty`; `Some(false)` for
/// non-class types; `None` for incomplete classes.
fn class_fact(
    db: &dyn TypeDatabase,
    ty: TypeId,
    fact: impl FnOnce(&RecordDecl) -> bool,
) -> Option<bool> {
    match record_decl(db, ty) {
        None => Some(false),
        Some(decl) if !decl.complete => None,
        Some(decl) => Some(fact(&decl)),
    }
}

/// Scalars qualify, arrays follow their element, records answer `fact`.
fn object_fact(
    db: &dyn TypeDatabase,
    ty: TypeId,
    fact: impl FnOnce(&RecordDecl) -> bool,
) -> Option<bool> {
    let element = strip_all_extents(db, ty);
    if is_scalar(db, element) {
        return Some(true);
    }
    match complete_record(db, element) {
        Some(decl) => Some(fact(&decl)),
        None => Some(false),
    }
}

impl DeclIntrospection {
    fn construct(
        &self,
        db: &dyn TypeDatabase,
        ty: TypeId,
        args: &[TypeId],
    ) -> Option<Effects> {
        let sema = Sema::new(db);
        let args = declvals(&sema, args)?;
        let effects = sema.direct_initialize(ty, &args).ok()?;
        if !is_reference(db, ty) && sema.destroy(ty).is_err() {
            return None;
        }
        Some(effects)
    }

    fn assign(&self, db: &dyn TypeDatabase, to: TypeId, from: TypeId) -> Option<Effects> {
        let sema = Sema::new(db);
        let lhs = sema.declval(to).ok()?;
        let rhs = sema.declval(from).ok()?;
        sema.assign(lhs, rhs).ok()
    }

    fn destroy(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<Effects> {
        Sema::new(db).destroy(ty).ok()
    }
}

impl IntrospectionProvider for DeclIntrospection {
    fn is_abstract(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        class_fact(db, ty, |decl| decl.facts.abstract_)
    }

    fn is_final(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        class_fact(db, ty, |decl| decl.is_final)
    }

    fn has_virtual_destructor(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        class_fact(db, ty, |decl| decl.facts.virtual_destructor)
    }

    fn is_polymorphic(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        class_fact(db, ty, |decl| !decl.is_union() && decl.facts.polymorphic)
    }

    fn is_empty(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        class_fact(db, ty, |decl| !decl.is_union() && decl.facts.empty)
    }

    fn is_standard_layout(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        object_fact(db, ty, |decl| decl.facts.standard_layout)
    }

    fn is_trivially_copyable(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        object_fact(db, ty, |decl| decl.facts.trivially_copyable)
    }

    fn is_trivial(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        object_fact(db, ty, |decl| decl.facts.trivial)
    }

    fn is_aggregate(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        if array_parts(db, ty).is_some() {
            return Some(true);
        }
        Some(class_record(db, ty).is_some_and(|decl| decl.facts.aggregate))
    }

    fn is_literal_type(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        if is_reference(db, ty) || is_void(db, ty) {
            return Some(true);
        }
        object_fact(db, ty, |decl| decl.facts.literal)
    }

    fn has_unique_object_representations(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        Some(has_unique_representation(db, ty))
    }

    fn underlying_type(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<TypeId> {
        let decl = enum_decl(db, ty)?;
        Some(decl.underlying(db.target()))
    }

    fn is_constructible(&self, db: &dyn TypeDatabase, ty: TypeId, args: &[TypeId]) -> Option<bool> {
        Some(self.construct(db, ty, args).is_some())
    }

    fn is_trivially_constructible(
        &self,
        db: &dyn TypeDatabase,
        ty: TypeId,
        args: &[TypeId],
    ) -> Option<bool> {
        Some(self.construct(db, ty, args).is_some_and(|effects| effects.trivial))
    }

    fn is_nothrow_constructible(
        &self,
        db: &dyn TypeDatabase,
        ty: TypeId,
        args: &[TypeId],
    ) -> Option<bool> {
        Some(self.construct(db, ty, args).is_some_and(|effects| effects.nothrow))
    }

    fn is_assignable(&self, db: &dyn TypeDatabase, to: TypeId, from: TypeId) -> Option<bool> {
        Some(self.assign(db, to, from).is_some())
    }

    fn is_trivially_assignable(&self, db: &dyn TypeDatabase, to: TypeId, from: TypeId) -> Option<bool> {
        Some(self.assign(db, to, from).is_some_and(|effects| effects.trivial))
    }

    fn is_nothrow_assignable(&self, db: &dyn TypeDatabase, to: TypeId, from: TypeId) -> Option<bool> {
        Some(self.assign(db, to, from).is_some_and(|effects| effects.nothrow))
    }

    fn is_destructible(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        Some(self.destroy(db, ty).is_some())
    }

    fn is_trivially_destructible(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        Some(self.destroy(db, ty).is_some_and(|effects| effects.trivial))
    }

    fn is_nothrow_destructible(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        Some(self.destroy(db, ty).is_some_and(|effects| effects.nothrow))
    }

    /// Whether `To test() { return declval<From>(); }` is well-formed.
    fn is_convertible(&self, db: &dyn TypeDatabase, from: TypeId, to: TypeId) -> Option<bool> {
        if is_void(db, from) || is_void(db, to) {
            return Some(is_void(db, from) && is_void(db, to));
        }
        if array_parts(db, to).is_some() || is_function(db, to) {
            return Some(false);
        }
        let sema = Sema::new(db);
        let Ok(source) = sema.declval(from) else {
            return Some(false);
        };
        Some(sema.copy_initialize(to, source).is_ok())
    }

    fn has_trivial_constructor(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        object_fact(db, ty, |decl| decl.facts.trivial_default_constructor)
    }

    fn has_trivial_destructor(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<bool> {
        if is_reference(db, ty) {
            return Some(true);
        }
        object_fact(db, ty, |decl| {
            decl.destructor
                .as_ref()
                .is_some_and(|destructor| destructor.trivial && !destructor.deleted)
        })
    }
}
