//! `is_constructible` and its trivial and nothrow variants.
//!
//! The fallback follows the library formulation arity by arity:
//!
//! - no arguments: `T()` is well-formed; arrays of known bound ask about
//!   their element, arrays of unknown bound never qualify;
//! - one argument, reference `T`: either the argument copy-initializes the
//!   reference, or `static_cast<T>(arg)` is well-formed and is neither an
//!   invalid base-to-derived cast nor an lvalue bound to an rvalue
//!   reference of the same (or a base) type;
//! - one argument, object `T`: `::new T(arg)` is well-formed;
//! - more arguments: `T(args...)` is well-formed.
//!
//! Object types must also be destructible.

use crate::capabilities::{Builtins, Features};
use crate::class_hierarchy::ClassHierarchy;
use crate::expr::{Effects, Expr, Formed, Inapplicable, Sema};
use crate::trait_queries::TraitSolver;
use crate::transform::{
    add_const, add_lvalue_reference, add_rvalue_reference, remove_all_extents, remove_cv,
    remove_cvref,
};
use crate::type_queries::{
    array_parts, is_function, is_reference, is_scalar, is_unbounded_array, is_void, referent,
};
use crate::types::TypeId;
use tracing::trace;

fn declvals(sema: &Sema<'_>, args: &[TypeId]) -> Option<Vec<Expr>> {
    args.iter().map(|arg| sema.declval(*arg).ok()).collect()
}

impl<'a> TraitSolver<'a> {
    pub fn is_constructible(&self, ty: TypeId, args: &[TypeId]) -> bool {
        if let Some(answer) = self.intrinsic(Builtins::IS_CONSTRUCTIBLE, "is_constructible", |p| {
            p.is_constructible(self.db, ty, args)
        }) {
            return answer;
        }
        self.construct(ty, args).is_ok()
    }

    /// The construction expression the fallback tests, with its effects.
    fn construct(&self, ty: TypeId, args: &[TypeId]) -> Formed<Effects> {
        let db = self.db;
        if is_void(db, ty) || is_function(db, ty) || is_unbounded_array(db, ty) {
            return Err(Inapplicable::NotAnObject);
        }
        if let Some((element, Some(_))) = array_parts(db, ty) {
            if !args.is_empty() {
                return Err(Inapplicable::WrongArity);
            }
            return self.construct(element, &[]);
        }

        let sema = self.sema();
        if let Some((_, is_rvalue)) = referent(db, ty) {
            let [from] = args else {
                return Err(Inapplicable::WrongArity);
            };
            return self.construct_reference(&sema, ty, is_rvalue, *from);
        }

        let exprs = declvals(&sema, args).ok_or(Inapplicable::IncompleteType)?;
        let effects = match exprs.as_slice() {
            [] => sema.value_initialize(ty)?,
            [_] => sema.new_expression(ty, &exprs)?,
            _ => sema.functional_cast(ty, &exprs)?,
        };
        let destroy = sema.destroy(ty)?;
        trace!(ty = ty.0, arity = args.len(), "constructible via expression");
        Ok(effects.and(destroy))
    }

    fn construct_reference(
        &self,
        sema: &Sema<'a>,
        to: TypeId,
        to_rvalue: bool,
        from: TypeId,
    ) -> Formed<Effects> {
        let db = self.db;
        let source = sema.declval(from)?;
        if let Ok(effects) = sema.copy_initialize(to, source) {
            return Ok(effects);
        }
        let effects = sema.static_cast_reference(to, source)?;

        let raw_from = remove_cvref(db, from);
        let raw_to = remove_cvref(db, to);
        let hierarchy = ClassHierarchy::new(db);

        // static_cast<Derived&>(base) compiles, but construction does not
        // downcast.
        let invalid_base_to_derived = raw_from != raw_to
            && hierarchy.is_base_of(raw_from, raw_to)
            && self.construct(raw_to, &[from]).is_err();
        // static_cast<T&&>(lvalue) compiles, but an rvalue reference does
        // not bind an lvalue of the same or a derived type.
        let from_lvalue_ref = matches!(referent(db, from), Some((_, false)));
        let invalid_lvalue_to_rvalue = to_rvalue
            && from_lvalue_ref
            && !is_function(db, raw_to)
            && (raw_from == raw_to || hierarchy.is_base_of(raw_to, raw_from));

        if invalid_base_to_derived || invalid_lvalue_to_rvalue {
            trace!(
                to = to.0,
                from = from.0,
                invalid_base_to_derived,
                invalid_lvalue_to_rvalue,
                "reference cast is not a construction"
            );
            return Err(Inapplicable::InvalidReceiver);
        }
        Ok(effects)
    }

    /// Trivially constructible without an intrinsic: scalars from nothing or
    /// from their own type, and classes the provider reports as having a
    /// trivial default constructor.
    fn trivially_constructible_fallback(&self, ty: TypeId, args: &[TypeId]) -> bool {
        let db = self.db;
        match args {
            [] => {
                let element = remove_all_extents(db, ty);
                if let Some(answer) =
                    self.intrinsic(Builtins::HAS_TRIVIAL_CONSTRUCTOR, "has_trivial_constructor", |p| {
                        p.has_trivial_constructor(db, element)
                    })
                {
                    return answer;
                }
                is_scalar(db, element)
            }
            [arg] => {
                !is_reference(db, ty)
                    && remove_cvref(db, *arg) == remove_cv(db, ty)
                    && is_scalar(db, ty)
            }
            _ => false,
        }
    }

    pub fn is_trivially_constructible(&self, ty: TypeId, args: &[TypeId]) -> bool {
        if let Some(answer) = self.intrinsic(
            Builtins::IS_TRIVIALLY_CONSTRUCTIBLE,
            "is_trivially_constructible",
            |p| p.is_trivially_constructible(self.db, ty, args),
        ) {
            return answer;
        }
        self.is_constructible(ty, args) && self.trivially_constructible_fallback(ty, args)
    }

    pub fn is_nothrow_constructible(&self, ty: TypeId, args: &[TypeId]) -> bool {
        if !self.is_constructible(ty, args) {
            return false;
        }
        if let Some(answer) = self.intrinsic(
            Builtins::IS_NOTHROW_CONSTRUCTIBLE,
            "is_nothrow_constructible",
            |p| p.is_nothrow_constructible(self.db, ty, args),
        ) {
            return answer;
        }
        if !self.has_feature(Features::NOEXCEPT) {
            return self.is_trivially_constructible(ty, args);
        }
        self.nothrow_construction(ty, args)
    }

    /// `noexcept(T(declval<Args>()...))`, without the destructor call.
    fn nothrow_construction(&self, ty: TypeId, args: &[TypeId]) -> bool {
        let sema = self.sema();
        let Some(exprs) = declvals(&sema, args) else {
            return false;
        };
        let effects = if is_reference(self.db, ty) {
            match exprs.as_slice() {
                [source] => sema
                    .copy_initialize(ty, *source)
                    .or_else(|_| sema.static_cast_reference(ty, *source)),
                _ => return false,
            }
        } else if exprs.is_empty() {
            sema.value_initialize(ty)
        } else {
            sema.direct_initialize(ty, &exprs)
        };
        effects.is_ok_and(|effects| effects.nothrow)
    }

    fn copy_source(&self, ty: TypeId) -> TypeId {
        add_lvalue_reference(self.db, add_const(self.db, ty))
    }

    fn move_source(&self, ty: TypeId) -> TypeId {
        add_rvalue_reference(self.db, ty)
    }

    pub fn is_default_constructible(&self, ty: TypeId) -> bool {
        self.is_constructible(ty, &[])
    }

    pub fn is_trivially_default_constructible(&self, ty: TypeId) -> bool {
        self.is_trivially_constructible(ty, &[])
    }

    pub fn is_nothrow_default_constructible(&self, ty: TypeId) -> bool {
        self.is_nothrow_constructible(ty, &[])
    }

    pub fn is_copy_constructible(&self, ty: TypeId) -> bool {
        self.is_constructible(ty, &[self.copy_source(ty)])
    }

    pub fn is_trivially_copy_constructible(&self, ty: TypeId) -> bool {
        self.is_trivially_constructible(ty, &[self.copy_source(ty)])
    }

    pub fn is_nothrow_copy_constructible(&self, ty: TypeId) -> bool {
        self.is_nothrow_constructible(ty, &[self.copy_source(ty)])
    }

    pub fn is_move_constructible(&self, ty: TypeId) -> bool {
        self.is_constructible(ty, &[self.move_source(ty)])
    }

    pub fn is_trivially_move_constructible(&self, ty: TypeId) -> bool {
        self.is_trivially_constructible(ty, &[self.move_source(ty)])
    }

    pub fn is_nothrow_move_constructible(&self, ty: TypeId) -> bool {
        self.is_nothrow_constructible(ty, &[self.move_source(ty)])
    }
}

#[cfg(test)]
#[path = "../tests/constructible_tests.rs"]
mod tests;
