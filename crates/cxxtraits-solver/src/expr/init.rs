//! Initialization, `new` and casts.
//!
//! Arrays are never initialized from a parenthesized expression list, and a
//! prvalue of the target class initializes the object directly without a
//! constructor call.

use super::overload::{MemberSet, record_candidates};
use super::{Effects, Expr, Formed, Inapplicable, InitMode, Operation, Sema};
use crate::type_queries::{
    array_parts, builtin_kind, complete_record, enum_decl, is_function, is_void,
    member_pointer_parts, pointee, record_id, referent, split_cv, unqualified,
};
use crate::types::{TypeId, ValueCategory};
use tracing::trace;

impl<'a> Sema<'a> {
    /// `T t(args...);`
    pub fn direct_initialize(&self, target: TypeId, args: &[Expr]) -> Formed<Effects> {
        self.guarded(Operation::Initialize, target, args.first().copied(), || {
            let db = self.db;
            if referent(db, target).is_some() {
                let [arg] = args else {
                    return Err(Inapplicable::WrongArity);
                };
                return self
                    .bind_reference(*arg, target, InitMode::Direct, true)
                    .map(|conversion| conversion.effects);
            }
            if is_void(db, target) || is_function(db, target) {
                return Err(Inapplicable::NotAnObject);
            }
            if let Some((element, bound)) = array_parts(db, target) {
                return match (bound, args) {
                    (Some(_), []) => self.direct_initialize(element, &[]),
                    _ => Err(Inapplicable::NotAnObject),
                };
            }
            if record_id(db, target).is_some() {
                return self.construct_class(target, args);
            }
            match args {
                [] => Ok(Effects::NONE),
                [arg] => self
                    .implicit_conversion(*arg, target, InitMode::Direct, true)
                    .map(|conversion| conversion.effects),
                _ => Err(Inapplicable::WrongArity),
            }
        })
    }

    fn construct_class(&self, target: TypeId, args: &[Expr]) -> Formed<Effects> {
        let class = unqualified(self.db, target);
        let decl = complete_record(self.db, class).ok_or(Inapplicable::IncompleteType)?;
        if decl.facts.abstract_ {
            return Err(Inapplicable::AbstractClass);
        }
        if let [arg] = args {
            if arg.category == ValueCategory::PRValue && unqualified(self.db, arg.ty) == class {
                return Ok(Effects::NONE);
            }
        }
        let candidates = record_candidates(&decl, MemberSet::Constructor, InitMode::Direct, None);
        let selection = self.resolve(&candidates, None, args, true)?;
        Ok(selection.effects)
    }

    /// `T t = from;`
    pub fn copy_initialize(&self, target: TypeId, from: Expr) -> Formed<Effects> {
        self.implicit_conversion(from, target, InitMode::Copy, true)
            .map(|conversion| conversion.effects)
    }

    /// `T()`: zero-initialization for scalars, the default constructor for
    /// classes, element-wise for bounded arrays.
    pub fn value_initialize(&self, target: TypeId) -> Formed<Effects> {
        if referent(self.db, target).is_some() {
            return Err(Inapplicable::NotAnObject);
        }
        if is_void(self.db, target) {
            return Ok(Effects::NONE);
        }
        self.direct_initialize(target, &[])
    }

    /// `::new T(args...)`. Only the initialization is checked; allocation
    /// is assumed to succeed.
    pub fn new_expression(&self, target: TypeId, args: &[Expr]) -> Formed<Effects> {
        if referent(self.db, target).is_some()
            || is_void(self.db, target)
            || is_function(self.db, target)
        {
            return Err(Inapplicable::NotAnObject);
        }
        self.direct_initialize(target, args)
    }

    /// `T(args...)`. A single argument behaves like `static_cast<T>(arg)`.
    pub fn functional_cast(&self, target: TypeId, args: &[Expr]) -> Formed<Effects> {
        match args {
            [arg] => self.static_cast(target, *arg),
            [] => self.value_initialize(target),
            _ => self.direct_initialize(target, args),
        }
    }

    /// `static_cast<T>(from)`.
    pub fn static_cast(&self, target: TypeId, from: Expr) -> Formed<Effects> {
        let db = self.db;
        if referent(db, target).is_some() {
            return self.static_cast_reference(target, from);
        }
        if is_void(db, target) {
            return Ok(Effects::NONE);
        }
        if let Ok(effects) = self.direct_initialize(target, &[from]) {
            return Ok(effects);
        }
        if self.inverse_standard_conversion(from.ty, target) {
            trace!(target = target.0, "static_cast via inverse standard conversion");
            return Ok(Effects::NONE);
        }
        Err(Inapplicable::NoConversion)
    }

    /// `static_cast<T&>(from)` or `static_cast<T&&>(from)`.
    ///
    /// Besides the ordinary direct binding this allows a base-to-derived
    /// downcast of a glvalue and the cast of a glvalue to an rvalue
    /// reference to a reference-compatible type.
    pub fn static_cast_reference(&self, target: TypeId, from: Expr) -> Formed<Effects> {
        let db = self.db;
        let Some((referent_ty, is_rvalue_ref)) = referent(db, target) else {
            return Err(Inapplicable::NoConversion);
        };
        let (target_ty, target_cv) = split_cv(db, referent_ty);
        let (source_ty, source_cv) = split_cv(db, from.ty);
        let cv_ok = target_cv.contains(source_cv);
        let source_ok = from.is_lvalue() || (is_rvalue_ref && from.category.is_glvalue());

        if cv_ok && source_ok && target_ty != source_ty {
            let hierarchy = self.hierarchy();
            if hierarchy.is_base_of(source_ty, target_ty)
                && hierarchy.base_conversion(target_ty, source_ty).is_ok()
                && !hierarchy.is_virtual_base_of(source_ty, target_ty)
            {
                trace!(target = target.0, "static_cast downcast");
                return Ok(Effects::NONE);
            }
        }

        if is_rvalue_ref && from.category.is_glvalue() && cv_ok {
            let related = target_ty == source_ty
                || self
                    .hierarchy()
                    .base_conversion(source_ty, target_ty)
                    .is_ok();
            if related {
                return Ok(Effects::NONE);
            }
        }

        self.bind_reference(from, target, InitMode::Direct, true)
            .map(|conversion| conversion.effects)
    }

    /// The inverse of a standard conversion that `static_cast` may perform:
    /// integer or enumeration to enumeration, `void*` to object pointer,
    /// base pointer to derived pointer, derived member pointer to base
    /// member pointer.
    fn inverse_standard_conversion(&self, from: TypeId, to: TypeId) -> bool {
        let db = self.db;
        let from = unqualified(db, from);
        let to = unqualified(db, to);

        if enum_decl(db, to).is_some() {
            return enum_decl(db, from).is_some() || builtin_kind(db, from).is_some();
        }

        if let (Some(from_pointee), Some(to_pointee)) = (pointee(db, from), pointee(db, to)) {
            let (from_ty, from_cv) = split_cv(db, from_pointee);
            let (to_ty, to_cv) = split_cv(db, to_pointee);
            if !to_cv.contains(from_cv) {
                return false;
            }
            if is_void(db, from_ty) {
                return !is_function(db, to_ty);
            }
            let hierarchy = self.hierarchy();
            return from_ty != to_ty
                && hierarchy.is_base_of(from_ty, to_ty)
                && hierarchy.base_conversion(to_ty, from_ty).is_ok()
                && !hierarchy.is_virtual_base_of(from_ty, to_ty);
        }

        if let (Some((from_class, from_pointee)), Some((to_class, to_pointee))) =
            (member_pointer_parts(db, from), member_pointer_parts(db, to))
        {
            return from_pointee == to_pointee
                && from_class != to_class
                && self.hierarchy().base_conversion(from_class, to_class).is_ok();
        }
        false
    }
}
