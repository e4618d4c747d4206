//! Assignment, destruction, dereference, calls, member pointer access and
//! `swap`.

use super::overload::{Candidate, FunctionRef, MemberSet, record_candidates};
use super::{Effects, Expr, Formed, Inapplicable, InitMode, Sema};
use crate::def::{FunctionDecl, RecordDecl};
use crate::type_queries::{
    array_parts, class_record, complete_record, cv_of, function_shape, is_function, is_reference,
    is_void, member_pointer_parts, pointee, record_id, unqualified,
};
use crate::types::{Access, CvQualifiers, FunctionShape, RecordId, RefQualifier, TypeId};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::trace;

/// Owner of functions that are not members of a modeled record.
const LIBRARY: RecordId = RecordId(0);

/// A free function with the signature of `shape`.
fn free_function(shape: &FunctionShape) -> FunctionDecl {
    let mut func = FunctionDecl::new(shape.params.clone()).returning(shape.ret);
    func.variadic = shape.variadic;
    func.noexcept = shape.noexcept;
    func
}

fn library_candidate(func: &FunctionDecl, is_template: bool) -> Candidate<'_> {
    Candidate {
        id: FunctionRef {
            record: LIBRARY,
            set: MemberSet::Library,
            index: 0,
        },
        func,
        object: None,
        is_template,
        result: None,
    }
}

impl<'a> Sema<'a> {
    /// `lhs = rhs`.
    pub fn assign(&self, lhs: Expr, rhs: Expr) -> Formed<Effects> {
        let db = self.db;
        if is_void(db, lhs.ty) || is_void(db, rhs.ty) {
            return Err(Inapplicable::VoidExpression);
        }
        if record_id(db, lhs.ty).is_some() {
            let class = unqualified(db, lhs.ty);
            let decl = complete_record(db, class).ok_or(Inapplicable::IncompleteType)?;
            let candidates =
                record_candidates(&decl, MemberSet::Assignment, InitMode::Copy, Some(class));
            return self
                .resolve(&candidates, Some(lhs), &[rhs], true)
                .map(|selection| selection.effects);
        }
        if !lhs.is_lvalue()
            || cv_of(db, lhs.ty).contains(CvQualifiers::CONST)
            || array_parts(db, lhs.ty).is_some()
            || is_function(db, lhs.ty)
        {
            return Err(Inapplicable::NotModifiable);
        }
        self.implicit_conversion(rhs, unqualified(db, lhs.ty), InitMode::Copy, true)
            .map(|conversion| conversion.effects)
    }

    /// `declval<T&>().~T()` for object types; a pseudo-destructor call for
    /// scalars; element-wise for bounded arrays.
    pub fn destroy(&self, ty: TypeId) -> Formed<Effects> {
        let db = self.db;
        if is_reference(db, ty) {
            return Ok(Effects::NONE);
        }
        if is_void(db, ty) || is_function(db, ty) {
            return Err(Inapplicable::NotAnObject);
        }
        if let Some((element, bound)) = array_parts(db, ty) {
            return match bound {
                Some(_) => self.destroy(element),
                None => Err(Inapplicable::NotAnObject),
            };
        }
        if record_id(db, ty).is_none() {
            return Ok(Effects::NONE);
        }
        let decl = complete_record(db, ty).ok_or(Inapplicable::IncompleteType)?;
        let Some(destructor) = &decl.destructor else {
            return Err(Inapplicable::Deleted);
        };
        if destructor.deleted {
            return Err(Inapplicable::Deleted);
        }
        if destructor.access != Access::Public {
            return Err(Inapplicable::Inaccessible);
        }
        Ok(Effects::of_call(destructor.noexcept, destructor.trivial))
    }

    /// `*e`: the builtin indirection of a pointer, or an overloaded
    /// `operator*` of a class.
    pub fn deref(&self, e: Expr) -> Formed<(Expr, Effects)> {
        let db = self.db;
        if let Some(target) = pointee(db, e.ty) {
            if is_void(db, target) {
                return Err(Inapplicable::VoidExpression);
            }
            return Ok((Expr::lvalue(target), Effects::NONE));
        }
        let decl = class_record(db, e.ty).ok_or(Inapplicable::NotCallable)?;
        let class = unqualified(db, e.ty);
        let candidates = record_candidates(&decl, MemberSet::Deref, InitMode::Copy, Some(class));
        let selection = self.resolve(&candidates, Some(e), &[], true)?;
        Ok((self.call_result(selection.func.ret), selection.effects))
    }

    /// `f(args...)` where `f` is a function, a pointer to function or a class
    /// object with call operators.
    pub fn call(&self, callee: Expr, args: &[Expr]) -> Formed<(Expr, Effects)> {
        let db = self.db;
        let function_ty = if is_function(db, callee.ty) {
            Some(callee.ty)
        } else {
            pointee(db, callee.ty).filter(|target| is_function(db, *target))
        };
        if let Some(function_ty) = function_ty {
            let shape = function_shape(db, function_ty).ok_or(Inapplicable::NotCallable)?;
            if shape.is_abominable() {
                return Err(Inapplicable::NotCallable);
            }
            return self.call_signature(&shape, args);
        }

        let decl = class_record(db, callee.ty).ok_or(Inapplicable::NotCallable)?;
        let class = unqualified(db, callee.ty);
        let candidates = record_candidates(&decl, MemberSet::Call, InitMode::Copy, Some(class));
        if candidates.is_empty() {
            return Err(Inapplicable::NotCallable);
        }
        let selection = self.resolve(&candidates, Some(callee), args, true)?;
        Ok((self.call_result(selection.func.ret), selection.effects))
    }

    fn call_signature(&self, shape: &FunctionShape, args: &[Expr]) -> Formed<(Expr, Effects)> {
        let func = free_function(shape);
        let candidates = [library_candidate(&func, false)];
        let selection = self.resolve(&candidates, None, args, true)?;
        Ok((self.call_result(shape.ret), selection.effects))
    }

    /// `(object.*pmf)(args...)` for a pointer to member function of type
    /// `member`.
    pub fn member_call(
        &self,
        object: Expr,
        member: TypeId,
        args: &[Expr],
    ) -> Formed<(Expr, Effects)> {
        let db = self.db;
        let (class, target) =
            member_pointer_parts(db, member).ok_or(Inapplicable::NotCallable)?;
        let shape = function_shape(db, target).ok_or(Inapplicable::NotCallable)?;
        self.check_receiver(object, class)?;

        let object_cv = cv_of(db, object.ty);
        if !shape.cv.contains(object_cv) {
            return Err(Inapplicable::DropsQualifiers);
        }
        match shape.ref_qualifier {
            RefQualifier::None => {}
            RefQualifier::LValue => {
                if object.is_rvalue() && shape.cv != CvQualifiers::CONST {
                    return Err(Inapplicable::InvalidReceiver);
                }
            }
            RefQualifier::RValue => {
                if object.is_lvalue() {
                    return Err(Inapplicable::InvalidReceiver);
                }
            }
        }
        self.call_signature(&shape, args)
    }

    /// `object.*pm` for a pointer to data member of type `member`.
    ///
    /// The result carries the object's cv-qualification; it is an lvalue
    /// for an lvalue object and an xvalue otherwise.
    pub fn member_access(&self, object: Expr, member: TypeId) -> Formed<Expr> {
        let db = self.db;
        let (class, target) =
            member_pointer_parts(db, member).ok_or(Inapplicable::NotAnObject)?;
        if is_function(db, target) {
            return Err(Inapplicable::NotAnObject);
        }
        self.check_receiver(object, class)?;
        let ty = db.qualified(target, cv_of(db, object.ty));
        Ok(if object.is_lvalue() {
            Expr::lvalue(ty)
        } else {
            Expr::xvalue(ty)
        })
    }

    /// The object of a `.*` expression must be of the member pointer's
    /// class or of a class unambiguously derived from it.
    fn check_receiver(&self, object: Expr, class: TypeId) -> Formed<()> {
        let object_class = unqualified(self.db, object.ty);
        if object_class == class {
            return Ok(());
        }
        if self
            .hierarchy()
            .base_conversion(object_class, class)
            .is_ok()
        {
            Ok(())
        } else {
            Err(Inapplicable::InvalidReceiver)
        }
    }

    /// `dynamic_cast<const volatile void*>(declval<T*>())`: well-formed only
    /// for complete polymorphic classes.
    pub fn dynamic_cast_to_cv_void_ptr(&self, ty: TypeId) -> Formed<Effects> {
        match class_record(self.db, ty) {
            Some(decl) if decl.facts.polymorphic => Ok(Effects::NONE),
            Some(_) => Err(Inapplicable::NoConversion),
            None => Err(Inapplicable::IncompleteType),
        }
    }

    /// `using std::swap; swap(a, b);`
    ///
    /// Candidates are the `swap` overloads found by argument-dependent lookup
    /// in the classes of both arguments and their bases, plus the
    /// `std::swap` templates: for two lvalues of the same move-constructible
    /// and move-assignable type, or element-wise for two arrays of the same
    /// type.
    pub fn swap(&self, a: Expr, b: Expr) -> Formed<Effects> {
        let owners = self.swap_owners(&[a, b]);
        let mut candidates: Vec<Candidate<'_>> = owners
            .iter()
            .flat_map(|decl| record_candidates(decl, MemberSet::Swap, InitMode::Copy, None))
            .collect();

        let library = self.std_swap(a, b);
        if let Some(func) = &library {
            candidates.push(library_candidate(func, true));
        }
        if candidates.is_empty() {
            return Err(Inapplicable::NoViableFunction);
        }
        let selection = self.resolve(&candidates, None, &[a, b], true)?;
        trace!(set = ?selection.id.set, nothrow = selection.effects.nothrow, "swap");
        Ok(selection.effects)
    }

    fn swap_owners(&self, args: &[Expr]) -> Vec<Arc<RecordDecl>> {
        let mut seen = FxHashSet::default();
        let mut owners = Vec::new();
        for arg in args {
            let class = unqualified(self.db, arg.ty);
            let Some(decl) = complete_record(self.db, class) else {
                continue;
            };
            let bases = self.hierarchy().all_bases(class);
            for (ty, decl) in std::iter::once((class, Some(decl))).chain(
                bases
                    .into_iter()
                    .map(|base| (base, complete_record(self.db, base))),
            ) {
                if let Some(decl) = decl {
                    if seen.insert(ty) {
                        owners.push(decl);
                    }
                }
            }
        }
        owners
    }

    /// The `std::swap` specialization deduced for `a` and `b`, if its
    /// constraints are satisfied. Its exception specification is computed
    /// from the move operations it performs.
    fn std_swap(&self, a: Expr, b: Expr) -> Option<FunctionDecl> {
        let db = self.db;
        if !a.is_lvalue() || !b.is_lvalue() || a.ty != b.ty {
            return None;
        }
        let ty = a.ty;
        let effects = if let Some((element, Some(_))) = array_parts(db, ty) {
            self.swap(Expr::lvalue(element), Expr::lvalue(element)).ok()?
        } else if array_parts(db, ty).is_some() || is_function(db, ty) {
            return None;
        } else {
            let constructed = self.direct_initialize(ty, &[Expr::xvalue(ty)]).ok()?;
            let destroyed = self.destroy(ty).ok()?;
            let assigned = self.assign(Expr::lvalue(ty), Expr::xvalue(ty)).ok()?;
            constructed.and(destroyed).and(assigned)
        };
        let reference = db.lvalue_reference(ty);
        let mut func = FunctionDecl::new(vec![reference, reference]);
        func.noexcept = effects.nothrow;
        Some(func)
    }
}
