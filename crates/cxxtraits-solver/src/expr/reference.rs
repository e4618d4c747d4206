//! Reference binding.
//!
//! Binding `cv1 T1&` or `cv1 T1&&` to an expression of type `cv2 T2`:
//!
//! 1. An lvalue reference binds directly to a reference-compatible lvalue,
//!    or to the lvalue result of a conversion function of a class `T2`.
//! 2. Otherwise an lvalue reference must be to non-volatile `const`.
//! 3. Any reference binds directly to a reference-compatible rvalue, or to
//!    the rvalue result of a conversion function.
//! 4. A reference-related initializer that cannot bind (it would drop
//!    qualifiers, or it is an lvalue for an rvalue reference) is ill-formed.
//! 5. Otherwise a temporary of type `cv1 T1` is copy-initialized from the
//!    initializer and the reference binds to it.
//!
//! `T1` is reference-related to `T2` when they are the same type or `T1` is
//! a base class of `T2`; reference-compatible when additionally `cv1` is at
//! least `cv2`.

use super::conversion::{ImplicitConversion, ReferenceBinding};
use super::{Expr, Formed, Inapplicable, InitMode, Operation, Sema};
use crate::class_hierarchy::BaseConversion;
use crate::type_queries::{is_function, record_id, referent, split_cv};
use crate::types::{CvQualifiers, TypeId};

impl<'a> Sema<'a> {
    /// The conversion sequence binding a reference of type `to` to `from`.
    pub(crate) fn bind_reference(
        &self,
        from: Expr,
        to: TypeId,
        mode: InitMode,
        allow_user: bool,
    ) -> Formed<ImplicitConversion> {
        let Some((target, is_rvalue_ref)) = referent(self.db, to) else {
            return Err(Inapplicable::NoConversion);
        };
        self.guarded(Operation::BindReference, to, Some(from), || {
            if is_function(self.db, target) {
                return self.bind_function_reference(from, target);
            }
            self.bind_object_reference(from, target, is_rvalue_ref, mode, allow_user)
        })
    }

    fn bind_function_reference(&self, from: Expr, target: TypeId) -> Formed<ImplicitConversion> {
        if !is_function(self.db, from.ty) {
            return Err(Inapplicable::NoConversion);
        }
        let from_ptr = self.db.pointer(from.ty);
        let to_ptr = self.db.pointer(target);
        self.standard_conversion(Expr::prvalue(from_ptr), to_ptr, InitMode::Copy)
    }

    fn bind_object_reference(
        &self,
        from: Expr,
        target: TypeId,
        is_rvalue_ref: bool,
        mode: InitMode,
        allow_user: bool,
    ) -> Formed<ImplicitConversion> {
        let db = self.db;
        let (target_ty, target_cv) = split_cv(db, target);
        let (source_ty, source_cv) = split_cv(db, from.ty);
        let relation = self.reference_relation(target_ty, source_ty);
        let compatible = relation.is_some() && target_cv.contains(source_cv);
        let source_is_class = record_id(db, source_ty).is_some();

        let binding = |rvalue_ref_to_rvalue: bool, temporary: bool| ReferenceBinding {
            rvalue_ref_to_rvalue,
            referent: target_ty,
            referent_cv: target_cv,
            implicit_object: false,
            temporary,
        };
        let direct = |relation: BaseConversion, rvalue_ref_to_rvalue: bool| match relation {
            BaseConversion::Ok { distance } => Ok(ImplicitConversion {
                binding: Some(binding(rvalue_ref_to_rvalue, false)),
                ..ImplicitConversion::derived_to_base(distance)
            }),
            BaseConversion::Ambiguous => Err(Inapplicable::AmbiguousBase),
            BaseConversion::Inaccessible => Err(Inapplicable::Inaccessible),
            BaseConversion::NotBase => Err(Inapplicable::NoConversion),
        };

        if !is_rvalue_ref {
            if from.is_lvalue() && compatible {
                if let Some(relation) = relation {
                    return direct(relation, false);
                }
            }
            if source_is_class && relation.is_none() && allow_user {
                if let Ok(conversion) =
                    self.bind_through_conversion_function(from, target_ty, target_cv, true, false, mode)
                {
                    return Ok(conversion);
                }
            }
            if target_cv != CvQualifiers::CONST {
                return Err(Inapplicable::NonConstLvalueReference);
            }
        }

        if from.is_rvalue() && compatible {
            if let Some(relation) = relation {
                return direct(relation, is_rvalue_ref);
            }
        }
        if source_is_class && relation.is_none() && allow_user {
            if let Ok(conversion) = self.bind_through_conversion_function(
                from,
                target_ty,
                target_cv,
                false,
                is_rvalue_ref,
                mode,
            ) {
                return Ok(conversion);
            }
        }

        if relation.is_some() {
            if is_rvalue_ref && from.is_lvalue() {
                return Err(Inapplicable::RvalueReferenceToLvalue);
            }
            return Err(Inapplicable::DropsQualifiers);
        }

        let temporary_ty = db.qualified(target_ty, target_cv);
        let conversion = self.implicit_conversion(from, temporary_ty, InitMode::Copy, allow_user)?;
        Ok(ImplicitConversion {
            binding: Some(binding(is_rvalue_ref, true)),
            ..conversion
        })
    }

    /// `Some` when `target` is reference-related to `source`, with the
    /// outcome of the derived-to-base check.
    fn reference_relation(&self, target: TypeId, source: TypeId) -> Option<BaseConversion> {
        if target == source {
            return Some(BaseConversion::Ok { distance: 0 });
        }
        if record_id(self.db, target).is_some() && self.hierarchy().is_base_of(target, source) {
            return Some(self.hierarchy().base_conversion(source, target));
        }
        None
    }

    /// Bind through a conversion function of the class `from` whose result
    /// is an lvalue (`want_lvalue`) or rvalue reference-compatible with
    /// `cv T`.
    fn bind_through_conversion_function(
        &self,
        from: Expr,
        target_ty: TypeId,
        target_cv: CvQualifiers,
        want_lvalue: bool,
        is_rvalue_ref: bool,
        mode: InitMode,
    ) -> Formed<ImplicitConversion> {
        let owners = self.conversion_owners(from.ty);
        let candidates = self.conversion_candidates(&owners, mode, |func| {
            let result = self.call_result(func.ret);
            if result.is_lvalue() != want_lvalue {
                return None;
            }
            let (result_ty, result_cv) = split_cv(self.db, result.ty);
            if !target_cv.contains(result_cv) {
                return None;
            }
            let distance = self.reference_relation(target_ty, result_ty)?.distance()?;
            Some(ImplicitConversion {
                binding: Some(ReferenceBinding {
                    rvalue_ref_to_rvalue: is_rvalue_ref,
                    referent: target_ty,
                    referent_cv: target_cv,
                    implicit_object: false,
                    temporary: false,
                }),
                ..ImplicitConversion::derived_to_base(distance)
            })
        });
        self.finish_user_defined(&candidates, from)
    }
}
