//! Typing of the conditional operator `b ? e1 : e2`.
//!
//! Operands of the same type and category produce that glvalue. Otherwise,
//! when a class is involved, each operand is tried as a conversion to match
//! the other; exactly one direction may succeed. What remains is a prvalue:
//! the common type of equal types, the usual arithmetic conversions, or the
//! composite pointer type.

use super::conversion::{ConversionKind, promoted_type};
use super::{Expr, Formed, Inapplicable, InitMode, Sema};
use crate::type_queries::{
    array_parts, builtin_kind, enum_decl, function_shape, is_function, is_void,
    member_pointer_parts, pointee, record_id, split_cv, unqualified,
};
use crate::types::{BuiltinKind, CvQualifiers, TypeData, TypeId, ValueCategory};
use tracing::trace;

/// The unsigned integer type with the same rank as `kind`.
fn unsigned_counterpart(kind: BuiltinKind) -> BuiltinKind {
    match kind {
        BuiltinKind::Int => BuiltinKind::UnsignedInt,
        BuiltinKind::Long => BuiltinKind::UnsignedLong,
        BuiltinKind::LongLong => BuiltinKind::UnsignedLongLong,
        BuiltinKind::Int128 => BuiltinKind::UnsignedInt128,
        other => other,
    }
}

fn floating_rank(kind: BuiltinKind) -> u8 {
    match kind {
        BuiltinKind::Float => 1,
        BuiltinKind::Double => 2,
        BuiltinKind::LongDouble => 3,
        _ => 0,
    }
}

impl<'a> Sema<'a> {
    /// The type and value category of `true ? a : b`.
    pub fn conditional(&self, a: Expr, b: Expr) -> Formed<Expr> {
        let db = self.db;
        let (a_void, b_void) = (is_void(db, a.ty), is_void(db, b.ty));
        if a_void || b_void {
            return if a_void && b_void {
                Ok(Expr::prvalue(TypeId::VOID))
            } else {
                Err(Inapplicable::VoidExpression)
            };
        }

        let same_glvalue = |a: Expr, b: Expr| a.ty == b.ty && a.category == b.category && a.category.is_glvalue();
        if same_glvalue(a, b) {
            return Ok(a);
        }

        let (mut a, mut b) = (a, b);
        let class_involved = record_id(db, a.ty).is_some() || record_id(db, b.ty).is_some();
        let cv_only = a.category == b.category
            && a.category.is_glvalue()
            && unqualified(db, a.ty) == unqualified(db, b.ty);
        if (a.ty != b.ty && class_involved) || cv_only {
            match (
                self.conditional_conversion(a, b, class_involved),
                self.conditional_conversion(b, a, class_involved),
            ) {
                (Some(_), Some(_)) => {
                    trace!(a = a.ty.0, b = b.ty.0, "conditional operands convert both ways");
                    return Err(Inapplicable::Ambiguous);
                }
                (Some(converted), None) => a = converted,
                (None, Some(converted)) => b = converted,
                (None, None) => {}
            }
            if same_glvalue(a, b) {
                return Ok(a);
            }
        }

        self.conditional_prvalue(a, b)
    }

    /// Try converting `from` to match `to`: bind directly to an lvalue or
    /// xvalue of `to`'s type, else convert to `to`'s prvalue type.
    fn conditional_conversion(&self, from: Expr, to: Expr, class_involved: bool) -> Option<Expr> {
        let db = self.db;
        if to.is_lvalue() {
            let target = db.lvalue_reference(to.ty);
            if let Ok(conversion) = self.implicit_conversion(from, target, InitMode::Copy, true) {
                let direct = conversion.binding.is_some_and(|binding| !binding.temporary);
                if direct && (from.is_lvalue() || conversion.kind == ConversionKind::UserDefined) {
                    return Some(Expr::lvalue(to.ty));
                }
            }
        }
        if to.category == ValueCategory::XValue {
            let target = db.rvalue_reference(to.ty);
            if let Ok(conversion) = self.implicit_conversion(from, target, InitMode::Copy, true) {
                if conversion.binding.is_some_and(|binding| !binding.temporary) {
                    return Some(Expr::xvalue(to.ty));
                }
            }
        }
        if to.category != ValueCategory::PRValue && !class_involved {
            return None;
        }

        let (from_class, from_cv) = split_cv(db, from.ty);
        let (to_class, to_cv) = split_cv(db, to.ty);
        let both_class = record_id(db, from_class).is_some() && record_id(db, to_class).is_some();
        let hierarchy = self.hierarchy();
        if both_class
            && (from_class == to_class
                || hierarchy.is_base_of(from_class, to_class)
                || hierarchy.is_base_of(to_class, from_class))
        {
            let derived_or_same = from_class == to_class || hierarchy.is_base_of(to_class, from_class);
            if !derived_or_same || !to_cv.contains(from_cv) {
                return None;
            }
            self.implicit_conversion(from, to.ty, InitMode::Copy, true)
                .ok()
                .map(|_| Expr::prvalue(to.ty))
        } else {
            let target = self.operand_type(to);
            self.implicit_conversion(from, target, InitMode::Copy, true)
                .ok()
                .map(|_| self.prvalue_of(target))
        }
    }

    /// Type of an operand after the lvalue-to-rvalue, array-to-pointer and
    /// function-to-pointer conversions.
    fn operand_type(&self, e: Expr) -> TypeId {
        let db = self.db;
        if let Some((element, _)) = array_parts(db, e.ty) {
            return db.pointer(element);
        }
        if is_function(db, e.ty) {
            return db.pointer(e.ty);
        }
        if record_id(db, e.ty).is_some() {
            return e.ty;
        }
        unqualified(db, e.ty)
    }

    fn conditional_prvalue(&self, a: Expr, b: Expr) -> Formed<Expr> {
        let db = self.db;
        let a_ty = self.operand_type(a);
        let b_ty = self.operand_type(b);
        if a_ty == b_ty {
            return Ok(Expr::prvalue(a_ty));
        }
        if record_id(db, a_ty).is_some() || record_id(db, b_ty).is_some() {
            return Err(Inapplicable::NoConversion);
        }
        if let Some(common) = self.usual_arithmetic_conversions(a_ty, b_ty) {
            return Ok(Expr::prvalue(common));
        }
        self.composite_pointer_type(a_ty, b_ty)
            .map(Expr::prvalue)
            .ok_or(Inapplicable::NoConversion)
    }

    /// The common type of two arithmetic or unscoped enumeration operands.
    pub(crate) fn usual_arithmetic_conversions(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        let db = self.db;
        let arithmetic = |ty: TypeId| {
            builtin_kind(db, ty).is_some() || enum_decl(db, ty).is_some_and(|decl| !decl.scoped)
        };
        if !arithmetic(a) || !arithmetic(b) {
            return None;
        }

        let a_kind = builtin_kind(db, promoted_type(db, a))?;
        let b_kind = builtin_kind(db, promoted_type(db, b))?;
        if a_kind.is_floating_point() || b_kind.is_floating_point() {
            let wider = if floating_rank(a_kind) >= floating_rank(b_kind) {
                a_kind
            } else {
                b_kind
            };
            return Some(wider.type_id());
        }
        if a_kind == b_kind {
            return Some(a_kind.type_id());
        }

        let target = db.target();
        let (a_signed, b_signed) = (a_kind.is_signed(target), b_kind.is_signed(target));
        let (a_rank, b_rank) = (a_kind.integer_rank(target), b_kind.integer_rank(target));
        let common = if a_signed == b_signed {
            if a_rank >= b_rank { a_kind } else { b_kind }
        } else {
            let (signed, unsigned) = if a_signed { (a_kind, b_kind) } else { (b_kind, a_kind) };
            if unsigned.integer_rank(target) >= signed.integer_rank(target) {
                unsigned
            } else if unsigned.fits_in(signed, target) {
                signed
            } else {
                unsigned_counterpart(signed)
            }
        };
        Some(common.type_id())
    }

    /// The composite pointer type of two pointer, member pointer or
    /// `nullptr_t` operands.
    pub(crate) fn composite_pointer_type(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        let db = self.db;
        let a_data = db.lookup(a)?;
        let b_data = db.lookup(b)?;
        match (&a_data, &b_data) {
            (TypeData::NullPtr, TypeData::Pointer(_) | TypeData::MemberPointer { .. }) => {
                return Some(b);
            }
            (TypeData::Pointer(_) | TypeData::MemberPointer { .. }, TypeData::NullPtr) => {
                return Some(a);
            }
            _ => {}
        }

        if let (Some(a_pointee), Some(b_pointee)) = (pointee(db, a), pointee(db, b)) {
            let (a_inner, a_cv) = split_cv(db, a_pointee);
            let (b_inner, b_cv) = split_cv(db, b_pointee);
            let cv = a_cv | b_cv;
            if is_void(db, a_inner) && !is_function(db, b_inner) {
                return Some(db.pointer(db.qualified(TypeId::VOID, cv)));
            }
            if is_void(db, b_inner) && !is_function(db, a_inner) {
                return Some(db.pointer(db.qualified(TypeId::VOID, cv)));
            }
            if a_inner != b_inner && record_id(db, a_inner).is_some() && record_id(db, b_inner).is_some() {
                let hierarchy = self.hierarchy();
                if hierarchy.is_base_of(a_inner, b_inner) {
                    return Some(db.pointer(db.qualified(a_inner, cv)));
                }
                if hierarchy.is_base_of(b_inner, a_inner) {
                    return Some(db.pointer(db.qualified(b_inner, cv)));
                }
                return None;
            }
            if let Some(plain) = self.common_function_type(a_inner, b_inner) {
                return Some(db.pointer(plain));
            }
            return self.cv_combine(a_pointee, b_pointee).map(|(ty, _)| db.pointer(ty));
        }

        if let (Some((a_class, a_member)), Some((b_class, b_member))) =
            (member_pointer_parts(db, a), member_pointer_parts(db, b))
        {
            // The composite names a member of the more derived class.
            let class = if a_class == b_class || self.hierarchy().is_base_of(b_class, a_class) {
                a_class
            } else if self.hierarchy().is_base_of(a_class, b_class) {
                b_class
            } else {
                return None;
            };
            if let Some(plain) = self.common_function_type(a_member, b_member) {
                return Some(db.member_pointer(class, plain));
            }
            let (member, _) = self.cv_combine(a_member, b_member)?;
            return Some(db.member_pointer(class, member));
        }
        None
    }

    /// For a `noexcept` function type and the same type without
    /// `noexcept`, the latter.
    fn common_function_type(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        let a_shape = function_shape(self.db, a)?;
        let b_shape = function_shape(self.db, b)?;
        let mut a_plain = (*a_shape).clone();
        let mut b_plain = (*b_shape).clone();
        a_plain.noexcept = false;
        b_plain.noexcept = false;
        if a_plain != b_plain {
            return None;
        }
        if !a_shape.noexcept { Some(a) } else { Some(b) }
    }

    /// The cv-combined type of two similar types: the union of the
    /// qualifiers at every level, with `const` added at every level above
    /// one that changed. Returns the type and whether any level changed.
    fn cv_combine(&self, a: TypeId, b: TypeId) -> Option<(TypeId, bool)> {
        let db = self.db;
        let (a_inner, a_cv) = split_cv(db, a);
        let (b_inner, b_cv) = split_cv(db, b);
        let (inner, inner_changed) = if a_inner == b_inner {
            (a_inner, false)
        } else if let (Some(x), Some(y)) = (pointee(db, a_inner), pointee(db, b_inner)) {
            let (combined, changed) = self.cv_combine(x, y)?;
            (db.pointer(combined), changed)
        } else if let (Some((x_class, x)), Some((y_class, y))) = (
            member_pointer_parts(db, a_inner),
            member_pointer_parts(db, b_inner),
        ) {
            if x_class != y_class {
                return None;
            }
            let (combined, changed) = self.cv_combine(x, y)?;
            (db.member_pointer(x_class, combined), changed)
        } else {
            return None;
        };
        let mut cv = a_cv | b_cv;
        if inner_changed {
            cv |= CvQualifiers::CONST;
        }
        let changed = inner_changed || cv != a_cv || cv != b_cv;
        Some((db.qualified(inner, cv), changed))
    }
}
