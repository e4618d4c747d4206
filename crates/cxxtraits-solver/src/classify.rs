//! Primary and composite type classification.
//!
//! Every type falls into exactly one `TypeCategory`. The composite
//! predicates (arithmetic, fundamental, scalar, object, compound) are
//! unions over the primary categories, computed after stripping top-level
//! cv-qualification. `is_const`/`is_volatile` are the only predicates that
//! look at the qualification itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use cxxtraits_solver::classify::{classify, TypeCategory};
//!
//! match classify(&db, ty) {
//!     TypeCategory::Class | TypeCategory::Union => { /* record */ }
//!     TypeCategory::Array => { /* element type via remove_extent */ }
//!     _ => {}
//! }
//! ```

use crate::TypeDatabase;
use crate::def::RecordKind;
use crate::type_queries::{self, array_parts, split_cv, unqualified_data};
use crate::types::{CvQualifiers, TypeData, TypeId};
use serde::Serialize;

/// Primary type category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeCategory {
    Void,
    NullPointer,
    Integral,
    FloatingPoint,
    Array,
    Pointer,
    LValueRef,
    RValueRef,
    MemberObjectPtr,
    MemberFunctionPtr,
    Enum,
    Union,
    Class,
    Function,
}

impl TypeCategory {
    pub const ALL: [TypeCategory; 14] = [
        TypeCategory::Void,
        TypeCategory::NullPointer,
        TypeCategory::Integral,
        TypeCategory::FloatingPoint,
        TypeCategory::Array,
        TypeCategory::Pointer,
        TypeCategory::LValueRef,
        TypeCategory::RValueRef,
        TypeCategory::MemberObjectPtr,
        TypeCategory::MemberFunctionPtr,
        TypeCategory::Enum,
        TypeCategory::Union,
        TypeCategory::Class,
        TypeCategory::Function,
    ];

    pub const fn is_arithmetic(self) -> bool {
        matches!(self, TypeCategory::Integral | TypeCategory::FloatingPoint)
    }

    pub const fn is_fundamental(self) -> bool {
        matches!(self, TypeCategory::Void | TypeCategory::NullPointer) || self.is_arithmetic()
    }

    pub const fn is_member_pointer(self) -> bool {
        matches!(
            self,
            TypeCategory::MemberObjectPtr | TypeCategory::MemberFunctionPtr
        )
    }

    pub const fn is_scalar(self) -> bool {
        self.is_arithmetic()
            || self.is_member_pointer()
            || matches!(
                self,
                TypeCategory::Pointer | TypeCategory::NullPointer | TypeCategory::Enum
            )
    }

    pub const fn is_object(self) -> bool {
        self.is_scalar()
            || matches!(
                self,
                TypeCategory::Array | TypeCategory::Union | TypeCategory::Class
            )
    }

    pub const fn is_compound(self) -> bool {
        !self.is_fundamental()
    }

    pub const fn is_reference(self) -> bool {
        matches!(self, TypeCategory::LValueRef | TypeCategory::RValueRef)
    }
}

/// The primary category of `ty`.
pub fn classify(db: &dyn TypeDatabase, ty: TypeId) -> TypeCategory {
    let Some(data) = unqualified_data(db, ty) else {
        // Unknown ids behave like an incomplete class: nothing can be done
        // with them, but they are still object types.
        return TypeCategory::Class;
    };
    match data {
        TypeData::Void => TypeCategory::Void,
        TypeData::NullPtr => TypeCategory::NullPointer,
        TypeData::Builtin(kind) if kind.is_floating_point() => TypeCategory::FloatingPoint,
        TypeData::Builtin(_) => TypeCategory::Integral,
        TypeData::Array { .. } => TypeCategory::Array,
        TypeData::Pointer(_) => TypeCategory::Pointer,
        TypeData::LValueRef(_) => TypeCategory::LValueRef,
        TypeData::RValueRef(_) => TypeCategory::RValueRef,
        TypeData::MemberPointer { pointee, .. } => {
            if type_queries::is_function(db, pointee) {
                TypeCategory::MemberFunctionPtr
            } else {
                TypeCategory::MemberObjectPtr
            }
        }
        TypeData::Enum(_) => TypeCategory::Enum,
        TypeData::Record(id) => match db.record(id).map(|decl| decl.kind) {
            Some(RecordKind::Union) => TypeCategory::Union,
            _ => TypeCategory::Class,
        },
        TypeData::Function(_) => TypeCategory::Function,
        // Qualified nodes are stripped by unqualified_data.
        TypeData::Qualified(inner, _) => classify(db, inner),
    }
}

macro_rules! category_predicates {
    ($($name:ident => $category:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(db: &dyn TypeDatabase, ty: TypeId) -> bool {
                classify(db, ty) == TypeCategory::$category
            }
        )*
    };
}

category_predicates! {
    is_void => Void,
    is_null_pointer => NullPointer,
    is_integral => Integral,
    is_floating_point => FloatingPoint,
    is_array => Array,
    is_pointer => Pointer,
    is_lvalue_reference => LValueRef,
    is_rvalue_reference => RValueRef,
    is_member_object_pointer => MemberObjectPtr,
    is_member_function_pointer => MemberFunctionPtr,
    is_enum => Enum,
    is_union => Union,
    is_class => Class,
    is_function => Function,
}

pub fn is_arithmetic(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    classify(db, ty).is_arithmetic()
}

pub fn is_fundamental(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    classify(db, ty).is_fundamental()
}

pub fn is_scalar(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    classify(db, ty).is_scalar()
}

pub fn is_object(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    classify(db, ty).is_object()
}

pub fn is_compound(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    classify(db, ty).is_compound()
}

pub fn is_reference(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    classify(db, ty).is_reference()
}

pub fn is_member_pointer(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    classify(db, ty).is_member_pointer()
}

/// `T&` can be formed: object and reference types, and function types
/// without method qualifiers.
pub fn is_referenceable(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    match classify(db, ty) {
        TypeCategory::Void => false,
        TypeCategory::Function => {
            type_queries::function_shape(db, ty).is_some_and(|shape| !shape.is_abominable())
        }
        _ => true,
    }
}

/// Top-level `const`. An array is const when its element type is.
pub fn is_const(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    split_cv(db, ty).1.contains(CvQualifiers::CONST)
}

/// Top-level `volatile`. An array is volatile when its element type is.
pub fn is_volatile(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    split_cv(db, ty).1.contains(CvQualifiers::VOLATILE)
}

/// Arithmetic type whose `T(-1) < T(0)`.
pub fn is_signed(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    type_queries::builtin_kind(db, ty).is_some_and(|kind| kind.is_signed(db.target()))
}

/// Arithmetic type whose `T(-1) > T(0)`; `bool` counts.
pub fn is_unsigned(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    type_queries::builtin_kind(db, ty)
        .is_some_and(|kind| kind.is_integral() && !kind.is_signed(db.target()))
}

pub fn is_bounded_array(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    matches!(array_parts(db, ty), Some((_, Some(_))))
}

pub fn is_unbounded_array(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    matches!(array_parts(db, ty), Some((_, None)))
}

#[inline]
pub fn is_same(a: TypeId, b: TypeId) -> bool {
    a == b
}

/// Number of array dimensions.
pub fn rank(db: &dyn TypeDatabase, ty: TypeId) -> u64 {
    let mut rank = 0;
    let mut current = ty;
    while let Some((element, _)) = array_parts(db, current) {
        rank += 1;
        current = element;
    }
    rank
}

/// Bound of the `dimension`-th array dimension, or 0 when that dimension
/// does not exist or is unbounded.
pub fn extent(db: &dyn TypeDatabase, ty: TypeId, dimension: u32) -> u64 {
    let mut current = ty;
    let mut remaining = dimension;
    while let Some((element, bound)) = array_parts(db, current) {
        if remaining == 0 {
            return bound.unwrap_or(0);
        }
        remaining -= 1;
        current = element;
    }
    0
}

#[cfg(test)]
#[path = "../tests/classify_tests.rs"]
mod tests;
