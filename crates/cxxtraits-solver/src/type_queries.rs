//! Structural type queries.
//!
//! Small helpers that look through the canonical `TypeData` encoding so the
//! trait layers can ask "what is the record behind this type" or "what does
//! this reference refer to" without matching on interned nodes themselves.

use crate::TypeDatabase;
use crate::def::{EnumDecl, RecordDecl};
use crate::types::{BuiltinKind, CvQualifiers, FunctionShape, RecordId, TypeData, TypeId};
use std::sync::Arc;

/// Split off top-level cv-qualification.
///
/// The qualification of an array type is the qualification of its element
/// type, so `const int[3]` splits into `int[3]` and `const`.
pub fn split_cv(db: &dyn TypeDatabase, ty: TypeId) -> (TypeId, CvQualifiers) {
    match db.lookup(ty) {
        Some(TypeData::Qualified(inner, cv)) => (inner, cv),
        Some(TypeData::Array { element, bound }) => {
            let (inner, cv) = split_cv(db, element);
            if cv.is_empty() {
                (ty, cv)
            } else {
                (db.array(inner, bound), cv)
            }
        }
        _ => (ty, CvQualifiers::empty()),
    }
}

#[inline]
pub fn unqualified(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    split_cv(db, ty).0
}

#[inline]
pub fn cv_of(db: &dyn TypeDatabase, ty: TypeId) -> CvQualifiers {
    split_cv(db, ty).1
}

/// Node of the cv-unqualified type.
pub fn unqualified_data(db: &dyn TypeDatabase, ty: TypeId) -> Option<TypeData> {
    match db.lookup(ty)? {
        TypeData::Qualified(inner, _) => db.lookup(inner),
        data => Some(data),
    }
}

pub fn builtin_kind(db: &dyn TypeDatabase, ty: TypeId) -> Option<BuiltinKind> {
    match unqualified_data(db, ty)? {
        TypeData::Builtin(kind) => Some(kind),
        _ => None,
    }
}

pub fn record_id(db: &dyn TypeDatabase, ty: TypeId) -> Option<RecordId> {
    match unqualified_data(db, ty)? {
        TypeData::Record(id) => Some(id),
        _ => None,
    }
}

/// Declaration of the record behind `ty`, complete or not.
pub fn record_decl(db: &dyn TypeDatabase, ty: TypeId) -> Option<Arc<RecordDecl>> {
    db.record(record_id(db, ty)?)
}

/// Declaration of the record behind `ty` if it is complete.
pub fn complete_record(db: &dyn TypeDatabase, ty: TypeId) -> Option<Arc<RecordDecl>> {
    record_decl(db, ty).filter(|decl| decl.complete)
}

/// Class or struct (not union) record behind `ty`.
pub fn class_record(db: &dyn TypeDatabase, ty: TypeId) -> Option<Arc<RecordDecl>> {
    complete_record(db, ty).filter(|decl| !decl.is_union())
}

pub fn enum_decl(db: &dyn TypeDatabase, ty: TypeId) -> Option<Arc<EnumDecl>> {
    match unqualified_data(db, ty)? {
        TypeData::Enum(id) => db.enum_decl(id),
        _ => None,
    }
}

/// Shape of `ty` if it is itself a function type.
pub fn function_shape(db: &dyn TypeDatabase, ty: TypeId) -> Option<Arc<FunctionShape>> {
    match db.lookup(ty)? {
        TypeData::Function(id) => db.function_shape(id),
        _ => None,
    }
}

/// Referent of a reference type and whether the reference is an rvalue reference.
pub fn referent(db: &dyn TypeDatabase, ty: TypeId) -> Option<(TypeId, bool)> {
    match db.lookup(ty)? {
        TypeData::LValueRef(inner) => Some((inner, false)),
        TypeData::RValueRef(inner) => Some((inner, true)),
        _ => None,
    }
}

#[inline]
pub fn is_reference(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    referent(db, ty).is_some()
}

/// Pointee of a (possibly cv-qualified) pointer type.
pub fn pointee(db: &dyn TypeDatabase, ty: TypeId) -> Option<TypeId> {
    match unqualified_data(db, ty)? {
        TypeData::Pointer(inner) => Some(inner),
        _ => None,
    }
}

/// Element type and bound of an array type.
pub fn array_parts(db: &dyn TypeDatabase, ty: TypeId) -> Option<(TypeId, Option<u64>)> {
    match db.lookup(ty)? {
        TypeData::Array { element, bound } => Some((element, bound)),
        _ => None,
    }
}

/// Class and pointee of a (possibly cv-qualified) member pointer type.
pub fn member_pointer_parts(db: &dyn TypeDatabase, ty: TypeId) -> Option<(TypeId, TypeId)> {
    match unqualified_data(db, ty)? {
        TypeData::MemberPointer { class, pointee } => Some((class, pointee)),
        _ => None,
    }
}

/// Innermost element type of a (possibly multidimensional) array.
pub fn strip_all_extents(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    let mut current = ty;
    while let Some((element, _)) = array_parts(db, current) {
        current = element;
    }
    current
}

pub fn is_void(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    matches!(unqualified_data(db, ty), Some(TypeData::Void))
}

pub fn is_function(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    matches!(db.lookup(ty), Some(TypeData::Function(_)))
}

pub fn is_unbounded_array(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    matches!(array_parts(db, ty), Some((_, None)))
}

/// Scalar: arithmetic, enumeration, pointer, member pointer or `nullptr_t`.
pub fn is_scalar(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    matches!(
        unqualified_data(db, ty),
        Some(
            TypeData::Builtin(_)
                | TypeData::Enum(_)
                | TypeData::Pointer(_)
                | TypeData::MemberPointer { .. }
                | TypeData::NullPtr
        )
    )
}

/// An object type whose size is known: not void, not a function, not a
/// reference, not an unbounded array, not an incomplete record.
pub fn is_complete_object(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    match unqualified_data(db, ty) {
        Some(TypeData::Void | TypeData::Function(_)) | None => false,
        Some(TypeData::LValueRef(_) | TypeData::RValueRef(_)) => false,
        Some(TypeData::Array { element, bound }) => {
            bound.is_some() && is_complete_object(db, element)
        }
        Some(TypeData::Record(id)) => db.record(id).is_some_and(|decl| decl.complete),
        Some(_) => true,
    }
}
