//! Type transformations.
//!
//! Pure functions from types to types. Each is total over every `TypeId`
//! and idempotent where the operation allows it: removing `const` from a
//! non-const type returns the input unchanged.

use crate::TypeDatabase;
use crate::classify::is_referenceable;
use crate::error::{TraitError, TraitResult};
use crate::format::TypeFormatter;
use crate::type_list::{first_with_size_at_least, signed_integers, unsigned_integers};
use crate::type_queries::{array_parts, builtin_kind, enum_decl, referent, split_cv};
use crate::types::{BuiltinKind, CvQualifiers, TypeData, TypeId};

// =============================================================================
// cv-qualification
// =============================================================================

pub fn add_const(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    db.qualified(ty, CvQualifiers::CONST)
}

pub fn add_volatile(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    db.qualified(ty, CvQualifiers::VOLATILE)
}

pub fn add_cv(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    db.qualified(ty, CvQualifiers::CONST | CvQualifiers::VOLATILE)
}

fn remove_qualifiers(db: &dyn TypeDatabase, ty: TypeId, remove: CvQualifiers) -> TypeId {
    let (base, cv) = split_cv(db, ty);
    if !cv.intersects(remove) {
        return ty;
    }
    db.qualified(base, cv - remove)
}

pub fn remove_const(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    remove_qualifiers(db, ty, CvQualifiers::CONST)
}

pub fn remove_volatile(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    remove_qualifiers(db, ty, CvQualifiers::VOLATILE)
}

pub fn remove_cv(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    split_cv(db, ty).0
}

// =============================================================================
// References and pointers
// =============================================================================

/// `T&`; `void` and abominable function types are returned unchanged.
pub fn add_lvalue_reference(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    if is_referenceable(db, ty) {
        db.lvalue_reference(ty)
    } else {
        ty
    }
}

/// `T&&`, collapsing `U& &&` to `U&`; `void` and abominable function types
/// are returned unchanged.
pub fn add_rvalue_reference(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    if is_referenceable(db, ty) {
        db.rvalue_reference(ty)
    } else {
        ty
    }
}

pub fn remove_reference(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    referent(db, ty).map_or(ty, |(inner, _)| inner)
}

pub fn remove_cvref(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    remove_cv(db, remove_reference(db, ty))
}

/// Pointer to the referent of `ty`. Abominable function types are returned
/// unchanged; `void` becomes `void*`.
pub fn add_pointer(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    let target = remove_reference(db, ty);
    if is_referenceable(db, target) || crate::type_queries::is_void(db, target) {
        db.pointer(target)
    } else {
        ty
    }
}

/// Pointee of a (possibly cv-qualified) pointer; other types unchanged.
pub fn remove_pointer(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    crate::type_queries::pointee(db, ty).unwrap_or(ty)
}

// =============================================================================
// Arrays
// =============================================================================

pub fn remove_extent(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    array_parts(db, ty).map_or(ty, |(element, _)| element)
}

pub fn remove_all_extents(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    crate::type_queries::strip_all_extents(db, ty)
}

// =============================================================================
// Decay and friends
// =============================================================================

/// The type a by-value parameter of type `ty` would have: the reference is
/// stripped first, then arrays become pointers to their element, functions
/// become function pointers, and everything else loses top-level cv.
pub fn decay(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    let stripped = remove_reference(db, ty);
    match db.lookup(stripped) {
        Some(TypeData::Array { element, .. }) => db.pointer(element),
        Some(TypeData::Function(_)) => add_pointer(db, stripped),
        _ => remove_cv(db, stripped),
    }
}

#[inline]
pub fn type_identity(ty: TypeId) -> TypeId {
    ty
}

#[inline]
pub fn conditional(condition: bool, if_true: TypeId, if_false: TypeId) -> TypeId {
    if condition { if_true } else { if_false }
}

// =============================================================================
// Signedness
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Signedness {
    Signed,
    Unsigned,
}

/// Signed counterpart of an integral or enumeration type, cv preserved.
///
/// Standard integer types map to the signed type of the same rank; character
/// types and enumerations map to the first signed integer at least as wide.
pub fn make_signed(db: &dyn TypeDatabase, ty: TypeId, int128: bool) -> TraitResult<TypeId> {
    make_with_signedness(db, ty, Signedness::Signed, int128)
}

/// Unsigned counterpart of an integral or enumeration type, cv preserved.
pub fn make_unsigned(db: &dyn TypeDatabase, ty: TypeId, int128: bool) -> TraitResult<TypeId> {
    make_with_signedness(db, ty, Signedness::Unsigned, int128)
}

fn make_with_signedness(
    db: &dyn TypeDatabase,
    ty: TypeId,
    signedness: Signedness,
    int128: bool,
) -> TraitResult<TypeId> {
    let trait_name = match signedness {
        Signedness::Signed => "make_signed",
        Signedness::Unsigned => "make_unsigned",
    };
    let (base, cv) = split_cv(db, ty);
    let not_integral = || TraitError::NotIntegral {
        trait_name,
        ty: TypeFormatter::new(db).format(ty),
    };

    let size = if let Some(kind) = builtin_kind(db, base) {
        if !kind.is_integral() || kind == BuiltinKind::Bool {
            return Err(not_integral());
        }
        if let Some(mapped) = rank_counterpart(kind, signedness) {
            return Ok(db.qualified(mapped.type_id(), cv));
        }
        kind.layout(db.target()).size
    } else if let Some(decl) = enum_decl(db, base) {
        let underlying = decl.underlying(db.target());
        builtin_kind(db, underlying)
            .map(|kind| kind.layout(db.target()).size)
            .ok_or_else(not_integral)?
    } else {
        return Err(not_integral());
    };

    let ladder = match signedness {
        Signedness::Signed => signed_integers(int128),
        Signedness::Unsigned => unsigned_integers(int128),
    };
    let kind = first_with_size_at_least(ladder, size, db.target())
        .ok_or(TraitError::NoMatchingInteger { trait_name, size })?;
    Ok(db.qualified(kind.type_id(), cv))
}

fn rank_counterpart(kind: BuiltinKind, signedness: Signedness) -> Option<BuiltinKind> {
    use BuiltinKind::*;
    let pair = match kind {
        SignedChar | UnsignedChar => (SignedChar, UnsignedChar),
        Short | UnsignedShort => (Short, UnsignedShort),
        Int | UnsignedInt => (Int, UnsignedInt),
        Long | UnsignedLong => (Long, UnsignedLong),
        LongLong | UnsignedLongLong => (LongLong, UnsignedLongLong),
        Int128 | UnsignedInt128 => (Int128, UnsignedInt128),
        _ => return None,
    };
    Some(match signedness {
        Signedness::Signed => pair.0,
        Signedness::Unsigned => pair.1,
    })
}

#[cfg(test)]
#[path = "../tests/transform_tests.rs"]
mod tests;
