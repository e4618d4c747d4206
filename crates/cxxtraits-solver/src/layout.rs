//! Object layout.
//!
//! `size_of`/`align_of` follow the target data model; records are laid out
//! with the parts of the Itanium C++ ABI that are observable through the
//! traits: a vtable pointer for dynamic classes that do not share their
//! primary base's, the empty-base optimization, natural alignment of
//! members, and a minimum size of one byte.
//!
//! `aligned_storage` and `aligned_union` compute the storage a placement
//! buffer needs.

use crate::TypeDatabase;
use crate::def::{BaseSpec, RecordLayout};
use crate::error::{TraitError, TraitResult};
use crate::format::TypeFormatter;
use crate::type_list::{AlignCandidate, candidate_with_alignment, max_alignment_within};
use crate::type_queries::{
    complete_record, enum_decl, is_function, referent, strip_all_extents, unqualified,
    unqualified_data,
};
use crate::types::{Access, TypeData, TypeId};
use cxxtraits_common::limits::MAX_ALIGNMENT;
use cxxtraits_common::target::ScalarLayout;
use rustc_hash::FxHashSet;

/// Layout of a complete object type, or `None` for `void`, functions,
/// arrays of unknown bound and incomplete records. A reference reports the
/// layout of its referent.
pub fn layout_of(db: &dyn TypeDatabase, ty: TypeId) -> Option<ScalarLayout> {
    if let Some((inner, _)) = referent(db, ty) {
        return layout_of(db, inner);
    }
    let target = db.target();
    match unqualified_data(db, ty)? {
        TypeData::Void | TypeData::Function(_) => None,
        TypeData::NullPtr | TypeData::Pointer(_) => Some(target.pointer_layout),
        TypeData::Builtin(kind) => Some(kind.layout(target)),
        TypeData::MemberPointer { pointee, .. } => {
            if is_function(db, pointee) {
                Some(target.member_function_pointer_layout)
            } else {
                Some(target.member_data_pointer_layout)
            }
        }
        TypeData::Array { element, bound } => {
            let element = layout_of(db, element)?;
            Some(ScalarLayout::new(element.size.checked_mul(bound?)?, element.align))
        }
        TypeData::Enum(_) => {
            let decl = enum_decl(db, ty)?;
            layout_of(db, decl.underlying(target))
        }
        TypeData::Record(_) => {
            let decl = complete_record(db, ty)?;
            Some(ScalarLayout::new(decl.layout.size, decl.layout.align))
        }
        TypeData::LValueRef(_) | TypeData::RValueRef(_) | TypeData::Qualified(..) => None,
    }
}

pub fn size_of(db: &dyn TypeDatabase, ty: TypeId) -> Option<u64> {
    layout_of(db, ty).map(|layout| layout.size)
}

pub fn align_of(db: &dyn TypeDatabase, ty: TypeId) -> Option<u64> {
    layout_of(db, ty).map(|layout| layout.align)
}

/// Storage-layout of a member: references occupy a pointer. `None` when
/// the member's size does not fit in `u64`.
fn member_layout(db: &dyn TypeDatabase, ty: TypeId) -> Option<ScalarLayout> {
    if referent(db, ty).is_some() {
        return Some(db.target().pointer_layout);
    }
    layout_of(db, ty)
}

#[inline]
fn round_up(value: u64, align: u64) -> Option<u64> {
    let align = align.max(1);
    value.div_ceil(align).checked_mul(align)
}

/// `offset` rounded up to `align`, then advanced by `size`.
#[inline]
fn place(offset: u64, align: u64, size: u64) -> Option<u64> {
    round_up(offset, align)?.checked_add(size)
}

/// Input to the record layout algorithm.
pub struct LayoutInput<'a> {
    pub is_union: bool,
    /// Polymorphic or has virtual bases.
    pub dynamic: bool,
    pub bases: &'a [BaseSpec],
    pub fields: &'a [TypeId],
}

/// Lay out a record from its bases and data members, or `None` when its
/// size does not fit in `u64`.
pub fn lay_out_record(db: &dyn TypeDatabase, input: &LayoutInput<'_>) -> Option<RecordLayout> {
    let target = db.target();
    let mut offset = 0u64;
    let mut align = 1u64;

    if input.is_union {
        let mut size = 0;
        for field in input.fields {
            let layout = member_layout(db, *field)?;
            size = size.max(layout.size);
            align = align.max(layout.align);
        }
        return Some(RecordLayout {
            size: round_up(size.max(1), align)?,
            align,
        });
    }

    let primary_is_dynamic = input
        .bases
        .iter()
        .find(|base| !base.is_virtual)
        .and_then(|base| complete_record(db, base.ty))
        .is_some_and(|decl| decl.facts.polymorphic || decl.facts.has_virtual_bases);
    if input.dynamic && !primary_is_dynamic {
        offset = target.pointer_layout.size;
        align = target.pointer_layout.align;
    }

    // Empty subobjects placed at offset zero; a second one of the same type
    // must move to a distinct address.
    let mut empty_at_zero: FxHashSet<TypeId> = FxHashSet::default();
    let mut virtual_bases: Vec<TypeId> = Vec::new();

    for base in input.bases {
        if base.is_virtual {
            if !virtual_bases.contains(&base.ty) {
                virtual_bases.push(base.ty);
            }
            continue;
        }
        let Some(decl) = complete_record(db, base.ty) else {
            continue;
        };
        align = align.max(decl.layout.align);
        if decl.facts.empty && offset == 0 && empty_at_zero.insert(base.ty) {
            continue;
        }
        if decl.facts.empty {
            offset = place(offset, decl.layout.align, 1)?;
            continue;
        }
        offset = place(offset, decl.layout.align, decl.layout.size)?;
    }

    for field in input.fields {
        let layout = member_layout(db, *field)?;
        align = align.max(layout.align);
        let clashes_with_empty_base = offset == 0 && empty_at_zero.contains(field);
        offset = place(offset, layout.align, layout.size)?;
        if clashes_with_empty_base {
            offset = offset.checked_add(layout.align)?;
        }
    }

    for base in virtual_bases {
        if let Some(decl) = complete_record(db, base) {
            align = align.max(decl.layout.align);
            if !decl.facts.empty {
                offset = place(offset, decl.layout.align, decl.layout.size)?;
            }
        }
    }

    Some(RecordLayout {
        size: round_up(offset.max(1), align)?,
        align,
    })
}

/// Whether deriving from `ty` adds storage: compares `struct : ty { double }`
/// with `struct { double }`. Only meaningful for complete non-union classes.
pub fn empty_probe(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    let Some(decl) = complete_record(db, ty) else {
        return false;
    };
    if decl.is_union() {
        return false;
    }
    let fields = [TypeId::DOUBLE];
    let base = [BaseSpec {
        ty: unqualified(db, ty),
        access: Access::Private,
        is_virtual: false,
    }];
    let dynamic = decl.facts.polymorphic || decl.facts.has_virtual_bases;
    let probe = lay_out_record(
        db,
        &LayoutInput {
            is_union: false,
            dynamic,
            bases: &base,
            fields: &fields,
        },
    );
    let plain = lay_out_record(
        db,
        &LayoutInput {
            is_union: false,
            dynamic: false,
            bases: &[],
            fields: &fields,
        },
    );
    probe.zip(plain).is_some_and(|(probe, plain)| probe.size == plain.size)
}

/// Every bit of the object representation takes part in the value: equal
/// values have equal bytes. Floating point types, `nullptr_t` and member
/// function pointers do not qualify; records carry the fact computed when
/// they were finished.
pub fn has_unique_representation(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    let ty = strip_all_extents(db, ty);
    match unqualified_data(db, ty) {
        Some(TypeData::Builtin(kind)) => kind.is_integral(),
        Some(TypeData::Enum(_)) => enum_decl(db, ty)
            .is_some_and(|decl| has_unique_representation(db, decl.underlying(db.target()))),
        Some(TypeData::Pointer(_)) => true,
        Some(TypeData::MemberPointer { pointee, .. }) => {
            !is_function(db, pointee)
        }
        Some(TypeData::Record(_)) => complete_record(db, ty)
            .is_some_and(|decl| decl.facts.unique_object_representations),
        _ => false,
    }
}

// =============================================================================
// Aligned storage
// =============================================================================

/// How an aligned storage buffer obtains its alignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AlignAnchor {
    /// A candidate type with exactly the requested natural alignment.
    Natural(AlignCandidate),
    /// An explicitly over-aligned empty type.
    OverAligned,
}

/// A raw storage buffer: `size` bytes aligned to `align`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlignedStorage {
    pub len: u64,
    pub size: u64,
    pub align: u64,
    pub anchor: AlignAnchor,
}

/// Storage of at least `len` bytes with alignment `align`, or the default
/// alignment for `len` when `align` is `None`.
///
/// The size is `len` rounded up to a multiple of the alignment.
pub fn aligned_storage(
    db: &dyn TypeDatabase,
    len: u64,
    align: Option<u64>,
) -> TraitResult<AlignedStorage> {
    if len == 0 {
        return Err(TraitError::ZeroLength);
    }
    let target = db.target();
    let align = align.unwrap_or_else(|| max_alignment_within(len, target));
    if !align.is_power_of_two() || align > MAX_ALIGNMENT {
        return Err(TraitError::InvalidAlignment {
            align,
            max: MAX_ALIGNMENT,
        });
    }
    let size = round_up(len, align).ok_or(TraitError::SizeOverflow { len, align })?;
    let anchor = candidate_with_alignment(align, target)
        .map_or(AlignAnchor::OverAligned, AlignAnchor::Natural);
    Ok(AlignedStorage {
        len,
        size,
        align,
        anchor,
    })
}

/// Storage suitable for any of `types` and at least `len` bytes long.
pub fn aligned_union(
    db: &dyn TypeDatabase,
    len: u64,
    types: &[TypeId],
) -> TraitResult<AlignedStorage> {
    if types.is_empty() {
        return Err(TraitError::ArityMismatch {
            trait_name: "aligned_union",
            expected: "at least 1",
            given: 0,
        });
    }
    let mut max_len = len;
    let mut max_align = 1;
    for ty in types {
        let layout = layout_of(db, *ty).ok_or_else(|| TraitError::Unsized {
            ty: TypeFormatter::new(db).format(*ty),
        })?;
        max_len = max_len.max(layout.size);
        max_align = max_align.max(layout.align);
    }
    aligned_storage(db, max_len, Some(max_align))
}

#[cfg(test)]
#[path = "../tests/layout_tests.rs"]
mod tests;
