use super::*;
use crate::TypeInterner;
use crate::def::FunctionDecl;
use crate::types::FunctionShape;
use cxxtraits_common::TargetInfo;

fn layout(db: &TypeInterner, ty: TypeId) -> (u64, u64) {
    let layout = layout_of(db, ty).expect("type has a layout");
    (layout.size, layout.align)
}

#[test]
fn test_scalar_layouts_follow_target() {
    let db = TypeInterner::new();
    assert_eq!(layout(&db, TypeId::CHAR), (1, 1));
    assert_eq!(layout(&db, TypeId::LONG), (8, 8));
    assert_eq!(layout(&db, db.pointer(TypeId::VOID)), (8, 8));
    assert_eq!(layout(&db, TypeId::NULLPTR), (8, 8));

    let windows = TypeInterner::with_target(TargetInfo::llp64());
    assert_eq!(layout(&windows, TypeId::LONG), (4, 4));

    let x86 = TypeInterner::with_target(TargetInfo::ilp32());
    assert_eq!(layout(&x86, TypeId::DOUBLE), (8, 4));
    assert_eq!(layout(&x86, x86.pointer(TypeId::INT)), (4, 4));
}

#[test]
fn test_no_layout_for_incomplete_types() {
    let db = TypeInterner::new();
    let function = db.function(FunctionShape::new(TypeId::VOID, vec![]));
    let fwd = db.incomplete_record("Fwd", crate::def::RecordKind::Struct);
    assert_eq!(size_of(&db, TypeId::VOID), None);
    assert_eq!(size_of(&db, function), None);
    assert_eq!(size_of(&db, db.array(TypeId::INT, None)), None);
    assert_eq!(size_of(&db, fwd), None);
}

#[test]
fn test_compound_layouts() {
    let db = TypeInterner::new();
    assert_eq!(layout(&db, db.array(TypeId::INT, Some(10))), (40, 4));
    assert_eq!(size_of(&db, db.lvalue_reference(TypeId::SHORT)), Some(2));
    let widget = db.struct_("W").finish().expect("W is well-formed");
    let method = db.function(FunctionShape::new(TypeId::VOID, vec![]));
    assert_eq!(layout(&db, db.member_pointer(widget, TypeId::INT)), (8, 8));
    assert_eq!(layout(&db, db.member_pointer(widget, method)), (16, 8));
    let small = db.enumeration("Small", true, Some(TypeId::UNSIGNED_CHAR), (0, 1));
    assert_eq!(layout(&db, small), (1, 1));
}

#[test]
fn test_record_layout_with_padding() {
    let db = TypeInterner::new();
    let padded = db
        .struct_("Padded")
        .field("c", TypeId::CHAR)
        .field("i", TypeId::INT)
        .finish()
        .expect("Padded is well-formed");
    assert_eq!(layout(&db, padded), (8, 4));

    let tail = db
        .struct_("Tail")
        .field("d", TypeId::DOUBLE)
        .field("c", TypeId::CHAR)
        .finish()
        .expect("Tail is well-formed");
    assert_eq!(layout(&db, tail), (16, 8));
}

#[test]
fn test_empty_record_has_size_one() {
    let db = TypeInterner::new();
    let empty = db.struct_("Empty").finish().expect("Empty is well-formed");
    assert_eq!(layout(&db, empty), (1, 1));
}

#[test]
fn test_empty_base_optimization() {
    let db = TypeInterner::new();
    let empty = db.struct_("E").finish().expect("E is well-formed");
    let derived = db
        .struct_("D")
        .base(empty)
        .field("x", TypeId::INT)
        .finish()
        .expect("D is well-formed");
    assert_eq!(layout(&db, derived), (4, 4));

    let clash = db
        .struct_("F")
        .base(empty)
        .field("e", empty)
        .finish()
        .expect("F is well-formed");
    assert_eq!(layout(&db, clash), (2, 1));
}

#[test]
fn test_dynamic_class_has_vtable_pointer() {
    let db = TypeInterner::new();
    let base = db
        .struct_("Base")
        .virtual_method("run")
        .field("x", TypeId::INT)
        .finish()
        .expect("Base is well-formed");
    assert_eq!(layout(&db, base), (16, 8));

    let derived = db
        .struct_("Derived")
        .base(base)
        .field("y", TypeId::INT)
        .finish()
        .expect("Derived is well-formed");
    assert_eq!(layout(&db, derived), (24, 8));
}

#[test]
fn test_union_layout() {
    let db = TypeInterner::new();
    let u = db
        .union("U")
        .field("c", TypeId::CHAR)
        .field("d", TypeId::DOUBLE)
        .finish()
        .expect("U is well-formed");
    assert_eq!(layout(&db, u), (8, 8));
}

#[test]
fn test_reference_members_take_pointer_storage() {
    let db = TypeInterner::new();
    let holder = db
        .struct_("Holder")
        .field("r", db.lvalue_reference(TypeId::CHAR))
        .finish()
        .expect("Holder is well-formed");
    assert_eq!(layout(&db, holder), (8, 8));
}

#[test]
fn test_empty_probe() {
    let db = TypeInterner::new();
    let empty = db.struct_("E").finish().expect("E is well-formed");
    let full = db
        .struct_("Full")
        .field("x", TypeId::INT)
        .finish()
        .expect("Full is well-formed");
    let dynamic = db
        .struct_("Dyn")
        .virtual_method("f")
        .finish()
        .expect("Dyn is well-formed");
    assert!(empty_probe(&db, empty));
    assert!(!empty_probe(&db, full));
    assert!(!empty_probe(&db, dynamic));
    assert!(!empty_probe(&db, TypeId::INT));
}

#[test]
fn test_unique_representation() {
    let db = TypeInterner::new();
    assert!(has_unique_representation(&db, TypeId::INT));
    assert!(has_unique_representation(&db, db.pointer(TypeId::INT)));
    assert!(!has_unique_representation(&db, TypeId::FLOAT));
    assert!(!has_unique_representation(&db, TypeId::NULLPTR));
    assert!(has_unique_representation(&db, db.array(TypeId::UNSIGNED_INT, Some(4))));

    let padded = db
        .struct_("Padded")
        .field("c", TypeId::CHAR)
        .field("i", TypeId::INT)
        .finish()
        .expect("Padded is well-formed");
    let packed = db
        .struct_("Packed")
        .field("a", TypeId::INT)
        .field("b", TypeId::INT)
        .finish()
        .expect("Packed is well-formed");
    assert!(!has_unique_representation(&db, padded));
    assert!(has_unique_representation(&db, packed));

    let copyable_only_by_hand = db
        .struct_("Manual")
        .field("a", TypeId::INT)
        .constructor(FunctionDecl::new(vec![db.lvalue_reference(db.qualified(
            TypeId::INT,
            crate::types::CvQualifiers::CONST,
        ))]))
        .assignment(FunctionDecl::new(vec![TypeId::INT]))
        .throwing_destructor()
        .finish()
        .expect("Manual is well-formed");
    assert!(!has_unique_representation(&db, copyable_only_by_hand));
}

#[test]
fn test_aligned_storage_default_alignment() {
    let db = TypeInterner::new();
    let storage = aligned_storage(&db, 10, None).expect("valid request");
    assert_eq!(storage.align, 8);
    assert_eq!(storage.size, 16);
    assert_eq!(
        storage.anchor,
        AlignAnchor::Natural(AlignCandidate::Builtin(crate::types::BuiltinKind::UnsignedLong))
    );

    let small = aligned_storage(&db, 3, None).expect("valid request");
    assert_eq!((small.size, small.align), (4, 2));
}

#[test]
fn test_aligned_storage_explicit_alignment() {
    let db = TypeInterner::new();
    let storage = aligned_storage(&db, 10, Some(64)).expect("valid request");
    assert_eq!((storage.len, storage.size, storage.align), (10, 64, 64));
    assert_eq!(storage.anchor, AlignAnchor::OverAligned);

    let exact = aligned_storage(&db, 32, Some(16)).expect("valid request");
    assert_eq!(exact.size, 32);
}

#[test]
fn test_aligned_storage_rejects_bad_requests() {
    let db = TypeInterner::new();
    assert_eq!(aligned_storage(&db, 0, None), Err(TraitError::ZeroLength));
    assert!(matches!(
        aligned_storage(&db, 8, Some(3)),
        Err(TraitError::InvalidAlignment { align: 3, .. })
    ));
    assert!(matches!(
        aligned_storage(&db, 8, Some(MAX_ALIGNMENT * 2)),
        Err(TraitError::InvalidAlignment { .. })
    ));
}

#[test]
fn test_aligned_storage_reports_size_overflow() {
    let db = TypeInterner::new();
    assert_eq!(
        aligned_storage(&db, u64::MAX, Some(2)),
        Err(TraitError::SizeOverflow {
            len: u64::MAX,
            align: 2
        })
    );
    assert!(matches!(
        aligned_storage(&db, u64::MAX - 3, None),
        Err(TraitError::SizeOverflow { .. })
    ));
    let largest = aligned_storage(&db, u64::MAX - 15, Some(16)).expect("fits exactly");
    assert_eq!(largest.size, u64::MAX - 15);
}

#[test]
fn test_oversized_record_is_rejected() {
    let db = TypeInterner::new();
    let half = db.array(TypeId::CHAR, Some(1 << 63));
    assert_eq!(size_of(&db, half), Some(1 << 63));

    let result = db.struct_("Huge").field("a", half).field("b", half).finish();
    assert_eq!(
        result,
        Err(TraitError::RecordTooLarge {
            record: "Huge".to_string()
        })
    );

    let padded = db
        .struct_("Padded")
        .field("tag", TypeId::CHAR)
        .field("rest", db.array(TypeId::LONG, Some(u64::MAX / 8)))
        .finish();
    assert!(matches!(padded, Err(TraitError::RecordTooLarge { .. })));

    let single = db.struct_("Half").field("a", half).finish().expect("fits");
    assert_eq!(size_of(&db, single), Some(1 << 63));
}

#[test]
fn test_aligned_union() {
    let db = TypeInterner::new();
    let storage = aligned_union(&db, 0, &[TypeId::INT, TypeId::DOUBLE, TypeId::CHAR]).expect("valid");
    assert_eq!((storage.size, storage.align), (8, 8));

    let long = aligned_union(&db, 20, &[TypeId::CHAR]).expect("valid");
    assert_eq!((long.len, long.size, long.align), (20, 20, 1));

    assert!(matches!(
        aligned_union(&db, 4, &[]),
        Err(TraitError::ArityMismatch { given: 0, .. })
    ));
    assert!(matches!(
        aligned_union(&db, 4, &[TypeId::VOID]),
        Err(TraitError::Unsized { .. })
    ));
}
