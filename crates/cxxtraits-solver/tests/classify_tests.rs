use super::*;
use crate::TypeInterner;
use crate::types::{FunctionShape, RefQualifier};

struct Fixture {
    interner: TypeInterner,
    class: TypeId,
    union: TypeId,
    color: TypeId,
}

fn fixture() -> Fixture {
    let interner = TypeInterner::new();
    let class = interner
        .class("Widget")
        .field("id", TypeId::INT)
        .finish()
        .expect("Widget is well-formed");
    let union = interner
        .union("Bits")
        .field("i", TypeId::INT)
        .field("f", TypeId::FLOAT)
        .finish()
        .expect("Bits is well-formed");
    let color = interner.enumeration("Color", true, None, (0, 3));
    Fixture {
        interner,
        class,
        union,
        color,
    }
}

#[test]
fn test_every_type_has_one_primary_category() {
    let f = fixture();
    let db = &f.interner;
    let function = db.function(FunctionShape::new(TypeId::VOID, vec![TypeId::INT]));
    let samples = [
        (TypeId::VOID, TypeCategory::Void),
        (TypeId::NULLPTR, TypeCategory::NullPointer),
        (TypeId::BOOL, TypeCategory::Integral),
        (TypeId::CHAR32, TypeCategory::Integral),
        (TypeId::LONG_DOUBLE, TypeCategory::FloatingPoint),
        (db.array(TypeId::INT, None), TypeCategory::Array),
        (db.pointer(TypeId::VOID), TypeCategory::Pointer),
        (db.lvalue_reference(TypeId::INT), TypeCategory::LValueRef),
        (db.rvalue_reference(TypeId::INT), TypeCategory::RValueRef),
        (db.member_pointer(f.class, TypeId::INT), TypeCategory::MemberObjectPtr),
        (db.member_pointer(f.class, function), TypeCategory::MemberFunctionPtr),
        (f.color, TypeCategory::Enum),
        (f.union, TypeCategory::Union),
        (f.class, TypeCategory::Class),
        (function, TypeCategory::Function),
    ];
    for (ty, expected) in samples {
        assert_eq!(classify(db, ty), expected);
        let hits = [
            is_void(db, ty),
            is_null_pointer(db, ty),
            is_integral(db, ty),
            is_floating_point(db, ty),
            is_array(db, ty),
            is_pointer(db, ty),
            is_lvalue_reference(db, ty),
            is_rvalue_reference(db, ty),
            is_member_object_pointer(db, ty),
            is_member_function_pointer(db, ty),
            is_enum(db, ty),
            is_union(db, ty),
            is_class(db, ty),
            is_function(db, ty),
        ];
        assert_eq!(hits.iter().filter(|hit| **hit).count(), 1);
    }
}

#[test]
fn test_classification_ignores_cv() {
    let f = fixture();
    let db = &f.interner;
    let cv = CvQualifiers::CONST | CvQualifiers::VOLATILE;
    assert!(is_integral(db, db.qualified(TypeId::INT, cv)));
    assert!(is_class(db, db.qualified(f.class, CvQualifiers::CONST)));
    assert!(is_pointer(db, db.qualified(db.pointer(TypeId::INT), cv)));
    assert!(is_void(db, db.qualified(TypeId::VOID, CvQualifiers::CONST)));
}

#[test]
fn test_composite_categories() {
    let f = fixture();
    let db = &f.interner;
    for category in TypeCategory::ALL {
        assert_eq!(category.is_compound(), !category.is_fundamental());
        if category.is_scalar() {
            assert!(category.is_object());
        }
        if category.is_arithmetic() {
            assert!(category.is_fundamental());
        }
    }
    assert!(is_scalar(db, f.color));
    assert!(is_scalar(db, TypeId::NULLPTR));
    assert!(!is_scalar(db, f.class));
    assert!(is_object(db, f.union));
    assert!(!is_object(db, db.lvalue_reference(TypeId::INT)));
    assert!(!is_object(db, TypeId::VOID));
    assert!(is_fundamental(db, TypeId::VOID));
    assert!(is_compound(db, db.pointer(TypeId::INT)));
    assert!(is_member_pointer(db, db.member_pointer(f.class, TypeId::INT)));
    assert!(is_reference(db, db.rvalue_reference(f.class)));
}

#[test]
fn test_referenceable() {
    let f = fixture();
    let db = &f.interner;
    assert!(!is_referenceable(db, TypeId::VOID));
    assert!(is_referenceable(db, TypeId::INT));
    assert!(is_referenceable(db, db.lvalue_reference(TypeId::INT)));
    let plain = db.function(FunctionShape::new(TypeId::VOID, vec![]));
    let abominable = db.function(
        FunctionShape::new(TypeId::VOID, vec![]).with_ref(RefQualifier::LValue),
    );
    assert!(is_referenceable(db, plain));
    assert!(!is_referenceable(db, abominable));
}

#[test]
fn test_const_and_volatile() {
    let f = fixture();
    let db = &f.interner;
    let const_int = db.qualified(TypeId::INT, CvQualifiers::CONST);
    assert!(is_const(db, const_int));
    assert!(!is_volatile(db, const_int));
    assert!(is_const(db, db.array(const_int, Some(3))));
    assert!(!is_const(db, db.lvalue_reference(const_int)));
    assert!(!is_const(db, db.pointer(const_int)));
    assert!(is_volatile(db, db.qualified(f.class, CvQualifiers::VOLATILE)));
}

#[test]
fn test_signed_and_unsigned() {
    let f = fixture();
    let db = &f.interner;
    assert!(is_signed(db, TypeId::INT));
    assert!(is_signed(db, TypeId::DOUBLE));
    assert!(!is_unsigned(db, TypeId::DOUBLE));
    assert!(is_unsigned(db, TypeId::BOOL));
    assert!(is_unsigned(db, db.qualified(TypeId::UNSIGNED_LONG, CvQualifiers::CONST)));
    assert!(!is_signed(db, f.color));
    assert!(!is_unsigned(db, f.color));
    assert!(!is_signed(db, db.pointer(TypeId::INT)));
}

#[test]
fn test_rank_and_extent() {
    let f = fixture();
    let db = &f.interner;
    let inner = db.array(TypeId::INT, Some(3));
    let matrix = db.array(inner, Some(2));
    let open = db.array(inner, None);
    assert_eq!(rank(db, TypeId::INT), 0);
    assert_eq!(rank(db, matrix), 2);
    assert_eq!(extent(db, matrix, 0), 2);
    assert_eq!(extent(db, matrix, 1), 3);
    assert_eq!(extent(db, matrix, 2), 0);
    assert_eq!(extent(db, open, 0), 0);
    assert_eq!(extent(db, open, 1), 3);
    assert!(is_bounded_array(db, matrix));
    assert!(is_unbounded_array(db, open));
    assert!(!is_bounded_array(db, open));
}

#[test]
fn test_is_same_is_identity() {
    let f = fixture();
    let db = &f.interner;
    let a = db.pointer(TypeId::INT);
    assert!(is_same(a, db.pointer(TypeId::INT)));
    assert!(!is_same(TypeId::INT, db.qualified(TypeId::INT, CvQualifiers::CONST)));
}
