use super::*;
use crate::TypeInterner;
use crate::types::{CvQualifiers, FunctionShape};

fn fmt(db: &TypeInterner, ty: TypeId) -> String {
    TypeFormatter::new(db).format(ty)
}

#[test]
fn test_format_fundamentals() {
    let db = TypeInterner::new();
    assert_eq!(fmt(&db, TypeId::VOID), "void");
    assert_eq!(fmt(&db, TypeId::NULLPTR), "std::nullptr_t");
    assert_eq!(fmt(&db, TypeId::UNSIGNED_LONG_LONG), "unsigned long long");
    assert_eq!(fmt(&db, TypeId::WCHAR), "wchar_t");
}

#[test]
fn test_format_qualified_and_pointers() {
    let db = TypeInterner::new();
    let const_int = db.qualified(TypeId::INT, CvQualifiers::CONST);
    assert_eq!(fmt(&db, const_int), "const int");
    assert_eq!(fmt(&db, db.pointer(const_int)), "const int*");
    assert_eq!(
        fmt(&db, db.qualified(db.pointer(TypeId::INT), CvQualifiers::CONST)),
        "int* const"
    );
    assert_eq!(fmt(&db, db.pointer(db.pointer(TypeId::CHAR))), "char**");
}

#[test]
fn test_format_references() {
    let db = TypeInterner::new();
    assert_eq!(fmt(&db, db.lvalue_reference(TypeId::INT)), "int&");
    assert_eq!(fmt(&db, db.rvalue_reference(TypeId::DOUBLE)), "double&&");
    let const_int = db.qualified(TypeId::INT, CvQualifiers::CONST);
    assert_eq!(fmt(&db, db.lvalue_reference(const_int)), "const int&");
}

#[test]
fn test_format_arrays() {
    let db = TypeInterner::new();
    let row = db.array(TypeId::INT, Some(3));
    assert_eq!(fmt(&db, row), "int[3]");
    assert_eq!(fmt(&db, db.array(row, Some(2))), "int[2][3]");
    assert_eq!(fmt(&db, db.array(TypeId::INT, None)), "int[]");
    assert_eq!(fmt(&db, db.pointer(row)), "int (*)[3]");
    assert_eq!(fmt(&db, db.lvalue_reference(row)), "int (&)[3]");
}

#[test]
fn test_format_functions() {
    let db = TypeInterner::new();
    let callback = db.function(FunctionShape::new(TypeId::VOID, vec![TypeId::INT]));
    assert_eq!(fmt(&db, callback), "void(int)");
    assert_eq!(fmt(&db, db.pointer(callback)), "void (*)(int)");

    let printf = db.function(
        FunctionShape::new(TypeId::INT, vec![TypeId::DOUBLE])
            .variadic()
            .noexcept(),
    );
    assert_eq!(fmt(&db, printf), "int(double, ...) noexcept");
}

#[test]
fn test_format_member_pointers() {
    let db = TypeInterner::new();
    let widget = db.class("Widget").finish().expect("Widget is well-formed");
    assert_eq!(fmt(&db, widget), "Widget");
    assert_eq!(fmt(&db, db.member_pointer(widget, TypeId::INT)), "int Widget::*");

    let method = db.function(
        FunctionShape::new(TypeId::VOID, vec![])
            .with_cv(CvQualifiers::CONST)
            .with_ref(crate::types::RefQualifier::LValue),
    );
    assert_eq!(
        fmt(&db, db.member_pointer(widget, method)),
        "void (Widget::*)() const &"
    );
}

#[test]
fn test_format_enums_and_unknown_ids() {
    let db = TypeInterner::new();
    let color = db.enumeration("Color", true, None, (0, 2));
    assert_eq!(fmt(&db, color), "Color");
    assert_eq!(fmt(&db, TypeId(TypeId::FIRST_USER + 99_999)), format!("<type#{}>", TypeId::FIRST_USER + 99_999));
}
