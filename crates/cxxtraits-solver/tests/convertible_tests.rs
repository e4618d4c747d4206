use super::*;
use crate::TypeInterner;
use crate::capabilities::Capabilities;
use crate::def::FunctionDecl;
use crate::types::{Access, CvQualifiers, FunctionShape};

struct Fixture {
    db: TypeInterner,
    base: TypeId,
    derived: TypeId,
    hidden: TypeId,
    meters: TypeId,
    grams: TypeId,
    handle: TypeId,
    celsius: TypeId,
}

fn fixture() -> Fixture {
    let db = TypeInterner::new();
    let base = db.struct_("Base").field("x", TypeId::INT).finish().expect("Base is well-formed");
    let derived = db.struct_("Derived").base(base).finish().expect("Derived is well-formed");
    let hidden = db
        .struct_("Hidden")
        .base_with(base, Access::Private, false)
        .finish()
        .expect("Hidden is well-formed");
    let meters = db
        .struct_("Meters")
        .constructor(FunctionDecl::new(vec![TypeId::DOUBLE]))
        .finish()
        .expect("Meters is well-formed");
    let grams = db
        .struct_("Grams")
        .constructor(FunctionDecl::new(vec![TypeId::DOUBLE]).noexcept())
        .finish()
        .expect("Grams is well-formed");
    let handle = db
        .struct_("Handle")
        .constructor(FunctionDecl::new(vec![TypeId::INT]).explicit())
        .finish()
        .expect("Handle is well-formed");
    let celsius = db
        .struct_("Celsius")
        .conversion(FunctionDecl::new(vec![]).returning(TypeId::DOUBLE).with_cv(CvQualifiers::CONST))
        .finish()
        .expect("Celsius is well-formed");
    Fixture {
        db,
        base,
        derived,
        hidden,
        meters,
        grams,
        handle,
        celsius,
    }
}

fn solvers(db: &TypeInterner) -> [TraitSolver<'_>; 2] {
    [
        TraitSolver::new(db),
        TraitSolver::with_capabilities(db, Capabilities::none().with_features(Features::all())),
    ]
}

#[test]
fn test_fundamental_conversions() {
    let f = fixture();
    let db = &f.db;
    let int_ref = db.lvalue_reference(TypeId::INT);
    let const_int_ref = db.lvalue_reference(db.qualified(TypeId::INT, CvQualifiers::CONST));
    for solver in solvers(db) {
        assert!(solver.is_convertible(TypeId::INT, TypeId::LONG));
        assert!(solver.is_convertible(TypeId::DOUBLE, TypeId::BOOL));
        assert!(solver.is_convertible(int_ref, int_ref));
        assert!(solver.is_convertible(TypeId::INT, const_int_ref));
        assert!(solver.is_convertible(TypeId::NULLPTR, db.pointer(TypeId::CHAR)));
        assert!(!solver.is_convertible(TypeId::INT, int_ref));
        assert!(!solver.is_convertible(db.pointer(TypeId::INT), TypeId::INT));
        assert!(!solver.is_convertible(
            db.pointer(db.qualified(TypeId::INT, CvQualifiers::CONST)),
            db.pointer(TypeId::INT)
        ));
    }
}

#[test]
fn test_degenerate_endpoints() {
    let f = fixture();
    let db = &f.db;
    let array = db.array(TypeId::INT, Some(3));
    let function = db.function(FunctionShape::new(TypeId::INT, vec![TypeId::INT]));
    for solver in solvers(db) {
        assert!(solver.is_convertible(TypeId::VOID, TypeId::VOID));
        assert!(solver.is_convertible(TypeId::VOID, db.qualified(TypeId::VOID, CvQualifiers::CONST)));
        assert!(!solver.is_convertible(TypeId::VOID, TypeId::INT));
        assert!(!solver.is_convertible(TypeId::INT, TypeId::VOID));

        // Arrays and functions decay as sources but are never targets.
        assert!(solver.is_convertible(array, db.pointer(TypeId::INT)));
        assert!(solver.is_convertible(function, db.pointer(function)));
        assert!(!solver.is_convertible(TypeId::INT, array));
        assert!(!solver.is_convertible(array, array));
        assert!(!solver.is_convertible(function, function));
        assert!(solver.is_convertible(function, db.lvalue_reference(function)));
    }
}

#[test]
fn test_class_conversions() {
    let f = fixture();
    let db = &f.db;
    let base_ptr = db.pointer(f.base);
    let derived_ptr = db.pointer(f.derived);
    for solver in solvers(db) {
        assert!(solver.is_convertible(derived_ptr, base_ptr));
        assert!(solver.is_convertible(derived_ptr, db.pointer(TypeId::VOID)));
        assert!(!solver.is_convertible(base_ptr, derived_ptr));
        assert!(!solver.is_convertible(db.pointer(f.hidden), base_ptr));

        assert!(solver.is_convertible(f.derived, f.base));
        assert!(solver.is_convertible(db.lvalue_reference(f.derived), db.lvalue_reference(f.base)));
        assert!(!solver.is_convertible(f.base, f.derived));
        assert!(!solver.is_convertible(f.hidden, f.base));

        assert!(solver.is_convertible(TypeId::DOUBLE, f.meters));
        assert!(solver.is_convertible(TypeId::INT, f.meters));
        assert!(!solver.is_convertible(f.meters, TypeId::DOUBLE));
        assert!(solver.is_convertible(f.celsius, TypeId::DOUBLE));
        assert!(solver.is_convertible(f.celsius, TypeId::INT));

        // Explicit constructors only take part in direct-initialization.
        assert!(!solver.is_convertible(TypeId::INT, f.handle));
        assert!(solver.is_constructible(f.handle, &[TypeId::INT]));
    }
}

#[test]
fn test_nothrow_convertible() {
    let f = fixture();
    let db = &f.db;
    for solver in solvers(db) {
        assert!(solver.is_nothrow_convertible(TypeId::INT, TypeId::LONG));
        assert!(solver.is_nothrow_convertible(TypeId::VOID, TypeId::VOID));
        assert!(solver.is_nothrow_convertible(f.derived, f.base));
        assert!(solver.is_nothrow_convertible(TypeId::DOUBLE, f.grams));
        assert!(!solver.is_nothrow_convertible(TypeId::DOUBLE, f.meters));
        assert!(!solver.is_nothrow_convertible(f.celsius, TypeId::DOUBLE));
        assert!(!solver.is_nothrow_convertible(TypeId::INT, TypeId::VOID));
    }
}

#[test]
fn test_nothrow_convertible_without_noexcept() {
    let f = fixture();
    let db = &f.db;
    let solver = TraitSolver::with_capabilities(db, Capabilities::none());
    assert!(solver.is_nothrow_convertible(TypeId::INT, TypeId::LONG));
    assert!(solver.is_nothrow_convertible(
        TypeId::INT,
        db.lvalue_reference(db.qualified(TypeId::INT, CvQualifiers::CONST))
    ));
    assert!(solver.is_nothrow_convertible(TypeId::VOID, TypeId::VOID));
    assert!(solver.is_convertible(TypeId::DOUBLE, f.grams));
    assert!(!solver.is_nothrow_convertible(TypeId::DOUBLE, f.grams));
}
