//! Laws every trait answer must satisfy, checked over a spread of types.

use cxxtraits::solver::layout::aligned_storage;
use cxxtraits::solver::transform::{add_const, add_volatile, decay, remove_cv};
use cxxtraits::solver::InvokeRule;
use cxxtraits::{
    CvQualifiers, FunctionDecl, FunctionShape, TraitKind, TraitSolver, TypeId, TypeInterner,
    common_type,
};

const PRIMARY_CATEGORIES: [TraitKind; 14] = [
    TraitKind::IsVoid,
    TraitKind::IsNullPointer,
    TraitKind::IsIntegral,
    TraitKind::IsFloatingPoint,
    TraitKind::IsArray,
    TraitKind::IsPointer,
    TraitKind::IsLvalueReference,
    TraitKind::IsRvalueReference,
    TraitKind::IsMemberObjectPointer,
    TraitKind::IsMemberFunctionPointer,
    TraitKind::IsEnum,
    TraitKind::IsUnion,
    TraitKind::IsClass,
    TraitKind::IsFunction,
];

struct Zoo {
    db: TypeInterner,
    base: TypeId,
    derived: TypeId,
    plain: TypeId,
}

fn zoo() -> Zoo {
    let db = TypeInterner::new();
    let base = db
        .struct_("Base")
        .field("id", TypeId::INT)
        .finish()
        .expect("Base is well-formed");
    let derived = db
        .struct_("Derived")
        .base(base)
        .finish()
        .expect("Derived is well-formed");
    let plain = db
        .struct_("Plain")
        .field("x", TypeId::DOUBLE)
        .finish()
        .expect("Plain is well-formed");
    Zoo {
        db,
        base,
        derived,
        plain,
    }
}

/// One representative of every kind of type, with and without cv.
fn sample_types(zoo: &Zoo) -> Vec<TypeId> {
    let db = &zoo.db;
    let function = db.function(FunctionShape::new(TypeId::INT, vec![TypeId::DOUBLE]));
    let color = db.enumeration("Color", true, None, (0, 2));
    let bits = db
        .union("Bits")
        .field("n", TypeId::INT)
        .finish()
        .expect("Bits is well-formed");
    let mut types = vec![
        TypeId::VOID,
        TypeId::NULLPTR,
        TypeId::BOOL,
        TypeId::CHAR,
        TypeId::INT,
        TypeId::UNSIGNED_LONG,
        TypeId::DOUBLE,
        db.array(TypeId::INT, Some(4)),
        db.array(TypeId::CHAR, None),
        db.pointer(TypeId::INT),
        db.pointer(function),
        db.lvalue_reference(TypeId::INT),
        db.rvalue_reference(zoo.plain),
        db.lvalue_reference(function),
        db.member_pointer(zoo.base, TypeId::INT),
        db.member_pointer(zoo.base, function),
        color,
        bits,
        zoo.base,
        zoo.derived,
        function,
    ];
    let qualified: Vec<TypeId> = types
        .iter()
        .map(|ty| db.qualified(*ty, CvQualifiers::CONST | CvQualifiers::VOLATILE))
        .collect();
    types.extend(qualified);
    types
}

#[test]
fn exactly_one_primary_category_holds() {
    let zoo = zoo();
    let solver = TraitSolver::new(&zoo.db);
    for ty in sample_types(&zoo) {
        let holding: Vec<&str> = PRIMARY_CATEGORIES
            .iter()
            .filter(|kind| {
                solver.query(**kind, ty, &[]).expect("unary").as_bool() == Some(true)
            })
            .map(|kind| kind.name())
            .collect();
        assert_eq!(holding.len(), 1, "type#{} is {holding:?}", ty.0);
    }
}

#[test]
fn stripping_cv_undoes_adding_it() {
    let zoo = zoo();
    let db = &zoo.db;
    for ty in sample_types(&zoo) {
        assert_eq!(remove_cv(db, add_const(db, add_volatile(db, ty))), remove_cv(db, ty));
    }
}

#[test]
fn decay_is_idempotent() {
    let zoo = zoo();
    let db = &zoo.db;
    for ty in sample_types(&zoo) {
        let once = decay(db, ty);
        assert_eq!(decay(db, once), once, "type#{}", ty.0);
    }
}

#[test]
fn unary_common_type_is_the_decayed_type() {
    let zoo = zoo();
    let db = &zoo.db;
    for ty in sample_types(&zoo) {
        assert_eq!(common_type(db, &[ty]), Some(decay(db, ty)), "type#{}", ty.0);
        assert_eq!(common_type(db, &[ty, ty]), common_type(db, &[ty]), "type#{}", ty.0);
    }
}

#[test]
fn references_never_bind_down_the_hierarchy() {
    let zoo = zoo();
    let db = &zoo.db;
    let solver = TraitSolver::new(db);
    let base_ref = db.lvalue_reference(zoo.base);
    let derived_ref = db.lvalue_reference(zoo.derived);

    assert!(solver.is_constructible(base_ref, &[derived_ref]));
    assert!(!solver.is_constructible(derived_ref, &[base_ref]));
    assert!(!solver.is_constructible(db.rvalue_reference(zoo.derived), &[base_ref]));
}

#[test]
fn rvalue_references_do_not_bind_to_lvalues() {
    let zoo = zoo();
    let db = &zoo.db;
    let solver = TraitSolver::new(db);
    let plain_ref = db.lvalue_reference(zoo.plain);
    let const_plain_ref = db.lvalue_reference(db.qualified(zoo.plain, CvQualifiers::CONST));

    assert!(!solver.is_constructible(db.rvalue_reference(zoo.plain), &[plain_ref]));
    assert!(solver.is_constructible(const_plain_ref, &[plain_ref]));
    assert!(solver.is_constructible(db.rvalue_reference(zoo.plain), &[zoo.plain]));
}

#[test]
fn derived_objects_take_priority_over_wrapping() {
    let zoo = zoo();
    let db = &zoo.db;
    let hybrid = db
        .struct_("Hybrid")
        .base(zoo.base)
        .wraps(zoo.base)
        .finish()
        .expect("Hybrid is well-formed");
    let getter = db.member_pointer(
        zoo.base,
        db.function(FunctionShape::new(TypeId::INT, vec![TypeId::INT]).with_cv(CvQualifiers::CONST)),
    );
    let solver = TraitSolver::new(db);

    for object in [hybrid, db.lvalue_reference(hybrid), db.rvalue_reference(hybrid)] {
        let invocation = solver
            .invoke(getter, &[object, TypeId::INT])
            .expect("callable through the base");
        assert_eq!(invocation.rule, InvokeRule::MemberFunctionOnObject);
        assert_eq!(invocation.result, TypeId::INT);
    }
}

#[test]
fn aligned_storage_honours_every_alignment() {
    let db = TypeInterner::new();
    let mut align = 1;
    while align <= 8192 {
        for len in [1, 3, 64, 100, 9000] {
            let storage = aligned_storage(&db, len, Some(align)).expect("valid alignment");
            assert_eq!(storage.align, align);
            assert!(storage.size >= len);
            assert_eq!(storage.size % align, 0, "len {len} align {align}");
        }
        align *= 2;
    }
}

#[test]
fn arrays_of_unknown_bound_are_never_default_constructible() {
    let zoo = zoo();
    let db = &zoo.db;
    let empty = db.struct_("Empty").finish().expect("Empty is well-formed");
    let solver = TraitSolver::new(db);
    for element in [TypeId::INT, TypeId::DOUBLE, db.pointer(TypeId::CHAR), empty, zoo.plain, zoo.base] {
        assert!(solver.is_default_constructible(element));
        let unbounded = db.array(element, None);
        assert!(!solver.is_default_constructible(unbounded));
        assert!(!solver.is_trivially_default_constructible(unbounded));
        assert!(!solver.is_nothrow_default_constructible(unbounded));
    }
}

#[test]
fn nothrow_construction_implies_construction() {
    let zoo = zoo();
    let db = &zoo.db;
    let quiet = db
        .struct_("Quiet")
        .constructor(FunctionDecl::new(vec![TypeId::INT]).noexcept())
        .constructor(FunctionDecl::new(vec![TypeId::DOUBLE]).noexcept().deleted())
        .finish()
        .expect("Quiet is well-formed");
    let solver = TraitSolver::new(db);

    let mut targets = sample_types(&zoo);
    targets.push(quiet);
    let packs: Vec<Vec<TypeId>> = vec![
        vec![],
        vec![TypeId::INT],
        vec![TypeId::DOUBLE],
        vec![db.lvalue_reference(zoo.derived)],
        vec![TypeId::INT, TypeId::INT],
    ];
    for ty in &targets {
        for args in &packs {
            if solver.is_nothrow_constructible(*ty, args) {
                assert!(solver.is_constructible(*ty, args), "type#{} from {args:?}", ty.0);
            }
        }
    }
    assert!(!solver.is_constructible(quiet, &[TypeId::DOUBLE]));
    assert!(!solver.is_nothrow_constructible(quiet, &[TypeId::DOUBLE]));
}
