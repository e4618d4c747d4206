use super::*;
use crate::TypeInterner;
use crate::capabilities::Capabilities;

fn method(db: &TypeInterner, class: TypeId, shape: FunctionShape) -> TypeId {
    db.member_pointer(class, db.function(shape))
}

#[test]
fn test_const_lvalue_member_function() {
    let db = TypeInterner::new();
    let widget = db.struct_("Widget").finish().expect("Widget is well-formed");
    let pmf = method(
        &db,
        widget,
        FunctionShape::new(TypeId::INT, vec![TypeId::DOUBLE, TypeId::CHAR])
            .with_cv(CvQualifiers::CONST)
            .with_ref(RefQualifier::LValue),
    );

    let traits = TraitSolver::new(&db)
        .member_pointer_traits(pmf)
        .expect("pointer to member function");
    assert_eq!(traits.qualifier, ReceiverQualifier::ConstLValue);
    assert_eq!(traits.class_type, db.lvalue_reference(db.qualified(widget, CvQualifiers::CONST)));
    assert_eq!(traits.return_type, TypeId::INT);
    assert_eq!(traits.params, vec![TypeId::DOUBLE, TypeId::CHAR]);
    assert_eq!(
        traits.signature,
        db.function(FunctionShape::new(TypeId::INT, vec![TypeId::DOUBLE, TypeId::CHAR]))
    );
    assert!(!traits.variadic);
}

#[test]
fn test_every_receiver_qualifier() {
    let db = TypeInterner::new();
    let widget = db.struct_("Widget").finish().expect("Widget is well-formed");
    let solver = TraitSolver::new(&db);
    for qualifier in ReceiverQualifier::ALL {
        assert_eq!(ReceiverQualifier::from_parts(qualifier.cv(), qualifier.ref_qualifier()), qualifier);

        let pmf = method(
            &db,
            widget,
            FunctionShape::new(TypeId::VOID, vec![])
                .with_cv(qualifier.cv())
                .with_ref(qualifier.ref_qualifier()),
        );
        let traits = solver.member_pointer_traits(pmf).expect("pointer to member function");
        assert_eq!(traits.qualifier, qualifier);

        let receiver = db.qualified(widget, qualifier.cv());
        let expected = match qualifier.ref_qualifier() {
            RefQualifier::None => receiver,
            RefQualifier::LValue => db.lvalue_reference(receiver),
            RefQualifier::RValue => db.rvalue_reference(receiver),
        };
        assert_eq!(traits.class_type, expected, "{qualifier:?}");
        assert_eq!(traits.signature, db.function(FunctionShape::new(TypeId::VOID, vec![])));
    }
}

#[test]
fn test_not_a_member_function_pointer() {
    let db = TypeInterner::new();
    let widget = db.struct_("Widget").finish().expect("Widget is well-formed");
    let solver = TraitSolver::new(&db);
    let function = db.function(FunctionShape::new(TypeId::INT, vec![]));
    assert_eq!(solver.member_pointer_traits(TypeId::INT), None);
    assert_eq!(solver.member_pointer_traits(db.member_pointer(widget, TypeId::INT)), None);
    assert_eq!(solver.member_pointer_traits(function), None);
    assert_eq!(solver.member_pointer_traits(db.pointer(function)), None);
}

#[test]
fn test_ref_qualified_requires_language_support() {
    let db = TypeInterner::new();
    let widget = db.struct_("Widget").finish().expect("Widget is well-formed");
    let solver = TraitSolver::with_capabilities(&db, Capabilities::none());
    let plain = method(&db, widget, FunctionShape::new(TypeId::INT, vec![]).with_cv(CvQualifiers::VOLATILE));
    let rvalue = method(&db, widget, FunctionShape::new(TypeId::INT, vec![]).with_ref(RefQualifier::RValue));

    let traits = solver.member_pointer_traits(plain).expect("unqualified receiver");
    assert_eq!(traits.qualifier, ReceiverQualifier::Volatile);
    assert_eq!(traits.class_type, db.qualified(widget, CvQualifiers::VOLATILE));
    assert_eq!(solver.member_pointer_traits(rvalue), None);
}

#[test]
fn test_signature_keeps_noexcept_and_ellipsis() {
    let db = TypeInterner::new();
    let widget = db.struct_("Widget").finish().expect("Widget is well-formed");
    let solver = TraitSolver::new(&db);

    let quiet = method(
        &db,
        widget,
        FunctionShape::new(TypeId::INT, vec![TypeId::DOUBLE])
            .with_cv(CvQualifiers::CONST)
            .noexcept(),
    );
    let traits = solver.member_pointer_traits(quiet).expect("pointer to member function");
    assert_eq!(
        traits.signature,
        db.function(FunctionShape::new(TypeId::INT, vec![TypeId::DOUBLE]).noexcept())
    );

    let log = method(&db, widget, FunctionShape::new(TypeId::VOID, vec![TypeId::INT]).variadic());
    let traits = solver.member_pointer_traits(log).expect("pointer to member function");
    assert!(traits.variadic);
    assert_eq!(traits.qualifier, ReceiverQualifier::None);
    assert_eq!(traits.class_type, widget);
    assert_eq!(
        traits.signature,
        db.function(FunctionShape::new(TypeId::VOID, vec![TypeId::INT]).variadic())
    );
}
