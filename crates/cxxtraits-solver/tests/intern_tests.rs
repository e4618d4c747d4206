use super::*;

#[test]
fn test_intrinsic_types_are_not_stored() {
    let interner = TypeInterner::new();
    assert!(interner.is_empty());
    assert_eq!(interner.intern(TypeData::Void), TypeId::VOID);
    assert_eq!(interner.intern(TypeData::NullPtr), TypeId::NULLPTR);
    assert_eq!(interner.builtin(BuiltinKind::Int), TypeId::INT);
    assert_eq!(interner.lookup(TypeId::DOUBLE), Some(TypeData::Builtin(BuiltinKind::Double)));
    assert!(interner.is_empty());
}

#[test]
fn test_interning_deduplicates() {
    let interner = TypeInterner::new();
    let a = interner.pointer(TypeId::INT);
    let b = interner.pointer(TypeId::INT);
    assert_eq!(a, b);
    assert_eq!(interner.len(), 1);
    assert_eq!(interner.lookup(a), Some(TypeData::Pointer(TypeId::INT)));
    assert_ne!(interner.pointer(TypeId::LONG), a);
}

#[test]
fn test_lookup_of_unknown_id() {
    let interner = TypeInterner::new();
    assert_eq!(interner.lookup(TypeId(TypeId::FIRST_USER + 12345)), None);
    assert_eq!(interner.lookup(TypeId(0)), None);
}

#[test]
fn test_qualifications_merge() {
    let interner = TypeInterner::new();
    let c = interner.qualified(TypeId::INT, CvQualifiers::CONST);
    let cv = interner.qualified(c, CvQualifiers::VOLATILE);
    let direct = interner.qualified(TypeId::INT, CvQualifiers::CONST | CvQualifiers::VOLATILE);
    assert_eq!(cv, direct);
    assert_eq!(interner.qualified(c, CvQualifiers::CONST), c);
    assert_eq!(interner.qualified(TypeId::INT, CvQualifiers::empty()), TypeId::INT);
    assert_eq!(
        interner.lookup(direct),
        Some(TypeData::Qualified(TypeId::INT, CvQualifiers::CONST | CvQualifiers::VOLATILE))
    );
}

#[test]
fn test_cv_on_array_moves_to_element() {
    let interner = TypeInterner::new();
    let array = interner.array(TypeId::INT, Some(4));
    let const_array = interner.qualified(array, CvQualifiers::CONST);
    let const_int = interner.qualified(TypeId::INT, CvQualifiers::CONST);
    assert_eq!(const_array, interner.array(const_int, Some(4)));
}

#[test]
fn test_cv_on_reference_and_function_is_dropped() {
    let interner = TypeInterner::new();
    let reference = interner.lvalue_reference(TypeId::INT);
    assert_eq!(interner.qualified(reference, CvQualifiers::CONST), reference);
    let function = interner.function(FunctionShape::new(TypeId::VOID, vec![]));
    assert_eq!(interner.qualified(function, CvQualifiers::VOLATILE), function);
}

#[test]
fn test_reference_collapsing() {
    let interner = TypeInterner::new();
    let lref = interner.lvalue_reference(TypeId::INT);
    let rref = interner.rvalue_reference(TypeId::INT);
    assert_eq!(interner.lvalue_reference(lref), lref);
    assert_eq!(interner.lvalue_reference(rref), lref);
    assert_eq!(interner.rvalue_reference(lref), lref);
    assert_eq!(interner.rvalue_reference(rref), rref);
}

#[test]
fn test_function_parameters_are_adjusted() {
    let interner = TypeInterner::new();
    let const_int = interner.qualified(TypeId::INT, CvQualifiers::CONST);
    let array = interner.array(TypeId::CHAR, Some(8));
    let callback = interner.function(FunctionShape::new(TypeId::VOID, vec![]));

    let declared = interner.function(FunctionShape::new(
        TypeId::VOID,
        vec![const_int, array, callback],
    ));
    let adjusted = interner.function(FunctionShape::new(
        TypeId::VOID,
        vec![
            TypeId::INT,
            interner.pointer(TypeId::CHAR),
            interner.pointer(callback),
        ],
    ));
    assert_eq!(declared, adjusted);
}

#[test]
fn test_function_shape_lookup() {
    let interner = TypeInterner::new();
    let f = interner.function(FunctionShape::new(TypeId::INT, vec![TypeId::DOUBLE]).noexcept());
    let Some(TypeData::Function(shape_id)) = interner.lookup(f) else {
        panic!("expected a function type");
    };
    let shape = interner.function_shape(shape_id).expect("shape exists");
    assert_eq!(shape.ret, TypeId::INT);
    assert_eq!(shape.params, vec![TypeId::DOUBLE]);
    assert!(shape.noexcept);

    let throwing = interner.function(FunctionShape::new(TypeId::INT, vec![TypeId::DOUBLE]));
    assert_ne!(f, throwing);
}

#[test]
fn test_records_are_nominal() {
    let interner = TypeInterner::new();
    let a = interner.struct_("A").finish().expect("A is well-formed");
    let b = interner.struct_("A").finish().expect("second A is well-formed");
    assert_ne!(a, b);

    let Some(TypeData::Record(id)) = interner.lookup(a) else {
        panic!("expected a record type");
    };
    let decl = interner.record_decl(id).expect("declaration exists");
    assert!(decl.complete);
    assert_eq!(&*interner.resolve_atom(decl.name), "A");
}

#[test]
fn test_incomplete_record() {
    let interner = TypeInterner::new();
    let fwd = interner.incomplete_record("Fwd", RecordKind::Class);
    let Some(TypeData::Record(id)) = interner.lookup(fwd) else {
        panic!("expected a record type");
    };
    let decl = interner.record_decl(id).expect("declaration exists");
    assert!(!decl.complete);
}

#[test]
fn test_enumeration_declaration() {
    let interner = TypeInterner::new();
    let color = interner.enumeration("Color", true, Some(TypeId::UNSIGNED_CHAR), (0, 2));
    let Some(TypeData::Enum(id)) = interner.lookup(color) else {
        panic!("expected an enum type");
    };
    let decl = interner.enum_decl(id).expect("declaration exists");
    assert!(decl.scoped);
    assert_eq!(decl.fixed_underlying, Some(TypeId::UNSIGNED_CHAR));
    assert_eq!((decl.min_value, decl.max_value), (0, 2));
}

#[test]
fn test_concurrent_interning_agrees() {
    let interner = TypeInterner::new();
    let ids: Vec<TypeId> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| interner.pointer(interner.pointer(TypeId::LONG))))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread panicked"))
            .collect()
    });
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(interner.len(), 2);
}
