//! Queries from many threads against one interner and one solver.

use cxxtraits::{
    Capabilities, CvQualifiers, FunctionDecl, FunctionShape, TraitAnswer, TraitKind, TraitSolver,
    TypeId, TypeInterner,
};
use rayon::prelude::*;

type Query = (TraitKind, TypeId, Vec<TypeId>);

fn workload(db: &TypeInterner) -> Vec<Query> {
    let base = db
        .struct_("Base")
        .virtual_destructor()
        .field("id", TypeId::INT)
        .finish()
        .expect("Base is well-formed");
    let derived = db
        .struct_("Derived")
        .base(base)
        .constructor(FunctionDecl::new(vec![TypeId::INT]).noexcept())
        .finish()
        .expect("Derived is well-formed");
    let callback = db.pointer(db.function(FunctionShape::new(TypeId::LONG, vec![TypeId::INT])));
    let const_base_ref = db.lvalue_reference(db.qualified(base, CvQualifiers::CONST));

    let mut queries = Vec::new();
    for ty in [TypeId::INT, TypeId::DOUBLE, db.pointer(TypeId::CHAR), base, derived, const_base_ref] {
        for kind in [
            TraitKind::IsClass,
            TraitKind::IsScalar,
            TraitKind::IsPolymorphic,
            TraitKind::Decay,
            TraitKind::RemoveCvref,
            TraitKind::SizeOf,
            TraitKind::IsDestructible,
            TraitKind::IsCopyConstructible,
            TraitKind::IsNothrowMoveAssignable,
            TraitKind::IsSwappable,
        ] {
            queries.push((kind, ty, vec![]));
        }
        queries.push((TraitKind::IsConvertible, ty, vec![const_base_ref]));
        queries.push((TraitKind::IsConstructible, ty, vec![TypeId::INT]));
        queries.push((TraitKind::CommonType, ty, vec![TypeId::LONG]));
    }
    queries.push((TraitKind::IsBaseOf, base, vec![derived]));
    queries.push((TraitKind::IsInvocable, callback, vec![TypeId::SHORT]));
    queries.push((TraitKind::InvokeResult, callback, vec![TypeId::INT]));
    queries.push((TraitKind::IsInvocableR, TypeId::DOUBLE, vec![callback, TypeId::INT]));
    queries
}

fn answer(solver: &TraitSolver<'_>, query: &Query) -> TraitAnswer {
    let (kind, ty, args) = query;
    solver.query(*kind, *ty, args).expect("well-formed query")
}

#[test]
fn parallel_answers_match_sequential_answers() {
    let db = TypeInterner::new();
    let queries = workload(&db);

    let sequential: Vec<TraitAnswer> = {
        let solver = TraitSolver::new(&db);
        queries.iter().map(|query| answer(&solver, query)).collect()
    };

    let shared = TraitSolver::new(&db);
    let parallel: Vec<TraitAnswer> = queries.par_iter().map(|query| answer(&shared, query)).collect();
    assert_eq!(parallel, sequential);

    // A second pass hits the memo from every thread.
    let cached = shared.cached_answers();
    let again: Vec<TraitAnswer> = queries.par_iter().map(|query| answer(&shared, query)).collect();
    assert_eq!(again, sequential);
    assert_eq!(shared.cached_answers(), cached);
}

#[test]
fn reversed_order_gives_the_same_answers() {
    let db = TypeInterner::new();
    let queries = workload(&db);
    let forward = TraitSolver::new(&db);
    let backward = TraitSolver::new(&db);

    let expected: Vec<TraitAnswer> = queries.iter().map(|query| answer(&forward, query)).collect();
    let mut reversed: Vec<TraitAnswer> = queries.iter().rev().map(|query| answer(&backward, query)).collect();
    reversed.reverse();
    assert_eq!(reversed, expected);
}

#[test]
fn threads_can_intern_while_querying() {
    let db = TypeInterner::new();
    let solver = TraitSolver::with_capabilities(&db, Capabilities::none());

    let sizes: Vec<Option<u64>> = (1..=64u64)
        .into_par_iter()
        .map(|len| {
            let array = db.array(TypeId::INT, Some(len));
            let pointer = db.pointer(array);
            assert_eq!(
                solver.query(TraitKind::RemovePointer, pointer, &[]),
                Ok(TraitAnswer::Type(array))
            );
            solver
                .query(TraitKind::SizeOf, array, &[])
                .expect("unary")
                .as_value()
        })
        .collect();
    let expected: Vec<Option<u64>> = (1..=64u64).map(|len| Some(len * 4)).collect();
    assert_eq!(sizes, expected);
}
