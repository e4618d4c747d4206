use super::*;
use crate::types::{CvQualifiers, FunctionShape};
use std::io;
use std::sync::Mutex;

fn ask(solver: &TraitSolver<'_>, kind: TraitKind, ty: TypeId, args: &[TypeId]) -> TraitAnswer {
    solver
        .query(kind, ty, args)
        .unwrap_or_else(|err| panic!("{} rejected: {err}", kind.name()))
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn test_query_answers_each_kind_of_trait() {
    let db = TypeInterner::with_target(TargetInfo::lp64());
    let solver = TraitSolver::new(&db);
    let const_int = db.qualified(TypeId::INT, CvQualifiers::CONST);

    assert_eq!(ask(&solver, TraitKind::IsVoid, TypeId::VOID, &[]), TraitAnswer::Bool(true));
    assert_eq!(ask(&solver, TraitKind::IsConst, const_int, &[]), TraitAnswer::Bool(true));
    assert_eq!(
        ask(&solver, TraitKind::IsSame, TypeId::INT, &[const_int]),
        TraitAnswer::Bool(false)
    );
    assert_eq!(
        ask(&solver, TraitKind::RemoveConst, const_int, &[]),
        TraitAnswer::Type(TypeId::INT)
    );
    assert_eq!(
        ask(&solver, TraitKind::MakeUnsigned, TypeId::INT, &[]),
        TraitAnswer::Type(TypeId::UNSIGNED_INT)
    );
    assert_eq!(
        ask(&solver, TraitKind::SizeOf, TypeId::INT, &[]),
        TraitAnswer::Value(IntegralConstant::new(4, TypeId::UNSIGNED_LONG))
    );
    assert_eq!(ask(&solver, TraitKind::SizeOf, TypeId::VOID, &[]), TraitAnswer::Inapplicable);
    assert_eq!(ask(&solver, TraitKind::AlignmentOf, TypeId::DOUBLE, &[]).as_value(), Some(8));

    let matrix = db.array(db.array(TypeId::INT, Some(3)), Some(5));
    assert_eq!(ask(&solver, TraitKind::Rank, matrix, &[]).as_value(), Some(2));
    assert_eq!(ask(&solver, TraitKind::Extent(0), matrix, &[]).as_value(), Some(5));
    assert_eq!(ask(&solver, TraitKind::Extent(1), matrix, &[]).as_value(), Some(3));
    assert_eq!(ask(&solver, TraitKind::Extent(2), matrix, &[]).as_value(), Some(0));
}

#[test]
fn test_common_type_over_the_whole_pack() {
    let db = TypeInterner::new();
    let solver = TraitSolver::new(&db);
    assert_eq!(
        ask(&solver, TraitKind::CommonType, TypeId::INT, &[TypeId::LONG, TypeId::SHORT]),
        TraitAnswer::Type(TypeId::LONG)
    );
    assert_eq!(
        ask(&solver, TraitKind::CommonType, TypeId::INT, &[]),
        TraitAnswer::Type(TypeId::INT)
    );
    assert_eq!(
        ask(&solver, TraitKind::CommonType, TypeId::INT, &[db.pointer(TypeId::INT)]),
        TraitAnswer::Inapplicable
    );
}

#[test]
fn test_invocation_queries() {
    let db = TypeInterner::new();
    let solver = TraitSolver::new(&db);
    let halve = db.function(FunctionShape::new(TypeId::DOUBLE, vec![TypeId::INT]));
    let halve_ptr = db.pointer(halve);

    assert_eq!(
        ask(&solver, TraitKind::IsInvocable, halve_ptr, &[TypeId::INT]),
        TraitAnswer::Bool(true)
    );
    assert_eq!(ask(&solver, TraitKind::IsInvocable, halve_ptr, &[]), TraitAnswer::Bool(false));
    assert_eq!(
        ask(&solver, TraitKind::InvokeResult, halve_ptr, &[TypeId::INT]),
        TraitAnswer::Type(TypeId::DOUBLE)
    );
    assert_eq!(ask(&solver, TraitKind::InvokeResult, TypeId::INT, &[]), TraitAnswer::Inapplicable);

    // The queried type is the result; the callable leads the pack.
    assert_eq!(
        ask(&solver, TraitKind::IsInvocableR, TypeId::LONG, &[halve_ptr, TypeId::INT]),
        TraitAnswer::Bool(true)
    );
    assert_eq!(
        ask(&solver, TraitKind::IsInvocableR, TypeId::VOID, &[halve_ptr, TypeId::INT]),
        TraitAnswer::Bool(true)
    );
    assert_eq!(
        ask(&solver, TraitKind::IsInvocableR, db.pointer(TypeId::INT), &[halve_ptr, TypeId::INT]),
        TraitAnswer::Bool(false)
    );
    assert_eq!(
        ask(&solver, TraitKind::IsInvocableR, halve_ptr, &[TypeId::LONG, TypeId::INT]),
        TraitAnswer::Bool(false)
    );
}

#[test]
fn test_contract_violations_are_errors() {
    let db = TypeInterner::new();
    let solver = TraitSolver::new(&db);
    assert_eq!(
        solver.query(TraitKind::MakeSigned, TypeId::FLOAT, &[]),
        Err(TraitError::NotIntegral {
            trait_name: "make_signed",
            ty: "float".to_string()
        })
    );
    assert!(matches!(
        solver.query(TraitKind::MakeUnsigned, TypeId::BOOL, &[]),
        Err(TraitError::NotIntegral { trait_name: "make_unsigned", .. })
    ));
    assert_eq!(
        solver.query(TraitKind::UnderlyingType, TypeId::INT, &[]),
        Err(TraitError::NotEnum {
            ty: "int".to_string()
        })
    );
    assert_eq!(solver.cached_answers(), 0);
}

// =============================================================================
// Arity
// =============================================================================

#[test]
fn test_arity_checks() {
    let db = TypeInterner::new();
    let solver = TraitSolver::new(&db);

    let pack = vec![TypeId::INT; MAX_TRAIT_ARITY + 1];
    assert_eq!(
        solver.query(TraitKind::IsConstructible, TypeId::INT, &pack),
        Err(TraitError::ArityExceeded {
            trait_name: "is_constructible",
            given: 17,
            max: 16
        })
    );
    assert!(
        solver
            .query(TraitKind::IsConstructible, TypeId::INT, &pack[..MAX_TRAIT_ARITY])
            .is_ok()
    );

    assert_eq!(
        solver.query(TraitKind::IsVoid, TypeId::VOID, &[TypeId::INT]),
        Err(TraitError::ArityMismatch {
            trait_name: "is_void",
            expected: "exactly 0",
            given: 1
        })
    );
    assert_eq!(
        solver.query(TraitKind::IsSame, TypeId::INT, &[]),
        Err(TraitError::ArityMismatch {
            trait_name: "is_same",
            expected: "exactly 1",
            given: 0
        })
    );
    assert_eq!(
        solver.query(TraitKind::IsInvocableR, TypeId::INT, &[]),
        Err(TraitError::ArityMismatch {
            trait_name: "is_invocable_r",
            expected: "at least 1",
            given: 0
        })
    );
    assert_eq!(
        TraitKind::Extent(1).check_arity(1),
        Err(TraitError::ArityMismatch {
            trait_name: "extent",
            expected: "exactly 0",
            given: 1
        })
    );
    assert!(TraitKind::InvokeResult.check_arity(0).is_ok());
    assert!(TraitKind::IsNothrowInvocableR.check_arity(3).is_ok());
}

#[test]
fn arity_error_messages() {
    let err = TraitKind::IsAssignable.check_arity(2).unwrap_err();
    assert_eq!(err.to_string(), "is_assignable expects exactly 1 argument types, got 2");
    let err = TraitKind::CommonType.check_arity(20).unwrap_err();
    assert_eq!(err.to_string(), "common_type accepts at most 16 argument types, got 20");
}

// =============================================================================
// Memoization
// =============================================================================

#[test]
fn test_answers_are_memoized() {
    let db = TypeInterner::new();
    let solver = TraitSolver::new(&db);
    assert_eq!(solver.cached_answers(), 0);

    let first = ask(&solver, TraitKind::IsConvertible, TypeId::INT, &[TypeId::LONG]);
    assert_eq!(solver.cached_answers(), 1);
    let again = ask(&solver, TraitKind::IsConvertible, TypeId::INT, &[TypeId::LONG]);
    assert_eq!(first, again);
    assert_eq!(solver.cached_answers(), 1);

    // Argument order is part of the key.
    ask(&solver, TraitKind::IsConvertible, TypeId::LONG, &[TypeId::INT]);
    ask(&solver, TraitKind::IsNothrowConvertible, TypeId::INT, &[TypeId::LONG]);
    assert_eq!(solver.cached_answers(), 3);

    assert!(solver.query(TraitKind::IsSame, TypeId::INT, &[]).is_err());
    assert!(solver.query(TraitKind::MakeSigned, TypeId::DOUBLE, &[]).is_err());
    assert_eq!(solver.cached_answers(), 3);

    solver.clear_cache();
    assert_eq!(solver.cached_answers(), 0);
    assert_eq!(ask(&solver, TraitKind::IsConvertible, TypeId::INT, &[TypeId::LONG]), first);
}

#[test]
fn test_extent_dimension_is_part_of_the_key() {
    let db = TypeInterner::new();
    let solver = TraitSolver::new(&db);
    let grid = db.array(db.array(TypeId::CHAR, Some(2)), Some(7));
    assert_eq!(ask(&solver, TraitKind::Extent(0), grid, &[]).as_value(), Some(7));
    assert_eq!(ask(&solver, TraitKind::Extent(1), grid, &[]).as_value(), Some(2));
    assert_eq!(solver.cached_answers(), 2);
}

// =============================================================================
// Answers
// =============================================================================

#[test]
fn test_answer_accessors_and_display() {
    let value = TraitAnswer::Value(IntegralConstant::new(12, TypeId::UNSIGNED_LONG));
    assert_eq!(value.as_value(), Some(12));
    assert_eq!(value.as_bool(), None);
    assert_eq!(value.to_string(), "12");

    let yes = TraitAnswer::Bool(true);
    assert_eq!(yes.as_bool(), Some(true));
    assert_eq!(yes.as_type(), None);
    assert_eq!(yes.to_string(), "true");

    let ty = TraitAnswer::Type(TypeId::INT);
    assert_eq!(ty.as_type(), Some(TypeId::INT));
    assert_eq!(ty.to_string(), format!("type#{}", TypeId::INT.0));

    assert_eq!(TraitAnswer::Inapplicable.as_type(), None);
    assert_eq!(TraitAnswer::Inapplicable.to_string(), "inapplicable");
}

#[test]
fn trait_names_are_snake_case() {
    assert_eq!(TraitKind::IsVoid.name(), "is_void");
    assert_eq!(TraitKind::SizeOf.name(), "sizeof");
    assert_eq!(TraitKind::HasUniqueObjectRepresentations.name(), "has_unique_object_representations");
    assert_eq!(TraitKind::Extent(3).name(), "extent");
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_solver_config_defaults() {
    let config = SolverConfig::default();
    assert_eq!(config.target, TargetInfo::lp64());
    assert_eq!(config.capabilities, Capabilities::all());
    assert_eq!(SolverConfig::from_json("{}").expect("empty config"), config);
    assert!(SolverConfig::from_json("{\"target\": 3}").is_err());
}

#[test]
fn test_solver_config_round_trips_through_json() {
    let config = SolverConfig {
        target: TargetInfo::ilp32(),
        capabilities: Capabilities::none().with_features(Features::NOEXCEPT),
    };
    let text = serde_json::to_string(&config).expect("serializable");
    let parsed = SolverConfig::from_json(&text).expect("parses back");
    assert_eq!(parsed, config);

    let db = parsed.interner();
    assert_eq!(db.target(), &TargetInfo::ilp32());
    let solver = TraitSolver::with_config(&db, &parsed);
    assert!(solver.has_feature(Features::NOEXCEPT));
    assert!(!solver.has_feature(Features::INT128));
    assert!(!solver.has_builtin(Builtins::IS_EMPTY));
    assert_eq!(ask(&solver, TraitKind::SizeOf, db.pointer(TypeId::INT), &[]).as_value(), Some(4));
}

#[test]
fn test_config_for_another_target_keeps_the_database_model() {
    let db = TypeInterner::with_target(TargetInfo::llp64());
    let solver = TraitSolver::with_config(&db, &SolverConfig::default());
    assert_eq!(ask(&solver, TraitKind::SizeOf, TypeId::LONG, &[]).as_value(), Some(4));
}

// =============================================================================
// Capabilities
// =============================================================================

#[test]
fn test_fallbacks_agree_with_intrinsics() {
    let db = TypeInterner::new();
    let widget = db
        .struct_("Widget")
        .field("n", TypeId::INT)
        .finish()
        .expect("Widget is well-formed");
    let derived = db.struct_("Derived").base(widget).finish().expect("Derived is well-formed");
    let color = db.enumeration("Color", true, None, (0, 3));
    let bits = db.union("Bits").field("n", TypeId::INT).finish().expect("Bits is well-formed");

    let full = TraitSolver::new(&db);
    let legacy = TraitSolver::with_capabilities(&db, Capabilities::none().with_features(Features::all()));
    let queries: Vec<(TraitKind, TypeId, Vec<TypeId>)> = vec![
        (TraitKind::IsClass, widget, vec![]),
        (TraitKind::IsClass, bits, vec![]),
        (TraitKind::IsUnion, bits, vec![]),
        (TraitKind::IsEnum, color, vec![]),
        (TraitKind::IsEnum, TypeId::INT, vec![]),
        (TraitKind::IsBaseOf, widget, vec![derived]),
        (TraitKind::IsBaseOf, derived, vec![widget]),
        (TraitKind::IsConvertible, derived, vec![widget]),
        (TraitKind::IsConstructible, widget, vec![]),
        (TraitKind::IsConstructible, widget, vec![TypeId::INT]),
        (TraitKind::IsNothrowCopyConstructible, widget, vec![]),
        (TraitKind::IsCopyAssignable, widget, vec![]),
        (TraitKind::IsDestructible, widget, vec![]),
        (TraitKind::IsTriviallyDestructible, widget, vec![]),
        (TraitKind::IsSwappable, widget, vec![]),
        (TraitKind::IsFunction, db.function(FunctionShape::new(TypeId::VOID, vec![])), vec![]),
    ];
    for (kind, ty, args) in &queries {
        assert_eq!(
            full.query(*kind, *ty, args),
            legacy.query(*kind, *ty, args),
            "{} disagrees",
            kind.name()
        );
    }
}

// =============================================================================
// Tracing
// =============================================================================

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("capture lock poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_query_events_are_structured_json() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_env_filter(tracing_subscriber::EnvFilter::new("cxxtraits::query_json=trace"))
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let db = TypeInterner::new();
        let solver = TraitSolver::new(&db);
        let _ = solver.query(TraitKind::IsVoid, TypeId::VOID, &[]);
        let _ = solver.query(TraitKind::IsVoid, TypeId::VOID, &[]);
        let _ = solver.query(TraitKind::IsSame, TypeId::INT, &[]);
    });

    let bytes = captured.0.lock().expect("capture lock poisoned").clone();
    let text = String::from_utf8(bytes).expect("utf-8 output");
    let events: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("one JSON object per line"))
        .collect();
    let phases: Vec<&str> = events
        .iter()
        .filter_map(|event| event["fields"]["phase"].as_str())
        .collect();
    assert_eq!(phases, ["start", "end", "start", "end", "start", "rejected"]);

    let hits: Vec<bool> = events
        .iter()
        .filter_map(|event| event["fields"]["cache_hit"].as_bool())
        .collect();
    assert_eq!(hits, [false, true]);
    assert!(events.iter().all(|event| event["target"] == "cxxtraits::query_json"));
    assert_eq!(events[1]["fields"]["answer"], "true");
    assert_eq!(events[5]["fields"]["op"], "is_same");
}
