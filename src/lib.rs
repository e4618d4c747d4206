//! C++ standard type traits over a modeled C++ type system.
//!
//! The solver lives in `cxxtraits-solver`; this crate re-exports it along
//! with the target data model from `cxxtraits-common` and wires up tracing.
//!
//! ```ignore
//! use cxxtraits::{TraitKind, TraitSolver, TypeId, TypeInterner};
//!
//! let db = TypeInterner::new();
//! let solver = TraitSolver::new(&db);
//! assert!(solver.is_convertible(TypeId::INT, TypeId::LONG));
//! let answer = solver.query(TraitKind::IsVoid, TypeId::VOID, &[])?;
//! ```

// Target data model and engine limits
pub use cxxtraits_common::limits;
pub use cxxtraits_common::{ScalarLayout, TargetInfo, TargetInfoError};

// The solver, in full and through its common entry points
pub use cxxtraits_solver as solver;
pub use cxxtraits_solver::{
    BoolConstant, Builtins, Capabilities, CapabilityOracle, CvQualifiers, DeclIntrospection,
    FALSE_TYPE, Features, FunctionDecl, FunctionShape, IntegralConstant, IntrospectionProvider,
    MemberPointerTraits, NoIntrospection, RecordBuilder, RecordKind, RefQualifier, SolverConfig,
    TRUE_TYPE, TraitAnswer, TraitError, TraitKind, TraitResult, TraitSolver, TypeDatabase,
    TypeFormatter, TypeId, TypeInterner, ValueCategory, common_type,
};

// Subscriber setup driven by CXXTRAITS_LOG / CXXTRAITS_LOG_FORMAT
pub mod tracing_config;
