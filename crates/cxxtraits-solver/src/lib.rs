//! C++ Type-Trait Solver
//!
//! This crate evaluates the standard library's type traits over a modeled
//! C++ type system. It uses:
//!
//! - **Interned types**: `TypeId` equality is type identity; canonical forms
//!   (reference collapsing, cv on arrays, adjusted parameters) are built in
//! - **Declarations**: records with synthesized special members, enums
//! - **An expression engine**: `Sema` decides whether the expressions the
//!   classical trait formulations test would be well-formed
//! - **Capabilities**: every trait with a compiler intrinsic can also be
//!   answered through its portable fallback
//!
//! Entry points are `TraitSolver` (typed methods per trait and the
//! memoized `query`) and the free functions in `classify`, `transform`
//! and `layout`.
mod assignable;
pub mod capabilities;
pub mod class_hierarchy;
pub mod classify;
mod common_type;
pub mod constant;
mod constructible;
mod convertible;
mod db;
pub mod def;
mod destructible;
pub mod error;
pub mod expr;
mod format;
mod intern;
pub mod introspection;
mod invoke;
pub mod layout;
mod member_pointer;
mod properties;
mod query_trace;
mod record_builder;
pub mod recursion;
mod swappable;
mod trait_queries;
pub mod transform;
pub mod type_list;
pub mod type_queries;
pub mod types;

pub use capabilities::{Builtins, Capabilities, CapabilityOracle, Features};
pub use common_type::common_type;
pub use constant::{BoolConstant, FALSE_TYPE, IntegralConstant, TRUE_TYPE, TransformResult};
pub use db::TypeDatabase;
pub use def::{DeclarationStore, EnumDecl, FunctionDecl, RecordDecl, RecordKind};
pub use error::{TraitError, TraitResult};
pub use format::TypeFormatter;
pub use intern::TypeInterner;
pub use introspection::{DeclIntrospection, IntrospectionProvider, NoIntrospection};
pub use invoke::{Invocation, InvokeRule};
pub use member_pointer::{MemberPointerTraits, ReceiverQualifier};
pub use record_builder::RecordBuilder;
pub use trait_queries::{SolverConfig, TraitAnswer, TraitKind, TraitSolver};
pub use types::{
    Access, BuiltinKind, CvQualifiers, FunctionShape, RefQualifier, TypeData, TypeId,
    ValueCategory,
};
