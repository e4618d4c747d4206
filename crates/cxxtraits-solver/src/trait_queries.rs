//! Query entry points.
//!
//! `TraitSolver` binds a `TypeDatabase` to a capability oracle and an
//! introspection provider. Each trait family adds its methods in its own
//! module (`properties`, `convertible`, `constructible`, `assignable`,
//! `destructible`, `swappable`, `invoke`); this module holds the solver
//! itself, path selection between intrinsic and fallback, and the
//! memoized `query` dispatcher used by embedders that name traits at
//! runtime.

use crate::TypeDatabase;
use crate::capabilities::{Builtins, Capabilities, CapabilityOracle, Features};
use crate::classify;
use crate::common_type::common_type;
use crate::constant::IntegralConstant;
use crate::error::{TraitError, TraitResult};
use crate::expr::Sema;
use crate::intern::TypeInterner;
use crate::introspection::{DeclIntrospection, IntrospectionProvider};
use crate::layout;
use crate::query_trace;
use crate::transform;
use crate::types::TypeId;
use cxxtraits_common::TargetInfo;
use cxxtraits_common::limits::MAX_TRAIT_ARITY;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

// =============================================================================
// Configuration
// =============================================================================

/// Target data model and capabilities of one solver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub target: TargetInfo,
    pub capabilities: Capabilities,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            target: TargetInfo::lp64(),
            capabilities: Capabilities::all(),
        }
    }
}

impl SolverConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// A fresh interner for the configured target.
    pub fn interner(&self) -> TypeInterner {
        TypeInterner::with_target(self.target.clone())
    }
}

// =============================================================================
// Trait kinds and answers
// =============================================================================

/// Every trait `TraitSolver::query` can evaluate.
///
/// The queried type is the first operand; `args` carries the rest: the
/// target of `is_convertible`, the argument pack of `is_constructible`, the
/// callable's arguments of `is_invocable`, the callable followed by its
/// arguments for `is_invocable_r`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TraitKind {
    // Primary and composite categories
    IsVoid,
    IsNullPointer,
    IsIntegral,
    IsFloatingPoint,
    IsArray,
    IsPointer,
    IsLvalueReference,
    IsRvalueReference,
    IsMemberObjectPointer,
    IsMemberFunctionPointer,
    IsEnum,
    IsUnion,
    IsClass,
    IsFunction,
    IsArithmetic,
    IsFundamental,
    IsScalar,
    IsObject,
    IsCompound,
    IsReference,
    IsMemberPointer,
    IsReferenceable,
    IsConst,
    IsVolatile,
    IsSigned,
    IsUnsigned,
    IsBoundedArray,
    IsUnboundedArray,
    IsSame,
    Rank,
    Extent(u32),
    SizeOf,
    AlignmentOf,

    // Transformations
    AddConst,
    AddVolatile,
    AddCv,
    RemoveConst,
    RemoveVolatile,
    RemoveCv,
    AddLvalueReference,
    AddRvalueReference,
    RemoveReference,
    RemoveCvref,
    AddPointer,
    RemovePointer,
    RemoveExtent,
    RemoveAllExtents,
    Decay,
    TypeIdentity,
    MakeSigned,
    MakeUnsigned,
    UnderlyingType,
    CommonType,

    // Properties
    IsBaseOf,
    IsEmpty,
    IsPolymorphic,
    IsAbstract,
    IsFinal,
    HasVirtualDestructor,
    IsTrivial,
    IsTriviallyCopyable,
    IsStandardLayout,
    IsPod,
    IsLiteralType,
    IsAggregate,
    HasUniqueObjectRepresentations,
    IsConvertible,
    IsNothrowConvertible,

    // Construction, assignment, destruction, swap
    IsConstructible,
    IsTriviallyConstructible,
    IsNothrowConstructible,
    IsDefaultConstructible,
    IsTriviallyDefaultConstructible,
    IsNothrowDefaultConstructible,
    IsCopyConstructible,
    IsTriviallyCopyConstructible,
    IsNothrowCopyConstructible,
    IsMoveConstructible,
    IsTriviallyMoveConstructible,
    IsNothrowMoveConstructible,
    IsAssignable,
    IsTriviallyAssignable,
    IsNothrowAssignable,
    IsCopyAssignable,
    IsTriviallyCopyAssignable,
    IsNothrowCopyAssignable,
    IsMoveAssignable,
    IsTriviallyMoveAssignable,
    IsNothrowMoveAssignable,
    IsDestructible,
    IsTriviallyDestructible,
    IsNothrowDestructible,
    IsSwappableWith,
    IsSwappable,
    IsNothrowSwappableWith,
    IsNothrowSwappable,

    // Invocation
    IsInvocable,
    IsInvocableR,
    IsNothrowInvocable,
    IsNothrowInvocableR,
    InvokeResult,
    ResultOf,
}

/// How many operands after the first a trait takes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Arity {
    Exact(usize),
    AtLeast(usize),
    Any,
}

impl TraitKind {
    pub fn name(self) -> &'static str {
        use TraitKind::*;
        match self {
            IsVoid => "is_void",
            IsNullPointer => "is_null_pointer",
            IsIntegral => "is_integral",
            IsFloatingPoint => "is_floating_point",
            IsArray => "is_array",
            IsPointer => "is_pointer",
            IsLvalueReference => "is_lvalue_reference",
            IsRvalueReference => "is_rvalue_reference",
            IsMemberObjectPointer => "is_member_object_pointer",
            IsMemberFunctionPointer => "is_member_function_pointer",
            IsEnum => "is_enum",
            IsUnion => "is_union",
            IsClass => "is_class",
            IsFunction => "is_function",
            IsArithmetic => "is_arithmetic",
            IsFundamental => "is_fundamental",
            IsScalar => "is_scalar",
            IsObject => "is_object",
            IsCompound => "is_compound",
            IsReference => "is_reference",
            IsMemberPointer => "is_member_pointer",
            IsReferenceable => "is_referenceable",
            IsConst => "is_const",
            IsVolatile => "is_volatile",
            IsSigned => "is_signed",
            IsUnsigned => "is_unsigned",
            IsBoundedArray => "is_bounded_array",
            IsUnboundedArray => "is_unbounded_array",
            IsSame => "is_same",
            Rank => "rank",
            Extent(_) => "extent",
            SizeOf => "sizeof",
            AlignmentOf => "alignment_of",
            AddConst => "add_const",
            AddVolatile => "add_volatile",
            AddCv => "add_cv",
            RemoveConst => "remove_const",
            RemoveVolatile => "remove_volatile",
            RemoveCv => "remove_cv",
            AddLvalueReference => "add_lvalue_reference",
            AddRvalueReference => "add_rvalue_reference",
            RemoveReference => "remove_reference",
            RemoveCvref => "remove_cvref",
            AddPointer => "add_pointer",
            RemovePointer => "remove_pointer",
            RemoveExtent => "remove_extent",
            RemoveAllExtents => "remove_all_extents",
            Decay => "decay",
            TypeIdentity => "type_identity",
            MakeSigned => "make_signed",
            MakeUnsigned => "make_unsigned",
            UnderlyingType => "underlying_type",
            CommonType => "common_type",
            IsBaseOf => "is_base_of",
            IsEmpty => "is_empty",
            IsPolymorphic => "is_polymorphic",
            IsAbstract => "is_abstract",
            IsFinal => "is_final",
            HasVirtualDestructor => "has_virtual_destructor",
            IsTrivial => "is_trivial",
            IsTriviallyCopyable => "is_trivially_copyable",
            IsStandardLayout => "is_standard_layout",
            IsPod => "is_pod",
            IsLiteralType => "is_literal_type",
            IsAggregate => "is_aggregate",
            HasUniqueObjectRepresentations => "has_unique_object_representations",
            IsConvertible => "is_convertible",
            IsNothrowConvertible => "is_nothrow_convertible",
            IsConstructible => "is_constructible",
            IsTriviallyConstructible => "is_trivially_constructible",
            IsNothrowConstructible => "is_nothrow_constructible",
            IsDefaultConstructible => "is_default_constructible",
            IsTriviallyDefaultConstructible => "is_trivially_default_constructible",
            IsNothrowDefaultConstructible => "is_nothrow_default_constructible",
            IsCopyConstructible => "is_copy_constructible",
            IsTriviallyCopyConstructible => "is_trivially_copy_constructible",
            IsNothrowCopyConstructible => "is_nothrow_copy_constructible",
            IsMoveConstructible => "is_move_constructible",
            IsTriviallyMoveConstructible => "is_trivially_move_constructible",
            IsNothrowMoveConstructible => "is_nothrow_move_constructible",
            IsAssignable => "is_assignable",
            IsTriviallyAssignable => "is_trivially_assignable",
            IsNothrowAssignable => "is_nothrow_assignable",
            IsCopyAssignable => "is_copy_assignable",
            IsTriviallyCopyAssignable => "is_trivially_copy_assignable",
            IsNothrowCopyAssignable => "is_nothrow_copy_assignable",
            IsMoveAssignable => "is_move_assignable",
            IsTriviallyMoveAssignable => "is_trivially_move_assignable",
            IsNothrowMoveAssignable => "is_nothrow_move_assignable",
            IsDestructible => "is_destructible",
            IsTriviallyDestructible => "is_trivially_destructible",
            IsNothrowDestructible => "is_nothrow_destructible",
            IsSwappableWith => "is_swappable_with",
            IsSwappable => "is_swappable",
            IsNothrowSwappableWith => "is_nothrow_swappable_with",
            IsNothrowSwappable => "is_nothrow_swappable",
            IsInvocable => "is_invocable",
            IsInvocableR => "is_invocable_r",
            IsNothrowInvocable => "is_nothrow_invocable",
            IsNothrowInvocableR => "is_nothrow_invocable_r",
            InvokeResult => "invoke_result",
            ResultOf => "result_of",
        }
    }

    fn arity(self) -> Arity {
        use TraitKind::*;
        match self {
            IsSame | IsBaseOf | IsConvertible | IsNothrowConvertible | IsAssignable
            | IsTriviallyAssignable | IsNothrowAssignable | IsSwappableWith
            | IsNothrowSwappableWith => Arity::Exact(1),
            IsInvocableR | IsNothrowInvocableR => Arity::AtLeast(1),
            IsConstructible | IsTriviallyConstructible | IsNothrowConstructible | CommonType
            | IsInvocable | IsNothrowInvocable | InvokeResult => Arity::Any,
            _ => Arity::Exact(0),
        }
    }

    /// Reject argument packs that no trait of this kind accepts.
    pub fn check_arity(self, given: usize) -> TraitResult<()> {
        let trait_name = self.name();
        if given > MAX_TRAIT_ARITY {
            return Err(TraitError::ArityExceeded {
                trait_name,
                given,
                max: MAX_TRAIT_ARITY,
            });
        }
        let expected = match self.arity() {
            Arity::Exact(n) if n != given => Some(if n == 0 { "exactly 0" } else { "exactly 1" }),
            Arity::AtLeast(n) if given < n => Some("at least 1"),
            _ => None,
        };
        match expected {
            Some(expected) => Err(TraitError::ArityMismatch {
                trait_name,
                expected,
                given,
            }),
            None => Ok(()),
        }
    }
}

/// The answer to one query.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TraitAnswer {
    Bool(bool),
    Type(TypeId),
    Value(IntegralConstant),
    /// The transformation has no result (`common_type` without a common
    /// type, `invoke_result` of an ill-formed call, an intrinsic-only
    /// transformation the provider cannot answer).
    Inapplicable,
}

impl TraitAnswer {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            TraitAnswer::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_type(self) -> Option<TypeId> {
        match self {
            TraitAnswer::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_value(self) -> Option<u64> {
        match self {
            TraitAnswer::Value(constant) => Some(constant.value),
            _ => None,
        }
    }

    fn from_type(ty: Option<TypeId>) -> Self {
        ty.map_or(TraitAnswer::Inapplicable, TraitAnswer::Type)
    }
}

impl fmt::Display for TraitAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitAnswer::Bool(value) => write!(f, "{value}"),
            TraitAnswer::Type(ty) => write!(f, "type#{}", ty.0),
            TraitAnswer::Value(constant) => write!(f, "{}", constant.value),
            TraitAnswer::Inapplicable => f.write_str("inapplicable"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct QueryKey {
    kind: TraitKind,
    ty: TypeId,
    args: SmallVec<[TypeId; 4]>,
}

// =============================================================================
// Solver
// =============================================================================

/// Evaluates type traits over a `TypeDatabase`.
///
/// Shareable across threads; answers are a pure function of the database,
/// the capabilities and the provider.
pub struct TraitSolver<'a> {
    pub(crate) db: &'a dyn TypeDatabase,
    oracle: Arc<dyn CapabilityOracle>,
    provider: Arc<dyn IntrospectionProvider>,
    cache: DashMap<QueryKey, TraitAnswer, FxBuildHasher>,
}

impl<'a> TraitSolver<'a> {
    /// Every capability, with answers from the declarations.
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self::with_provider(db, Arc::new(Capabilities::all()), Arc::new(DeclIntrospection))
    }

    pub fn with_capabilities(db: &'a dyn TypeDatabase, capabilities: Capabilities) -> Self {
        Self::with_provider(db, Arc::new(capabilities), Arc::new(DeclIntrospection))
    }

    pub fn with_provider(
        db: &'a dyn TypeDatabase,
        oracle: Arc<dyn CapabilityOracle>,
        provider: Arc<dyn IntrospectionProvider>,
    ) -> Self {
        Self {
            db,
            oracle,
            provider,
            cache: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn with_config(db: &'a dyn TypeDatabase, config: &SolverConfig) -> Self {
        if db.target() != &config.target {
            debug!(
                configured = %config.target.name,
                database = %db.target().name,
                "solver configured for a different target than its database"
            );
        }
        Self::with_capabilities(db, config.capabilities)
    }

    #[inline]
    pub fn db(&self) -> &'a dyn TypeDatabase {
        self.db
    }

    #[inline]
    pub fn has_builtin(&self, builtin: Builtins) -> bool {
        self.oracle.has_builtin(builtin)
    }

    #[inline]
    pub fn has_feature(&self, feature: Features) -> bool {
        self.oracle.has_feature(feature)
    }

    /// A fresh expression checker for one question.
    #[inline]
    pub(crate) fn sema(&self) -> Sema<'a> {
        Sema::new(self.db)
    }

    /// The intrinsic answer when `builtin` is available and the provider
    /// knows it; `None` selects the fallback.
    pub(crate) fn intrinsic<T>(
        &self,
        builtin: Builtins,
        trait_name: &'static str,
        ask: impl FnOnce(&dyn IntrospectionProvider) -> Option<T>,
    ) -> Option<T> {
        if !self.oracle.has_builtin(builtin) {
            trace!(trait_name, path = "fallback", "builtin unavailable");
            return None;
        }
        let answer = ask(self.provider.as_ref());
        if answer.is_some() {
            trace!(trait_name, path = "intrinsic");
        } else {
            trace!(trait_name, path = "fallback", "provider has no answer");
        }
        answer
    }

    /// A question only the provider can answer; "unknown" is `false`.
    pub(crate) fn provider_only(
        &self,
        trait_name: &'static str,
        ty: TypeId,
        ask: impl FnOnce(&dyn IntrospectionProvider) -> Option<bool>,
    ) -> bool {
        match ask(self.provider.as_ref()) {
            Some(answer) => answer,
            None => {
                debug!(trait_name, ty = ty.0, "introspection provider has no answer");
                false
            }
        }
    }

    /// An intrinsic-only predicate gated by `builtin`; `false` when the
    /// builtin is missing or the provider has no answer.
    pub(crate) fn gated(
        &self,
        builtin: Builtins,
        trait_name: &'static str,
        ty: TypeId,
        ask: impl FnOnce(&dyn IntrospectionProvider) -> Option<bool>,
    ) -> bool {
        match self.intrinsic(builtin, trait_name, ask) {
            Some(answer) => answer,
            None => {
                debug!(trait_name, ty = ty.0, "no intrinsic answer and no fallback");
                false
            }
        }
    }

    /// Number of memoized answers.
    pub fn cached_answers(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Evaluate `kind` for `ty` and `args`, memoized.
    ///
    /// Fails only for argument packs the trait cannot take and for
    /// transformations whose input is a contract violation (`make_signed`
    /// of a non-integral type, `underlying_type` of a non-enum).
    pub fn query(&self, kind: TraitKind, ty: TypeId, args: &[TypeId]) -> TraitResult<TraitAnswer> {
        let op = kind.name();
        let tracing_queries = query_trace::enabled();
        let query_id = if tracing_queries {
            query_trace::next_query_id()
        } else {
            0
        };
        if tracing_queries {
            query_trace::query_start(query_id, op, ty, args);
        }

        if let Err(err) = kind.check_arity(args.len()) {
            debug!(trait_name = op, given = args.len(), %err, "rejected query");
            if tracing_queries {
                query_trace::query_rejected(query_id, op, &err.to_string());
            }
            return Err(err);
        }

        let key = QueryKey {
            kind,
            ty,
            args: args.iter().copied().collect(),
        };
        if let Some(answer) = self.cache.get(&key).map(|entry| *entry) {
            if tracing_queries {
                query_trace::query_end(query_id, op, &answer.to_string(), true);
            }
            return Ok(answer);
        }

        let answer = match self.evaluate(kind, ty, args) {
            Ok(answer) => answer,
            Err(err) => {
                debug!(trait_name = op, ty = ty.0, %err, "contract violation");
                if tracing_queries {
                    query_trace::query_rejected(query_id, op, &err.to_string());
                }
                return Err(err);
            }
        };
        self.cache.insert(key, answer);
        if tracing_queries {
            query_trace::query_end(query_id, op, &answer.to_string(), false);
        }
        Ok(answer)
    }

    fn evaluate(&self, kind: TraitKind, ty: TypeId, args: &[TypeId]) -> TraitResult<TraitAnswer> {
        use TraitKind::*;
        let db = self.db;
        let first = args.first().copied().unwrap_or(TypeId::VOID);
        let int128 = self.has_feature(Features::INT128);

        let answer = match kind {
            IsVoid => TraitAnswer::Bool(classify::is_void(db, ty)),
            IsNullPointer => TraitAnswer::Bool(classify::is_null_pointer(db, ty)),
            IsIntegral => TraitAnswer::Bool(classify::is_integral(db, ty)),
            IsFloatingPoint => TraitAnswer::Bool(classify::is_floating_point(db, ty)),
            IsArray => TraitAnswer::Bool(classify::is_array(db, ty)),
            IsPointer => TraitAnswer::Bool(classify::is_pointer(db, ty)),
            IsLvalueReference => TraitAnswer::Bool(classify::is_lvalue_reference(db, ty)),
            IsRvalueReference => TraitAnswer::Bool(classify::is_rvalue_reference(db, ty)),
            IsMemberObjectPointer => TraitAnswer::Bool(classify::is_member_object_pointer(db, ty)),
            IsMemberFunctionPointer => {
                TraitAnswer::Bool(classify::is_member_function_pointer(db, ty))
            }
            IsEnum => TraitAnswer::Bool(classify::is_enum(db, ty)),
            IsUnion => TraitAnswer::Bool(classify::is_union(db, ty)),
            IsClass => TraitAnswer::Bool(classify::is_class(db, ty)),
            IsFunction => TraitAnswer::Bool(classify::is_function(db, ty)),
            IsArithmetic => TraitAnswer::Bool(classify::is_arithmetic(db, ty)),
            IsFundamental => TraitAnswer::Bool(classify::is_fundamental(db, ty)),
            IsScalar => TraitAnswer::Bool(classify::is_scalar(db, ty)),
            IsObject => TraitAnswer::Bool(classify::is_object(db, ty)),
            IsCompound => TraitAnswer::Bool(classify::is_compound(db, ty)),
            IsReference => TraitAnswer::Bool(classify::is_reference(db, ty)),
            IsMemberPointer => TraitAnswer::Bool(classify::is_member_pointer(db, ty)),
            IsReferenceable => TraitAnswer::Bool(classify::is_referenceable(db, ty)),
            IsConst => TraitAnswer::Bool(classify::is_const(db, ty)),
            IsVolatile => TraitAnswer::Bool(classify::is_volatile(db, ty)),
            IsSigned => TraitAnswer::Bool(classify::is_signed(db, ty)),
            IsUnsigned => TraitAnswer::Bool(classify::is_unsigned(db, ty)),
            IsBoundedArray => TraitAnswer::Bool(classify::is_bounded_array(db, ty)),
            IsUnboundedArray => TraitAnswer::Bool(classify::is_unbounded_array(db, ty)),
            IsSame => TraitAnswer::Bool(classify::is_same(ty, first)),
            Rank => TraitAnswer::Value(self.rank(ty)),
            Extent(dimension) => TraitAnswer::Value(self.extent(ty, dimension)),
            SizeOf => layout::size_of(db, ty).map_or(TraitAnswer::Inapplicable, |size| {
                TraitAnswer::Value(IntegralConstant::new(size, self.size_type()))
            }),
            AlignmentOf => self
                .alignment_of(ty)
                .map_or(TraitAnswer::Inapplicable, TraitAnswer::Value),

            AddConst => TraitAnswer::Type(transform::add_const(db, ty)),
            AddVolatile => TraitAnswer::Type(transform::add_volatile(db, ty)),
            AddCv => TraitAnswer::Type(transform::add_cv(db, ty)),
            RemoveConst => TraitAnswer::Type(transform::remove_const(db, ty)),
            RemoveVolatile => TraitAnswer::Type(transform::remove_volatile(db, ty)),
            RemoveCv => TraitAnswer::Type(transform::remove_cv(db, ty)),
            AddLvalueReference => TraitAnswer::Type(transform::add_lvalue_reference(db, ty)),
            AddRvalueReference => TraitAnswer::Type(transform::add_rvalue_reference(db, ty)),
            RemoveReference => TraitAnswer::Type(transform::remove_reference(db, ty)),
            RemoveCvref => TraitAnswer::Type(transform::remove_cvref(db, ty)),
            AddPointer => TraitAnswer::Type(transform::add_pointer(db, ty)),
            RemovePointer => TraitAnswer::Type(transform::remove_pointer(db, ty)),
            RemoveExtent => TraitAnswer::Type(transform::remove_extent(db, ty)),
            RemoveAllExtents => TraitAnswer::Type(transform::remove_all_extents(db, ty)),
            Decay => TraitAnswer::Type(transform::decay(db, ty)),
            TypeIdentity => TraitAnswer::Type(transform::type_identity(ty)),
            MakeSigned => TraitAnswer::Type(transform::make_signed(db, ty, int128)?),
            MakeUnsigned => TraitAnswer::Type(transform::make_unsigned(db, ty, int128)?),
            UnderlyingType => TraitAnswer::from_type(self.underlying_type(ty)?),
            CommonType => {
                let mut types: SmallVec<[TypeId; 8]> = SmallVec::with_capacity(args.len() + 1);
                types.push(ty);
                types.extend_from_slice(args);
                TraitAnswer::from_type(common_type(db, &types))
            }

            IsBaseOf => TraitAnswer::Bool(self.is_base_of(ty, first)),
            IsEmpty => TraitAnswer::Bool(self.is_empty(ty)),
            IsPolymorphic => TraitAnswer::Bool(self.is_polymorphic(ty)),
            IsAbstract => TraitAnswer::Bool(self.is_abstract(ty)),
            IsFinal => TraitAnswer::Bool(self.is_final(ty)),
            HasVirtualDestructor => TraitAnswer::Bool(self.has_virtual_destructor(ty)),
            IsTrivial => TraitAnswer::Bool(self.is_trivial(ty)),
            IsTriviallyCopyable => TraitAnswer::Bool(self.is_trivially_copyable(ty)),
            IsStandardLayout => TraitAnswer::Bool(self.is_standard_layout(ty)),
            IsPod => TraitAnswer::Bool(self.is_pod(ty)),
            IsLiteralType => TraitAnswer::Bool(self.is_literal_type(ty)),
            IsAggregate => TraitAnswer::Bool(self.is_aggregate(ty)),
            HasUniqueObjectRepresentations => {
                TraitAnswer::Bool(self.has_unique_object_representations(ty))
            }
            IsConvertible => TraitAnswer::Bool(self.is_convertible(ty, first)),
            IsNothrowConvertible => TraitAnswer::Bool(self.is_nothrow_convertible(ty, first)),

            IsConstructible => TraitAnswer::Bool(self.is_constructible(ty, args)),
            IsTriviallyConstructible => TraitAnswer::Bool(self.is_trivially_constructible(ty, args)),
            IsNothrowConstructible => TraitAnswer::Bool(self.is_nothrow_constructible(ty, args)),
            IsDefaultConstructible => TraitAnswer::Bool(self.is_default_constructible(ty)),
            IsTriviallyDefaultConstructible => {
                TraitAnswer::Bool(self.is_trivially_default_constructible(ty))
            }
            IsNothrowDefaultConstructible => {
                TraitAnswer::Bool(self.is_nothrow_default_constructible(ty))
            }
            IsCopyConstructible => TraitAnswer::Bool(self.is_copy_constructible(ty)),
            IsTriviallyCopyConstructible => {
                TraitAnswer::Bool(self.is_trivially_copy_constructible(ty))
            }
            IsNothrowCopyConstructible => TraitAnswer::Bool(self.is_nothrow_copy_constructible(ty)),
            IsMoveConstructible => TraitAnswer::Bool(self.is_move_constructible(ty)),
            IsTriviallyMoveConstructible => {
                TraitAnswer::Bool(self.is_trivially_move_constructible(ty))
            }
            IsNothrowMoveConstructible => TraitAnswer::Bool(self.is_nothrow_move_constructible(ty)),
            IsAssignable => TraitAnswer::Bool(self.is_assignable(ty, first)),
            IsTriviallyAssignable => TraitAnswer::Bool(self.is_trivially_assignable(ty, first)),
            IsNothrowAssignable => TraitAnswer::Bool(self.is_nothrow_assignable(ty, first)),
            IsCopyAssignable => TraitAnswer::Bool(self.is_copy_assignable(ty)),
            IsTriviallyCopyAssignable => TraitAnswer::Bool(self.is_trivially_copy_assignable(ty)),
            IsNothrowCopyAssignable => TraitAnswer::Bool(self.is_nothrow_copy_assignable(ty)),
            IsMoveAssignable => TraitAnswer::Bool(self.is_move_assignable(ty)),
            IsTriviallyMoveAssignable => TraitAnswer::Bool(self.is_trivially_move_assignable(ty)),
            IsNothrowMoveAssignable => TraitAnswer::Bool(self.is_nothrow_move_assignable(ty)),
            IsDestructible => TraitAnswer::Bool(self.is_destructible(ty)),
            IsTriviallyDestructible => TraitAnswer::Bool(self.is_trivially_destructible(ty)),
            IsNothrowDestructible => TraitAnswer::Bool(self.is_nothrow_destructible(ty)),
            IsSwappableWith => TraitAnswer::Bool(self.is_swappable_with(ty, first)),
            IsSwappable => TraitAnswer::Bool(self.is_swappable(ty)),
            IsNothrowSwappableWith => TraitAnswer::Bool(self.is_nothrow_swappable_with(ty, first)),
            IsNothrowSwappable => TraitAnswer::Bool(self.is_nothrow_swappable(ty)),

            IsInvocable => TraitAnswer::Bool(self.is_invocable(ty, args)),
            IsInvocableR => TraitAnswer::Bool(self.is_invocable_r(ty, first, &args[1..])),
            IsNothrowInvocable => TraitAnswer::Bool(self.is_nothrow_invocable(ty, args)),
            IsNothrowInvocableR => {
                TraitAnswer::Bool(self.is_nothrow_invocable_r(ty, first, &args[1..]))
            }
            InvokeResult => TraitAnswer::from_type(self.invoke_result(ty, args)),
            ResultOf => TraitAnswer::from_type(self.result_of(ty)),
        };
        Ok(answer)
    }
}

#[cfg(test)]
#[path = "../tests/trait_queries_tests.rs"]
mod tests;
