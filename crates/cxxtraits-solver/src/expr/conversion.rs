//! Implicit conversion sequences.
//!
//! A conversion sequence is standard (identity, promotion or conversion of
//! builtin types, pointer and member pointer adjustments, derived-to-base
//! copies of classes), user-defined (one converting constructor or
//! conversion function wrapped in standard conversions), or an ellipsis
//! match. Sequences are ranked so overload resolution can pick the best
//! viable function.

use super::overload::{Candidate, FunctionRef, MemberSet, record_candidates};
use super::{Effects, Expr, Formed, Inapplicable, InitMode, Operation, Sema};
use crate::TypeDatabase;
use crate::class_hierarchy::BaseConversion;
use crate::def::{FunctionDecl, RecordDecl};
use crate::type_queries::{
    array_parts, builtin_kind, complete_record, enum_decl, function_shape, is_function, is_void,
    member_pointer_parts, pointee, record_decl, record_id, referent, split_cv, unqualified,
    unqualified_data,
};
use crate::types::{BuiltinKind, CvQualifiers, RefQualifier, TypeData, TypeId, ValueCategory};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::trace;

/// Rank of a standard conversion sequence. Lower is better.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConversionRank {
    Exact,
    Promotion,
    Conversion,
}

/// Form of an implicit conversion sequence. Lower is better.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConversionKind {
    Standard,
    UserDefined,
    Ellipsis,
}

/// Details of a reference binding, used by the reference tie-breakers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReferenceBinding {
    /// An rvalue reference bound to an rvalue.
    pub rvalue_ref_to_rvalue: bool,
    /// Unqualified referenced type.
    pub referent: TypeId,
    pub referent_cv: CvQualifiers,
    /// The implicit object parameter of a member function without a
    /// ref-qualifier.
    pub implicit_object: bool,
    /// Bound to a materialized temporary rather than directly.
    pub temporary: bool,
}

/// An implicit conversion sequence.
///
/// For a user-defined sequence `rank`, `derived_distance` and
/// `pointer_to_bool` describe the second standard conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImplicitConversion {
    pub kind: ConversionKind,
    pub rank: ConversionRank,
    pub effects: Effects,
    /// Inheritance distance of a derived-to-base conversion.
    pub derived_distance: Option<u32>,
    pub pointer_to_bool: bool,
    pub binding: Option<ReferenceBinding>,
    /// The converting constructor or conversion function.
    pub user: Option<FunctionRef>,
}

impl ImplicitConversion {
    pub fn identity() -> Self {
        Self::standard(ConversionRank::Exact)
    }

    pub fn standard(rank: ConversionRank) -> Self {
        Self {
            kind: ConversionKind::Standard,
            rank,
            effects: Effects::NONE,
            derived_distance: None,
            pointer_to_bool: false,
            binding: None,
            user: None,
        }
    }

    pub fn ellipsis() -> Self {
        Self {
            kind: ConversionKind::Ellipsis,
            ..Self::identity()
        }
    }

    pub(crate) fn derived_to_base(distance: u32) -> Self {
        if distance == 0 {
            return Self::identity();
        }
        Self {
            derived_distance: Some(distance),
            ..Self::standard(ConversionRank::Conversion)
        }
    }

    fn user_defined(user: FunctionRef, second: ImplicitConversion, effects: Effects) -> Self {
        Self {
            kind: ConversionKind::UserDefined,
            effects,
            user: Some(user),
            ..second
        }
    }

    /// Binding of the implied object argument of a member function of
    /// `class` qualified with `cv` and `ref_qualifier`.
    pub(crate) fn object_binding(
        class: TypeId,
        cv: CvQualifiers,
        distance: u32,
        ref_qualifier: RefQualifier,
        object_is_rvalue: bool,
    ) -> Self {
        Self {
            binding: Some(ReferenceBinding {
                rvalue_ref_to_rvalue: ref_qualifier == RefQualifier::RValue && object_is_rvalue,
                referent: class,
                referent_cv: cv,
                implicit_object: ref_qualifier == RefQualifier::None,
                temporary: false,
            }),
            ..Self::derived_to_base(distance)
        }
    }

    /// `Less` when `self` is the better conversion sequence.
    ///
    /// Two user-defined sequences are only comparable when they use the same
    /// conversion function or constructor; otherwise they are
    /// indistinguishable.
    pub fn compare(&self, other: &ImplicitConversion) -> Ordering {
        match self.kind.cmp(&other.kind) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        match self.kind {
            ConversionKind::Ellipsis => return Ordering::Equal,
            ConversionKind::UserDefined if self.user != other.user => return Ordering::Equal,
            _ => {}
        }
        match self.rank.cmp(&other.rank) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        if self.pointer_to_bool != other.pointer_to_bool {
            return if self.pointer_to_bool {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }
        if let (Some(a), Some(b)) = (self.derived_distance, other.derived_distance) {
            match a.cmp(&b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        if let (Some(a), Some(b)) = (self.binding, other.binding) {
            if !a.implicit_object
                && !b.implicit_object
                && a.rvalue_ref_to_rvalue != b.rvalue_ref_to_rvalue
            {
                return if a.rvalue_ref_to_rvalue {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
            }
            if a.referent == b.referent && a.referent_cv != b.referent_cv {
                if b.referent_cv.contains(a.referent_cv) {
                    return Ordering::Less;
                }
                if a.referent_cv.contains(b.referent_cv) {
                    return Ordering::Greater;
                }
            }
        }
        Ordering::Equal
    }
}

// =============================================================================
// Promotions
// =============================================================================

/// Integral promotion of a builtin kind, if it has one.
pub(crate) fn integral_promotion(db: &dyn TypeDatabase, kind: BuiltinKind) -> Option<BuiltinKind> {
    let target = db.target();
    match kind {
        BuiltinKind::Bool
        | BuiltinKind::Char
        | BuiltinKind::SignedChar
        | BuiltinKind::UnsignedChar
        | BuiltinKind::Short
        | BuiltinKind::UnsignedShort => {
            if kind.fits_in(BuiltinKind::Int, target) {
                Some(BuiltinKind::Int)
            } else {
                Some(BuiltinKind::UnsignedInt)
            }
        }
        BuiltinKind::WChar | BuiltinKind::Char16 | BuiltinKind::Char32 => [
            BuiltinKind::Int,
            BuiltinKind::UnsignedInt,
            BuiltinKind::Long,
            BuiltinKind::UnsignedLong,
            BuiltinKind::LongLong,
            BuiltinKind::UnsignedLongLong,
        ]
        .into_iter()
        .find(|candidate| kind.fits_in(*candidate, target)),
        _ => None,
    }
}

/// The type an arithmetic or unscoped enumeration operand has after
/// integral promotion. Other types are returned unchanged (unqualified).
pub(crate) fn promoted_type(db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
    let ty = unqualified(db, ty);
    if let Some(decl) = enum_decl(db, ty) {
        if decl.scoped {
            return ty;
        }
        let underlying = decl.underlying(db.target());
        return builtin_kind(db, underlying)
            .and_then(|kind| integral_promotion(db, kind))
            .map_or(underlying, BuiltinKind::type_id);
    }
    match builtin_kind(db, ty) {
        Some(kind) => integral_promotion(db, kind).map_or(ty, BuiltinKind::type_id),
        None => ty,
    }
}

// =============================================================================
// Qualification conversions
// =============================================================================

/// Whether a pointer to `from` converts to a pointer to `to` by adding
/// qualifiers only, at any depth of a multi-level pointer.
///
/// Adding a qualifier at some level requires `const` at every level above.
pub(crate) fn qualification_compatible(db: &dyn TypeDatabase, from: TypeId, to: TypeId) -> bool {
    fn walk(db: &dyn TypeDatabase, from: TypeId, to: TypeId, const_above: bool) -> bool {
        let (from_ty, from_cv) = split_cv(db, from);
        let (to_ty, to_cv) = split_cv(db, to);
        if !to_cv.contains(from_cv) {
            return false;
        }
        if to_cv != from_cv && !const_above {
            return false;
        }
        let const_here = const_above && to_cv.contains(CvQualifiers::CONST);
        if from_ty == to_ty {
            return true;
        }
        if let (Some(a), Some(b)) = (pointee(db, from_ty), pointee(db, to_ty)) {
            return walk(db, a, b, const_here);
        }
        match (
            member_pointer_parts(db, from_ty),
            member_pointer_parts(db, to_ty),
        ) {
            (Some((class_a, a)), Some((class_b, b))) if class_a == class_b => {
                walk(db, a, b, const_here)
            }
            _ => false,
        }
    }
    walk(db, from, to, true)
}

/// `from` with every function qualifier except `noexcept` equal to `to`,
/// and `noexcept` only on `from`.
fn drops_noexcept(db: &dyn TypeDatabase, from: TypeId, to: TypeId) -> bool {
    match (function_shape(db, from), function_shape(db, to)) {
        (Some(a), Some(b)) => {
            a.noexcept
                && !b.noexcept
                && a.ret == b.ret
                && a.params == b.params
                && a.variadic == b.variadic
                && a.cv == b.cv
                && a.ref_qualifier == b.ref_qualifier
        }
        _ => false,
    }
}

// =============================================================================
// Conversions
// =============================================================================

type ConversionOwners = Vec<(TypeId, Arc<RecordDecl>)>;

impl<'a> Sema<'a> {
    /// The implicit conversion sequence that initializes an object or
    /// reference of type `to` from `from`.
    ///
    /// `mode` selects copy- or direct-initialization; `allow_user` permits a
    /// user-defined conversion.
    pub fn implicit_conversion(
        &self,
        from: Expr,
        to: TypeId,
        mode: InitMode,
        allow_user: bool,
    ) -> Formed<ImplicitConversion> {
        self.guarded(Operation::Convert, to, Some(from), || {
            if referent(self.db, to).is_some() {
                return self.bind_reference(from, to, mode, allow_user);
            }
            if is_void(self.db, from.ty) {
                return Err(Inapplicable::VoidExpression);
            }
            if record_id(self.db, to).is_some() {
                return self.convert_to_class(from, to, mode, allow_user);
            }
            if record_id(self.db, from.ty).is_some() {
                if !allow_user {
                    return Err(Inapplicable::NoConversion);
                }
                return self.convert_via_conversion_function(from, to, mode);
            }
            self.standard_conversion(from, to, mode)
        })
    }

    /// Initialization of a class object of type `to` from `from`.
    pub(crate) fn convert_to_class(
        &self,
        from: Expr,
        to: TypeId,
        mode: InitMode,
        allow_user: bool,
    ) -> Formed<ImplicitConversion> {
        let target = unqualified(self.db, to);
        let decl = complete_record(self.db, target).ok_or(Inapplicable::IncompleteType)?;
        if decl.facts.abstract_ {
            return Err(Inapplicable::AbstractClass);
        }

        let source = unqualified(self.db, from.ty);
        let related = source == target || self.hierarchy().is_base_of(target, source);
        if related {
            let distance = match self.hierarchy().base_conversion(source, target) {
                BaseConversion::Ok { distance } => distance,
                BaseConversion::Ambiguous => return Err(Inapplicable::AmbiguousBase),
                BaseConversion::Inaccessible => return Err(Inapplicable::Inaccessible),
                BaseConversion::NotBase => return Err(Inapplicable::NoConversion),
            };
            if distance == 0 && from.category == ValueCategory::PRValue {
                return Ok(ImplicitConversion::identity());
            }
            let candidates = record_candidates(&decl, MemberSet::Constructor, mode, None);
            let selection = self.resolve(&candidates, None, &[from], false)?;
            return Ok(ImplicitConversion {
                effects: selection.effects,
                ..ImplicitConversion::derived_to_base(distance)
            });
        }

        if !allow_user {
            return Err(Inapplicable::NoConversion);
        }
        self.user_defined_to_class(from, target, &decl, mode)
    }

    /// Copy-initialization of class `target` from an unrelated type:
    /// converting constructors of the target compete with conversion
    /// functions of the source.
    fn user_defined_to_class(
        &self,
        from: Expr,
        target: TypeId,
        decl: &RecordDecl,
        mode: InitMode,
    ) -> Formed<ImplicitConversion> {
        let mut candidates: Vec<Candidate<'_>> =
            record_candidates(decl, MemberSet::Constructor, mode, None)
                .into_iter()
                .filter(|candidate| {
                    let func = candidate.func;
                    func.params.len() == 1 || (func.params.is_empty() && func.variadic)
                })
                .collect();

        let owners = self.conversion_owners(from.ty);
        candidates.extend(self.conversion_candidates(&owners, mode, |func| {
            let result = self.call_result(func.ret);
            let result_class = unqualified(self.db, result.ty);
            if result_class != target && !self.hierarchy().is_base_of(target, result_class) {
                return None;
            }
            self.convert_to_class(result, target, InitMode::Copy, false).ok()
        }));

        self.finish_user_defined(&candidates, from)
    }

    /// Conversion of a class object to a non-class type through one of its
    /// conversion functions.
    fn convert_via_conversion_function(
        &self,
        from: Expr,
        to: TypeId,
        mode: InitMode,
    ) -> Formed<ImplicitConversion> {
        let owners = self.conversion_owners(from.ty);
        let candidates = self.conversion_candidates(&owners, mode, |func| {
            let result = self.call_result(func.ret);
            self.standard_conversion(result, to, mode).ok()
        });
        self.finish_user_defined(&candidates, from)
    }

    pub(crate) fn finish_user_defined(
        &self,
        candidates: &[Candidate<'_>],
        from: Expr,
    ) -> Formed<ImplicitConversion> {
        let selection = self.resolve(candidates, Some(from), &[from], false)?;
        let second = candidates
            .iter()
            .find(|candidate| candidate.id == selection.id)
            .and_then(|candidate| candidate.result)
            .unwrap_or_else(ImplicitConversion::identity);
        trace!(
            set = ?selection.id.set,
            rank = ?second.rank,
            "user-defined conversion"
        );
        Ok(ImplicitConversion::user_defined(
            selection.id,
            second,
            selection.effects,
        ))
    }

    /// The class of `source` and its bases, each with its declaration.
    pub(crate) fn conversion_owners(&self, source: TypeId) -> ConversionOwners {
        let Some(decl) = record_decl(self.db, source) else {
            return Vec::new();
        };
        if !decl.complete {
            return Vec::new();
        }
        let class = unqualified(self.db, source);
        let mut owners = vec![(class, decl)];
        for base in self.hierarchy().all_bases(class) {
            if let Some(base_decl) = complete_record(self.db, base) {
                owners.push((base, base_decl));
            }
        }
        owners
    }

    /// Conversion function candidates of `owners` for which `accept`
    /// produces the conversion of the function's result to the target.
    /// A conversion function of a base is hidden by one with the same
    /// signature in a more derived class.
    pub(crate) fn conversion_candidates<'d>(
        &self,
        owners: &'d ConversionOwners,
        mode: InitMode,
        accept: impl Fn(&FunctionDecl) -> Option<ImplicitConversion>,
    ) -> Vec<Candidate<'d>> {
        let mut seen: Vec<(TypeId, CvQualifiers, RefQualifier)> = Vec::new();
        let mut out = Vec::new();
        for (class, decl) in owners {
            for mut candidate in record_candidates(decl, MemberSet::Conversion, mode, Some(*class))
            {
                let func = candidate.func;
                let signature = (func.ret, func.cv, func.ref_qualifier);
                if seen.contains(&signature) {
                    continue;
                }
                seen.push(signature);
                if let Some(result) = accept(func) {
                    candidate.result = Some(result);
                    out.push(candidate);
                }
            }
        }
        out
    }

    /// A standard conversion sequence from `from` to the non-class,
    /// non-reference type `to`.
    pub(crate) fn standard_conversion(
        &self,
        from: Expr,
        to: TypeId,
        mode: InitMode,
    ) -> Formed<ImplicitConversion> {
        let db = self.db;
        let source = self.adjusted_source(from);
        let target = unqualified(db, to);
        if source == target {
            return Ok(ImplicitConversion::identity());
        }

        let (Some(source_data), Some(target_data)) =
            (unqualified_data(db, source), unqualified_data(db, target))
        else {
            return Err(Inapplicable::NoConversion);
        };

        match (source_data, target_data) {
            (TypeData::Builtin(s), TypeData::Builtin(t)) => {
                let rank = if t == BuiltinKind::Bool {
                    ConversionRank::Conversion
                } else if integral_promotion(db, s) == Some(t)
                    || (s == BuiltinKind::Float && t == BuiltinKind::Double)
                {
                    ConversionRank::Promotion
                } else {
                    ConversionRank::Conversion
                };
                Ok(ImplicitConversion::standard(rank))
            }
            (TypeData::Enum(_), TypeData::Builtin(t)) => {
                let decl = enum_decl(db, source).ok_or(Inapplicable::IncompleteType)?;
                if decl.scoped {
                    return Err(Inapplicable::NoConversion);
                }
                let underlying = decl.underlying(db.target());
                let promoted = promoted_type(db, source);
                let rank = if t != BuiltinKind::Bool
                    && (target == promoted || (decl.fixed_underlying.is_some() && target == underlying))
                {
                    ConversionRank::Promotion
                } else {
                    ConversionRank::Conversion
                };
                Ok(ImplicitConversion::standard(rank))
            }
            (TypeData::NullPtr, TypeData::Pointer(_) | TypeData::MemberPointer { .. }) => {
                Ok(ImplicitConversion::standard(ConversionRank::Conversion))
            }
            (TypeData::NullPtr, TypeData::Builtin(BuiltinKind::Bool)) => match mode {
                InitMode::Direct => Ok(ImplicitConversion::standard(ConversionRank::Conversion)),
                InitMode::Copy => Err(Inapplicable::NoConversion),
            },
            (
                TypeData::Pointer(_) | TypeData::MemberPointer { .. },
                TypeData::Builtin(BuiltinKind::Bool),
            ) => Ok(ImplicitConversion {
                pointer_to_bool: true,
                ..ImplicitConversion::standard(ConversionRank::Conversion)
            }),
            (TypeData::Pointer(from_pointee), TypeData::Pointer(to_pointee)) => {
                self.pointer_conversion(from_pointee, to_pointee)
            }
            (
                TypeData::MemberPointer {
                    class: from_class,
                    pointee: from_pointee,
                },
                TypeData::MemberPointer {
                    class: to_class,
                    pointee: to_pointee,
                },
            ) => {
                if from_class == to_class {
                    if qualification_compatible(db, from_pointee, to_pointee)
                        || drops_noexcept(db, from_pointee, to_pointee)
                    {
                        return Ok(ImplicitConversion::identity());
                    }
                    return Err(Inapplicable::NoConversion);
                }
                if from_pointee != to_pointee {
                    return Err(Inapplicable::NoConversion);
                }
                // Pointer to member of a base converts to pointer to member
                // of a derived class, never the other way.
                match self.hierarchy().base_conversion(to_class, from_class) {
                    BaseConversion::Ok { distance } => {
                        Ok(ImplicitConversion::derived_to_base(distance))
                    }
                    BaseConversion::Ambiguous => Err(Inapplicable::AmbiguousBase),
                    BaseConversion::Inaccessible => Err(Inapplicable::Inaccessible),
                    BaseConversion::NotBase => Err(Inapplicable::NoConversion),
                }
            }
            _ => Err(Inapplicable::NoConversion),
        }
    }

    /// Source type after the lvalue transformations: array-to-pointer,
    /// function-to-pointer, and dropping cv-qualification.
    fn adjusted_source(&self, from: Expr) -> TypeId {
        if let Some((element, _)) = array_parts(self.db, from.ty) {
            return self.db.pointer(element);
        }
        if is_function(self.db, from.ty) {
            return self.db.pointer(from.ty);
        }
        unqualified(self.db, from.ty)
    }

    fn pointer_conversion(&self, from: TypeId, to: TypeId) -> Formed<ImplicitConversion> {
        let db = self.db;
        if qualification_compatible(db, from, to) {
            return Ok(ImplicitConversion::identity());
        }
        if drops_noexcept(db, from, to) {
            return Ok(ImplicitConversion::identity());
        }
        let (from_ty, from_cv) = split_cv(db, from);
        let (to_ty, to_cv) = split_cv(db, to);
        if !to_cv.contains(from_cv) {
            return Err(Inapplicable::DropsQualifiers);
        }
        if is_void(db, to_ty) {
            if is_function(db, from_ty) {
                return Err(Inapplicable::NoConversion);
            }
            return Ok(ImplicitConversion::standard(ConversionRank::Conversion));
        }
        if record_id(db, from_ty).is_some() && record_id(db, to_ty).is_some() {
            return match self.hierarchy().base_conversion(from_ty, to_ty) {
                BaseConversion::Ok { distance } => Ok(ImplicitConversion::derived_to_base(distance)),
                BaseConversion::Ambiguous => Err(Inapplicable::AmbiguousBase),
                BaseConversion::Inaccessible => Err(Inapplicable::Inaccessible),
                BaseConversion::NotBase => Err(Inapplicable::NoConversion),
            };
        }
        Err(Inapplicable::NoConversion)
    }
}
