//! Type properties: structural facts about a single type.
//!
//! Most of these have two formulations. A front end answers them through
//! an intrinsic; without one, the classical library formulation applies:
//! `is_empty` compares the size of a class deriving from `T` with one that
//! does not, `is_polymorphic` asks whether `dynamic_cast<const volatile
//! void*>` on a `T*` is well-formed, and the layout predicates fall back to
//! "scalar, or array of scalar", which is exact for non-class types and
//! conservative for classes. `is_abstract`, `is_final` and
//! `has_virtual_destructor` have no expression formulation and are
//! answered by the provider alone.

use crate::capabilities::Builtins;
use crate::class_hierarchy::ClassHierarchy;
use crate::classify;
use crate::constant::IntegralConstant;
use crate::error::{TraitError, TraitResult};
use crate::format::TypeFormatter;
use crate::layout;
use crate::trait_queries::TraitSolver;
use crate::transform::remove_all_extents;
use crate::type_queries::{class_record, enum_decl, is_reference, is_scalar};
use crate::types::{BuiltinKind, TypeId};
use tracing::debug;

impl<'a> TraitSolver<'a> {
    /// `std::size_t` on the target: `unsigned long` when it is as wide as a
    /// pointer, otherwise `unsigned int` or `unsigned long long`.
    pub fn size_type(&self) -> TypeId {
        let target = self.db.target();
        let pointer = target.pointer_layout.size;
        [
            BuiltinKind::UnsignedLong,
            BuiltinKind::UnsignedInt,
            BuiltinKind::UnsignedLongLong,
        ]
        .into_iter()
        .find(|kind| kind.layout(target).size == pointer)
        .unwrap_or(BuiltinKind::UnsignedLongLong)
        .type_id()
    }

    pub fn rank(&self, ty: TypeId) -> IntegralConstant {
        IntegralConstant::new(classify::rank(self.db, ty), self.size_type())
    }

    pub fn extent(&self, ty: TypeId, dimension: u32) -> IntegralConstant {
        IntegralConstant::new(classify::extent(self.db, ty, dimension), self.size_type())
    }

    /// `alignof(T)`; `None` for types without a size.
    pub fn alignment_of(&self, ty: TypeId) -> Option<IntegralConstant> {
        let align = layout::align_of(self.db, ty)?;
        Some(IntegralConstant::new(align, self.size_type()))
    }

    pub fn is_base_of(&self, base: TypeId, derived: TypeId) -> bool {
        ClassHierarchy::new(self.db).is_base_of(base, derived)
    }

    pub fn is_empty(&self, ty: TypeId) -> bool {
        if let Some(answer) =
            self.intrinsic(Builtins::IS_EMPTY, "is_empty", |p| p.is_empty(self.db, ty))
        {
            return answer;
        }
        class_record(self.db, ty).is_some() && layout::empty_probe(self.db, ty)
    }

    pub fn is_polymorphic(&self, ty: TypeId) -> bool {
        if let Some(answer) = self.intrinsic(Builtins::IS_POLYMORPHIC, "is_polymorphic", |p| {
            p.is_polymorphic(self.db, ty)
        }) {
            return answer;
        }
        self.sema().dynamic_cast_to_cv_void_ptr(ty).is_ok()
    }

    pub fn is_abstract(&self, ty: TypeId) -> bool {
        self.provider_only("is_abstract", ty, |p| p.is_abstract(self.db, ty))
    }

    pub fn is_final(&self, ty: TypeId) -> bool {
        self.provider_only("is_final", ty, |p| p.is_final(self.db, ty))
    }

    pub fn has_virtual_destructor(&self, ty: TypeId) -> bool {
        self.provider_only("has_virtual_destructor", ty, |p| {
            p.has_virtual_destructor(self.db, ty)
        })
    }

    /// Scalar, or array of scalar.
    fn scalar_element(&self, ty: TypeId) -> bool {
        is_scalar(self.db, remove_all_extents(self.db, ty))
    }

    pub fn is_trivially_copyable(&self, ty: TypeId) -> bool {
        if let Some(answer) =
            self.intrinsic(Builtins::IS_TRIVIALLY_COPYABLE, "is_trivially_copyable", |p| {
                p.is_trivially_copyable(self.db, ty)
            })
        {
            return answer;
        }
        self.scalar_element(ty)
    }

    pub fn is_standard_layout(&self, ty: TypeId) -> bool {
        if let Some(answer) =
            self.intrinsic(Builtins::IS_STANDARD_LAYOUT, "is_standard_layout", |p| {
                p.is_standard_layout(self.db, ty)
            })
        {
            return answer;
        }
        self.scalar_element(ty)
    }

    pub fn is_trivial(&self, ty: TypeId) -> bool {
        if let Some(answer) =
            self.intrinsic(Builtins::IS_TRIVIAL, "is_trivial", |p| p.is_trivial(self.db, ty))
        {
            return answer;
        }
        self.is_trivially_copyable(ty) && self.is_trivially_default_constructible(ty)
    }

    pub fn is_pod(&self, ty: TypeId) -> bool {
        if let Some(answer) = self.intrinsic(Builtins::IS_POD, "is_pod", |p| {
            Some(p.is_trivial(self.db, ty)? && p.is_standard_layout(self.db, ty)?)
        }) {
            return answer;
        }
        let element = remove_all_extents(self.db, ty);
        self.is_trivially_default_constructible(element)
            && self.is_trivially_copy_constructible(element)
            && self.is_trivially_copy_assignable(element)
            && self.is_trivially_destructible(element)
            && self.is_standard_layout(element)
    }

    pub fn is_literal_type(&self, ty: TypeId) -> bool {
        if let Some(answer) = self.intrinsic(Builtins::IS_LITERAL_TYPE, "is_literal_type", |p| {
            p.is_literal_type(self.db, ty)
        }) {
            return answer;
        }
        let element = remove_all_extents(self.db, ty);
        is_scalar(self.db, element) || is_reference(self.db, element)
    }

    pub fn is_aggregate(&self, ty: TypeId) -> bool {
        self.gated(Builtins::IS_AGGREGATE, "is_aggregate", ty, |p| {
            p.is_aggregate(self.db, ty)
        })
    }

    pub fn has_unique_object_representations(&self, ty: TypeId) -> bool {
        self.gated(
            Builtins::HAS_UNIQUE_OBJECT_REPRESENTATIONS,
            "has_unique_object_representations",
            ty,
            |p| p.has_unique_object_representations(self.db, ty),
        )
    }

    /// The underlying integer type of an enumeration.
    ///
    /// `Err(NotEnum)` for any other type; `Ok(None)` when the builtin is
    /// unavailable or the provider does not know.
    pub fn underlying_type(&self, ty: TypeId) -> TraitResult<Option<TypeId>> {
        if enum_decl(self.db, ty).is_none() {
            return Err(TraitError::NotEnum {
                ty: TypeFormatter::new(self.db).format(ty),
            });
        }
        let answer = self.intrinsic(Builtins::UNDERLYING_TYPE, "underlying_type", |p| {
            p.underlying_type(self.db, ty)
        });
        if answer.is_none() {
            debug!(ty = ty.0, "underlying_type has no intrinsic answer");
        }
        Ok(answer)
    }
}

#[cfg(test)]
#[path = "../tests/properties_tests.rs"]
mod tests;
