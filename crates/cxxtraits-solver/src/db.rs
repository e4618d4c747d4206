//! Type database abstraction for the solver.
//!
//! This trait isolates the trait layers from concrete storage, so an
//! embedding front end can answer type and declaration lookups from its own
//! tables instead of a `TypeInterner`.

use crate::def::{EnumDecl, RecordDecl};
use crate::intern::TypeInterner;
use crate::types::{
    CvQualifiers, EnumId, FunctionShape, FunctionShapeId, RecordId, TypeData, TypeId,
};
use cxxtraits_common::TargetInfo;
use cxxtraits_common::interner::Atom;
use std::sync::Arc;

/// Query interface for the solver.
///
/// This keeps solver components generic and prevents them from reaching
/// into concrete storage structures directly. Implementations must be
/// shareable across threads: answers never depend on which thread asks or
/// in which order questions arrive.
pub trait TypeDatabase: Send + Sync {
    fn lookup(&self, id: TypeId) -> Option<TypeData>;
    fn function_shape(&self, id: FunctionShapeId) -> Option<Arc<FunctionShape>>;
    fn record(&self, id: RecordId) -> Option<Arc<RecordDecl>>;
    fn enum_decl(&self, id: EnumId) -> Option<Arc<EnumDecl>>;
    fn target(&self) -> &TargetInfo;
    fn resolve_atom(&self, atom: Atom) -> Arc<str>;

    fn qualified(&self, ty: TypeId, cv: CvQualifiers) -> TypeId;
    fn pointer(&self, pointee: TypeId) -> TypeId;
    fn lvalue_reference(&self, ty: TypeId) -> TypeId;
    fn rvalue_reference(&self, ty: TypeId) -> TypeId;
    fn array(&self, element: TypeId, bound: Option<u64>) -> TypeId;
    fn function(&self, shape: FunctionShape) -> TypeId;
    fn member_pointer(&self, class: TypeId, pointee: TypeId) -> TypeId;
    fn record_type(&self, id: RecordId) -> TypeId;
}

impl TypeDatabase for TypeInterner {
    fn lookup(&self, id: TypeId) -> Option<TypeData> {
        TypeInterner::lookup(self, id)
    }

    fn function_shape(&self, id: FunctionShapeId) -> Option<Arc<FunctionShape>> {
        TypeInterner::function_shape(self, id)
    }

    fn record(&self, id: RecordId) -> Option<Arc<RecordDecl>> {
        self.record_decl(id)
    }

    fn enum_decl(&self, id: EnumId) -> Option<Arc<EnumDecl>> {
        TypeInterner::enum_decl(self, id)
    }

    fn target(&self) -> &TargetInfo {
        TypeInterner::target(self)
    }

    fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        TypeInterner::resolve_atom(self, atom)
    }

    fn qualified(&self, ty: TypeId, cv: CvQualifiers) -> TypeId {
        TypeInterner::qualified(self, ty, cv)
    }

    fn pointer(&self, pointee: TypeId) -> TypeId {
        TypeInterner::pointer(self, pointee)
    }

    fn lvalue_reference(&self, ty: TypeId) -> TypeId {
        TypeInterner::lvalue_reference(self, ty)
    }

    fn rvalue_reference(&self, ty: TypeId) -> TypeId {
        TypeInterner::rvalue_reference(self, ty)
    }

    fn array(&self, element: TypeId, bound: Option<u64>) -> TypeId {
        TypeInterner::array(self, element, bound)
    }

    fn function(&self, shape: FunctionShape) -> TypeId {
        TypeInterner::function(self, shape)
    }

    fn member_pointer(&self, class: TypeId, pointee: TypeId) -> TypeId {
        TypeInterner::member_pointer(self, class, pointee)
    }

    fn record_type(&self, id: RecordId) -> TypeId {
        TypeInterner::record_type(self, id)
    }
}
