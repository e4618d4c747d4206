//! Type interning for structural deduplication.
//!
//! This module implements the interning engine that converts `TypeData`
//! nodes into lightweight `TypeId` handles, and the factory methods that
//! keep every interned type in canonical form:
//!
//! - cv-qualification of an array applies to its element type
//! - cv-qualification of a reference or function type is discarded
//! - nested qualifications merge
//! - references collapse (`T& &&` is `T&`, `T&& &&` is `T&&`)
//! - function parameters decay and lose top-level qualification
//!
//! Because of this, type equality is `TypeId` equality everywhere else.

use crate::def::{DeclarationStore, EnumDecl, RecordDecl, RecordKind};
use crate::record_builder::RecordBuilder;
use crate::types::*;
use cxxtraits_common::TargetInfo;
use cxxtraits_common::interner::{Atom, ShardedInterner};
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS; // 64 shards
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

struct TypeShard {
    key_to_index: RwLock<FxHashMap<TypeData, u32>>,
    index_to_key: RwLock<Vec<TypeData>>,
}

impl TypeShard {
    fn new() -> Self {
        TypeShard {
            key_to_index: RwLock::new(FxHashMap::default()),
            index_to_key: RwLock::new(Vec::new()),
        }
    }
}

struct ValueInterner<T> {
    items: Vec<Arc<T>>,
    map: FxHashMap<Arc<T>, u32>,
}

impl<T> ValueInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        ValueInterner {
            items: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.map.get(&value) {
            return id;
        }

        let arc = Arc::new(value);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<T>> {
        self.items.get(id as usize).cloned()
    }
}

/// Type interner and declaration registry for one modeled program.
///
/// Thread-safe via sharded `RwLock`s; declarations live in a concurrent
/// `DeclarationStore`.
pub struct TypeInterner {
    shards: [TypeShard; SHARD_COUNT],
    function_shapes: RwLock<ValueInterner<FunctionShape>>,
    names: ShardedInterner,
    declarations: DeclarationStore,
    target: TargetInfo,
}

impl TypeInterner {
    pub fn new() -> Self {
        Self::with_target(TargetInfo::default())
    }

    pub fn with_target(target: TargetInfo) -> Self {
        let names = ShardedInterner::new();
        names.intern_common();
        TypeInterner {
            shards: std::array::from_fn(|_| TypeShard::new()),
            function_shapes: RwLock::new(ValueInterner::new()),
            names,
            declarations: DeclarationStore::new(),
            target,
        }
    }

    pub fn target(&self) -> &TargetInfo {
        &self.target
    }

    pub fn declarations(&self) -> &DeclarationStore {
        &self.declarations
    }

    pub fn intern_string(&self, s: &str) -> Atom {
        self.names.intern(s)
    }

    pub fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.names.resolve(atom)
    }

    // -------------------------------------------------------------------------
    // Raw interning
    // -------------------------------------------------------------------------

    fn get_intrinsic_id(data: &TypeData) -> Option<TypeId> {
        match data {
            TypeData::Void => Some(TypeId::VOID),
            TypeData::NullPtr => Some(TypeId::NULLPTR),
            TypeData::Builtin(kind) => Some(kind.type_id()),
            _ => None,
        }
    }

    fn get_intrinsic_data(id: TypeId) -> Option<TypeData> {
        match id {
            TypeId::VOID => Some(TypeData::Void),
            TypeId::NULLPTR => Some(TypeData::NullPtr),
            _ => BuiltinKind::from_type_id(id).map(TypeData::Builtin),
        }
    }

    #[inline]
    fn make_id(local_index: u32, shard_idx: u32) -> TypeId {
        TypeId(TypeId::FIRST_USER + ((local_index << SHARD_BITS) | (shard_idx & SHARD_MASK)))
    }

    /// Intern a type node as given. Callers outside this module should use the
    /// canonicalizing factory methods instead.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(id) = Self::get_intrinsic_id(&data) {
            return id;
        }

        let mut hasher = FxHasher::default();
        data.hash(&mut hasher);
        let shard_idx = (hasher.finish() as usize) & (SHARD_COUNT - 1);
        let shard = &self.shards[shard_idx];

        {
            let map = shard
                .key_to_index
                .read()
                .expect("shard key_to_index lock poisoned");
            if let Some(&local_index) = map.get(&data) {
                return Self::make_id(local_index, shard_idx as u32);
            }
        }

        let mut map = shard
            .key_to_index
            .write()
            .expect("shard key_to_index lock poisoned");
        let mut storage = shard
            .index_to_key
            .write()
            .expect("shard index_to_key lock poisoned");

        if let Some(&local_index) = map.get(&data) {
            return Self::make_id(local_index, shard_idx as u32);
        }

        let local_index = storage.len() as u32;
        storage.push(data.clone());
        map.insert(data, local_index);

        Self::make_id(local_index, shard_idx as u32)
    }

    /// Look up the node for a given `TypeId`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        if id.is_intrinsic() {
            return Self::get_intrinsic_data(id);
        }

        let raw_val = id.0.checked_sub(TypeId::FIRST_USER)?;
        let shard_idx = (raw_val & SHARD_MASK) as usize;
        let local_index = raw_val >> SHARD_BITS;

        let shard = self.shards.get(shard_idx)?;
        let storage = shard
            .index_to_key
            .read()
            .expect("shard index_to_key lock poisoned");
        storage.get(local_index as usize).cloned()
    }

    pub fn function_shape(&self, id: FunctionShapeId) -> Option<Arc<FunctionShape>> {
        self.function_shapes
            .read()
            .expect("function_shapes lock poisoned")
            .get(id.0)
    }

    /// Number of interned non-intrinsic types.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                shard
                    .index_to_key
                    .read()
                    .expect("shard index_to_key lock poisoned")
                    .len()
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -------------------------------------------------------------------------
    // Canonicalizing factories
    // -------------------------------------------------------------------------

    pub fn builtin(&self, kind: BuiltinKind) -> TypeId {
        kind.type_id()
    }

    /// Add `cv` to `ty`.
    pub fn qualified(&self, ty: TypeId, cv: CvQualifiers) -> TypeId {
        if cv.is_empty() {
            return ty;
        }
        match self.lookup(ty) {
            Some(TypeData::Qualified(inner, existing)) => {
                if existing.contains(cv) {
                    ty
                } else {
                    self.intern(TypeData::Qualified(inner, existing | cv))
                }
            }
            Some(TypeData::LValueRef(_) | TypeData::RValueRef(_) | TypeData::Function(_)) => ty,
            Some(TypeData::Array { element, bound }) => {
                let element = self.qualified(element, cv);
                self.array(element, bound)
            }
            _ => self.intern(TypeData::Qualified(ty, cv)),
        }
    }

    pub fn pointer(&self, pointee: TypeId) -> TypeId {
        debug_assert!(
            !matches!(
                self.lookup(pointee),
                Some(TypeData::LValueRef(_) | TypeData::RValueRef(_))
            ),
            "pointer to reference"
        );
        self.intern(TypeData::Pointer(pointee))
    }

    /// `ty&`, collapsing references.
    pub fn lvalue_reference(&self, ty: TypeId) -> TypeId {
        match self.lookup(ty) {
            Some(TypeData::LValueRef(_)) => ty,
            Some(TypeData::RValueRef(inner)) => self.intern(TypeData::LValueRef(inner)),
            _ => self.intern(TypeData::LValueRef(ty)),
        }
    }

    /// `ty&&`, collapsing references.
    pub fn rvalue_reference(&self, ty: TypeId) -> TypeId {
        match self.lookup(ty) {
            Some(TypeData::LValueRef(_) | TypeData::RValueRef(_)) => ty,
            _ => self.intern(TypeData::RValueRef(ty)),
        }
    }

    pub fn array(&self, element: TypeId, bound: Option<u64>) -> TypeId {
        self.intern(TypeData::Array { element, bound })
    }

    /// Intern a function type, adjusting parameter types the way a function
    /// declarator does.
    pub fn function(&self, mut shape: FunctionShape) -> TypeId {
        for param in &mut shape.params {
            *param = self.adjust_parameter(*param);
        }
        let id = self
            .function_shapes
            .write()
            .expect("function_shapes lock poisoned")
            .intern(shape);
        self.intern(TypeData::Function(FunctionShapeId(id)))
    }

    fn adjust_parameter(&self, param: TypeId) -> TypeId {
        match self.lookup(param) {
            Some(TypeData::Qualified(inner, _)) => inner,
            Some(TypeData::Array { element, .. }) => self.pointer(element),
            Some(TypeData::Function(_)) => self.pointer(param),
            _ => param,
        }
    }

    /// `pointee class::*`. `class` must be an unqualified record type.
    pub fn member_pointer(&self, class: TypeId, pointee: TypeId) -> TypeId {
        self.intern(TypeData::MemberPointer { class, pointee })
    }

    pub fn record_type(&self, id: crate::types::RecordId) -> TypeId {
        self.intern(TypeData::Record(id))
    }

    pub fn enum_type(&self, id: EnumId) -> TypeId {
        self.intern(TypeData::Enum(id))
    }

    // -------------------------------------------------------------------------
    // Declarations
    // -------------------------------------------------------------------------

    /// Start declaring a class.
    pub fn class(&self, name: &str) -> RecordBuilder<'_> {
        RecordBuilder::new(self, name, RecordKind::Class)
    }

    /// Start declaring a struct.
    pub fn struct_(&self, name: &str) -> RecordBuilder<'_> {
        RecordBuilder::new(self, name, RecordKind::Struct)
    }

    /// Start declaring a union.
    pub fn union(&self, name: &str) -> RecordBuilder<'_> {
        RecordBuilder::new(self, name, RecordKind::Union)
    }

    /// Forward-declare a record that is never completed.
    pub fn incomplete_record(&self, name: &str, kind: RecordKind) -> TypeId {
        let id = self
            .declarations
            .declare_record(self.intern_string(name), kind);
        self.record_type(id)
    }

    pub fn record_decl(&self, id: crate::types::RecordId) -> Option<Arc<RecordDecl>> {
        self.declarations.record(id)
    }

    /// Declare an enumeration whose enumerators span `min..=max`.
    pub fn enumeration(
        &self,
        name: &str,
        scoped: bool,
        fixed_underlying: Option<TypeId>,
        range: (i128, i128),
    ) -> TypeId {
        let decl = EnumDecl {
            id: EnumId(0),
            name: self.intern_string(name),
            scoped,
            fixed_underlying,
            min_value: range.0,
            max_value: range.1,
        };
        let id = self.declarations.declare_enum(decl);
        self.enum_type(id)
    }

    pub fn enum_decl(&self, id: EnumId) -> Option<Arc<EnumDecl>> {
        self.declarations.enum_decl(id)
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
