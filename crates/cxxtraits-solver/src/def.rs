//! Record and enumeration declarations.
//!
//! Class, struct and union types are nominal: a `TypeData::Record` only
//! carries a `RecordId`, and everything the trait layers need to know about
//! the class (bases, members, special member functions, derived facts and
//! layout) lives in a `RecordDecl` owned by the `DeclarationStore`.
//!
//! Records are created in two steps. `declare_record` hands out an id for an
//! incomplete type, so a class can mention itself in its own members
//! (`Widget(const Widget&)`). `define_record` then installs the completed
//! declaration produced by `RecordBuilder::finish`.

use crate::types::{Access, CvQualifiers, EnumId, RecordId, RefQualifier, TypeId};
use cxxtraits_common::TargetInfo;
use cxxtraits_common::interner::Atom;
use dashmap::DashMap;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use tracing::trace;

// =============================================================================
// Member functions
// =============================================================================

/// How a member function came into existence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Declared and defined by the user.
    UserProvided,
    /// Declared `= default` on its first declaration.
    Defaulted,
    /// Declared `= delete`.
    Deleted,
    /// Implicitly declared by the compiler.
    Implicit,
}

/// A constructor, assignment operator, destructor, conversion function,
/// call operator, dereference operator or free `swap` overload.
///
/// Constructors return `void`; conversion functions return their target
/// type. For member functions `cv` and `ref_qualifier` qualify the implicit
/// object parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionDecl {
    pub params: Vec<TypeId>,
    pub variadic: bool,
    pub ret: TypeId,
    pub cv: CvQualifiers,
    pub ref_qualifier: RefQualifier,
    pub explicit: bool,
    pub noexcept: bool,
    pub constexpr: bool,
    pub access: Access,
    pub origin: Origin,
    pub deleted: bool,
    /// A defaulted move operation defined as deleted; overload resolution
    /// ignores it so the copy operation is selected instead.
    pub hidden: bool,
    pub trivial: bool,
    pub is_virtual: bool,
}

impl FunctionDecl {
    /// A user-provided public function taking `params` and returning `void`.
    pub fn new(params: Vec<TypeId>) -> Self {
        Self {
            params,
            variadic: false,
            ret: TypeId::VOID,
            cv: CvQualifiers::empty(),
            ref_qualifier: RefQualifier::None,
            explicit: false,
            noexcept: false,
            constexpr: false,
            access: Access::Public,
            origin: Origin::UserProvided,
            deleted: false,
            hidden: false,
            trivial: false,
            is_virtual: false,
        }
    }

    pub fn returning(mut self, ret: TypeId) -> Self {
        self.ret = ret;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn explicit(mut self) -> Self {
        self.explicit = true;
        self
    }

    pub fn noexcept(mut self) -> Self {
        self.noexcept = true;
        self
    }

    pub fn constexpr(mut self) -> Self {
        self.constexpr = true;
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_cv(mut self, cv: CvQualifiers) -> Self {
        self.cv = cv;
        self
    }

    pub fn with_ref(mut self, ref_qualifier: RefQualifier) -> Self {
        self.ref_qualifier = ref_qualifier;
        self
    }

    pub fn virtual_(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    /// `= default`. Deletedness, triviality and the exception specification
    /// are computed when the record is finished.
    pub fn defaulted(mut self) -> Self {
        self.origin = Origin::Defaulted;
        self
    }

    /// `= delete`.
    pub fn deleted(mut self) -> Self {
        self.origin = Origin::Deleted;
        self.deleted = true;
        self
    }

    #[inline]
    pub fn is_user_declared(&self) -> bool {
        self.origin != Origin::Implicit
    }

    #[inline]
    pub fn is_user_provided(&self) -> bool {
        self.origin == Origin::UserProvided
    }

    /// Whether the compiler defines the body (implicit or `= default`).
    #[inline]
    pub fn is_compiler_defined(&self) -> bool {
        matches!(self.origin, Origin::Implicit | Origin::Defaulted)
    }

    /// Callable from outside the class: public and not deleted.
    #[inline]
    pub fn is_usable(&self) -> bool {
        !self.deleted && self.access == Access::Public
    }

    /// Accepts exactly `arity` arguments without an ellipsis.
    #[inline]
    pub fn takes(&self, arity: usize) -> bool {
        self.params.len() == arity && !self.variadic
    }
}

// =============================================================================
// Records
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Class,
    Struct,
    Union,
}

impl RecordKind {
    /// Default member and base access for this class-key.
    pub fn default_access(self) -> Access {
        match self {
            RecordKind::Class => Access::Private,
            RecordKind::Struct | RecordKind::Union => Access::Public,
        }
    }
}

/// A direct base class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseSpec {
    /// The base's record type (unqualified).
    pub ty: TypeId,
    pub access: Access,
    pub is_virtual: bool,
}

/// A non-static data member.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDecl {
    pub name: Atom,
    pub ty: TypeId,
    pub access: Access,
    /// Has a default member initializer (`int x = 0;`).
    pub has_initializer: bool,
    pub is_mutable: bool,
}

/// A virtual member function other than the destructor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VirtualMethod {
    pub name: Atom,
    pub pure: bool,
}

/// Facts derived from the declaration when the record is finished.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RecordFacts {
    pub polymorphic: bool,
    pub abstract_: bool,
    pub has_virtual_bases: bool,
    pub virtual_destructor: bool,
    pub empty: bool,
    pub standard_layout: bool,
    pub trivially_copyable: bool,
    pub trivial_default_constructor: bool,
    pub trivial: bool,
    pub aggregate: bool,
    pub literal: bool,
    pub unique_object_representations: bool,
    /// Pure virtual functions without a final overrider.
    pub unresolved_pure: Vec<Atom>,
}

/// Size and alignment of a complete record, in bytes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RecordLayout {
    pub size: u64,
    pub align: u64,
}

/// A class, struct or union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordDecl {
    pub id: RecordId,
    pub name: Atom,
    pub kind: RecordKind,
    pub complete: bool,
    pub bases: Vec<BaseSpec>,
    pub fields: Vec<FieldDecl>,
    pub constructors: Vec<FunctionDecl>,
    pub assignments: Vec<FunctionDecl>,
    /// Always present on a complete record.
    pub destructor: Option<FunctionDecl>,
    pub conversions: Vec<FunctionDecl>,
    pub call_operators: Vec<FunctionDecl>,
    pub deref: Option<FunctionDecl>,
    /// Free `swap` overloads found by argument-dependent lookup.
    pub swaps: Vec<FunctionDecl>,
    pub virtual_methods: Vec<VirtualMethod>,
    /// `Some(T)` when this record is a reference wrapper around `T`: it
    /// exposes `T& get() const`.
    pub wraps: Option<TypeId>,
    pub is_final: bool,
    pub facts: RecordFacts,
    pub layout: RecordLayout,
}

impl RecordDecl {
    /// An incomplete (forward-declared) record.
    pub fn incomplete(id: RecordId, name: Atom, kind: RecordKind) -> Self {
        Self {
            id,
            name,
            kind,
            complete: false,
            bases: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            assignments: Vec::new(),
            destructor: None,
            conversions: Vec::new(),
            call_operators: Vec::new(),
            deref: None,
            swaps: Vec::new(),
            virtual_methods: Vec::new(),
            wraps: None,
            is_final: false,
            facts: RecordFacts::default(),
            layout: RecordLayout::default(),
        }
    }

    #[inline]
    pub fn is_union(&self) -> bool {
        self.kind == RecordKind::Union
    }
}

// =============================================================================
// Enumerations
// =============================================================================

/// An enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumDecl {
    pub id: EnumId,
    pub name: Atom,
    pub scoped: bool,
    /// `enum E : T`.
    pub fixed_underlying: Option<TypeId>,
    /// Smallest and largest enumerator values.
    pub min_value: i128,
    pub max_value: i128,
}

impl EnumDecl {
    /// The underlying integer type on `target`.
    ///
    /// Scoped enumerations default to `int`. Unscoped enumerations without a
    /// fixed type use the first of `int`, `unsigned int`, `long`,
    /// `unsigned long`, `long long`, `unsigned long long` that can represent
    /// every enumerator.
    pub fn underlying(&self, target: &TargetInfo) -> TypeId {
        use crate::types::BuiltinKind;

        if let Some(fixed) = self.fixed_underlying {
            return fixed;
        }
        if self.scoped {
            return TypeId::INT;
        }
        let ladder = [
            BuiltinKind::Int,
            BuiltinKind::UnsignedInt,
            BuiltinKind::Long,
            BuiltinKind::UnsignedLong,
            BuiltinKind::LongLong,
            BuiltinKind::UnsignedLongLong,
        ];
        for kind in ladder {
            let bits = kind.value_bits(target);
            let (lo, hi) = if kind.is_signed(target) {
                let half = 1i128 << (bits - 1);
                (-half, half - 1)
            } else {
                (0, (1i128 << bits) - 1)
            };
            if self.min_value >= lo && self.max_value <= hi {
                return kind.type_id();
            }
        }
        TypeId::UNSIGNED_LONG_LONG
    }
}

// =============================================================================
// DeclarationStore
// =============================================================================

/// Storage for record and enumeration declarations.
///
/// Ids are allocated sequentially; the name index preserves declaration order.
pub struct DeclarationStore {
    records: DashMap<RecordId, Arc<RecordDecl>>,
    enums: DashMap<EnumId, Arc<EnumDecl>>,
    names: RwLock<IndexMap<Atom, RecordId>>,
    next_record: AtomicU32,
    next_enum: AtomicU32,
}

impl DeclarationStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            enums: DashMap::new(),
            names: RwLock::new(IndexMap::new()),
            next_record: AtomicU32::new(1),
            next_enum: AtomicU32::new(1),
        }
    }

    /// Allocate an id for a new, incomplete record.
    pub fn declare_record(&self, name: Atom, kind: RecordKind) -> RecordId {
        let id = RecordId(self.next_record.fetch_add(1, Ordering::SeqCst));
        trace!(record_id = id.0, name = name.0, ?kind, "declare_record");
        self.records
            .insert(id, Arc::new(RecordDecl::incomplete(id, name, kind)));
        if !name.is_none() {
            self.names
                .write()
                .expect("declaration name index lock poisoned")
                .insert(name, id);
        }
        id
    }

    /// Install the completed declaration of a previously declared record.
    pub fn define_record(&self, decl: RecordDecl) {
        trace!(record_id = decl.id.0, complete = decl.complete, "define_record");
        self.records.insert(decl.id, Arc::new(decl));
    }

    pub fn record(&self, id: RecordId) -> Option<Arc<RecordDecl>> {
        self.records.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Most recent record declared with `name`.
    pub fn find_record(&self, name: Atom) -> Option<RecordId> {
        self.names
            .read()
            .expect("declaration name index lock poisoned")
            .get(&name)
            .copied()
    }

    /// Record ids in declaration order.
    pub fn record_ids(&self) -> Vec<RecordId> {
        self.names
            .read()
            .expect("declaration name index lock poisoned")
            .values()
            .copied()
            .collect()
    }

    pub fn declare_enum(&self, mut decl: EnumDecl) -> EnumId {
        let id = EnumId(self.next_enum.fetch_add(1, Ordering::SeqCst));
        decl.id = id;
        trace!(enum_id = id.0, name = decl.name.0, scoped = decl.scoped, "declare_enum");
        self.enums.insert(id, Arc::new(decl));
        id
    }

    pub fn enum_decl(&self, id: EnumId) -> Option<Arc<EnumDecl>> {
        self.enums.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl Default for DeclarationStore {
    fn default() -> Self {
        Self::new()
    }
}
