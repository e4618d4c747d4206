//! Record declarations.
//!
//! `RecordBuilder` collects the user-declared parts of a class and `finish`
//! completes it the way a compiler does at the closing brace:
//!
//! - implicit special members are declared, and defined as deleted when a
//!   base or member makes them so;
//! - move operations are suppressed by user-declared copy operations or a
//!   user-declared destructor, and a defaulted move that would be deleted
//!   is hidden from overload resolution;
//! - triviality and exception specifications of compiler-defined members
//!   follow from the bases and members;
//! - the class properties (`RecordFacts`) are derived and the record is
//!   laid out.

use crate::TypeDatabase;
use crate::class_hierarchy::ClassHierarchy;
use crate::def::{BaseSpec, FieldDecl, FunctionDecl, Origin, RecordDecl, RecordFacts, RecordKind, VirtualMethod};
use crate::error::{TraitError, TraitResult};
use crate::expr::{Effects, Expr, Sema};
use crate::format::TypeFormatter;
use crate::intern::TypeInterner;
use crate::layout::{LayoutInput, has_unique_representation, lay_out_record, size_of};
use crate::type_queries::{
    complete_record, cv_of, is_complete_object, is_void, record_id, referent, strip_all_extents,
    unqualified,
};
use crate::types::{Access, CvQualifiers, TypeId};
use cxxtraits_common::limits::MAX_HIERARCHY_DEPTH;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Special {
    DefaultConstructor,
    CopyConstructor,
    MoveConstructor,
    CopyAssignment,
    MoveAssignment,
}

/// A base class or non-static data member as seen by a compiler-defined
/// special member.
#[derive(Copy, Clone, Debug)]
struct Subobject {
    /// The element type for arrays, with the member's cv-qualification.
    ty: TypeId,
    is_base: bool,
    /// `Some(is_rvalue)` for reference members.
    reference: Option<bool>,
    has_initializer: bool,
}

/// How a defaulted special member turns out.
#[derive(Copy, Clone, Debug)]
struct Defaulted {
    deleted: bool,
    trivial: bool,
    noexcept: bool,
}

impl Defaulted {
    const DELETED: Defaulted = Defaulted {
        deleted: true,
        trivial: false,
        noexcept: true,
    };

    fn defined(trivial: bool) -> Self {
        Defaulted {
            deleted: false,
            trivial,
            noexcept: true,
        }
    }

    fn absorb(&mut self, effects: Effects) {
        self.trivial &= effects.trivial;
        self.noexcept &= effects.nothrow;
    }

    fn apply(self, func: &mut FunctionDecl) {
        func.deleted = self.deleted;
        func.trivial = self.trivial && !self.deleted;
        func.noexcept = self.noexcept;
    }

    fn implicit(self, params: Vec<TypeId>) -> FunctionDecl {
        let mut func = FunctionDecl::new(params);
        func.origin = Origin::Implicit;
        self.apply(&mut func);
        func
    }
}

/// Defines special members from the subobjects of one record.
struct Synthesis<'s, 'a> {
    sema: &'s Sema<'a>,
    subobjects: &'s [Subobject],
    is_union: bool,
    /// Has virtual functions or virtual bases.
    dynamic: bool,
}

impl Synthesis<'_, '_> {
    fn db(&self) -> &dyn TypeDatabase {
        self.sema.db()
    }

    fn destructible(&self, ty: TypeId) -> bool {
        self.sema.destroy(ty).is_ok()
    }

    fn default_constructor(&self) -> Defaulted {
        let db = self.db();
        if self.is_union {
            let initialized = self.subobjects.iter().any(|s| s.has_initializer);
            let mut result = Defaulted::defined(!initialized);
            for member in self.subobjects {
                if member.reference.is_some() {
                    return Defaulted::DELETED;
                }
                match self.sema.direct_initialize(member.ty, &[]) {
                    Ok(effects) if effects.trivial => {}
                    _ if initialized => result.trivial = false,
                    _ => return Defaulted::DELETED,
                }
            }
            return result;
        }

        let mut result = Defaulted::defined(!self.dynamic);
        for sub in self.subobjects {
            if sub.has_initializer {
                result.trivial = false;
                continue;
            }
            if sub.reference.is_some() {
                return Defaulted::DELETED;
            }
            if !sub.is_base && cv_of(db, sub.ty).contains(CvQualifiers::CONST) {
                let user_provided = complete_record(db, sub.ty).is_some_and(|decl| {
                    decl.constructors
                        .iter()
                        .any(|ctor| ctor.takes(0) && ctor.is_user_provided())
                });
                if !user_provided {
                    return Defaulted::DELETED;
                }
            }
            let Ok(effects) = self.sema.direct_initialize(sub.ty, &[]) else {
                return Defaulted::DELETED;
            };
            if !self.destructible(sub.ty) {
                return Defaulted::DELETED;
            }
            result.absorb(effects);
        }
        result
    }

    /// Copy (`copy`) or move construction of every subobject from the
    /// argument built by `arg`.
    fn construct_from(&self, copy: bool, arg: impl Fn(TypeId) -> Expr) -> Defaulted {
        let mut result = Defaulted::defined(!self.dynamic);
        for sub in self.subobjects {
            if let Some(is_rvalue) = sub.reference {
                if copy && is_rvalue {
                    return Defaulted::DELETED;
                }
                continue;
            }
            let Ok(effects) = self.sema.direct_initialize(sub.ty, &[arg(sub.ty)]) else {
                return Defaulted::DELETED;
            };
            if self.is_union {
                if !effects.trivial {
                    return Defaulted::DELETED;
                }
                continue;
            }
            if !self.destructible(sub.ty) {
                return Defaulted::DELETED;
            }
            result.absorb(effects);
        }
        result
    }

    fn copy_constructor(&self, const_param: bool) -> Defaulted {
        let db = self.db();
        self.construct_from(true, |ty| {
            if const_param {
                Expr::lvalue(db.qualified(ty, CvQualifiers::CONST))
            } else {
                Expr::lvalue(ty)
            }
        })
    }

    fn move_constructor(&self) -> Defaulted {
        self.construct_from(false, Expr::xvalue)
    }

    fn assign_from(&self, arg: impl Fn(TypeId) -> Expr) -> Defaulted {
        let db = self.db();
        let mut result = Defaulted::defined(!self.dynamic);
        for sub in self.subobjects {
            if sub.reference.is_some() {
                return Defaulted::DELETED;
            }
            if !sub.is_base
                && record_id(db, sub.ty).is_none()
                && cv_of(db, sub.ty).contains(CvQualifiers::CONST)
            {
                return Defaulted::DELETED;
            }
            let Ok(effects) = self.sema.assign(Expr::lvalue(sub.ty), arg(sub.ty)) else {
                return Defaulted::DELETED;
            };
            if self.is_union {
                if !effects.trivial {
                    return Defaulted::DELETED;
                }
                continue;
            }
            result.absorb(effects);
        }
        result
    }

    fn copy_assignment(&self, const_param: bool) -> Defaulted {
        let db = self.db();
        self.assign_from(|ty| {
            if const_param {
                Expr::lvalue(db.qualified(ty, CvQualifiers::CONST))
            } else {
                Expr::lvalue(ty)
            }
        })
    }

    fn move_assignment(&self) -> Defaulted {
        self.assign_from(Expr::xvalue)
    }

    fn destructor(&self) -> Defaulted {
        let mut result = Defaulted::defined(true);
        for sub in self.subobjects {
            if sub.reference.is_some() {
                continue;
            }
            let Ok(effects) = self.sema.destroy(sub.ty) else {
                return Defaulted::DELETED;
            };
            if self.is_union && !effects.trivial {
                return Defaulted::DELETED;
            }
            result.absorb(effects);
        }
        result
    }

    /// Whether the implicit copy operation takes `const C&`: every class
    /// subobject has a copy constructor (or copy assignment) accepting a
    /// `const` lvalue.
    fn const_copy_param(&self, assignment: bool) -> bool {
        let db = self.db();
        self.subobjects.iter().all(|sub| {
            if sub.reference.is_some() {
                return true;
            }
            let Some(decl) = complete_record(db, sub.ty) else {
                return true;
            };
            let class = unqualified(db, sub.ty);
            let funcs = if assignment {
                &decl.assignments
            } else {
                &decl.constructors
            };
            funcs.iter().any(|func| {
                func.takes(1)
                    && match referent(db, func.params[0]) {
                        Some((inner, false)) => {
                            unqualified(db, inner) == class
                                && cv_of(db, inner).contains(CvQualifiers::CONST)
                        }
                        None => assignment && unqualified(db, func.params[0]) == class,
                        Some(_) => false,
                    }
            })
        })
    }

    /// Whether an implicit default constructor would be `constexpr`.
    fn constexpr_default(&self) -> bool {
        let db = self.db();
        if self.is_union {
            return self.subobjects.is_empty() || self.subobjects.iter().any(|s| s.has_initializer);
        }
        self.subobjects.iter().all(|sub| {
            if sub.has_initializer {
                return true;
            }
            complete_record(db, sub.ty).is_some_and(|decl| {
                decl.constructors
                    .iter()
                    .any(|ctor| ctor.takes(0) && ctor.constexpr && !ctor.deleted)
            })
        })
    }
}

/// Declares a class, struct or union.
///
/// The record is declared (incomplete) as soon as the builder exists, so
/// members may refer to it through `self_type`. `finish` completes it.
pub struct RecordBuilder<'a> {
    db: &'a TypeInterner,
    decl: RecordDecl,
    self_type: TypeId,
    throwing_destructor: bool,
}

impl<'a> RecordBuilder<'a> {
    pub(crate) fn new(db: &'a TypeInterner, name: &str, kind: RecordKind) -> Self {
        let atom = db.intern_string(name);
        let id = db.declarations().declare_record(atom, kind);
        RecordBuilder {
            db,
            decl: RecordDecl::incomplete(id, atom, kind),
            self_type: db.record_type(id),
            throwing_destructor: false,
        }
    }

    /// The type being declared.
    pub fn self_type(&self) -> TypeId {
        self.self_type
    }

    /// `const C&`
    pub fn const_ref(&self) -> TypeId {
        self.db
            .lvalue_reference(self.db.qualified(self.self_type, CvQualifiers::CONST))
    }

    /// `C&`
    pub fn lvalue_ref(&self) -> TypeId {
        self.db.lvalue_reference(self.self_type)
    }

    /// `C&&`
    pub fn rvalue_ref(&self) -> TypeId {
        self.db.rvalue_reference(self.self_type)
    }

    /// A base with the class-key's default access.
    pub fn base(self, ty: TypeId) -> Self {
        let access = self.decl.kind.default_access();
        self.base_with(ty, access, false)
    }

    pub fn base_with(mut self, ty: TypeId, access: Access, is_virtual: bool) -> Self {
        self.decl.bases.push(BaseSpec {
            ty,
            access,
            is_virtual,
        });
        self
    }

    pub fn virtual_base(self, ty: TypeId) -> Self {
        let access = self.decl.kind.default_access();
        self.base_with(ty, access, true)
    }

    /// A data member with the class-key's default access.
    pub fn field(self, name: &str, ty: TypeId) -> Self {
        let access = self.decl.kind.default_access();
        self.push_field(name, ty, access, false, false)
    }

    pub fn field_with_access(self, name: &str, ty: TypeId, access: Access) -> Self {
        self.push_field(name, ty, access, false, false)
    }

    /// A data member with a default member initializer.
    pub fn initialized_field(self, name: &str, ty: TypeId) -> Self {
        let access = self.decl.kind.default_access();
        self.push_field(name, ty, access, true, false)
    }

    pub fn mutable_field(self, name: &str, ty: TypeId) -> Self {
        let access = self.decl.kind.default_access();
        self.push_field(name, ty, access, false, true)
    }

    fn push_field(
        mut self,
        name: &str,
        ty: TypeId,
        access: Access,
        has_initializer: bool,
        is_mutable: bool,
    ) -> Self {
        self.decl.fields.push(FieldDecl {
            name: self.db.intern_string(name),
            ty,
            access,
            has_initializer,
            is_mutable,
        });
        self
    }

    pub fn constructor(mut self, func: FunctionDecl) -> Self {
        self.decl.constructors.push(func);
        self
    }

    /// An assignment operator. A `void` return type is taken to mean the
    /// conventional `C&`.
    pub fn assignment(mut self, mut func: FunctionDecl) -> Self {
        if func.ret == TypeId::VOID {
            func.ret = self.lvalue_ref();
        }
        self.decl.assignments.push(func);
        self
    }

    /// A user-declared destructor. Without an explicit `noexcept` it gets
    /// the implicit exception specification; see `throwing_destructor`.
    pub fn destructor(mut self, func: FunctionDecl) -> Self {
        self.decl.destructor = Some(func);
        self
    }

    /// A user-provided `~C() noexcept(false)`.
    pub fn throwing_destructor(mut self) -> Self {
        self.decl.destructor = Some(FunctionDecl::new(Vec::new()));
        self.throwing_destructor = true;
        self
    }

    /// A user-provided `virtual ~C()`.
    pub fn virtual_destructor(self) -> Self {
        self.destructor(FunctionDecl::new(Vec::new()).virtual_())
    }

    /// A conversion function; `func.ret` is the target type.
    pub fn conversion(mut self, func: FunctionDecl) -> Self {
        self.decl.conversions.push(func);
        self
    }

    pub fn call_operator(mut self, func: FunctionDecl) -> Self {
        self.decl.call_operators.push(func);
        self
    }

    /// `operator*`, making the record a smart-handle.
    pub fn deref(mut self, func: FunctionDecl) -> Self {
        self.decl.deref = Some(func);
        self
    }

    /// A free `swap` overload found by argument-dependent lookup.
    pub fn swap(mut self, func: FunctionDecl) -> Self {
        self.decl.swaps.push(func);
        self
    }

    pub fn virtual_method(mut self, name: &str) -> Self {
        let name = self.db.intern_string(name);
        self.decl.virtual_methods.push(VirtualMethod { name, pure: false });
        self
    }

    pub fn pure_virtual(mut self, name: &str) -> Self {
        let name = self.db.intern_string(name);
        self.decl.virtual_methods.push(VirtualMethod { name, pure: true });
        self
    }

    /// Make the record a reference wrapper around `ty`: it exposes `T&`
    /// through `get()` and through `operator T&() const noexcept`.
    pub fn wraps(mut self, ty: TypeId) -> Self {
        let reference = self.db.lvalue_reference(ty);
        self.decl.wraps = Some(ty);
        self.decl.conversions.push(
            FunctionDecl::new(Vec::new())
                .returning(reference)
                .with_cv(CvQualifiers::CONST)
                .noexcept(),
        );
        self
    }

    pub fn final_(mut self) -> Self {
        self.decl.is_final = true;
        self
    }

    /// Complete the record.
    pub fn finish(mut self) -> TraitResult<TypeId> {
        self.check_bases()?;
        self.check_fields()?;

        let db: &dyn TypeDatabase = self.db;
        let base_decls: Vec<_> = self
            .decl
            .bases
            .iter()
            .filter_map(|base| complete_record(db, base.ty))
            .collect();
        let has_virtual_bases = self.decl.bases.iter().any(|base| base.is_virtual)
            || base_decls.iter().any(|decl| decl.facts.has_virtual_bases);
        let inherits_virtual_destructor = base_decls
            .iter()
            .any(|decl| decl.facts.virtual_destructor);
        let polymorphic = !self.decl.virtual_methods.is_empty()
            || self.decl.destructor.as_ref().is_some_and(|d| d.is_virtual)
            || base_decls.iter().any(|decl| decl.facts.polymorphic);

        let subobjects = self.subobjects();
        let sema = Sema::new(db);
        let synthesis = Synthesis {
            sema: &sema,
            subobjects: &subobjects,
            is_union: self.decl.is_union(),
            dynamic: polymorphic || has_virtual_bases,
        };
        self.declare_special_members(&synthesis, inherits_virtual_destructor);

        let mut facts = self.facts(polymorphic, has_virtual_bases);
        let fields: Vec<TypeId> = self.decl.fields.iter().map(|field| field.ty).collect();
        let layout = lay_out_record(
            db,
            &LayoutInput {
                is_union: self.decl.is_union(),
                dynamic: polymorphic || has_virtual_bases,
                bases: &self.decl.bases,
                fields: &fields,
            },
        )
        .ok_or_else(|| TraitError::RecordTooLarge { record: self.name() })?;
        facts.unique_object_representations = self.unique_representation(&facts, layout.size);

        debug!(
            record = %self.name(),
            size = layout.size,
            align = layout.align,
            trivial = facts.trivial,
            aggregate = facts.aggregate,
            "finish record"
        );
        self.decl.complete = true;
        self.decl.facts = facts;
        self.decl.layout = layout;
        self.db.declarations().define_record(self.decl);
        Ok(self.self_type)
    }

    fn name(&self) -> String {
        self.db.resolve_atom(self.decl.name).to_string()
    }

    fn format(&self, ty: TypeId) -> String {
        TypeFormatter::new(self.db).format(ty)
    }

    fn check_bases(&mut self) -> TraitResult<()> {
        let record = self.name();
        if self.decl.is_union() && !self.decl.bases.is_empty() {
            return Err(TraitError::UnionBase { record });
        }
        let db: &dyn TypeDatabase = self.db;
        for index in 0..self.decl.bases.len() {
            let ty = unqualified(db, self.decl.bases[index].ty);
            self.decl.bases[index].ty = ty;
            match record_id(db, ty) {
                Some(id) if id == self.decl.id => return Err(TraitError::SelfBase { record }),
                Some(_) => {}
                None => {
                    return Err(TraitError::InvalidBase {
                        record,
                        base: self.format(ty),
                    });
                }
            }
            match complete_record(db, ty) {
                None => {
                    return Err(TraitError::IncompleteBase {
                        record,
                        base: self.format(ty),
                    });
                }
                Some(decl) if decl.is_union() => {
                    return Err(TraitError::InvalidBase {
                        record,
                        base: self.format(ty),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn check_fields(&self) -> TraitResult<()> {
        let db: &dyn TypeDatabase = self.db;
        for field in &self.decl.fields {
            if referent(db, field.ty).is_some() {
                continue;
            }
            if is_void(db, field.ty) || !is_complete_object(db, field.ty) {
                return Err(TraitError::InvalidMember {
                    record: self.name(),
                    member: self.db.resolve_atom(field.name).to_string(),
                    ty: self.format(field.ty),
                });
            }
        }
        Ok(())
    }

    /// Direct bases, virtual bases of the bases, then data members.
    fn subobjects(&self) -> Vec<Subobject> {
        let db: &dyn TypeDatabase = self.db;
        let hierarchy = ClassHierarchy::new(db);
        let mut out = Vec::new();
        let mut virtual_seen = FxHashSet::default();
        let base = |ty| Subobject {
            ty,
            is_base: true,
            reference: None,
            has_initializer: false,
        };
        for spec in &self.decl.bases {
            if !spec.is_virtual || virtual_seen.insert(spec.ty) {
                out.push(base(spec.ty));
            }
            for indirect in hierarchy.all_bases(spec.ty) {
                if hierarchy.is_virtual_base_of(indirect, spec.ty) && virtual_seen.insert(indirect) {
                    out.push(base(indirect));
                }
            }
        }
        for field in &self.decl.fields {
            let reference = referent(db, field.ty).map(|(_, is_rvalue)| is_rvalue);
            out.push(Subobject {
                ty: if reference.is_some() {
                    field.ty
                } else {
                    strip_all_extents(db, field.ty)
                },
                is_base: false,
                reference,
                has_initializer: field.has_initializer,
            });
        }
        out
    }

    fn special_kind(&self, func: &FunctionDecl, assignment: bool) -> Option<Special> {
        let db: &dyn TypeDatabase = self.db;
        if !assignment && func.takes(0) {
            return Some(Special::DefaultConstructor);
        }
        if !func.takes(1) {
            return None;
        }
        let param = func.params[0];
        match referent(db, param) {
            Some((inner, is_rvalue)) if unqualified(db, inner) == self.self_type => {
                Some(match (assignment, is_rvalue) {
                    (false, false) => Special::CopyConstructor,
                    (false, true) => Special::MoveConstructor,
                    (true, false) => Special::CopyAssignment,
                    (true, true) => Special::MoveAssignment,
                })
            }
            None if assignment && unqualified(db, param) == self.self_type => {
                Some(Special::CopyAssignment)
            }
            _ => None,
        }
    }

    /// Whether the copy operation's parameter is `const C&` (or by value).
    fn takes_const(&self, func: &FunctionDecl) -> bool {
        let db: &dyn TypeDatabase = self.db;
        match referent(db, func.params[0]) {
            Some((inner, _)) => cv_of(db, inner).contains(CvQualifiers::CONST),
            None => true,
        }
    }

    fn declare_special_members(&mut self, synthesis: &Synthesis<'_, '_>, inherits_virtual_destructor: bool) {
        let ctor_kinds: Vec<Option<Special>> = self
            .decl
            .constructors
            .iter()
            .map(|func| self.special_kind(func, false))
            .collect();
        let assign_kinds: Vec<Option<Special>> = self
            .decl
            .assignments
            .iter()
            .map(|func| self.special_kind(func, true))
            .collect();
        let ctor_const: Vec<bool> = self
            .decl
            .constructors
            .iter()
            .zip(&ctor_kinds)
            .map(|(func, kind)| *kind == Some(Special::CopyConstructor) && self.takes_const(func))
            .collect();
        let assign_const: Vec<bool> = self
            .decl
            .assignments
            .iter()
            .zip(&assign_kinds)
            .map(|(func, kind)| *kind == Some(Special::CopyAssignment) && self.takes_const(func))
            .collect();

        let declared = |special| {
            ctor_kinds.contains(&Some(special)) || assign_kinds.contains(&Some(special))
        };
        let user_copy_ctor = declared(Special::CopyConstructor);
        let user_move_ctor = declared(Special::MoveConstructor);
        let user_copy_assign = declared(Special::CopyAssignment);
        let user_move_assign = declared(Special::MoveAssignment);
        let user_destructor = self.decl.destructor.is_some();
        let user_move = user_move_ctor || user_move_assign;
        let no_constructors = self.decl.constructors.is_empty();

        // Members declared `= default` are defined here.
        for (index, func) in self.decl.constructors.iter_mut().enumerate() {
            if func.origin != Origin::Defaulted {
                continue;
            }
            match ctor_kinds[index] {
                Some(Special::DefaultConstructor) => {
                    synthesis.default_constructor().apply(func);
                    func.constexpr |= synthesis.constexpr_default();
                }
                Some(Special::CopyConstructor) => {
                    synthesis.copy_constructor(ctor_const[index]).apply(func);
                }
                Some(Special::MoveConstructor) => {
                    let outcome = synthesis.move_constructor();
                    outcome.apply(func);
                    func.hidden = outcome.deleted;
                }
                _ => {}
            }
        }
        for (index, func) in self.decl.assignments.iter_mut().enumerate() {
            if func.origin != Origin::Defaulted {
                continue;
            }
            match assign_kinds[index] {
                Some(Special::CopyAssignment) => {
                    synthesis.copy_assignment(assign_const[index]).apply(func);
                }
                Some(Special::MoveAssignment) => {
                    let outcome = synthesis.move_assignment();
                    outcome.apply(func);
                    func.hidden = outcome.deleted;
                }
                _ => {}
            }
        }

        let const_ref = self.const_ref();
        let lvalue_ref = self.lvalue_ref();
        let rvalue_ref = self.rvalue_ref();

        if no_constructors {
            let mut func = synthesis.default_constructor().implicit(Vec::new());
            func.constexpr = !func.deleted && synthesis.constexpr_default();
            trace!(record = %self.name(), deleted = func.deleted, trivial = func.trivial, "implicit default constructor");
            self.decl.constructors.push(func);
        }
        if !user_copy_ctor {
            let const_param = synthesis.const_copy_param(false);
            let outcome = if user_move {
                Defaulted::DELETED
            } else {
                synthesis.copy_constructor(const_param)
            };
            let param = if const_param { const_ref } else { lvalue_ref };
            self.decl.constructors.push(outcome.implicit(vec![param]));
        }
        if !user_copy_ctor && !user_move_ctor && !user_copy_assign && !user_move_assign && !user_destructor {
            let outcome = synthesis.move_constructor();
            if !outcome.deleted {
                self.decl.constructors.push(outcome.implicit(vec![rvalue_ref]));
            }
        }
        if !user_copy_assign {
            let const_param = synthesis.const_copy_param(true);
            let outcome = if user_move {
                Defaulted::DELETED
            } else {
                synthesis.copy_assignment(const_param)
            };
            let param = if const_param { const_ref } else { lvalue_ref };
            self.decl
                .assignments
                .push(outcome.implicit(vec![param]).returning(lvalue_ref));
        }
        if !user_copy_ctor && !user_move_ctor && !user_copy_assign && !user_move_assign && !user_destructor {
            let outcome = synthesis.move_assignment();
            if !outcome.deleted {
                self.decl
                    .assignments
                    .push(outcome.implicit(vec![rvalue_ref]).returning(lvalue_ref));
            }
        }

        let implicit = synthesis.destructor();
        let throwing = self.throwing_destructor;
        let destructor = match self.decl.destructor.take() {
            None => implicit.implicit(Vec::new()),
            Some(mut func) => {
                match func.origin {
                    Origin::Defaulted => implicit.apply(&mut func),
                    Origin::UserProvided => {
                        func.trivial = false;
                        func.noexcept = !throwing && (func.noexcept || implicit.noexcept);
                    }
                    Origin::Deleted | Origin::Implicit => {}
                }
                func
            }
        };
        let mut destructor = destructor;
        if inherits_virtual_destructor {
            destructor.is_virtual = true;
        }
        if destructor.is_virtual {
            destructor.trivial = false;
        }
        self.decl.destructor = Some(destructor);
    }

    fn facts(&self, polymorphic: bool, has_virtual_bases: bool) -> RecordFacts {
        let db: &dyn TypeDatabase = self.db;
        let decl = &self.decl;
        let base_decls: Vec<_> = decl
            .bases
            .iter()
            .filter_map(|base| complete_record(db, base.ty))
            .collect();

        let mut unresolved_pure = Vec::new();
        for base in &base_decls {
            for name in &base.facts.unresolved_pure {
                let overridden = decl.virtual_methods.iter().any(|m| m.name == *name);
                if !overridden && !unresolved_pure.contains(name) {
                    unresolved_pure.push(*name);
                }
            }
        }
        for method in decl.virtual_methods.iter().filter(|m| m.pure) {
            if !unresolved_pure.contains(&method.name) {
                unresolved_pure.push(method.name);
            }
        }

        let destructor = decl.destructor.as_ref();
        let virtual_destructor = destructor.is_some_and(|d| d.is_virtual);
        let dynamic = polymorphic || has_virtual_bases;

        let empty = !decl.is_union()
            && decl.fields.is_empty()
            && !dynamic
            && base_decls.iter().all(|base| base.facts.empty);

        let copy_or_move = decl
            .constructors
            .iter()
            .filter(|func| {
                matches!(
                    self.special_kind(func, false),
                    Some(Special::CopyConstructor | Special::MoveConstructor)
                )
            })
            .chain(decl.assignments.iter().filter(|func| {
                matches!(
                    self.special_kind(func, true),
                    Some(Special::CopyAssignment | Special::MoveAssignment)
                )
            }));
        let eligible: Vec<&FunctionDecl> = copy_or_move
            .filter(|func| !func.deleted && !func.hidden)
            .collect();
        let trivial_destructor = destructor.is_some_and(|d| !d.deleted && d.trivial);
        let trivially_copyable = !eligible.is_empty()
            && eligible.iter().all(|func| func.trivial)
            && trivial_destructor;

        let default_ctors: Vec<&FunctionDecl> = decl
            .constructors
            .iter()
            .filter(|func| func.takes(0) && !func.deleted)
            .collect();
        let trivial_default_constructor =
            !default_ctors.is_empty() && default_ctors.iter().all(|func| func.trivial);

        let aggregate = !decl
            .constructors
            .iter()
            .any(|func| func.is_user_provided() || (func.is_user_declared() && func.explicit))
            && decl.fields.iter().all(|field| field.access == Access::Public)
            && !polymorphic
            && decl
                .bases
                .iter()
                .all(|base| base.access == Access::Public && !base.is_virtual);

        let literal_member = |ty: TypeId| {
            if referent(db, ty).is_some() {
                return true;
            }
            let element = strip_all_extents(db, ty);
            if cv_of(db, element).contains(CvQualifiers::VOLATILE) {
                return false;
            }
            match complete_record(db, element) {
                Some(member) => member.facts.literal,
                None => true,
            }
        };
        let constexpr_constructor = decl.constructors.iter().any(|func| {
            func.constexpr
                && !func.deleted
                && !matches!(
                    self.special_kind(func, false),
                    Some(Special::CopyConstructor | Special::MoveConstructor)
                )
        });
        let members_literal = if decl.is_union() {
            decl.fields.is_empty() || decl.fields.iter().any(|field| literal_member(field.ty))
        } else {
            decl.fields.iter().all(|field| literal_member(field.ty))
                && base_decls.iter().all(|base| base.facts.literal)
        };
        let literal = trivial_destructor && (aggregate || constexpr_constructor) && members_literal;

        let standard_layout = !dynamic && self.standard_layout(&base_decls);

        RecordFacts {
            polymorphic,
            abstract_: !unresolved_pure.is_empty(),
            has_virtual_bases,
            virtual_destructor,
            empty,
            standard_layout,
            trivially_copyable,
            trivial_default_constructor,
            trivial: trivially_copyable && trivial_default_constructor,
            aggregate,
            literal,
            unique_object_representations: false,
            unresolved_pure,
        }
    }

    fn standard_layout(&self, base_decls: &[std::sync::Arc<RecordDecl>]) -> bool {
        let db: &dyn TypeDatabase = self.db;
        let decl = &self.decl;
        if !base_decls.iter().all(|base| base.facts.standard_layout) {
            return false;
        }
        let mut access = decl.fields.iter().map(|field| field.access);
        if let Some(first) = access.next() {
            if access.any(|other| other != first) {
                return false;
            }
        }
        for field in &decl.fields {
            if referent(db, field.ty).is_some() {
                return false;
            }
            let element = strip_all_extents(db, field.ty);
            if complete_record(db, element).is_some_and(|member| !member.facts.standard_layout) {
                return false;
            }
        }

        // At most one class in the hierarchy declares data members, and no
        // base class type appears twice.
        let mut all_bases = Vec::new();
        for base in &decl.bases {
            all_bases.push(base.ty);
            self.collect_base_subobjects(base.ty, &mut all_bases, 0);
        }
        let mut seen = FxHashSet::default();
        if !all_bases.iter().all(|ty| seen.insert(*ty)) {
            return false;
        }
        let with_fields = all_bases
            .iter()
            .filter(|ty| complete_record(db, **ty).is_some_and(|base| !base.fields.is_empty()))
            .count()
            + usize::from(!decl.fields.is_empty());
        if with_fields > 1 {
            return false;
        }

        // The first member may not share a type with a base.
        if let Some(first) = decl.fields.first() {
            let first = unqualified(db, strip_all_extents(db, first.ty));
            if all_bases.contains(&first) {
                return false;
            }
        }
        true
    }

    /// Every base subobject below `ty`, repeated once per occurrence.
    fn collect_base_subobjects(&self, ty: TypeId, out: &mut Vec<TypeId>, depth: u32) {
        if depth > MAX_HIERARCHY_DEPTH {
            return;
        }
        let Some(decl) = complete_record(self.db, ty) else {
            return;
        };
        for base in &decl.bases {
            out.push(base.ty);
            self.collect_base_subobjects(base.ty, out, depth + 1);
        }
    }

    /// No padding bits: every subobject has a unique representation and
    /// their sizes add up to the size of the record.
    fn unique_representation(&self, facts: &RecordFacts, size: u64) -> bool {
        let db: &dyn TypeDatabase = self.db;
        if !facts.trivially_copyable {
            return false;
        }
        let field_ok = |field: &FieldDecl| {
            referent(db, field.ty).is_none() && has_unique_representation(db, field.ty)
        };
        if self.decl.is_union() {
            return self.decl.fields.iter().all(|field| {
                field_ok(field) && size_of(db, field.ty) == Some(size)
            });
        }
        let mut total = 0u64;
        for base in &self.decl.bases {
            let Some(decl) = complete_record(db, base.ty) else {
                return false;
            };
            if decl.facts.empty {
                continue;
            }
            if !decl.facts.unique_object_representations {
                return false;
            }
            total += decl.layout.size;
        }
        for field in &self.decl.fields {
            if !field_ok(field) {
                return false;
            }
            total += size_of(db, field.ty).unwrap_or(0);
        }
        total == size
    }
}

#[cfg(test)]
#[path = "../tests/record_builder_tests.rs"]
mod tests;
