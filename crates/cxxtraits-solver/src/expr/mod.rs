//! Expression well-formedness engine.
//!
//! The classical trait formulations ask "would this expression compile?":
//! `::new T(declval<A>())`, `declval<T>() = declval<U>()`,
//! `declval<T&>().~T()`, `(declval<C>().*declval<M>())(declval<A>()...)`.
//! `Sema` answers those questions over the modeled type system. Every
//! operation returns `Formed<T>`; an ill-formed expression is
//! `Err(Inapplicable)`, never a hard error, so callers can fall through to
//! the next alternative exactly like substitution failure does.
//!
//! Successful expressions carry `Effects`: whether evaluating them can
//! throw and whether every function they select is trivial.
//!
//! The engine is split by concern:
//! - `conversion`: standard and user-defined implicit conversion sequences
//! - `reference`: reference binding
//! - `overload`: candidate sets and best viable function selection
//! - `init`: direct-, copy- and value-initialization, `new`, casts
//! - `operators`: assignment, destruction, dereference, calls, member pointers, swap
//! - `conditional`: typing of `b ? e1 : e2`

mod conditional;
mod conversion;
mod init;
mod operators;
mod overload;
mod reference;

pub use conversion::{ConversionKind, ConversionRank, ImplicitConversion, ReferenceBinding};
pub use overload::{FunctionRef, MemberSet, Selection};

use crate::TypeDatabase;
use crate::class_hierarchy::ClassHierarchy;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::type_queries::{self, function_shape, referent, split_cv};
use crate::types::{TypeData, TypeId, ValueCategory};
use std::cell::RefCell;
use tracing::trace;

// =============================================================================
// Expressions and results
// =============================================================================

/// The static type and value category of an expression.
///
/// `ty` is never a reference type: an expression of type `T&` is an lvalue
/// of type `T`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Expr {
    pub ty: TypeId,
    pub category: ValueCategory,
}

impl Expr {
    #[inline]
    pub fn new(ty: TypeId, category: ValueCategory) -> Self {
        Self { ty, category }
    }

    #[inline]
    pub fn lvalue(ty: TypeId) -> Self {
        Self::new(ty, ValueCategory::LValue)
    }

    #[inline]
    pub fn xvalue(ty: TypeId) -> Self {
        Self::new(ty, ValueCategory::XValue)
    }

    #[inline]
    pub fn prvalue(ty: TypeId) -> Self {
        Self::new(ty, ValueCategory::PRValue)
    }

    #[inline]
    pub fn is_lvalue(self) -> bool {
        self.category == ValueCategory::LValue
    }

    #[inline]
    pub fn is_rvalue(self) -> bool {
        self.category.is_rvalue()
    }
}

/// Runtime properties of a well-formed expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Effects {
    /// Evaluation cannot throw.
    pub nothrow: bool,
    /// Every selected special member function is trivial; no user code runs.
    pub trivial: bool,
}

impl Effects {
    /// Builtin operations on scalars: no calls at all.
    pub const NONE: Effects = Effects {
        nothrow: true,
        trivial: true,
    };

    /// Effects of calling `func`.
    #[inline]
    pub fn of_call(nothrow: bool, trivial: bool) -> Effects {
        Effects { nothrow, trivial }
    }

    /// Both `self` and `other` happen.
    #[inline]
    #[must_use]
    pub fn and(self, other: Effects) -> Effects {
        Effects {
            nothrow: self.nothrow && other.nothrow,
            trivial: self.trivial && other.trivial,
        }
    }
}

impl Default for Effects {
    fn default() -> Self {
        Self::NONE
    }
}

/// Why an expression is ill-formed. Only used for tracing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Inapplicable {
    NoConversion,
    NoViableFunction,
    Ambiguous,
    Deleted,
    Inaccessible,
    IncompleteType,
    AbstractClass,
    VoidExpression,
    NotAnObject,
    NotModifiable,
    NonConstLvalueReference,
    RvalueReferenceToLvalue,
    DropsQualifiers,
    AmbiguousBase,
    NotCallable,
    WrongArity,
    InvalidReceiver,
    RecursionLimit,
}

pub type Formed<T> = Result<T, Inapplicable>;

/// How the target of an initialization is initialized.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InitMode {
    /// `T t = e;`, argument passing, return. Explicit constructors and
    /// conversion functions are not candidates.
    Copy,
    /// `T t(e);`, `static_cast<T>(e)`, `new T(e)`.
    Direct,
}

// =============================================================================
// Sema
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Operation {
    Convert,
    BindReference,
    Initialize,
    Destroy,
}

type GuardKey = (Operation, TypeId, TypeId, ValueCategory);

/// Expression checker over a `TypeDatabase`.
///
/// Holds per-query recursion state, so one `Sema` serves one top-level
/// question on one thread.
pub struct Sema<'a> {
    db: &'a dyn TypeDatabase,
    guard: RefCell<RecursionGuard<GuardKey>>,
}

impl<'a> Sema<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self {
            db,
            guard: RefCell::new(RecursionGuard::with_profile(
                RecursionProfile::Initialization,
            )),
        }
    }

    #[inline]
    pub fn db(&self) -> &'a dyn TypeDatabase {
        self.db
    }

    #[inline]
    pub(crate) fn hierarchy(&self) -> ClassHierarchy<'a> {
        ClassHierarchy::new(self.db)
    }

    /// `std::declval<T>()`: an lvalue for `T&`, an xvalue for `T&&` and for
    /// object types, a `void` prvalue for `void`. Functions are lvalues.
    pub fn declval(&self, ty: TypeId) -> Formed<Expr> {
        match self.db.lookup(ty) {
            Some(TypeData::LValueRef(inner)) => Ok(Expr::lvalue(inner)),
            Some(TypeData::RValueRef(inner)) => {
                if type_queries::is_function(self.db, inner) {
                    Ok(Expr::lvalue(inner))
                } else {
                    Ok(Expr::xvalue(inner))
                }
            }
            Some(TypeData::Function(_)) => match function_shape(self.db, ty) {
                Some(shape) if !shape.is_abominable() => Ok(Expr::lvalue(ty)),
                _ => Err(Inapplicable::NotAnObject),
            },
            Some(_) if type_queries::is_void(self.db, ty) => Ok(Expr::prvalue(TypeId::VOID)),
            Some(_) => Ok(Expr::xvalue(ty)),
            None => Err(Inapplicable::IncompleteType),
        }
    }

    /// The expression produced by calling a function returning `ret`.
    pub fn call_result(&self, ret: TypeId) -> Expr {
        match referent(self.db, ret) {
            Some((inner, false)) => Expr::lvalue(inner),
            Some((inner, true)) if type_queries::is_function(self.db, inner) => {
                Expr::lvalue(inner)
            }
            Some((inner, true)) => Expr::xvalue(inner),
            None => self.prvalue_of(ret),
        }
    }

    /// A prvalue of type `ty`; non-class prvalues lose their cv-qualification.
    pub fn prvalue_of(&self, ty: TypeId) -> Expr {
        if type_queries::record_id(self.db, ty).is_some()
            || type_queries::array_parts(self.db, ty).is_some()
        {
            Expr::prvalue(ty)
        } else {
            Expr::prvalue(split_cv(self.db, ty).0)
        }
    }

    /// Run `f` unless the same operation is already in progress or the
    /// depth limit is reached.
    fn guarded<T>(
        &self,
        op: Operation,
        target: TypeId,
        from: Option<Expr>,
        f: impl FnOnce() -> Formed<T>,
    ) -> Formed<T> {
        let key = (
            op,
            target,
            from.map_or(TypeId::VOID, |e| e.ty),
            from.map_or(ValueCategory::PRValue, |e| e.category),
        );
        // The borrow ends before `f` runs: `f` re-enters through `self`.
        let entered = self.guard.borrow_mut().enter(key);
        if !entered.is_entered() {
            trace!(?op, target = target.0, ?entered, "expression guard denied entry");
            return Err(Inapplicable::RecursionLimit);
        }
        let result = f();
        self.guard.borrow_mut().leave(key);
        result
    }
}

#[cfg(test)]
#[path = "../../tests/expr_tests.rs"]
mod tests;
