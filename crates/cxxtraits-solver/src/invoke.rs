//! Invocation: `INVOKE(f, t1, ..., tN)`.
//!
//! The callable is matched against the rules below in order; the first
//! rule whose shape fits decides the expression, and failure after that
//! point makes the invocation ill-formed.
//!
//! 1. pointer to member function, `t1` is (derived from) the class:
//!    `(t1.*f)(t2, ..., tN)`
//! 2. pointer to member function, `t1` is a reference wrapper:
//!    `(t1.get().*f)(t2, ..., tN)`
//! 3. pointer to member function otherwise: `((*t1).*f)(t2, ..., tN)`
//! 4. pointer to data member, with `t1` as in 1-3 and no further arguments:
//!    `t1.*f`, `t1.get().*f`, `(*t1).*f`
//! 5. anything else: `f(t1, ..., tN)`
//!
//! Rule selection looks at `decay(F)` and `decay(T1)`. The result type is
//! the type of the expression: `T&` for lvalues, `T&&` for xvalues, `T`
//! for prvalues.

use crate::capabilities::Features;
use crate::class_hierarchy::ClassHierarchy;
use crate::expr::{Effects, Expr, Formed, Inapplicable, Sema};
use crate::trait_queries::TraitSolver;
use crate::transform::decay;
use crate::type_queries::{
    function_shape, is_function, is_void, member_pointer_parts, record_decl, unqualified,
};
use crate::types::{RefQualifier, TypeId, ValueCategory};
use tracing::trace;

/// Which `INVOKE` rule an invocation used.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InvokeRule {
    MemberFunctionOnObject,
    MemberFunctionOnWrapper,
    MemberFunctionOnPointer,
    MemberDataOnObject,
    MemberDataOnWrapper,
    MemberDataOnPointer,
    Call,
}

/// A well-formed invocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Invocation {
    pub rule: InvokeRule,
    pub result: TypeId,
    pub effects: Effects,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Receiver {
    Object,
    Wrapper,
    Pointer,
}

impl Receiver {
    fn rule(self, member_function: bool) -> InvokeRule {
        match (self, member_function) {
            (Receiver::Object, true) => InvokeRule::MemberFunctionOnObject,
            (Receiver::Wrapper, true) => InvokeRule::MemberFunctionOnWrapper,
            (Receiver::Pointer, true) => InvokeRule::MemberFunctionOnPointer,
            (Receiver::Object, false) => InvokeRule::MemberDataOnObject,
            (Receiver::Wrapper, false) => InvokeRule::MemberDataOnWrapper,
            (Receiver::Pointer, false) => InvokeRule::MemberDataOnPointer,
        }
    }
}

fn declvals(sema: &Sema<'_>, args: &[TypeId]) -> Formed<Vec<Expr>> {
    args.iter().map(|arg| sema.declval(*arg)).collect()
}

impl<'a> TraitSolver<'a> {
    /// The declared type of an expression.
    fn expression_type(&self, e: Expr) -> TypeId {
        match e.category {
            ValueCategory::LValue => self.db.lvalue_reference(e.ty),
            ValueCategory::XValue => self.db.rvalue_reference(e.ty),
            ValueCategory::PRValue => e.ty,
        }
    }

    /// The object `t1` designates for a member pointer of `class`.
    fn receiver(&self, sema: &Sema<'a>, class: TypeId, arg: TypeId) -> Formed<(Receiver, Expr, Effects)> {
        let db = self.db;
        let object = sema.declval(arg)?;
        let decayed = decay(db, arg);
        if unqualified(db, decayed) == class || ClassHierarchy::new(db).is_base_of(class, decayed) {
            return Ok((Receiver::Object, object, Effects::NONE));
        }
        if let Some(wrapped) = record_decl(db, decayed).and_then(|decl| decl.wraps) {
            return Ok((Receiver::Wrapper, Expr::lvalue(wrapped), Effects::NONE));
        }
        let (target, effects) = sema.deref(object)?;
        Ok((Receiver::Pointer, target, effects))
    }

    /// Form `INVOKE(declval<F>(), declval<Args>()...)`.
    pub fn invoke(&self, callable: TypeId, args: &[TypeId]) -> Formed<Invocation> {
        let db = self.db;
        let sema = self.sema();

        let Some((class, member)) = member_pointer_parts(db, decay(db, callable)) else {
            let f = sema.declval(callable)?;
            let exprs = declvals(&sema, args)?;
            let (result, effects) = sema.call(f, &exprs)?;
            return Ok(Invocation {
                rule: InvokeRule::Call,
                result: self.expression_type(result),
                effects,
            });
        };

        let [first, rest @ ..] = args else {
            return Err(Inapplicable::WrongArity);
        };
        let member_function = is_function(db, member);
        if member_function {
            let ref_qualified = function_shape(db, member)
                .is_some_and(|shape| shape.ref_qualifier != RefQualifier::None);
            if ref_qualified && !self.has_feature(Features::REF_QUALIFIED_FUNCTIONS) {
                return Err(Inapplicable::NotCallable);
            }
        } else if !rest.is_empty() {
            return Err(Inapplicable::WrongArity);
        }

        let (receiver, object, receiver_effects) = self.receiver(&sema, class, *first)?;
        let rule = receiver.rule(member_function);
        let member_pointer = unqualified(db, decay(db, callable));
        let (result, effects) = if member_function {
            let exprs = declvals(&sema, rest)?;
            sema.member_call(object, member_pointer, &exprs)?
        } else {
            (sema.member_access(object, member_pointer)?, Effects::NONE)
        };
        trace!(callable = callable.0, ?rule, "invoke");
        Ok(Invocation {
            rule,
            result: self.expression_type(result),
            effects: receiver_effects.and(effects),
        })
    }

    pub fn is_invocable(&self, callable: TypeId, args: &[TypeId]) -> bool {
        self.invoke(callable, args).is_ok()
    }

    /// `std::invoke_result_t<F, Args...>`.
    pub fn invoke_result(&self, callable: TypeId, args: &[TypeId]) -> Option<TypeId> {
        self.invoke(callable, args).ok().map(|invocation| invocation.result)
    }

    /// `std::result_of_t<F(Args...)>`: the callable is the return type of
    /// the function type `ty`, the arguments its parameters.
    pub fn result_of(&self, ty: TypeId) -> Option<TypeId> {
        let shape = function_shape(self.db, ty)?;
        self.invoke_result(shape.ret, &shape.params)
    }

    /// Invocable, and the result converts to `ret` (anything does for
    /// `void`).
    pub fn is_invocable_r(&self, ret: TypeId, callable: TypeId, args: &[TypeId]) -> bool {
        match self.invoke(callable, args) {
            Ok(invocation) => is_void(self.db, ret) || self.is_convertible(invocation.result, ret),
            Err(_) => false,
        }
    }

    fn invocation_nothrow(&self, invocation: &Invocation) -> bool {
        if self.has_feature(Features::NOEXCEPT) {
            invocation.effects.nothrow
        } else {
            invocation.effects.trivial
        }
    }

    pub fn is_nothrow_invocable(&self, callable: TypeId, args: &[TypeId]) -> bool {
        self.invoke(callable, args)
            .is_ok_and(|invocation| self.invocation_nothrow(&invocation))
    }

    pub fn is_nothrow_invocable_r(&self, ret: TypeId, callable: TypeId, args: &[TypeId]) -> bool {
        let Ok(invocation) = self.invoke(callable, args) else {
            return false;
        };
        self.invocation_nothrow(&invocation)
            && (is_void(self.db, ret) || self.is_nothrow_convertible(invocation.result, ret))
    }
}

#[cfg(test)]
#[path = "../tests/invoke_tests.rs"]
mod tests;
