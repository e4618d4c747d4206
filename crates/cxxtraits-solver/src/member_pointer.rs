//! Decomposition of pointer-to-member-function types.
//!
//! A member function's implicit object parameter can be cv-qualified and
//! ref-qualified in twelve ways. `ReceiverQualifier` names them, and
//! `MemberPointerTraits` reports the class type as the receiver sees it
//! (`const C`, `C&`, `const volatile C&&`, ...), together with the return
//! type and the plain function signature.

use crate::capabilities::Features;
use crate::trait_queries::TraitSolver;
use crate::type_queries::{function_shape, member_pointer_parts};
use crate::types::{CvQualifiers, FunctionShape, RefQualifier, TypeId};
use tracing::debug;

/// cv × ref qualification of the implicit object parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReceiverQualifier {
    None,
    Const,
    Volatile,
    ConstVolatile,
    LValue,
    ConstLValue,
    VolatileLValue,
    ConstVolatileLValue,
    RValue,
    ConstRValue,
    VolatileRValue,
    ConstVolatileRValue,
}

impl ReceiverQualifier {
    pub const ALL: [ReceiverQualifier; 12] = [
        ReceiverQualifier::None,
        ReceiverQualifier::Const,
        ReceiverQualifier::Volatile,
        ReceiverQualifier::ConstVolatile,
        ReceiverQualifier::LValue,
        ReceiverQualifier::ConstLValue,
        ReceiverQualifier::VolatileLValue,
        ReceiverQualifier::ConstVolatileLValue,
        ReceiverQualifier::RValue,
        ReceiverQualifier::ConstRValue,
        ReceiverQualifier::VolatileRValue,
        ReceiverQualifier::ConstVolatileRValue,
    ];

    pub fn from_parts(cv: CvQualifiers, ref_qualifier: RefQualifier) -> Self {
        use ReceiverQualifier::*;
        let is_const = cv.contains(CvQualifiers::CONST);
        let is_volatile = cv.contains(CvQualifiers::VOLATILE);
        match (ref_qualifier, is_const, is_volatile) {
            (RefQualifier::None, false, false) => None,
            (RefQualifier::None, true, false) => Const,
            (RefQualifier::None, false, true) => Volatile,
            (RefQualifier::None, true, true) => ConstVolatile,
            (RefQualifier::LValue, false, false) => LValue,
            (RefQualifier::LValue, true, false) => ConstLValue,
            (RefQualifier::LValue, false, true) => VolatileLValue,
            (RefQualifier::LValue, true, true) => ConstVolatileLValue,
            (RefQualifier::RValue, false, false) => RValue,
            (RefQualifier::RValue, true, false) => ConstRValue,
            (RefQualifier::RValue, false, true) => VolatileRValue,
            (RefQualifier::RValue, true, true) => ConstVolatileRValue,
        }
    }

    pub fn cv(self) -> CvQualifiers {
        use ReceiverQualifier::*;
        match self {
            None | LValue | RValue => CvQualifiers::empty(),
            Const | ConstLValue | ConstRValue => CvQualifiers::CONST,
            Volatile | VolatileLValue | VolatileRValue => CvQualifiers::VOLATILE,
            ConstVolatile | ConstVolatileLValue | ConstVolatileRValue => {
                CvQualifiers::CONST | CvQualifiers::VOLATILE
            }
        }
    }

    pub fn ref_qualifier(self) -> RefQualifier {
        use ReceiverQualifier::*;
        match self {
            None | Const | Volatile | ConstVolatile => RefQualifier::None,
            LValue | ConstLValue | VolatileLValue | ConstVolatileLValue => RefQualifier::LValue,
            RValue | ConstRValue | VolatileRValue | ConstVolatileRValue => RefQualifier::RValue,
        }
    }
}

/// The parts of `R (C::*)(P...) cv ref`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberPointerTraits {
    /// `C` with the receiver's qualification applied: `const C` for a
    /// `const` member, `C&&` for an `&&` member.
    pub class_type: TypeId,
    pub return_type: TypeId,
    /// `R(P...)`, without method qualifiers.
    pub signature: TypeId,
    pub params: Vec<TypeId>,
    pub qualifier: ReceiverQualifier,
    pub variadic: bool,
}

impl<'a> TraitSolver<'a> {
    /// `None` for anything but a pointer to member function, and for
    /// ref-qualified members when ref-qualified functions are unavailable.
    pub fn member_pointer_traits(&self, ty: TypeId) -> Option<MemberPointerTraits> {
        let db = self.db;
        let (class, member) = member_pointer_parts(db, ty)?;
        let shape = function_shape(db, member)?;
        let qualifier = ReceiverQualifier::from_parts(shape.cv, shape.ref_qualifier);
        if qualifier.ref_qualifier() != RefQualifier::None
            && !self.has_feature(Features::REF_QUALIFIED_FUNCTIONS)
        {
            debug!(ty = ty.0, "ref-qualified member function without language support");
            return None;
        }

        let receiver = db.qualified(class, qualifier.cv());
        let class_type = match qualifier.ref_qualifier() {
            RefQualifier::None => receiver,
            RefQualifier::LValue => db.lvalue_reference(receiver),
            RefQualifier::RValue => db.rvalue_reference(receiver),
        };
        let mut plain = FunctionShape::new(shape.ret, shape.params.clone());
        plain.variadic = shape.variadic;
        plain.noexcept = shape.noexcept;

        Some(MemberPointerTraits {
            class_type,
            return_type: shape.ret,
            signature: db.function(plain),
            params: shape.params.clone(),
            qualifier,
            variadic: shape.variadic,
        })
    }
}

#[cfg(test)]
#[path = "../tests/member_pointer_tests.rs"]
mod tests;
