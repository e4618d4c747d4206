//! Overload resolution.
//!
//! Candidates are constructors, assignment operators, conversion functions,
//! call operators, dereference operators and `swap` overloads of modeled
//! records, plus library templates supplied by the caller. The best viable
//! function must be at least as good as every other viable candidate for
//! every argument and strictly better for one, or win a tie-breaker
//! (non-template over template, better conversion of the result in a
//! user-defined conversion). Selecting a deleted or non-public function
//! makes the whole expression ill-formed.

use super::conversion::ImplicitConversion;
use super::{Effects, Expr, Formed, Inapplicable, InitMode, Sema};
use crate::def::{FunctionDecl, RecordDecl};
use crate::type_queries::{is_void, split_cv};
use crate::types::{Access, CvQualifiers, RecordId, RefQualifier, TypeId};
use smallvec::{SmallVec, smallvec};
use std::cmp::Ordering;
use tracing::trace;

/// Which member list of a record a function lives in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberSet {
    Constructor,
    Assignment,
    Destructor,
    Conversion,
    Call,
    Deref,
    Swap,
    /// Library templates such as `std::swap`; not stored in any record.
    Library,
}

/// Identity of a selected function.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionRef {
    pub record: RecordId,
    pub set: MemberSet,
    pub index: u32,
}

/// The outcome of overload resolution.
#[derive(Clone, Debug)]
pub struct Selection {
    pub id: FunctionRef,
    pub func: FunctionDecl,
    /// Effects of the call including every argument conversion.
    pub effects: Effects,
}

pub(crate) struct Candidate<'f> {
    pub id: FunctionRef,
    pub func: &'f FunctionDecl,
    /// Class of the implicit object parameter, for member functions.
    pub object: Option<TypeId>,
    pub is_template: bool,
    /// Conversion of the function's result to the initialization target,
    /// when resolving a user-defined conversion.
    pub result: Option<ImplicitConversion>,
}

type Conversions = SmallVec<[Option<ImplicitConversion>; 4]>;

/// Candidates from one member list of `decl`.
pub(crate) fn record_candidates<'f>(
    decl: &'f RecordDecl,
    set: MemberSet,
    mode: InitMode,
    object: Option<TypeId>,
) -> Vec<Candidate<'f>> {
    let funcs: &[FunctionDecl] = match set {
        MemberSet::Constructor => &decl.constructors,
        MemberSet::Assignment => &decl.assignments,
        MemberSet::Conversion => &decl.conversions,
        MemberSet::Call => &decl.call_operators,
        MemberSet::Swap => &decl.swaps,
        MemberSet::Deref => decl.deref.as_slice(),
        MemberSet::Destructor => decl.destructor.as_slice(),
        MemberSet::Library => &[],
    };
    funcs
        .iter()
        .enumerate()
        .filter(|(_, func)| !func.hidden && (mode == InitMode::Direct || !func.explicit))
        .map(|(index, func)| Candidate {
            id: FunctionRef {
                record: decl.id,
                set,
                index: index as u32,
            },
            func,
            object,
            is_template: false,
            result: None,
        })
        .collect()
}

impl<'a> Sema<'a> {
    /// Select the best viable function for a call with `object` as the
    /// implied object argument (member candidates only) and `args`.
    ///
    /// `allow_user` controls whether argument conversions may use a
    /// user-defined conversion; it is off while already inside one.
    pub(crate) fn resolve(
        &self,
        candidates: &[Candidate<'_>],
        object: Option<Expr>,
        args: &[Expr],
        allow_user: bool,
    ) -> Formed<Selection> {
        let viable: Vec<(usize, Conversions)> = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                self.viable_conversions(candidate, object, args, allow_user)
                    .map(|conversions| (index, conversions))
            })
            .collect();

        if viable.is_empty() {
            return Err(Inapplicable::NoViableFunction);
        }

        let best = (0..viable.len()).find(|&i| {
            (0..viable.len()).all(|j| i == j || is_better(candidates, &viable[i], &viable[j]))
        });
        let Some(best) = best else {
            trace!(viable = viable.len(), "overload resolution is ambiguous");
            return Err(Inapplicable::Ambiguous);
        };

        let (index, conversions) = &viable[best];
        let candidate = &candidates[*index];
        let func = candidate.func;
        if func.deleted {
            return Err(Inapplicable::Deleted);
        }
        if func.access != Access::Public {
            return Err(Inapplicable::Inaccessible);
        }

        let mut effects = Effects::of_call(func.noexcept, func.trivial);
        for conversion in conversions.iter().flatten() {
            effects = effects.and(conversion.effects);
        }
        if let Some(result) = candidate.result {
            effects = effects.and(result.effects);
        }
        trace!(
            set = ?candidate.id.set,
            index = candidate.id.index,
            nothrow = effects.nothrow,
            trivial = effects.trivial,
            "overload resolution selected"
        );
        Ok(Selection {
            id: candidate.id,
            func: func.clone(),
            effects,
        })
    }

    fn viable_conversions(
        &self,
        candidate: &Candidate<'_>,
        object: Option<Expr>,
        args: &[Expr],
        allow_user: bool,
    ) -> Option<Conversions> {
        let func = candidate.func;
        if candidate.id.set == MemberSet::Conversion {
            // The source of a user-defined conversion is the implied object
            // argument of a conversion function and the single argument of a
            // converting constructor; both occupy the argument slot.
            let conversion = self.object_conversion(object?, candidate.object?, func)?;
            return Some(smallvec![None, Some(conversion)]);
        }
        let arity = func.params.len();
        if args.len() < arity || (args.len() > arity && !func.variadic) {
            return None;
        }

        let mut conversions = Conversions::new();
        match candidate.object {
            Some(class) => conversions.push(Some(self.object_conversion(object?, class, func)?)),
            None => conversions.push(None),
        }
        for (position, arg) in args.iter().enumerate() {
            if let Some(param) = func.params.get(position) {
                let conversion = self
                    .implicit_conversion(*arg, *param, InitMode::Copy, allow_user)
                    .ok()?;
                conversions.push(Some(conversion));
            } else {
                if is_void(self.db, arg.ty) {
                    return None;
                }
                conversions.push(Some(ImplicitConversion::ellipsis()));
            }
        }
        Some(conversions)
    }

    /// Binding of the implied object argument to the implicit object
    /// parameter `cv C&` / `cv C&&` of a member function.
    ///
    /// Without a ref-qualifier an rvalue may bind to the non-const lvalue
    /// reference, and the rvalue-binding tie-breaker does not apply.
    fn object_conversion(
        &self,
        object: Expr,
        class: TypeId,
        func: &FunctionDecl,
    ) -> Option<ImplicitConversion> {
        let (object_ty, object_cv) = split_cv(self.db, object.ty);
        if !func.cv.contains(object_cv) {
            return None;
        }
        let distance = if object_ty == class {
            0
        } else {
            self.hierarchy()
                .base_conversion(object_ty, class)
                .distance()?
        };
        match func.ref_qualifier {
            RefQualifier::None => {}
            RefQualifier::LValue => {
                if object.is_rvalue() && func.cv != CvQualifiers::CONST {
                    return None;
                }
            }
            RefQualifier::RValue => {
                if object.is_lvalue() {
                    return None;
                }
            }
        }
        Some(ImplicitConversion::object_binding(
            class,
            func.cv,
            distance,
            func.ref_qualifier,
            object.is_rvalue(),
        ))
    }
}

fn is_better(
    candidates: &[Candidate<'_>],
    (a_index, a): &(usize, Conversions),
    (b_index, b): &(usize, Conversions),
) -> bool {
    let mut better = false;
    for (x, y) in a.iter().zip(b.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            match x.compare(y) {
                Ordering::Less => better = true,
                Ordering::Greater => return false,
                Ordering::Equal => {}
            }
        }
    }
    if better {
        return true;
    }

    let (x, y) = (&candidates[*a_index], &candidates[*b_index]);
    if !x.is_template && y.is_template {
        return true;
    }
    match (x.result, y.result) {
        (Some(rx), Some(ry)) => rx.compare(&ry) == Ordering::Less,
        _ => false,
    }
}
