//! `common_type`.
//!
//! Two types meet where the conditional operator puts them: the decayed
//! type of `true ? declval<D1>() : declval<D2>()` for the decayed inputs,
//! retried with `const D1&` and `const D2&` operands when that is
//! ill-formed. Longer lists fold from the left.

use crate::TypeDatabase;
use crate::expr::{Expr, Sema};
use crate::transform::{decay, remove_cvref};
use crate::type_queries::is_void;
use crate::types::{CvQualifiers, TypeId};
use tracing::trace;

/// The common type of `types`, or `None` when there is none (including
/// for the empty list).
pub fn common_type(db: &dyn TypeDatabase, types: &[TypeId]) -> Option<TypeId> {
    match types {
        [] => None,
        [only] => common_pair(db, *only, *only),
        [first, second, rest @ ..] => {
            let mut common = common_pair(db, *first, *second)?;
            for next in rest {
                common = common_pair(db, common, *next)?;
            }
            Some(common)
        }
    }
}

fn common_pair(db: &dyn TypeDatabase, a: TypeId, b: TypeId) -> Option<TypeId> {
    let (d1, d2) = (decay(db, a), decay(db, b));
    if d1 != a || d2 != b {
        return common_pair(db, d1, d2);
    }

    let sema = Sema::new(db);
    if let (Ok(x), Ok(y)) = (sema.declval(d1), sema.declval(d2)) {
        if let Ok(result) = sema.conditional(x, y) {
            let common = decay(db, result.ty);
            trace!(a = a.0, b = b.0, common = common.0, "common_type");
            return Some(common);
        }
    }

    if is_void(db, d1) || is_void(db, d2) {
        return None;
    }
    let x = Expr::lvalue(db.qualified(d1, CvQualifiers::CONST));
    let y = Expr::lvalue(db.qualified(d2, CvQualifiers::CONST));
    let result = sema.conditional(x, y).ok()?;
    let common = remove_cvref(db, result.ty);
    trace!(a = a.0, b = b.0, common = common.0, "common_type via const lvalues");
    Some(common)
}

#[cfg(test)]
#[path = "../tests/common_type_tests.rs"]
mod tests;
