//! Class hierarchy queries.
//!
//! Responsibilities:
//! - `is_base_of` over direct and indirect, virtual and non-virtual bases
//! - derived-to-base conversion checks: ambiguity, accessibility, distance
//! - enumeration of every base class for argument-dependent lookup
//!
//! Record declarations are acyclic by construction: a base must be complete
//! before a derived class can name it, and a class is incomplete until its
//! own `finish` call returns.

use crate::TypeDatabase;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::type_queries::{class_record, record_id, unqualified};
use crate::types::{Access, TypeId};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::trace;

/// Result of checking the implicit conversion `Derived*` to `Base*`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BaseConversion {
    /// `base` is not a base class of `derived` (nor the same class).
    NotBase,
    /// More than one `base` subobject is reachable.
    Ambiguous,
    /// Every path to the base subobject passes a non-public base.
    Inaccessible,
    /// Unambiguous and accessible. `distance` is the number of inheritance
    /// edges on the shortest path; 0 means the same class.
    Ok { distance: u32 },
}

impl BaseConversion {
    #[inline]
    pub fn is_ok(self) -> bool {
        matches!(self, BaseConversion::Ok { .. })
    }

    #[inline]
    pub fn distance(self) -> Option<u32> {
        match self {
            BaseConversion::Ok { distance } => Some(distance),
            _ => None,
        }
    }
}

/// Identity of one base subobject: the virtual base it is nested in (if
/// any) and the non-virtual path from there.
type SubobjectKey = (Option<TypeId>, SmallVec<[TypeId; 4]>);

struct PathSearch {
    target: TypeId,
    subobjects: FxHashSet<SubobjectKey>,
    any_public: bool,
    shortest: Option<u32>,
}

pub struct ClassHierarchy<'a> {
    db: &'a dyn TypeDatabase,
}

type HierarchyGuard = RecursionGuard<TypeId>;

fn hierarchy_guard() -> HierarchyGuard {
    RecursionGuard::with_profile(RecursionProfile::Hierarchy)
}

impl<'a> ClassHierarchy<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    /// `base` is `derived` or one of its (direct or indirect) base classes.
    ///
    /// Both must be non-union class types; cv-qualification is ignored.
    /// A class is a base of itself even when incomplete.
    pub fn is_base_of(&self, base: TypeId, derived: TypeId) -> bool {
        let (Some(base_id), Some(derived_id)) = (record_id(self.db, base), record_id(self.db, derived))
        else {
            return false;
        };
        let is_class = |id| {
            self.db
                .record(id)
                .is_some_and(|decl| !decl.is_union())
        };
        if !is_class(base_id) || !is_class(derived_id) {
            return false;
        }
        if base_id == derived_id {
            return true;
        }
        let target = unqualified(self.db, base);
        self.reaches(unqualified(self.db, derived), target, &mut hierarchy_guard())
    }

    fn reaches(&self, from: TypeId, target: TypeId, guard: &mut HierarchyGuard) -> bool {
        let Some(decl) = class_record(self.db, from) else {
            return false;
        };
        decl.bases.iter().any(|base| {
            base.ty == target
                || guard
                    .scope(base.ty, |guard| self.reaches(base.ty, target, guard))
                    .unwrap_or(false)
        })
    }

    /// Check the derived-to-base conversion from `derived` to `base`.
    pub fn base_conversion(&self, derived: TypeId, base: TypeId) -> BaseConversion {
        let derived = unqualified(self.db, derived);
        let base = unqualified(self.db, base);
        if derived == base {
            return BaseConversion::Ok { distance: 0 };
        }
        if !self.is_base_of(base, derived) {
            return BaseConversion::NotBase;
        }

        let mut search = PathSearch {
            target: base,
            subobjects: FxHashSet::default(),
            any_public: false,
            shortest: None,
        };
        self.walk(derived, None, SmallVec::new(), true, &mut hierarchy_guard(), &mut search);

        let result = if search.subobjects.len() > 1 {
            BaseConversion::Ambiguous
        } else if !search.any_public {
            BaseConversion::Inaccessible
        } else {
            BaseConversion::Ok {
                distance: search.shortest.unwrap_or(1),
            }
        };
        trace!(derived = derived.0, base = base.0, ?result, "base_conversion");
        result
    }

    fn walk(
        &self,
        from: TypeId,
        anchor: Option<TypeId>,
        path: SmallVec<[TypeId; 4]>,
        public: bool,
        guard: &mut HierarchyGuard,
        search: &mut PathSearch,
    ) {
        let Some(decl) = class_record(self.db, from) else {
            return;
        };
        for base in &decl.bases {
            let (anchor, path) = if base.is_virtual {
                (Some(base.ty), SmallVec::new())
            } else {
                let mut path = path.clone();
                path.push(base.ty);
                (anchor, path)
            };
            let public = public && base.access == Access::Public;
            if base.ty == search.target {
                search.subobjects.insert((anchor, path.clone()));
                search.any_public |= public;
                let distance = guard.depth() + 1;
                search.shortest = Some(search.shortest.map_or(distance, |d| d.min(distance)));
            }
            let denied = guard
                .scope(base.ty, |guard| self.walk(base.ty, anchor, path, public, guard, search))
                .err();
            if let Some(denied) = denied {
                trace!(base = base.ty.0, ?denied, "base walk stopped");
            }
        }
    }

    /// Whether some path from `derived` to `base` passes a virtual base
    /// edge. Such a base cannot be the source of a `static_cast` downcast.
    pub fn is_virtual_base_of(&self, base: TypeId, derived: TypeId) -> bool {
        let base = unqualified(self.db, base);
        let derived = unqualified(self.db, derived);
        if base == derived || !self.is_base_of(base, derived) {
            return false;
        }
        self.reaches_virtually(derived, base, false, &mut hierarchy_guard())
    }

    fn reaches_virtually(
        &self,
        from: TypeId,
        target: TypeId,
        seen_virtual: bool,
        guard: &mut HierarchyGuard,
    ) -> bool {
        let Some(decl) = class_record(self.db, from) else {
            return false;
        };
        decl.bases.iter().any(|base| {
            let seen_virtual = seen_virtual || base.is_virtual;
            (base.ty == target && seen_virtual)
                || guard
                    .scope(base.ty, |guard| {
                        self.reaches_virtually(base.ty, target, seen_virtual, guard)
                    })
                    .unwrap_or(false)
        })
    }

    /// Every direct and indirect base class of `ty`, each listed once, in
    /// depth-first declaration order.
    pub fn all_bases(&self, ty: TypeId) -> Vec<TypeId> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        self.collect_bases(unqualified(self.db, ty), &mut out, &mut seen, &mut hierarchy_guard());
        out
    }

    fn collect_bases(
        &self,
        ty: TypeId,
        out: &mut Vec<TypeId>,
        seen: &mut FxHashSet<TypeId>,
        guard: &mut HierarchyGuard,
    ) {
        let Some(decl) = class_record(self.db, ty) else {
            return;
        };
        for base in &decl.bases {
            if seen.insert(base.ty) {
                out.push(base.ty);
            }
            let _ = guard.scope(base.ty, |guard| self.collect_bases(base.ty, out, seen, guard));
        }
    }
}

#[cfg(test)]
#[path = "../tests/class_hierarchy_tests.rs"]
mod tests;
