//! Ordered candidate type lists.
//!
//! Searches such as "smallest signed integer at least as wide as `T`" or
//! "most strictly aligned fundamental type not exceeding `Len`" walk a fixed,
//! ascending list and stop at the first match. The lists are process-wide
//! constants; running off the end is the `None` sentinel.

use crate::types::BuiltinKind;
use cxxtraits_common::TargetInfo;
use cxxtraits_common::target::ScalarLayout;

/// A static, ordered sequence of candidates.
#[derive(Copy, Clone, Debug)]
pub struct TypeList<T: Copy + 'static> {
    entries: &'static [T],
}

impl<T: Copy + 'static> TypeList<T> {
    pub const fn new(entries: &'static [T]) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry satisfying `pred`; `None` when the list is exhausted.
    pub fn find_first(&self, mut pred: impl FnMut(T) -> bool) -> Option<T> {
        self.iter().find(|entry| pred(*entry))
    }
}

const SIGNED: &[BuiltinKind] = &[
    BuiltinKind::SignedChar,
    BuiltinKind::Short,
    BuiltinKind::Int,
    BuiltinKind::Long,
    BuiltinKind::LongLong,
];

const SIGNED_WITH_INT128: &[BuiltinKind] = &[
    BuiltinKind::SignedChar,
    BuiltinKind::Short,
    BuiltinKind::Int,
    BuiltinKind::Long,
    BuiltinKind::LongLong,
    BuiltinKind::Int128,
];

const UNSIGNED: &[BuiltinKind] = &[
    BuiltinKind::UnsignedChar,
    BuiltinKind::UnsignedShort,
    BuiltinKind::UnsignedInt,
    BuiltinKind::UnsignedLong,
    BuiltinKind::UnsignedLongLong,
];

const UNSIGNED_WITH_INT128: &[BuiltinKind] = &[
    BuiltinKind::UnsignedChar,
    BuiltinKind::UnsignedShort,
    BuiltinKind::UnsignedInt,
    BuiltinKind::UnsignedLong,
    BuiltinKind::UnsignedLongLong,
    BuiltinKind::UnsignedInt128,
];

/// Signed integer types in ascending rank.
pub fn signed_integers(int128: bool) -> TypeList<BuiltinKind> {
    TypeList::new(if int128 { SIGNED_WITH_INT128 } else { SIGNED })
}

/// Unsigned integer types in ascending rank.
pub fn unsigned_integers(int128: bool) -> TypeList<BuiltinKind> {
    TypeList::new(if int128 {
        UNSIGNED_WITH_INT128
    } else {
        UNSIGNED
    })
}

/// First integer in `list` at least `size` bytes wide.
pub fn first_with_size_at_least(
    list: TypeList<BuiltinKind>,
    size: u64,
    target: &TargetInfo,
) -> Option<BuiltinKind> {
    list.find_first(|kind| size <= kind.layout(target).size)
}

/// Entries of the alignment search list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AlignCandidate {
    Builtin(BuiltinKind),
    /// `struct { long double x; }`
    LongDoubleStruct,
    /// `struct { double x[4]; }`
    DoubleArrayStruct,
    /// `int*`
    Pointer,
}

impl AlignCandidate {
    pub fn layout(self, target: &TargetInfo) -> ScalarLayout {
        match self {
            AlignCandidate::Builtin(kind) => kind.layout(target),
            AlignCandidate::LongDoubleStruct => target.long_double_layout,
            AlignCandidate::DoubleArrayStruct => {
                let double = target.double_layout;
                ScalarLayout::new(double.size * 4, double.align)
            }
            AlignCandidate::Pointer => target.pointer_layout,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AlignCandidate::Builtin(kind) => kind.name(),
            AlignCandidate::LongDoubleStruct => "struct { long double }",
            AlignCandidate::DoubleArrayStruct => "struct { double[4] }",
            AlignCandidate::Pointer => "int*",
        }
    }
}

/// Every candidate alignment type, in the order the search walks them.
pub const ALIGNMENT_CANDIDATES: TypeList<AlignCandidate> = TypeList::new(&[
    AlignCandidate::Builtin(BuiltinKind::UnsignedChar),
    AlignCandidate::Builtin(BuiltinKind::UnsignedShort),
    AlignCandidate::Builtin(BuiltinKind::UnsignedInt),
    AlignCandidate::Builtin(BuiltinKind::UnsignedLong),
    AlignCandidate::Builtin(BuiltinKind::UnsignedLongLong),
    AlignCandidate::Builtin(BuiltinKind::Double),
    AlignCandidate::Builtin(BuiltinKind::LongDouble),
    AlignCandidate::LongDoubleStruct,
    AlignCandidate::DoubleArrayStruct,
    AlignCandidate::Pointer,
]);

/// Default alignment for `len` bytes of storage: the strictest candidate
/// alignment not exceeding `len`, or the loosest one when every candidate
/// is stricter than `len`.
pub fn max_alignment_within(len: u64, target: &TargetInfo) -> u64 {
    let aligns = || ALIGNMENT_CANDIDATES.iter().map(|c| c.layout(target).align);
    let fitting = aligns().filter(|align| *align <= len).max();
    fitting.or_else(|| aligns().min()).unwrap_or(1)
}

/// First candidate whose natural alignment is exactly `align`.
pub fn candidate_with_alignment(align: u64, target: &TargetInfo) -> Option<AlignCandidate> {
    ALIGNMENT_CANDIDATES.find_first(|c| c.layout(target).align == align)
}

#[cfg(test)]
#[path = "../tests/type_list_tests.rs"]
mod tests;
