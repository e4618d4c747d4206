//! Type representation for the trait solver.
//!
//! Every type of the modeled C++ program is a `TypeData` node interned into a
//! `TypeId`. Interning keeps types in canonical form (cv-qualification pushed
//! onto array elements, references collapsed, function parameters adjusted),
//! so two spellings of the same type always share one id and type identity is
//! a `u32` comparison.

use bitflags::bitflags;
use cxxtraits_common::TargetInfo;
use cxxtraits_common::target::ScalarLayout;
use serde::{Deserialize, Serialize};

// =============================================================================
// TypeId
// =============================================================================

/// Interned type handle.
///
/// Ids below `FIRST_USER` are reserved for `void`, `std::nullptr_t` and the
/// builtin arithmetic types; they are never stored in the interner shards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const VOID: TypeId = TypeId(1);
    pub const NULLPTR: TypeId = TypeId(2);

    pub const BOOL: TypeId = BuiltinKind::Bool.type_id();
    pub const CHAR: TypeId = BuiltinKind::Char.type_id();
    pub const SIGNED_CHAR: TypeId = BuiltinKind::SignedChar.type_id();
    pub const UNSIGNED_CHAR: TypeId = BuiltinKind::UnsignedChar.type_id();
    pub const WCHAR: TypeId = BuiltinKind::WChar.type_id();
    pub const CHAR16: TypeId = BuiltinKind::Char16.type_id();
    pub const CHAR32: TypeId = BuiltinKind::Char32.type_id();
    pub const SHORT: TypeId = BuiltinKind::Short.type_id();
    pub const UNSIGNED_SHORT: TypeId = BuiltinKind::UnsignedShort.type_id();
    pub const INT: TypeId = BuiltinKind::Int.type_id();
    pub const UNSIGNED_INT: TypeId = BuiltinKind::UnsignedInt.type_id();
    pub const LONG: TypeId = BuiltinKind::Long.type_id();
    pub const UNSIGNED_LONG: TypeId = BuiltinKind::UnsignedLong.type_id();
    pub const LONG_LONG: TypeId = BuiltinKind::LongLong.type_id();
    pub const UNSIGNED_LONG_LONG: TypeId = BuiltinKind::UnsignedLongLong.type_id();
    pub const INT128: TypeId = BuiltinKind::Int128.type_id();
    pub const UNSIGNED_INT128: TypeId = BuiltinKind::UnsignedInt128.type_id();
    pub const FLOAT: TypeId = BuiltinKind::Float.type_id();
    pub const DOUBLE: TypeId = BuiltinKind::Double.type_id();
    pub const LONG_DOUBLE: TypeId = BuiltinKind::LongDouble.type_id();

    /// First id handed out by the interner.
    pub const FIRST_USER: u32 = 64;

    /// Whether this id names one of the predefined types.
    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

// =============================================================================
// Builtin arithmetic types
// =============================================================================

/// The builtin arithmetic types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuiltinKind {
    Bool,
    Char,
    SignedChar,
    UnsignedChar,
    WChar,
    Char16,
    Char32,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Int128,
    UnsignedInt128,
    Float,
    Double,
    LongDouble,
}

const BUILTIN_BASE: u32 = 3;

impl BuiltinKind {
    pub const ALL: [BuiltinKind; 20] = [
        BuiltinKind::Bool,
        BuiltinKind::Char,
        BuiltinKind::SignedChar,
        BuiltinKind::UnsignedChar,
        BuiltinKind::WChar,
        BuiltinKind::Char16,
        BuiltinKind::Char32,
        BuiltinKind::Short,
        BuiltinKind::UnsignedShort,
        BuiltinKind::Int,
        BuiltinKind::UnsignedInt,
        BuiltinKind::Long,
        BuiltinKind::UnsignedLong,
        BuiltinKind::LongLong,
        BuiltinKind::UnsignedLongLong,
        BuiltinKind::Int128,
        BuiltinKind::UnsignedInt128,
        BuiltinKind::Float,
        BuiltinKind::Double,
        BuiltinKind::LongDouble,
    ];

    #[inline]
    pub const fn type_id(self) -> TypeId {
        TypeId(BUILTIN_BASE + self as u32)
    }

    pub fn from_type_id(id: TypeId) -> Option<BuiltinKind> {
        let index = id.0.checked_sub(BUILTIN_BASE)?;
        Self::ALL.get(index as usize).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            BuiltinKind::Bool => "bool",
            BuiltinKind::Char => "char",
            BuiltinKind::SignedChar => "signed char",
            BuiltinKind::UnsignedChar => "unsigned char",
            BuiltinKind::WChar => "wchar_t",
            BuiltinKind::Char16 => "char16_t",
            BuiltinKind::Char32 => "char32_t",
            BuiltinKind::Short => "short",
            BuiltinKind::UnsignedShort => "unsigned short",
            BuiltinKind::Int => "int",
            BuiltinKind::UnsignedInt => "unsigned int",
            BuiltinKind::Long => "long",
            BuiltinKind::UnsignedLong => "unsigned long",
            BuiltinKind::LongLong => "long long",
            BuiltinKind::UnsignedLongLong => "unsigned long long",
            BuiltinKind::Int128 => "__int128",
            BuiltinKind::UnsignedInt128 => "unsigned __int128",
            BuiltinKind::Float => "float",
            BuiltinKind::Double => "double",
            BuiltinKind::LongDouble => "long double",
        }
    }

    #[inline]
    pub const fn is_floating_point(self) -> bool {
        matches!(
            self,
            BuiltinKind::Float | BuiltinKind::Double | BuiltinKind::LongDouble
        )
    }

    #[inline]
    pub const fn is_integral(self) -> bool {
        !self.is_floating_point()
    }

    /// Character types other than the plain narrow ones; they promote by range.
    #[inline]
    pub const fn is_wide_character(self) -> bool {
        matches!(
            self,
            BuiltinKind::WChar | BuiltinKind::Char16 | BuiltinKind::Char32
        )
    }

    /// Signedness on the given target. Floating-point types are signed.
    pub fn is_signed(self, target: &TargetInfo) -> bool {
        match self {
            BuiltinKind::Bool
            | BuiltinKind::UnsignedChar
            | BuiltinKind::Char16
            | BuiltinKind::Char32
            | BuiltinKind::UnsignedShort
            | BuiltinKind::UnsignedInt
            | BuiltinKind::UnsignedLong
            | BuiltinKind::UnsignedLongLong
            | BuiltinKind::UnsignedInt128 => false,
            BuiltinKind::Char => target.char_is_signed,
            BuiltinKind::WChar => target.wchar_is_signed,
            BuiltinKind::SignedChar
            | BuiltinKind::Short
            | BuiltinKind::Int
            | BuiltinKind::Long
            | BuiltinKind::LongLong
            | BuiltinKind::Int128
            | BuiltinKind::Float
            | BuiltinKind::Double
            | BuiltinKind::LongDouble => true,
        }
    }

    /// Integer conversion rank. Character types share the rank of the
    /// standard integer type they are represented by.
    pub fn integer_rank(self, target: &TargetInfo) -> u8 {
        match self {
            BuiltinKind::Bool => 0,
            BuiltinKind::Char | BuiltinKind::SignedChar | BuiltinKind::UnsignedChar => 1,
            BuiltinKind::Short | BuiltinKind::UnsignedShort => 2,
            BuiltinKind::Int | BuiltinKind::UnsignedInt => 3,
            BuiltinKind::Long | BuiltinKind::UnsignedLong => 4,
            BuiltinKind::LongLong | BuiltinKind::UnsignedLongLong => 5,
            BuiltinKind::Int128 | BuiltinKind::UnsignedInt128 => 6,
            BuiltinKind::WChar | BuiltinKind::Char16 | BuiltinKind::Char32 => {
                let size = self.layout(target).size;
                if size <= target.char_layout.size {
                    1
                } else if size <= target.short_layout.size {
                    2
                } else if size <= target.int_layout.size {
                    3
                } else {
                    4
                }
            }
            BuiltinKind::Float | BuiltinKind::Double | BuiltinKind::LongDouble => 0,
        }
    }

    pub fn layout(self, target: &TargetInfo) -> ScalarLayout {
        match self {
            BuiltinKind::Bool => target.bool_layout,
            BuiltinKind::Char | BuiltinKind::SignedChar | BuiltinKind::UnsignedChar => {
                target.char_layout
            }
            BuiltinKind::WChar => target.wchar_layout,
            BuiltinKind::Char16 => target.char16_layout,
            BuiltinKind::Char32 => target.char32_layout,
            BuiltinKind::Short | BuiltinKind::UnsignedShort => target.short_layout,
            BuiltinKind::Int | BuiltinKind::UnsignedInt => target.int_layout,
            BuiltinKind::Long | BuiltinKind::UnsignedLong => target.long_layout,
            BuiltinKind::LongLong | BuiltinKind::UnsignedLongLong => target.long_long_layout,
            BuiltinKind::Int128 | BuiltinKind::UnsignedInt128 => target.int128_layout,
            BuiltinKind::Float => target.float_layout,
            BuiltinKind::Double => target.double_layout,
            BuiltinKind::LongDouble => target.long_double_layout,
        }
    }

    /// Number of value bits (the sign bit included).
    pub fn value_bits(self, target: &TargetInfo) -> u32 {
        match self {
            BuiltinKind::Bool => 1,
            _ => (self.layout(target).size * 8) as u32,
        }
    }

    /// Whether every value of `self` is representable in `other`.
    /// Only meaningful for integral kinds.
    pub fn fits_in(self, other: BuiltinKind, target: &TargetInfo) -> bool {
        let src_bits = self.value_bits(target);
        let dst_bits = other.value_bits(target);
        match (self.is_signed(target), other.is_signed(target)) {
            (false, false) | (true, true) => src_bits <= dst_bits,
            (false, true) => src_bits < dst_bits,
            (true, false) => false,
        }
    }
}

// =============================================================================
// Qualifiers
// =============================================================================

bitflags! {
    /// Top-level const/volatile qualification.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct CvQualifiers: u8 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
    }
}

impl CvQualifiers {
    /// `self` is at least as qualified as `other`.
    #[inline]
    pub fn is_superset_of(self, other: CvQualifiers) -> bool {
        self.contains(other)
    }

    pub fn spelling(self) -> &'static str {
        match (
            self.contains(CvQualifiers::CONST),
            self.contains(CvQualifiers::VOLATILE),
        ) {
            (false, false) => "",
            (true, false) => "const",
            (false, true) => "volatile",
            (true, true) => "const volatile",
        }
    }
}

/// Ref-qualifier of a non-static member function.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefQualifier {
    #[default]
    None,
    LValue,
    RValue,
}

// =============================================================================
// Function shapes
// =============================================================================

/// Interned function signature handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShapeId(pub u32);

/// A function type: `R(P...) cv ref noexcept`.
///
/// The method qualifiers (`cv`, `ref_qualifier`) are meaningful for the
/// pointee of a member function pointer. On a free function type they make
/// the type an "abominable" function type that cannot be referenced or
/// pointed to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub ret: TypeId,
    pub params: Vec<TypeId>,
    pub variadic: bool,
    pub cv: CvQualifiers,
    pub ref_qualifier: RefQualifier,
    pub noexcept: bool,
}

impl FunctionShape {
    pub fn new(ret: TypeId, params: Vec<TypeId>) -> Self {
        Self {
            ret,
            params,
            variadic: false,
            cv: CvQualifiers::empty(),
            ref_qualifier: RefQualifier::None,
            noexcept: false,
        }
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
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

    pub fn noexcept(mut self) -> Self {
        self.noexcept = true;
        self
    }

    /// Carries method qualifiers, so cannot be named by pointer or reference.
    #[inline]
    pub fn is_abominable(&self) -> bool {
        !self.cv.is_empty() || self.ref_qualifier != RefQualifier::None
    }
}

// =============================================================================
// Declarations referenced by types
// =============================================================================

/// Identifier of a class, struct or union declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub u32);

/// Identifier of an enumeration declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumId(pub u32);

// =============================================================================
// TypeData
// =============================================================================

/// Structural type node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Void,
    NullPtr,
    Builtin(BuiltinKind),
    /// cv-qualified type. Never wraps a reference, a function, an array or
    /// another `Qualified` node.
    Qualified(TypeId, CvQualifiers),
    Pointer(TypeId),
    LValueRef(TypeId),
    RValueRef(TypeId),
    Array {
        element: TypeId,
        bound: Option<u64>,
    },
    Function(FunctionShapeId),
    MemberPointer {
        class: TypeId,
        pointee: TypeId,
    },
    Record(RecordId),
    Enum(EnumId),
}

// =============================================================================
// Expressions
// =============================================================================

/// Value category of an expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueCategory {
    LValue,
    XValue,
    PRValue,
}

impl ValueCategory {
    #[inline]
    pub fn is_glvalue(self) -> bool {
        matches!(self, ValueCategory::LValue | ValueCategory::XValue)
    }

    #[inline]
    pub fn is_rvalue(self) -> bool {
        matches!(self, ValueCategory::XValue | ValueCategory::PRValue)
    }
}

/// Member access level.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
