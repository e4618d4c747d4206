//! Contract violations.
//!
//! An ill-formed expression is never an error; it is `Inapplicable` and the
//! enclosing predicate simply answers `false`. `TraitError` is reserved for
//! requests that are wrong on their face: too many arguments, impossible
//! alignments, malformed record declarations.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TraitError {
    #[error("{trait_name} accepts at most {max} argument types, got {given}")]
    ArityExceeded {
        trait_name: &'static str,
        given: usize,
        max: usize,
    },

    #[error("{trait_name} expects {expected} argument types, got {given}")]
    ArityMismatch {
        trait_name: &'static str,
        expected: &'static str,
        given: usize,
    },

    #[error("alignment {align} is not a power of two no greater than {max}")]
    InvalidAlignment { align: u64, max: u64 },

    #[error("storage length must be nonzero")]
    ZeroLength,

    #[error("{len} bytes rounded up to alignment {align} does not fit in 64 bits")]
    SizeOverflow { len: u64, align: u64 },

    #[error("record `{record}` is too large to lay out")]
    RecordTooLarge { record: String },

    #[error("unknown record id {0}")]
    UnknownRecord(u32),

    #[error("unknown enum id {0}")]
    UnknownEnum(u32),

    #[error("record `{record}` cannot derive from itself")]
    SelfBase { record: String },

    #[error("record `{record}` derives from incomplete type `{base}`")]
    IncompleteBase { record: String, base: String },

    #[error("record `{record}` derives from non-class type `{base}`")]
    InvalidBase { record: String, base: String },

    #[error("union `{record}` cannot have base classes")]
    UnionBase { record: String },

    #[error("member `{member}` of `{record}` has incomplete or non-object type `{ty}`")]
    InvalidMember {
        record: String,
        member: String,
        ty: String,
    },

    #[error("{trait_name} requires an integral or enumeration type other than bool, got `{ty}`")]
    NotIntegral { trait_name: &'static str, ty: String },

    #[error("no integer type of {size} bytes is available for {trait_name}")]
    NoMatchingInteger { trait_name: &'static str, size: u64 },

    #[error("underlying_type requires an enumeration type, got `{ty}`")]
    NotEnum { ty: String },

    #[error("`{ty}` has no size")]
    Unsized { ty: String },
}

pub type TraitResult<T> = Result<T, TraitError>;
