//! Target data model.
//!
//! Sizes and alignments of the scalar types depend on the platform the
//! modeled program is compiled for. `TargetInfo` captures them so that layout
//! questions (`sizeof`, `alignof`, `aligned_storage`, emptiness) and the
//! size-based type ladders (`make_signed`, `make_unsigned`) answer the way
//! the real compiler would on that target.
//!
//! Presets cover the common data models. A custom model can be loaded from
//! JSON:
//!
//! ```json
//! { "name": "custom", "char_is_signed": false, ... }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size and alignment of one scalar type, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScalarLayout {
    pub size: u64,
    pub align: u64,
}

impl ScalarLayout {
    pub const fn new(size: u64, align: u64) -> Self {
        Self { size, align }
    }

    /// Layout whose alignment equals its size.
    pub const fn natural(size: u64) -> Self {
        Self { size, align: size }
    }
}

/// Description of a compilation target's data model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInfo {
    pub name: String,
    pub char_is_signed: bool,
    pub wchar_is_signed: bool,
    pub bool_layout: ScalarLayout,
    pub char_layout: ScalarLayout,
    pub wchar_layout: ScalarLayout,
    pub char16_layout: ScalarLayout,
    pub char32_layout: ScalarLayout,
    pub short_layout: ScalarLayout,
    pub int_layout: ScalarLayout,
    pub long_layout: ScalarLayout,
    pub long_long_layout: ScalarLayout,
    pub int128_layout: ScalarLayout,
    pub float_layout: ScalarLayout,
    pub double_layout: ScalarLayout,
    pub long_double_layout: ScalarLayout,
    pub pointer_layout: ScalarLayout,
    pub member_data_pointer_layout: ScalarLayout,
    pub member_function_pointer_layout: ScalarLayout,
    /// Alignment of `std::max_align_t`.
    pub max_fundamental_align: u64,
}

/// Error produced when a JSON target description cannot be used.
#[derive(Debug, Error)]
pub enum TargetInfoError {
    #[error("invalid target description: {0}")]
    Parse(#[from] serde_json::Error),
    /// A size or alignment is zero, or an alignment is not a power of two.
    #[error("invalid layout for `{0}` in target description")]
    InvalidLayout(&'static str),
}

impl TargetInfo {
    /// 64-bit Unix-like targets (x86-64 and AArch64 Linux, macOS).
    pub fn lp64() -> Self {
        Self {
            name: "lp64".to_string(),
            char_is_signed: true,
            wchar_is_signed: true,
            bool_layout: ScalarLayout::natural(1),
            char_layout: ScalarLayout::natural(1),
            wchar_layout: ScalarLayout::natural(4),
            char16_layout: ScalarLayout::natural(2),
            char32_layout: ScalarLayout::natural(4),
            short_layout: ScalarLayout::natural(2),
            int_layout: ScalarLayout::natural(4),
            long_layout: ScalarLayout::natural(8),
            long_long_layout: ScalarLayout::natural(8),
            int128_layout: ScalarLayout::natural(16),
            float_layout: ScalarLayout::natural(4),
            double_layout: ScalarLayout::natural(8),
            long_double_layout: ScalarLayout::natural(16),
            pointer_layout: ScalarLayout::natural(8),
            member_data_pointer_layout: ScalarLayout::natural(8),
            member_function_pointer_layout: ScalarLayout::new(16, 8),
            max_fundamental_align: 16,
        }
    }

    /// 64-bit Windows.
    pub fn llp64() -> Self {
        Self {
            name: "llp64".to_string(),
            wchar_is_signed: false,
            wchar_layout: ScalarLayout::natural(2),
            long_layout: ScalarLayout::natural(4),
            long_double_layout: ScalarLayout::natural(8),
            ..Self::lp64()
        }
    }

    /// 32-bit x86 System V.
    pub fn ilp32() -> Self {
        Self {
            name: "ilp32".to_string(),
            long_layout: ScalarLayout::natural(4),
            long_long_layout: ScalarLayout::new(8, 4),
            double_layout: ScalarLayout::new(8, 4),
            long_double_layout: ScalarLayout::new(12, 4),
            pointer_layout: ScalarLayout::natural(4),
            member_data_pointer_layout: ScalarLayout::natural(4),
            member_function_pointer_layout: ScalarLayout::new(8, 4),
            ..Self::lp64()
        }
    }

    /// Parse and validate a target description.
    pub fn from_json(text: &str) -> Result<Self, TargetInfoError> {
        let target: TargetInfo = serde_json::from_str(text)?;
        target.validate()?;
        Ok(target)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    fn validate(&self) -> Result<(), TargetInfoError> {
        let layouts = [
            ("bool_layout", self.bool_layout),
            ("char_layout", self.char_layout),
            ("wchar_layout", self.wchar_layout),
            ("char16_layout", self.char16_layout),
            ("char32_layout", self.char32_layout),
            ("short_layout", self.short_layout),
            ("int_layout", self.int_layout),
            ("long_layout", self.long_layout),
            ("long_long_layout", self.long_long_layout),
            ("int128_layout", self.int128_layout),
            ("float_layout", self.float_layout),
            ("double_layout", self.double_layout),
            ("long_double_layout", self.long_double_layout),
            ("pointer_layout", self.pointer_layout),
            ("member_data_pointer_layout", self.member_data_pointer_layout),
            ("member_function_pointer_layout", self.member_function_pointer_layout),
        ];
        for (field, layout) in layouts {
            if layout.size == 0 || !layout.align.is_power_of_two() {
                return Err(TargetInfoError::InvalidLayout(field));
            }
        }
        if !self.max_fundamental_align.is_power_of_two() {
            return Err(TargetInfoError::InvalidLayout("max_fundamental_align"));
        }
        Ok(())
    }
}

impl Default for TargetInfo {
    fn default() -> Self {
        Self::lp64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ_where_data_models_differ() {
        let lp64 = TargetInfo::lp64();
        let llp64 = TargetInfo::llp64();
        let ilp32 = TargetInfo::ilp32();
        assert_eq!(lp64.long_layout.size, 8);
        assert_eq!(llp64.long_layout.size, 4);
        assert_eq!(ilp32.pointer_layout.size, 4);
        assert_eq!(ilp32.long_long_layout.align, 4);
    }

    #[test]
    fn test_json_round_trip_preserves_target() {
        let target = TargetInfo::llp64();
        let parsed = TargetInfo::from_json(&target.to_json()).unwrap();
        assert_eq!(parsed, target);
    }

    #[test]
    fn test_rejects_non_power_of_two_alignment() {
        let mut target = TargetInfo::lp64();
        target.double_layout = ScalarLayout::new(8, 6);
        let err = TargetInfo::from_json(&target.to_json()).unwrap_err();
        assert!(matches!(err, TargetInfoError::InvalidLayout("double_layout")));
    }
}
