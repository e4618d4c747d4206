//! Capability oracle.
//!
//! Which compiler builtins and language features the engine may rely on.
//! Predicates with an intrinsic path ask the oracle before using it; when the
//! answer is "no" they fall back to the classical formulation over the
//! expression engine.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Compiler builtins with a fast intrinsic path.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Builtins: u32 {
        const IS_CONVERTIBLE_TO = 1 << 0;
        const IS_CONSTRUCTIBLE = 1 << 1;
        const IS_ASSIGNABLE = 1 << 2;
        const IS_DESTRUCTIBLE = 1 << 3;
        const IS_TRIVIALLY_CONSTRUCTIBLE = 1 << 4;
        const IS_TRIVIALLY_ASSIGNABLE = 1 << 5;
        const IS_TRIVIALLY_DESTRUCTIBLE = 1 << 6;
        const HAS_TRIVIAL_CONSTRUCTOR = 1 << 7;
        const HAS_TRIVIAL_DESTRUCTOR = 1 << 8;
        const IS_NOTHROW_CONSTRUCTIBLE = 1 << 9;
        const IS_NOTHROW_ASSIGNABLE = 1 << 10;
        const IS_EMPTY = 1 << 11;
        const IS_POLYMORPHIC = 1 << 12;
        const IS_POD = 1 << 13;
        const IS_STANDARD_LAYOUT = 1 << 14;
        const IS_TRIVIALLY_COPYABLE = 1 << 15;
        const IS_TRIVIAL = 1 << 16;
        const IS_LITERAL_TYPE = 1 << 17;
        const IS_AGGREGATE = 1 << 18;
        const HAS_UNIQUE_OBJECT_REPRESENTATIONS = 1 << 19;
        const UNDERLYING_TYPE = 1 << 20;
    }
}

bitflags! {
    /// Language features.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Features: u32 {
        /// `noexcept` expressions and exception specifications can be queried.
        const NOEXCEPT = 1 << 0;
        /// `__int128` takes part in the signed/unsigned integer ladders.
        const INT128 = 1 << 1;
        /// Member functions may carry `&`/`&&` qualifiers.
        const REF_QUALIFIED_FUNCTIONS = 1 << 2;
    }
}

/// Answers "does builtin X exist" and "is feature Y available".
pub trait CapabilityOracle: Send + Sync {
    fn has_builtin(&self, builtin: Builtins) -> bool;
    fn has_feature(&self, feature: Features) -> bool;
}

/// A fixed capability set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    pub builtins: Builtins,
    pub features: Features,
}

impl Capabilities {
    /// Every builtin and every feature: a modern compiler front end.
    pub fn all() -> Self {
        Self {
            builtins: Builtins::all(),
            features: Features::all(),
        }
    }

    /// Nothing at all: every predicate takes its fallback path.
    pub fn none() -> Self {
        Self {
            builtins: Builtins::empty(),
            features: Features::empty(),
        }
    }

    pub fn with_builtins(mut self, builtins: Builtins) -> Self {
        self.builtins = builtins;
        self
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

impl CapabilityOracle for Capabilities {
    fn has_builtin(&self, builtin: Builtins) -> bool {
        self.builtins.contains(builtin)
    }

    fn has_feature(&self, feature: Features) -> bool {
        self.features.contains(feature)
    }
}

#[cfg(test)]
#[path = "../tests/capabilities_tests.rs"]
mod tests;
