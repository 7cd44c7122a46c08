use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

use crate::value::{ConversionError, ShortName};

// -----------------------------------------------------------------------------
// TargetFound

/// What was passed where an instance target was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFound {
    /// No target at all.
    Missing,
    /// A target whose type neither is nor derives from the declaring type.
    Unrelated,
}

impl fmt::Display for TargetFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.pad("no target"),
            Self::Unrelated => f.pad("a target of an unrelated type"),
        }
    }
}

// -----------------------------------------------------------------------------
// AccessError

/// Every failure the accessor compilers, the cache and [`DynamicHandle`] can report.
///
/// All of them are caller defects, none is retried internally.
///
/// [`DynamicHandle`]: crate::DynamicHandle
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("`{type_name}` has no member matching `{member}`")]
    MemberNotFound { type_name: ShortName, member: String },

    #[error("call to `{type_name}::{member}` is ambiguous between: {}", .candidates.join(", "))]
    AmbiguousOverload {
        type_name: ShortName,
        member: String,
        candidates: Vec<String>,
    },

    #[error("`{member}` takes {expected} arguments, {actual} were given")]
    ArityMismatch {
        member: String,
        expected: usize,
        actual: usize,
    },

    #[error("`{member}` needs a target of type `{expected}`, found {found}")]
    InvalidTarget {
        member: String,
        expected: ShortName,
        found: TargetFound,
    },

    #[error(transparent)]
    ValueConversion(#[from] ConversionError),

    #[error("`{type_name}` has no parameterless constructor")]
    NoParameterlessConstructor { type_name: ShortName },

    #[error("generic method `{member}` still has {arity} unbound type parameters")]
    OpenGenericMethod { member: String, arity: usize },

    #[error("property `{member}` has no setter")]
    NoSetter { member: String },
}
