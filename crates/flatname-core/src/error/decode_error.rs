//! The [`DecodeError`] type covering every decoding failure.

use thiserror::Error;

use crate::error::ErrorCode;

/// A type alias for `Result<T, DecodeError>`.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors raised while decoding flattened names.
///
/// All variants are deterministic functions of the input: the same entries
/// always fail the same way.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid name pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to match `{name}` against pattern `{pattern}`")]
    PatternMismatch { name: String, pattern: String },

    #[error("invalid index segment `{segment}` in `{name}`")]
    InvalidIndex { name: String, segment: String },

    #[error(
        "parent indexes do not match index hierarchy for `{name}`: indexes {indexes:?}, parents {parent_indexes:?}"
    )]
    IndexMismatch {
        name: String,
        indexes: Vec<u32>,
        parent_indexes: Vec<u32>,
    },

    #[error("no parent candidate left for container `{name}`")]
    NoParentCandidate { name: String },

    #[error("container `{name}` has ambiguous parent candidates {candidates:?}")]
    AmbiguousParent {
        name: String,
        candidates: Vec<String>,
    },

    #[error("parent `{parent}` of container `{name}` was not found")]
    ParentNotFound { name: String, parent: String },

    #[error("element `{name}` matches several equally specific containers {candidates:?}")]
    AmbiguousBuild {
        name: String,
        candidates: Vec<String>,
    },

    #[error("element `{name}` was never added")]
    NotFound { name: String },

    #[error("entry `{name}` was added but no element was built for it")]
    ElementNotBuilt { name: String },
}

impl DecodeError {
    /// Returns the [`ErrorCode`] of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidPattern { .. } => ErrorCode::E100,
            Self::PatternMismatch { .. } => ErrorCode::E101,
            Self::InvalidIndex { .. } => ErrorCode::E102,
            Self::IndexMismatch { .. } => ErrorCode::E103,
            Self::NoParentCandidate { .. } => ErrorCode::E200,
            Self::AmbiguousParent { .. } => ErrorCode::E201,
            Self::ParentNotFound { .. } => ErrorCode::E202,
            Self::AmbiguousBuild { .. } => ErrorCode::E300,
            Self::NotFound { .. } => ErrorCode::E301,
            Self::ElementNotBuilt { .. } => ErrorCode::E302,
        }
    }

    /// Returns a suggestion for resolving this error.
    pub fn help(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => {
                "container names may only contain characters the matcher accepts literally"
            }
            Self::PatternMismatch { .. } => {
                "the element does not belong under the computed parent, or its name breaks the encoding"
            }
            Self::InvalidIndex { .. } => "index suffixes are digit runs separated by `_`",
            Self::IndexMismatch { .. } => {
                "the leading indexes must repeat the indexes of the enclosing containers"
            }
            Self::NoParentCandidate { .. } | Self::AmbiguousParent { .. } => {
                "check that every enclosing container of this element was added"
            }
            Self::ParentNotFound { .. } => "this is a bug in the hierarchy resolver",
            Self::ElementNotBuilt { .. } => "this is a bug in the registry",
            Self::AmbiguousBuild { .. } => {
                "rename one of the containers or use the `first-match` attach policy"
            }
            Self::NotFound { .. } => "add the element before querying it",
        }
    }
}
