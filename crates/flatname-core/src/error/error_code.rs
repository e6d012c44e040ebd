//! Error codes for the flatname error system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Pattern and decode errors
//! - `E2xx` - Hierarchy resolution errors
//! - `E3xx` - Registry errors

use std::fmt;

/// Error codes for categorizing decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Pattern and Decode Errors (E1xx)
    // =========================================================================
    /// Invalid pattern.
    ///
    /// An ancestor spelling produced a pattern the matcher rejects.
    E100,

    /// Pattern mismatch.
    ///
    /// An encoded name does not match the pattern built from its ancestors.
    E101,

    /// Invalid index.
    ///
    /// A segment of the index suffix is not a non-negative integer.
    E102,

    /// Index hierarchy mismatch.
    ///
    /// The decoded index prefix disagrees with the ancestors' own indexes.
    E103,

    // =========================================================================
    // Hierarchy Errors (E2xx)
    // =========================================================================
    /// No parent candidate.
    ///
    /// Disambiguation removed every parent candidate of a container.
    E200,

    /// Ambiguous parent.
    ///
    /// Several parent candidates remain once disambiguation stops changing.
    E201,

    /// Parent not found.
    ///
    /// A computed parent has no built node. This indicates a defect.
    E202,

    // =========================================================================
    // Registry Errors (E3xx)
    // =========================================================================
    /// Ambiguous build.
    ///
    /// A leaf matches several equally specific containers.
    E300,

    /// Element not found.
    ///
    /// An element was requested that was never added.
    E301,

    /// Element not built.
    ///
    /// An added entry produced neither a container nor a leaf. This
    /// indicates a defect.
    E302,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E101").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "invalid pattern",
            ErrorCode::E101 => "pattern mismatch",
            ErrorCode::E102 => "invalid index",
            ErrorCode::E103 => "index hierarchy mismatch",
            ErrorCode::E200 => "no parent candidate",
            ErrorCode::E201 => "ambiguous parent",
            ErrorCode::E202 => "parent not found",
            ErrorCode::E300 => "ambiguous build",
            ErrorCode::E301 => "element not found",
            ErrorCode::E302 => "element not built",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
