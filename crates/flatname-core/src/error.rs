//! Error system for decoding flattened names.
//!
//! Every failure the decoder can report is a [`DecodeError`] variant. Each
//! variant maps to a stable [`ErrorCode`] for documentation and
//! searchability, and carries help text for front ends that render rich
//! diagnostics.
//!
//! # Example
//!
//! ```
//! # use flatname_core::error::{DecodeError, ErrorCode};
//! let err = DecodeError::NotFound {
//!     name: "missing".to_string(),
//! };
//!
//! assert_eq!(err.code(), ErrorCode::E301);
//! assert_eq!(err.to_string(), "element `missing` was never added");
//! ```

mod decode_error;
mod error_code;

pub use decode_error::{DecodeError, Result};
pub use error_code::ErrorCode;
