//! Flatname Core Types and Definitions
//!
//! This crate provides the foundational types for decoding flattened
//! element names. It includes:
//!
//! - **Patterns**: Ancestor-aware name patterns ([`pattern::NamePattern`])
//! - **Elements**: Container and leaf nodes with lazily decoded names ([`element`] module)
//! - **Payloads**: Opaque container payloads and pluggable decoders ([`payload`] module)
//! - **Errors**: Decode errors with stable error codes ([`error`] module)

pub mod element;
pub mod error;
pub mod pattern;
pub mod payload;

pub use element::{CONTAINER_KINDS, Container, Element, Leaf, is_container_kind};
pub use error::{DecodeError, ErrorCode};
pub use pattern::{NameMatch, NamePattern, flatten_name};
pub use payload::{JsonPayloadDecoder, Payload, PayloadDecoder};
