//! Opaque container payloads.
//!
//! Container entries may carry a serialized blob (for example the list of
//! loop keys a block stores). The decoder never looks inside it: a
//! [`Payload`] is forwarded verbatim to the decoded [`Container`], and
//! callers that know the blob's format interpret it through a
//! [`PayloadDecoder`] of their choice.
//!
//! [`Container`]: crate::element::Container

use std::{fmt, marker::PhantomData};

use serde::de::DeserializeOwned;

/// Raw payload bytes attached to a container entry.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Payload(Vec<u8>);

impl Payload {
    /// Wrap raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Interpret the payload with a caller-supplied decoder.
    ///
    /// # Examples
    ///
    /// ```
    /// use flatname_core::payload::{JsonPayloadDecoder, Payload};
    ///
    /// let payload = Payload::from("[1, 2, 3]");
    /// let keys: Vec<u32> = payload.decode(&JsonPayloadDecoder::new()).unwrap();
    /// assert_eq!(keys, vec![1, 2, 3]);
    /// ```
    pub fn decode<D: PayloadDecoder>(&self, decoder: &D) -> Result<D::Output, D::Error> {
        decoder.decode(&self.0)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

/// Turns payload bytes into a caller-defined value.
pub trait PayloadDecoder {
    type Output;
    type Error: std::error::Error;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Output, Self::Error>;
}

/// [`PayloadDecoder`] for JSON-encoded payloads.
pub struct JsonPayloadDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonPayloadDecoder<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonPayloadDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> PayloadDecoder for JsonPayloadDecoder<T> {
    type Output = T;
    type Error = serde_json::Error;

    fn decode(&self, bytes: &[u8]) -> Result<T, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
