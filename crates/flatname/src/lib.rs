//! Flatname - Recover the nesting hierarchy encoded in flattened element names.
//!
//! Legacy documents store nested, repeatable elements under flat names that
//! spell out every enclosing container and loop position, for example
//! `accordionAB_AB-BAB3_AB-B-ABAB_AB-BAB33_13_1_2`. This crate infers the
//! container tree from such names, strips the encoding back to the short
//! real names, and attaches every leaf to its nearest enclosing container.
//!
//! The entry point is [`Registry`]; [`decode`] is a shortcut for the common
//! "add everything, then process" case.

pub mod config;
pub mod formatter;
pub mod registry;
pub mod resolver;

mod error;

pub use flatname_core::{element, pattern, payload};

pub use error::FlatnameError;
pub use flatname_core::error::{DecodeError, ErrorCode};
pub use formatter::{NameFormatter, NestedNameFormatter};
pub use registry::Registry;

use log::info;

use config::AppConfig;
use payload::Payload;

/// Build and process a [`Registry`] from `(name, kind, payload)` entries.
///
/// # Errors
///
/// Returns [`FlatnameError::Decode`] if any entry cannot be decoded.
///
/// # Examples
///
/// ```
/// use flatname::{config::AppConfig, decode};
///
/// let entries = [
///     ("content", "block", None),
///     ("content1", "block", None),
///     ("headlinecontent1", "input", None),
/// ];
/// let mut registry = decode(entries, &AppConfig::default()).unwrap();
///
/// let headline = registry.get_element("headlinecontent1").unwrap();
/// assert_eq!(headline.parent().unwrap().encoded_name(), "content1");
/// ```
pub fn decode<I, N, K>(entries: I, config: &AppConfig) -> Result<Registry, FlatnameError>
where
    I: IntoIterator<Item = (N, K, Option<Payload>)>,
    N: Into<String>,
    K: Into<String>,
{
    let mut registry = Registry::new(config.registry().clone());
    for (name, kind, payload) in entries {
        registry.add(name, kind, payload);
    }

    info!(entries = registry.len(); "Decoding entries");
    registry.process()?;

    Ok(registry)
}
