//! Re-synthesis of non-flattened names from decoded elements.
//!
//! A [`NameFormatter`] turns the decoded facts of an element (its real name,
//! its ancestors' real names and its index path) back into a readable
//! identifier. Formatters are passed explicitly wherever a rendered name is
//! needed, including the diagnostics of ambiguous leaf attachment.

use flatname_core::{element::Element, error::Result};

/// Renders an element's identifier from its decoded facts.
pub trait NameFormatter {
    /// Render the identifier of `element`.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the element or one of its ancestors cannot
    /// be decoded.
    fn format(&self, element: &Element) -> Result<String>;
}

/// Formats names as `parent:index.child`, e.g. `AB:3.AB-B:1.accordion`.
///
/// Indexes are paired with ancestors from the innermost level outwards, so
/// ancestors without a loop position are rendered without an index.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedNameFormatter;

impl NameFormatter for NestedNameFormatter {
    fn format(&self, element: &Element) -> Result<String> {
        let ancestors = element.ancestors();
        let index_path = element.index_path()?;
        let offset = ancestors.len().saturating_sub(index_path.len());

        let mut parts = Vec::with_capacity(ancestors.len() + 1);
        for (level, ancestor) in ancestors.iter().enumerate() {
            let real_name = ancestor.real_name()?;
            let index = level
                .checked_sub(offset)
                .and_then(|position| index_path.get(position));
            parts.push(match index {
                Some(index) => format!("{real_name}:{index}"),
                None => real_name.to_string(),
            });
        }
        parts.push(element.real_name()?.to_string());

        Ok(parts.join("."))
    }
}
