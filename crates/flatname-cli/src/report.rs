//! Plain-text report of decoded elements.
//!
//! One tab-separated line per element, in name order:
//!
//! ```text
//! encoded name  kind  real name  index path  parent  nested name
//! ```
//!
//! Missing values (no index path, no parent) are written as `-`.

use flatname::{FlatnameError, NameFormatter, Registry, element::Element};

/// Column header line.
pub const HEADER: &str = "# name\tkind\treal_name\tindex_path\tparent\tnested_name";

/// Render every element of `registry`, processing it first if needed.
///
/// # Errors
///
/// Returns [`FlatnameError::Decode`] if processing or formatting fails.
pub fn render_report(
    registry: &mut Registry,
    formatter: &dyn NameFormatter,
) -> Result<String, FlatnameError> {
    let mut report = String::from(HEADER);
    report.push('\n');

    for element in registry.elements()?.values() {
        report.push_str(&render_line(element, formatter)?);
        report.push('\n');
    }

    Ok(report)
}

fn render_line(element: &Element, formatter: &dyn NameFormatter) -> Result<String, FlatnameError> {
    let index_path = element.index_path()?;
    let index_path = if index_path.is_empty() {
        "-".to_string()
    } else {
        index_path
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".")
    };
    let parent = element.parent().map_or("-", |p| p.encoded_name());

    Ok(format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        element.encoded_name(),
        element.kind(),
        element.real_name()?,
        index_path,
        parent,
        formatter.format(element)?,
    ))
}
