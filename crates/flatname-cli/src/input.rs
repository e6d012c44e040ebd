//! Element list input files.
//!
//! An input file lists a document's elements as TOML tables:
//!
//! ```toml
//! [[element]]
//! name = "AB"
//! kind = "areablock"
//! payload = '[{"key":"1","hidden":false}]'
//!
//! [[element]]
//! name = "headlineAB"
//! kind = "input"
//! ```

use log::debug;
use serde::Deserialize;

use flatname::{FlatnameError, payload::Payload};

#[derive(Debug, Deserialize)]
struct InputFile {
    #[serde(default, rename = "element")]
    elements: Vec<InputElement>,
}

/// One `[[element]]` table.
#[derive(Debug, Deserialize)]
pub struct InputElement {
    name: String,
    kind: String,
    payload: Option<String>,
}

impl InputElement {
    pub fn into_entry(self) -> (String, String, Option<Payload>) {
        (self.name, self.kind, self.payload.map(Payload::from))
    }
}

/// Parse an element list.
///
/// # Errors
///
/// Returns [`FlatnameError::Input`] pointing at the offending TOML.
pub fn parse_input(source: &str) -> Result<Vec<InputElement>, FlatnameError> {
    let file: InputFile = toml::from_str(source)
        .map_err(|err| FlatnameError::new_input_error(err.message(), source, err.span()))?;

    debug!(elements = file.elements.len(); "Input parsed");
    Ok(file.elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_elements() {
        let source = r#"
            [[element]]
            name = "AB"
            kind = "areablock"
            payload = "[1]"

            [[element]]
            name = "headlineAB"
            kind = "input"
        "#;

        let entries: Vec<_> = parse_input(source)
            .unwrap()
            .into_iter()
            .map(InputElement::into_entry)
            .collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "AB");
        assert_eq!(entries[0].2.as_ref().map(|p| p.as_bytes()), Some(&b"[1]"[..]));
        assert_eq!(entries[1].1, "input");
        assert!(entries[1].2.is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_input("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_kind() {
        let source = "[[element]]\nname = \"AB\"\n";

        let err = parse_input(source).unwrap_err();
        assert!(matches!(
            err,
            FlatnameError::Input { ref message, .. } if message.contains("kind")
        ));
    }
}
