//! Ancestor-aware name patterns.
//!
//! A flattened name is spelled as `<real name><ancestor spellings><indexes>`,
//! where the ancestor spellings are the encoded names of all enclosing
//! containers joined with `_` (root first), and the indexes are digit runs
//! joined with `_`. For example:
//!
//! ```text
//! input:      accordionAB_AB-BAB3_AB-B-ABAB_AB-BAB33_13_1_2
//! ancestors:  AB, AB-BAB3, AB-B-ABAB_AB-BAB33_1
//! real name:  accordion
//! indexes:    3_1_2
//! ```
//!
//! [`NamePattern`] builds the anchored matcher for one ancestor list and
//! splits a candidate name into its real name and index suffix.

use log::trace;
use regex::Regex;

use crate::error::{DecodeError, Result};

/// Separator placed between ancestor spellings and between index segments.
pub const SEPARATOR: char = '_';

/// Escapes the characters of a literal ancestor spelling that are
/// meaningful to the matcher (`.` and `-`). Everything else is kept as is.
///
/// # Examples
///
/// ```
/// use flatname_core::pattern::escape_literal;
///
/// assert_eq!(escape_literal("AB-B.x"), r"AB\-B\.x");
/// ```
pub fn escape_literal(literal: &str) -> String {
    literal.replace('.', r"\.").replace('-', r"\-")
}

/// Spell a flattened name from its parts; the inverse of decoding.
///
/// `ancestors` are the encoded spellings of the enclosing containers, root
/// first, and `index_path` holds the loop positions down to the element's
/// own index. Consumers that add elements to a decoded document use this
/// to produce names the decoder reads back; [`Container::nested_name`]
/// fills in the parts from a decoded container.
///
/// [`Container::nested_name`]: crate::element::Container::nested_name
///
/// # Examples
///
/// ```
/// use flatname_core::pattern::flatten_name;
///
/// let name = flatten_name("accordion", &["AB", "AB-BAB3", "AB-B-ABAB_AB-BAB33_1"], &[3, 1, 2]);
/// assert_eq!(name, "accordionAB_AB-BAB3_AB-B-ABAB_AB-BAB33_13_1_2");
/// ```
pub fn flatten_name<S: AsRef<str>>(real_name: &str, ancestors: &[S], index_path: &[u32]) -> String {
    let separator = SEPARATOR.to_string();
    let ancestors = ancestors
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&separator);
    let indexes = index_path
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(&separator);

    format!("{real_name}{ancestors}{indexes}")
}

/// Anchored pattern matching `<anything><ancestor literal><digits and underscores>`.
#[derive(Debug, Clone)]
pub struct NamePattern {
    regex: Regex,
}

impl NamePattern {
    /// Build a pattern from literal ancestor spellings in root-to-parent order.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidPattern`] when an unescaped character in
    /// one of the spellings makes the pattern invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use flatname_core::pattern::NamePattern;
    ///
    /// let pattern = NamePattern::new(&["AB"]).unwrap();
    /// let matched = pattern.captures("AB-BAB3").unwrap();
    ///
    /// assert_eq!(matched.real_name(), "AB-B");
    /// assert_eq!(matched.indexes(), "3");
    /// ```
    pub fn new<S: AsRef<str>>(ancestors: &[S]) -> Result<Self> {
        let literal = ancestors
            .iter()
            .map(|ancestor| escape_literal(ancestor.as_ref()))
            .collect::<Vec<_>>()
            .join(&SEPARATOR.to_string());
        let pattern = format!("^(?P<real_name>.+){literal}(?P<indexes>[0-9_]*)$");

        trace!(pattern = pattern.as_str(); "Compiling name pattern");

        let regex = Regex::new(&pattern)
            .map_err(|source| DecodeError::InvalidPattern { pattern, source })?;

        Ok(Self { regex })
    }

    /// Returns the textual form of the pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns `true` if the whole `candidate` matches.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// Split `candidate` into real name and index suffix, or `None` on no match.
    pub fn captures<'h>(&self, candidate: &'h str) -> Option<NameMatch<'h>> {
        let captures = self.regex.captures(candidate)?;
        let real_name = captures.name("real_name")?.as_str();
        let indexes = captures.name("indexes").map_or("", |m| m.as_str());

        Some(NameMatch {
            name: candidate,
            real_name,
            indexes,
        })
    }
}

/// The decomposition of a name matched by a [`NamePattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameMatch<'h> {
    name: &'h str,
    real_name: &'h str,
    indexes: &'h str,
}

impl<'h> NameMatch<'h> {
    /// The full name that was matched.
    pub fn name(&self) -> &'h str {
        self.name
    }

    /// The captured real name.
    pub fn real_name(&self) -> &'h str {
        self.real_name
    }

    /// The raw index suffix, possibly empty.
    pub fn indexes(&self) -> &'h str {
        self.indexes
    }

    /// Parse the index suffix into its segments.
    ///
    /// An empty suffix yields an empty path.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidIndex`] if a segment is not a
    /// non-negative integer (this includes empty segments such as in `1__2`).
    pub fn index_path(&self) -> Result<Vec<u32>> {
        if self.indexes.is_empty() {
            return Ok(Vec::new());
        }

        self.indexes
            .split(SEPARATOR)
            .map(|segment| {
                segment
                    .parse::<u32>()
                    .map_err(|_| DecodeError::InvalidIndex {
                        name: self.name.to_string(),
                        segment: segment.to_string(),
                    })
            })
            .collect()
    }

    /// Parse the index suffix and verify it against the ancestors' own indexes.
    ///
    /// The last segment is the element's own index; the segments before it
    /// must equal `parent_indexes` in order.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidIndex`] for unparsable segments and
    /// [`DecodeError::IndexMismatch`] when the prefix disagrees.
    pub fn checked_index_path(&self, parent_indexes: &[u32]) -> Result<Vec<u32>> {
        let index_path = self.index_path()?;

        if let Some((_, prefix)) = index_path.split_last() {
            if prefix != parent_indexes {
                return Err(DecodeError::IndexMismatch {
                    name: self.name.to_string(),
                    indexes: prefix.to_vec(),
                    parent_indexes: parent_indexes.to_vec(),
                });
            }
        }

        Ok(index_path)
    }
}
