//! Decoded elements: containers and leaves.
//!
//! Every element keeps the encoded name it was registered with and a
//! reference to its parent container. The real name and index path are
//! derived from the encoded name and the ancestors' spellings on first
//! access and memoised afterwards, so decoding an element twice is free
//! and always yields the same result.
//!
//! Elements are reference counted ([`Rc`]) and use interior memoisation
//! ([`OnceCell`]); they are meant to be owned by a single registry on a
//! single thread.

use std::{cell::OnceCell, fmt, rc::Rc};

use crate::{
    error::{DecodeError, Result},
    pattern::{NamePattern, flatten_name},
    payload::Payload,
};

/// Kinds that open a repeatable region holding nested elements.
pub const CONTAINER_KINDS: [&str; 2] = ["block", "areablock"];

/// Returns `true` if `kind` is one of the [`CONTAINER_KINDS`].
pub fn is_container_kind(kind: &str) -> bool {
    CONTAINER_KINDS.contains(&kind)
}

/// Facts derived from an encoded name.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Decoded {
    real_name: String,
    index_path: Vec<u32>,
}

/// State shared by containers and leaves.
struct Node {
    encoded_name: String,
    kind: String,
    parent: Option<Rc<Container>>,
    ancestors: OnceCell<Vec<Rc<Container>>>,
    decoded: OnceCell<Decoded>,
}

impl Node {
    fn new(encoded_name: String, kind: String, parent: Option<Rc<Container>>) -> Self {
        Self {
            encoded_name,
            kind,
            parent,
            ancestors: OnceCell::new(),
            decoded: OnceCell::new(),
        }
    }

    fn ancestors(&self) -> &[Rc<Container>] {
        self.ancestors.get_or_init(|| {
            let mut ancestors = Vec::new();
            let mut current = self.parent.clone();
            while let Some(container) = current {
                current = container.parent().cloned();
                ancestors.push(container);
            }
            ancestors.reverse();
            ancestors
        })
    }

    fn decoded(&self) -> Result<&Decoded> {
        if let Some(decoded) = self.decoded.get() {
            return Ok(decoded);
        }

        let decoded = self.decode()?;
        Ok(self.decoded.get_or_init(|| decoded))
    }

    fn decode(&self) -> Result<Decoded> {
        // Root level: no index, the real name is the encoded name.
        if self.parent.is_none() {
            return Ok(Decoded {
                real_name: self.encoded_name.clone(),
                index_path: Vec::new(),
            });
        }

        let ancestors = self.ancestors();
        let mut spellings = Vec::with_capacity(ancestors.len());
        let mut parent_indexes = Vec::new();
        for ancestor in ancestors {
            spellings.push(ancestor.encoded_name());
            if let Some(index) = ancestor.index()? {
                parent_indexes.push(index);
            }
        }

        let pattern = NamePattern::new(&spellings)?;
        let matched =
            pattern
                .captures(&self.encoded_name)
                .ok_or_else(|| DecodeError::PatternMismatch {
                    name: self.encoded_name.clone(),
                    pattern: pattern.as_str().to_string(),
                })?;

        Ok(Decoded {
            real_name: matched.real_name().to_string(),
            index_path: matched.checked_index_path(&parent_indexes)?,
        })
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("encoded_name", &self.encoded_name)
            .field("kind", &self.kind)
            .field("parent", &self.parent.as_ref().map(|p| p.encoded_name()))
            .field("decoded", &self.decoded.get())
            .finish()
    }
}

macro_rules! node_accessors {
    () => {
        /// The raw, flattened name this element was registered with.
        pub fn encoded_name(&self) -> &str {
            &self.node().encoded_name
        }

        /// The kind tag this element was registered with.
        pub fn kind(&self) -> &str {
            &self.node().kind
        }

        /// The enclosing container, or `None` at root level.
        pub fn parent(&self) -> Option<&Rc<Container>> {
            self.node().parent.as_ref()
        }

        /// All enclosing containers, root first.
        pub fn ancestors(&self) -> &[Rc<Container>] {
            self.node().ancestors()
        }

        /// Nesting depth (number of ancestors).
        pub fn level(&self) -> usize {
            self.ancestors().len()
        }

        /// The name with ancestry and index suffix stripped.
        ///
        /// # Errors
        ///
        /// Returns a [`DecodeError`] if the encoded name does not fit its
        /// ancestor chain.
        pub fn real_name(&self) -> Result<&str> {
            Ok(&self.node().decoded()?.real_name)
        }

        /// Loop positions per nesting level, ending with the own index.
        ///
        /// # Errors
        ///
        /// Returns a [`DecodeError`] if the encoded name does not fit its
        /// ancestor chain.
        pub fn index_path(&self) -> Result<&[u32]> {
            Ok(&self.node().decoded()?.index_path)
        }

        /// This element's own loop index, if it has one.
        ///
        /// # Errors
        ///
        /// Returns a [`DecodeError`] if the encoded name does not fit its
        /// ancestor chain.
        pub fn index(&self) -> Result<Option<u32>> {
            Ok(self.index_path()?.last().copied())
        }

        /// Decode now instead of on first access.
        pub fn decode(&self) -> Result<()> {
            self.node().decoded().map(|_| ())
        }
    };
}

/// An element that may repeat and hold nested elements.
#[derive(Debug)]
pub struct Container {
    node: Node,
    payload: Option<Payload>,
}

impl Container {
    /// Create a container below `parent` (or at root level).
    pub fn new(
        encoded_name: impl Into<String>,
        kind: impl Into<String>,
        parent: Option<Rc<Container>>,
        payload: Option<Payload>,
    ) -> Self {
        Self {
            node: Node::new(encoded_name.into(), kind.into(), parent),
            payload,
        }
    }

    fn node(&self) -> &Node {
        &self.node
    }

    node_accessors!();

    /// The string other elements are tested against for containment.
    pub fn match_string(&self) -> &str {
        self.encoded_name()
    }

    /// The pattern matching names that end with this container's spelling.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidPattern`] if the spelling cannot be
    /// embedded in a pattern.
    pub fn pattern(&self) -> Result<NamePattern> {
        NamePattern::new(&[self.match_string()])
    }

    /// The opaque payload attached at registration.
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Spell the encoded name of a new element `real_name` placed directly
    /// inside this container, with its own loop `index` if it has one.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if this container or one of its ancestors
    /// does not decode.
    pub fn nested_name(&self, real_name: &str, index: Option<u32>) -> Result<String> {
        let mut spellings = Vec::with_capacity(self.level() + 1);
        let mut index_path = Vec::new();
        for container in self.ancestors().iter().map(Rc::as_ref).chain([self]) {
            spellings.push(container.encoded_name());
            if let Some(own) = container.index()? {
                index_path.push(own);
            }
        }
        index_path.extend(index);

        Ok(flatten_name(real_name, &spellings, &index_path))
    }
}

/// A non-repeating element inside (at most) one container.
#[derive(Debug)]
pub struct Leaf {
    node: Node,
}

impl Leaf {
    /// Create a leaf attached to `container` (or at root level).
    pub fn new(
        encoded_name: impl Into<String>,
        kind: impl Into<String>,
        container: Option<Rc<Container>>,
    ) -> Self {
        Self {
            node: Node::new(encoded_name.into(), kind.into(), container),
        }
    }

    fn node(&self) -> &Node {
        &self.node
    }

    node_accessors!();
}

/// A decoded element of either variant.
#[derive(Debug, Clone)]
pub enum Element {
    Container(Rc<Container>),
    Leaf(Rc<Leaf>),
}

impl Element {
    fn node(&self) -> &Node {
        match self {
            Element::Container(container) => &container.node,
            Element::Leaf(leaf) => &leaf.node,
        }
    }

    node_accessors!();

    pub fn is_container(&self) -> bool {
        matches!(self, Element::Container(_))
    }

    /// Borrow the container if this element is one.
    pub fn as_container(&self) -> Option<&Rc<Container>> {
        match self {
            Element::Container(container) => Some(container),
            Element::Leaf(_) => None,
        }
    }

    /// Borrow the leaf if this element is one.
    pub fn as_leaf(&self) -> Option<&Rc<Leaf>> {
        match self {
            Element::Leaf(leaf) => Some(leaf),
            Element::Container(_) => None,
        }
    }
}

impl From<Rc<Container>> for Element {
    fn from(container: Rc<Container>) -> Self {
        Element::Container(container)
    }
}

impl From<Rc<Leaf>> for Element {
    fn from(leaf: Rc<Leaf>) -> Self {
        Element::Leaf(leaf)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encoded_name())
    }
}
