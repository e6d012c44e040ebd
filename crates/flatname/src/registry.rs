//! The element registry.
//!
//! A [`Registry`] collects raw `(name, kind, payload)` entries and, on the
//! first query, decodes them:
//!
//! 1. **Resolve** - infer the parent of every container name
//! 2. **Build containers** - shallowest first, so parents exist before children
//! 3. **Attach leaves** - each leaf goes to its most specific enclosing container
//! 4. **Decode** - every element is decoded so errors surface immediately
//!
//! Adding an entry afterwards discards all derived state; the next query
//! rebuilds everything from scratch.

use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use indexmap::IndexMap;
use log::{debug, info};

use flatname_core::{
    element::{Container, Element, Leaf, is_container_kind},
    error::{DecodeError, Result},
    pattern::NamePattern,
    payload::Payload,
};

use crate::{
    config::{AttachPolicy, RegistryConfig},
    formatter::{NameFormatter, NestedNameFormatter},
    resolver::HierarchyResolver,
};

/// A raw entry as it was added.
#[derive(Debug, Clone)]
struct Entry {
    kind: String,
    payload: Option<Payload>,
}

/// Collects flattened element names and decodes their hierarchy.
///
/// The registry is not internally synchronized; use one registry per
/// document.
///
/// # Examples
///
/// ```
/// use flatname::Registry;
///
/// let mut registry = Registry::default();
/// registry.add("AB", "areablock", None);
/// registry.add("AB-BAB3", "block", None);
/// registry.add("headlineAB_AB-BAB33_1", "input", None);
///
/// let headline = registry.get_element("headlineAB_AB-BAB33_1").unwrap();
/// assert_eq!(headline.real_name().unwrap(), "headline");
/// assert_eq!(headline.index_path().unwrap(), &[3, 1]);
/// assert_eq!(headline.level(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    config: RegistryConfig,
    entries: BTreeMap<String, Entry>,
    elements: Option<IndexMap<String, Element>>,
}

impl Registry {
    /// Create an empty registry with the given configuration.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            entries: BTreeMap::new(),
            elements: None,
        }
    }

    /// Returns the registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Record an entry, replacing any earlier entry with the same name.
    ///
    /// All derived state is discarded.
    pub fn add(&mut self, name: impl Into<String>, kind: impl Into<String>, payload: Option<Payload>) {
        let name = name.into();
        let kind = kind.into();
        debug!(name = name.as_str(), kind = kind.as_str(); "Adding entry");

        self.entries.insert(name, Entry { kind, payload });
        self.elements = None;
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if an entry with this name was added.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns `true` if the derived elements are up to date.
    pub fn is_processed(&self) -> bool {
        self.elements.is_some()
    }

    /// Decode all entries if they changed since the last run.
    ///
    /// Ambiguity diagnostics are rendered with [`NestedNameFormatter`].
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] encountered; no partial results are
    /// kept.
    pub fn process(&mut self) -> Result<()> {
        self.process_with(&NestedNameFormatter)
    }

    /// Decode all entries, rendering ambiguity diagnostics with `formatter`.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] encountered; no partial results are
    /// kept.
    pub fn process_with(&mut self, formatter: &dyn NameFormatter) -> Result<()> {
        if self.elements.is_some() {
            return Ok(());
        }

        let elements = self.build(formatter)?;
        self.elements = Some(elements);
        Ok(())
    }

    /// Returns the decoded element named `name`, processing first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotFound`] for names that were never added, or
    /// any error raised while processing.
    pub fn get_element(&mut self, name: &str) -> Result<&Element> {
        self.elements()?
            .get(name)
            .ok_or_else(|| DecodeError::NotFound {
                name: name.to_string(),
            })
    }

    /// Returns all decoded elements in name order, processing first if needed.
    ///
    /// # Errors
    ///
    /// Returns any error raised while processing.
    pub fn elements(&mut self) -> Result<&IndexMap<String, Element>> {
        self.process()?;
        Ok(self.elements.get_or_insert_with(IndexMap::new))
    }

    /// Returns the elements directly inside the container `name`, in name order.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotFound`] for names that were never added, or
    /// any error raised while processing.
    pub fn children(&mut self, name: &str) -> Result<Vec<&Element>> {
        let elements = self.elements()?;
        if !elements.contains_key(name) {
            return Err(DecodeError::NotFound {
                name: name.to_string(),
            });
        }

        Ok(elements
            .values()
            .filter(|element| element.parent().map(|p| p.encoded_name()) == Some(name))
            .collect())
    }

    fn build(&self, formatter: &dyn NameFormatter) -> Result<IndexMap<String, Element>> {
        let container_names: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, entry)| is_container_kind(&entry.kind))
            .map(|(name, _)| name.as_str())
            .collect();

        info!(
            entries = self.entries.len(),
            containers = container_names.len();
            "Processing registry"
        );

        let parents = HierarchyResolver::new(container_names.iter().copied()).resolve()?;
        let containers = self.build_containers(&container_names, &parents)?;
        let leaves = self.attach_leaves(&containers, formatter)?;

        let elements = assemble_elements(self.entries.keys(), containers, leaves)?;

        info!(elements = elements.len(); "Registry processed");
        Ok(elements)
    }

    /// Build containers in ascending depth so each parent exists before its children.
    fn build_containers(
        &self,
        names: &[&str],
        parents: &BTreeMap<String, String>,
    ) -> Result<HashMap<String, Rc<Container>>> {
        let mut ordered: Vec<(&str, usize)> = names
            .iter()
            .map(|&name| (name, chain_length(name, parents)))
            .collect();
        // Stable: names at the same depth keep their sorted order.
        ordered.sort_by_key(|&(_, depth)| depth);

        let mut built: HashMap<String, Rc<Container>> = HashMap::with_capacity(names.len());
        for (name, depth) in ordered {
            let parent = match parents.get(name) {
                Some(parent_name) => Some(built.get(parent_name).cloned().ok_or_else(|| {
                    DecodeError::ParentNotFound {
                        name: name.to_string(),
                        parent: parent_name.clone(),
                    }
                })?),
                None => None,
            };

            let entry = &self.entries[name];
            let container = Rc::new(Container::new(
                name,
                entry.kind.as_str(),
                parent,
                entry.payload.clone(),
            ));
            container.decode()?;

            debug!(
                name = name,
                depth = depth,
                real_name = container.real_name()?;
                "Built container"
            );
            built.insert(name.to_string(), container);
        }

        Ok(built)
    }

    /// Attach every leaf to its most specific enclosing container.
    fn attach_leaves(
        &self,
        containers: &HashMap<String, Rc<Container>>,
        formatter: &dyn NameFormatter,
    ) -> Result<HashMap<String, Rc<Leaf>>> {
        let mut ranked = containers
            .values()
            .map(RankedContainer::new)
            .collect::<Result<Vec<_>>>()?;
        ranked.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let mut leaves = HashMap::new();
        for (name, entry) in &self.entries {
            if is_container_kind(&entry.kind) {
                continue;
            }

            let parent = self.find_container(name, &ranked, formatter)?;
            let leaf = Rc::new(Leaf::new(name.as_str(), entry.kind.as_str(), parent));
            leaf.decode()?;

            debug!(
                name = name.as_str(),
                container:? = leaf.parent().map(|p| p.encoded_name()),
                real_name = leaf.real_name()?;
                "Attached leaf"
            );
            leaves.insert(name.clone(), leaf);
        }

        Ok(leaves)
    }

    /// Find the enclosing container of the leaf `name` among `ranked` containers.
    fn find_container(
        &self,
        name: &str,
        ranked: &[RankedContainer],
        formatter: &dyn NameFormatter,
    ) -> Result<Option<Rc<Container>>> {
        let mut matches = ranked.iter().filter(|candidate| candidate.pattern.is_match(name));

        let Some(first) = matches.next() else {
            return Ok(None);
        };

        if self.config.attach_policy() == AttachPolicy::Strict {
            let tied: Vec<&RankedContainer> = matches
                .take_while(|other| other.specificity() == first.specificity())
                .collect();

            if !tied.is_empty() {
                let candidates = std::iter::once(first)
                    .chain(tied)
                    .map(|candidate| formatter.format(&Element::from(candidate.container.clone())))
                    .collect::<Result<Vec<_>>>()?;

                return Err(DecodeError::AmbiguousBuild {
                    name: name.to_string(),
                    candidates,
                });
            }
        }

        Ok(Some(first.container.clone()))
    }
}

/// Collect the built elements in the order of `names`.
///
/// Every name must have been built as either a container or a leaf.
fn assemble_elements<'a>(
    names: impl IntoIterator<Item = &'a String>,
    mut containers: HashMap<String, Rc<Container>>,
    mut leaves: HashMap<String, Rc<Leaf>>,
) -> Result<IndexMap<String, Element>> {
    let names = names.into_iter();
    let mut elements = IndexMap::with_capacity(names.size_hint().0);

    for name in names {
        let element = match containers.remove(name) {
            Some(container) => Element::Container(container),
            None => leaves
                .remove(name)
                .map(Element::Leaf)
                .ok_or_else(|| DecodeError::ElementNotBuilt { name: name.clone() })?,
        };
        elements.insert(name.clone(), element);
    }

    Ok(elements)
}

/// Number of ancestors of `name` according to the parent map.
///
/// A parent's spelling is always strictly shorter than its child's, so the
/// parent map is acyclic.
fn chain_length(name: &str, parents: &BTreeMap<String, String>) -> usize {
    let mut length = 0;
    let mut current = name;
    while let Some(parent) = parents.get(current) {
        length += 1;
        current = parent.as_str();
    }
    length
}

/// Length of the run of ASCII digits at the end of `name`.
fn trailing_digits(name: &str) -> usize {
    name.bytes().rev().take_while(u8::is_ascii_digit).count()
}

/// A container with its precompiled containment pattern and ranking data.
struct RankedContainer {
    container: Rc<Container>,
    pattern: NamePattern,
    level: usize,
    trailing_digits: usize,
}

impl RankedContainer {
    fn new(container: &Rc<Container>) -> Result<Self> {
        Ok(Self {
            pattern: container.pattern()?,
            level: container.level(),
            trailing_digits: trailing_digits(container.match_string()),
            container: container.clone(),
        })
    }

    /// Deeper first, then longer trailing digit run first.
    fn specificity(&self) -> (Reverse<usize>, Reverse<usize>) {
        (Reverse(self.level), Reverse(self.trailing_digits))
    }

    /// Specificity, then longer spelling first, then name.
    fn sort_key(&self) -> ((Reverse<usize>, Reverse<usize>), Reverse<usize>, &str) {
        let name = self.container.encoded_name();
        (self.specificity(), Reverse(name.len()), name)
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use flatname_core::pattern::flatten_name;

    use super::*;

    /// A generated container. Each child spec is repeated as sibling loop
    /// instances that share the spec and differ only by loop index.
    #[derive(Debug, Clone)]
    struct NodeSpec {
        real_name: String,
        /// Leaf real names, and whether a leaf of a root container is indexed.
        leaves: Vec<(String, bool)>,
        children: Vec<(NodeSpec, usize)>,
    }

    /// A generated document: root containers plus leaves outside any container.
    #[derive(Debug, Clone)]
    struct Tree {
        roots: Vec<NodeSpec>,
        leaves: Vec<String>,
    }

    /// What decoding must recover for one encoded name.
    #[derive(Debug, Clone, PartialEq)]
    struct Expected {
        parent: Option<String>,
        real_name: String,
        index_path: Vec<u32>,
        container: bool,
    }

    impl NodeSpec {
        /// Encode this container below `ancestors` and recurse into its
        /// leaves and children.
        fn flatten_into(
            &self,
            ancestors: &[String],
            index_path: &[u32],
            out: &mut BTreeMap<String, Expected>,
        ) {
            let name = flatten_name(&self.real_name, ancestors, index_path);
            out.insert(
                name.clone(),
                Expected {
                    parent: ancestors.last().cloned(),
                    real_name: self.real_name.clone(),
                    index_path: index_path.to_vec(),
                    container: true,
                },
            );

            let mut lineage = ancestors.to_vec();
            lineage.push(name.clone());

            for (position, (leaf, indexed)) in self.leaves.iter().enumerate() {
                let mut leaf_path = index_path.to_vec();
                // Leaves of looped containers always carry their own index.
                if *indexed || !ancestors.is_empty() {
                    leaf_path.push(position as u32 + 1);
                }
                out.insert(
                    flatten_name(leaf, &lineage, &leaf_path),
                    Expected {
                        parent: Some(name.clone()),
                        real_name: leaf.clone(),
                        index_path: leaf_path,
                        container: false,
                    },
                );
            }

            let instances = self
                .children
                .iter()
                .flat_map(|(child, copies)| std::iter::repeat_n(child, *copies));
            for (position, child) in instances.enumerate() {
                let mut child_path = index_path.to_vec();
                child_path.push(position as u32 + 1);
                child.flatten_into(&lineage, &child_path, out);
            }
        }
    }

    impl Tree {
        /// Every encoded name with what decoding must recover for it.
        fn flatten(&self) -> BTreeMap<String, Expected> {
            let mut expected = BTreeMap::new();
            for root in &self.roots {
                root.flatten_into(&[], &[], &mut expected);
            }
            for leaf in &self.leaves {
                expected.insert(
                    leaf.clone(),
                    Expected {
                        parent: None,
                        real_name: leaf.clone(),
                        index_path: Vec::new(),
                        container: false,
                    },
                );
            }
            expected
        }
    }

    // ===================
    // Strategies
    // ===================

    // Container names carry exactly one capital so a spelling cannot be
    // rebuilt from two others. Loop indexes stay below 10, since `1` and
    // `11` would make sibling spellings overlap.
    fn node_strategy(depth: u32) -> BoxedStrategy<NodeSpec> {
        let leaves = prop::collection::vec(("[a-z]{2,6}", any::<bool>()), 0..3);
        if depth == 0 {
            return ("[A-Z][a-z]{1,4}", leaves)
                .prop_map(|(real_name, leaves)| NodeSpec {
                    real_name,
                    leaves,
                    children: Vec::new(),
                })
                .boxed();
        }

        (
            "[A-Z][a-z]{1,4}",
            leaves,
            prop::collection::vec((node_strategy(depth - 1), 1usize..=2), 0..3),
        )
            .prop_map(|(real_name, leaves, children)| NodeSpec {
                real_name,
                leaves,
                children,
            })
            .boxed()
    }

    fn tree_strategy() -> impl Strategy<Value = Tree> {
        (
            prop::collection::vec(node_strategy(2), 1..3).prop_filter(
                "root names must be distinct",
                |roots| {
                    let names: std::collections::BTreeSet<&str> =
                        roots.iter().map(|root| root.real_name.as_str()).collect();
                    names.len() == roots.len()
                },
            ),
            prop::collection::vec("[a-z]{2,6}", 0..2),
        )
            .prop_map(|(roots, leaves)| Tree { roots, leaves })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Decoding a flattened tree recovers the parent, real name and index
    /// path of every element.
    fn check_tree_round_trip(tree: &Tree) -> std::result::Result<(), TestCaseError> {
        let expected = tree.flatten();

        let mut registry = Registry::default();
        for (name, element) in &expected {
            let kind = if element.container { "block" } else { "input" };
            registry.add(name.as_str(), kind, None);
        }

        let decoded = registry
            .elements()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(decoded.len(), expected.len());

        for (name, want) in &expected {
            let element = &decoded[name.as_str()];

            prop_assert_eq!(element.is_container(), want.container, "{}", name);
            prop_assert_eq!(element.real_name().unwrap(), want.real_name.as_str(), "{}", name);
            prop_assert_eq!(element.index_path().unwrap(), want.index_path.as_slice(), "{}", name);
            prop_assert_eq!(
                element.parent().map(|p| p.encoded_name()),
                want.parent.as_deref(),
                "{}",
                name
            );
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn tree_round_trip(tree in tree_strategy()) {
            check_tree_round_trip(&tree)?;
        }
    }
}
