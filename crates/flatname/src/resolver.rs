//! Parent inference among container names.
//!
//! Container entries carry no explicit parent. A child's spelling always
//! ends with its parent's spelling plus an optional index suffix, so every
//! container whose spelling fits that shape is a *candidate* parent. The
//! candidates of a deeply nested container include all of its ancestors;
//! [`HierarchyResolver`] narrows them down to the immediate parent by
//! repeatedly dropping every candidate that is already known to be the
//! parent of another, closer candidate.

use std::collections::BTreeMap;

use log::{debug, trace};

use flatname_core::{
    error::{DecodeError, Result},
    pattern::NamePattern,
};

/// Computes the immediate parent of every container name.
#[derive(Debug, Clone)]
pub struct HierarchyResolver<'a> {
    names: Vec<&'a str>,
}

impl<'a> HierarchyResolver<'a> {
    /// Create a resolver over a set of container names.
    ///
    /// Names are sorted and deduplicated so results and diagnostics do not
    /// depend on input order.
    pub fn new(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names: Vec<&'a str> = names.into_iter().collect();
        names.sort_unstable();
        names.dedup();
        Self { names }
    }

    /// Find, for every container, all containers whose spelling it ends with.
    ///
    /// Containers without any candidate are roots and do not appear in the
    /// returned map.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidPattern`] if a name cannot be embedded
    /// in a pattern.
    pub fn find_parent_candidates(&self) -> Result<BTreeMap<&'a str, Vec<&'a str>>> {
        let mut candidates: BTreeMap<&'a str, Vec<&'a str>> = BTreeMap::new();

        for &parent in &self.names {
            let pattern = NamePattern::new(&[parent])?;

            for &child in &self.names {
                if child != parent && pattern.is_match(child) {
                    trace!(child = child, candidate = parent; "Found parent candidate");
                    candidates.entry(child).or_default().push(parent);
                }
            }
        }

        Ok(candidates)
    }

    /// Resolve the immediate parent of every non-root container.
    ///
    /// Each pass works on a frozen snapshot of the previous pass: a name with
    /// a single candidate is resolved to it, and a name with several
    /// candidates loses every candidate that is the resolved parent of
    /// another of its candidates. Passes repeat until nothing changes.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::NoParentCandidate`] if a candidate list runs empty.
    /// - [`DecodeError::AmbiguousParent`] if several candidates survive.
    ///
    /// # Examples
    ///
    /// ```
    /// use flatname::resolver::HierarchyResolver;
    ///
    /// let resolver = HierarchyResolver::new(["AB", "AB-BAB3", "AB-B-ABAB_AB-BAB33_1"]);
    /// let parents = resolver.resolve().unwrap();
    ///
    /// assert_eq!(parents["AB-BAB3"], "AB");
    /// assert_eq!(parents["AB-B-ABAB_AB-BAB33_1"], "AB-BAB3");
    /// assert!(!parents.contains_key("AB"));
    /// ```
    pub fn resolve(&self) -> Result<BTreeMap<String, String>> {
        let mut candidates = self.find_parent_candidates()?;
        let mut parents: BTreeMap<&'a str, &'a str> = BTreeMap::new();
        let mut passes = 0usize;

        loop {
            passes += 1;
            let (next_candidates, next_parents, changed) = Self::pass(&candidates, &parents)?;
            candidates = next_candidates;
            parents = next_parents;

            if !changed {
                break;
            }
        }

        debug!(passes = passes, resolved = parents.len(); "Parent resolution converged");

        if let Some((name, remaining)) = candidates.iter().find(|(_, list)| list.len() > 1) {
            return Err(DecodeError::AmbiguousParent {
                name: name.to_string(),
                candidates: remaining.iter().map(|c| c.to_string()).collect(),
            });
        }

        Ok(parents
            .into_iter()
            .map(|(name, parent)| (name.to_string(), parent.to_string()))
            .collect())
    }

    /// Run one disambiguation pass over the given snapshot.
    #[allow(clippy::type_complexity)]
    fn pass(
        candidates: &BTreeMap<&'a str, Vec<&'a str>>,
        parents: &BTreeMap<&'a str, &'a str>,
    ) -> Result<(BTreeMap<&'a str, Vec<&'a str>>, BTreeMap<&'a str, &'a str>, bool)> {
        let mut next_candidates = BTreeMap::new();
        let mut next_parents = parents.clone();
        let mut changed = false;

        for (&name, list) in candidates {
            match list.as_slice() {
                [] => {
                    return Err(DecodeError::NoParentCandidate {
                        name: name.to_string(),
                    });
                }
                [single] => {
                    if !parents.contains_key(name) {
                        debug!(name = name, parent = *single; "Resolved parent");
                        next_parents.insert(name, *single);
                        changed = true;
                    }
                    next_candidates.insert(name, list.clone());
                }
                _ => {
                    // A candidate's own parent is further away than the candidate.
                    let redundant: Vec<&'a str> = list
                        .iter()
                        .filter_map(|candidate| parents.get(candidate).copied())
                        .filter(|parent| list.contains(parent))
                        .collect();

                    let kept: Vec<&'a str> = list
                        .iter()
                        .copied()
                        .filter(|candidate| !redundant.contains(candidate))
                        .collect();

                    if kept.len() != list.len() {
                        trace!(name = name, dropped:? = redundant; "Dropped redundant candidates");
                        changed = true;
                    }
                    next_candidates.insert(name, kept);
                }
            }
        }

        Ok((next_candidates, next_parents, changed))
    }
}
