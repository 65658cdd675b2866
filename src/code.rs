//! The prefix-code primitive: one labelled tree over a fixed alphabet.
//!
//! A complete prefix code is stored as its sorted map of leaf index-path to
//! integer label. Because paths are symbol-index sequences, the map order
//! *is* the dictionary order on leaves, and every structural operation is an
//! edit of this map. Labels always form a bijection onto `0..size`.
//!
//! Two refinement granularities exist and both are load-bearing:
//! [`PrefixCode::expand_at`] attaches a caret (the target becomes an
//! internal node with all children present as leaves), which is the
//! construction-surface operation, while [`PrefixCode::refine_to`] grows
//! the tree only until the target is a leaf, which is what composition uses
//! to align two codes on a shared boundary without over-refining.

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use tracing::instrument;

use crate::alphabet::Alphabet;
use crate::dfs;
use crate::errors::{TreePairError, TreePairResult};

/// A complete prefix code with uniquely labelled leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixCode {
    alphabet: Alphabet,
    /// Leaf index-path -> label. Map order is dictionary order on leaves.
    leaves: BTreeMap<Vec<u8>, usize>,
}

impl PrefixCode {
    /// The trivial code: a single root leaf labelled 0.
    pub fn new(alphabet: Alphabet) -> Self {
        let mut leaves = BTreeMap::new();
        leaves.insert(Vec::new(), 0);
        Self { alphabet, leaves }
    }

    /// Decodes a DFS shape string; leaves get natural labels 0,1,2,… in
    /// dictionary order.
    pub fn from_dfs(alphabet: Alphabet, dfs: &str) -> TreePairResult<Self> {
        let paths = dfs::decode_shape(alphabet.arity(), dfs)?;
        let leaves = paths
            .into_iter()
            .enumerate()
            .map(|(label, path)| (path, label))
            .collect();
        Ok(Self { alphabet, leaves })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Leaf count.
    pub fn size(&self) -> usize {
        self.leaves.len()
    }

    /// Leaves with their labels, in dictionary order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], usize)> + '_ {
        self.leaves.iter().map(|(p, &l)| (p.as_slice(), l))
    }

    pub fn label_at_leaf(&self, path: &[u8]) -> Option<usize> {
        self.leaves.get(path).copied()
    }

    pub fn leaf_at_label(&self, label: usize) -> Option<&[u8]> {
        self.leaves
            .iter()
            .find(|(_, &l)| l == label)
            .map(|(p, _)| p.as_slice())
    }

    /// The labels of the leaves in dictionary order: the code's permutation.
    pub fn permutation(&self) -> Vec<usize> {
        self.leaves.values().copied().collect()
    }

    /// The longest leaf that is a (not necessarily proper) prefix of `path`,
    /// or `None` when `path` sits at or above an internal node. Since no
    /// leaf is a prefix of another, the result is unique when it exists.
    pub fn get_prefix_of(&self, path: &[u8]) -> Option<&[u8]> {
        self.leaves
            .keys()
            .find(|leaf| path.starts_with(leaf))
            .map(|leaf| leaf.as_slice())
    }

    /// True when some leaf lies strictly below `path`.
    pub fn is_internal(&self, path: &[u8]) -> bool {
        self.leaves
            .keys()
            .any(|leaf| leaf.len() > path.len() && leaf.starts_with(path))
    }

    /// True when `path` is an internal node all of whose children are leaves.
    pub(crate) fn is_exposed_caret(&self, path: &[u8]) -> bool {
        (0..self.alphabet.arity() as u8).all(|a| {
            let mut child = path.to_vec();
            child.push(a);
            self.leaves.contains_key(&child)
        })
    }

    /// Roots of exposed carets in dictionary order.
    pub fn exposed_carets(&self) -> Vec<Vec<u8>> {
        let mut leaf_children: BTreeMap<Vec<u8>, usize> = BTreeMap::new();
        for leaf in self.leaves.keys() {
            if let Some((_, parent)) = leaf.split_last() {
                *leaf_children.entry(parent.to_vec()).or_default() += 1;
            }
        }
        leaf_children
            .into_iter()
            .filter(|&(_, n)| n == self.alphabet.arity())
            .map(|(path, _)| path)
            .collect()
    }

    /// Minimal refinement making `path` the root of an exposed caret.
    ///
    /// An existing leaf at `path` is split into its children; a `path` at or
    /// above an internal node is left alone.
    #[instrument(level = "trace", skip(self))]
    pub fn expand_at(&mut self, path: &[u8]) {
        if self.is_internal(path) {
            return;
        }
        let Some(prefix) = self.get_prefix_of(path).map(<[u8]>::to_vec) else {
            return;
        };
        self.grow(&prefix, path, true);
    }

    /// Minimal refinement making `path` a leaf; no-op when `path` is
    /// already a node of the tree.
    #[instrument(level = "trace", skip(self))]
    pub fn refine_to(&mut self, path: &[u8]) {
        if self.leaves.contains_key(path) || self.is_internal(path) {
            return;
        }
        let Some(prefix) = self.get_prefix_of(path).map(<[u8]>::to_vec) else {
            return;
        };
        self.grow(&prefix, path, false);
    }

    /// Replaces the leaf at `prefix` by the chain of carets leading to
    /// `target` (plus a final caret at `target` itself when `make_caret`).
    ///
    /// The removed leaf's label ℓ becomes a contiguous run ℓ..ℓ+m over the
    /// m fresh leaves in dictionary order; every label above ℓ shifts up to
    /// keep the labelling a bijection onto 0..size. A naturally labelled
    /// code therefore stays naturally labelled.
    fn grow(&mut self, prefix: &[u8], target: &[u8], make_caret: bool) {
        let arity = self.alphabet.arity() as u8;
        let Some(label) = self.leaves.remove(prefix) else {
            return;
        };

        let mut fresh: Vec<Vec<u8>> = Vec::new();
        let mut node = prefix.to_vec();
        for &step in &target[prefix.len()..] {
            for a in 0..arity {
                if a != step {
                    let mut sibling = node.clone();
                    sibling.push(a);
                    fresh.push(sibling);
                }
            }
            node.push(step);
        }
        if make_caret {
            for a in 0..arity {
                let mut child = node.clone();
                child.push(a);
                fresh.push(child);
            }
        } else {
            fresh.push(node);
        }
        fresh.sort();

        let added = fresh.len() - 1;
        for l in self.leaves.values_mut() {
            if *l > label {
                *l += added;
            }
        }
        for (offset, leaf) in fresh.into_iter().enumerate() {
            self.leaves.insert(leaf, label + offset);
        }
    }

    /// Collapses the exposed caret at `path` back into one leaf, provided
    /// its child labels form a contiguous increasing run in alphabet order.
    /// Returns whether a reduction occurred.
    #[instrument(level = "trace", skip(self))]
    pub fn reduce_at(&mut self, path: &[u8]) -> bool {
        let arity = self.alphabet.arity();

        let mut run = Vec::with_capacity(arity);
        for a in 0..arity as u8 {
            let mut child = path.to_vec();
            child.push(a);
            match self.leaves.get(&child) {
                Some(&label) => run.push(label),
                None => return false,
            }
        }
        let base = run[0];
        if !run.iter().enumerate().all(|(i, &l)| l == base + i) {
            return false;
        }

        for a in 0..arity as u8 {
            let mut child = path.to_vec();
            child.push(a);
            self.leaves.remove(&child);
        }
        let removed = arity - 1;
        for l in self.leaves.values_mut() {
            if *l > base {
                *l -= removed;
            }
        }
        self.leaves.insert(path.to_vec(), base);
        true
    }

    /// Relabels every leaf through a bijection on `0..size`.
    ///
    /// # Errors
    /// `PermutationMismatch` if `perm`'s length disagrees with the leaf
    /// count or `perm` is not a bijection.
    pub fn apply_perm(&mut self, perm: &[usize]) -> TreePairResult<()> {
        if perm.len() != self.size() {
            return Err(TreePairError::PermutationMismatch(format!(
                "permutation has {} entries, code has {} leaves",
                perm.len(),
                self.size()
            )));
        }
        let mut seen = vec![false; perm.len()];
        for &v in perm {
            if v >= perm.len() || seen[v] {
                return Err(TreePairError::PermutationMismatch(format!(
                    "{perm:?} is not a bijection on 0..{}",
                    perm.len()
                )));
            }
            seen[v] = true;
        }
        self.relabel(perm);
        Ok(())
    }

    /// Unchecked relabelling; callers guarantee `perm` is a bijection on
    /// `0..size`.
    pub(crate) fn relabel(&mut self, perm: &[usize]) {
        for l in self.leaves.values_mut() {
            *l = perm[*l];
        }
    }

    /// Coarsest common refinement of two codes over the same alphabet,
    /// naturally labelled.
    ///
    /// # Errors
    /// `JoinFailure` when the alphabets differ.
    #[instrument(level = "debug", skip_all)]
    pub fn join(&self, other: &PrefixCode) -> TreePairResult<PrefixCode> {
        if self.alphabet != other.alphabet {
            return Err(TreePairError::JoinFailure {
                left: self.alphabet.to_string(),
                right: other.alphabet.to_string(),
            });
        }

        // A leaf of either code survives iff it is at least as deep as the
        // covering leaf of the other code; taking equality on one side only
        // keeps shared leaves from appearing twice.
        let mut paths: Vec<Vec<u8>> = Vec::new();
        for a in self.leaves.keys() {
            if other.leaves.keys().any(|b| a.starts_with(b)) {
                paths.push(a.clone());
            }
        }
        for b in other.leaves.keys() {
            if self
                .leaves
                .keys()
                .any(|a| b.len() > a.len() && b.starts_with(a))
            {
                paths.push(b.clone());
            }
        }
        paths.sort();

        let leaves = paths
            .into_iter()
            .enumerate()
            .map(|(label, path)| (path, label))
            .collect();
        Ok(PrefixCode {
            alphabet: self.alphabet.clone(),
            leaves,
        })
    }
}

impl fmt::Display for PrefixCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .leaves
            .iter()
            .map(|(path, label)| format!("[{} {}]", self.alphabet.render_path(path), label))
            .join(", ");
        write!(f, "{rendered}")
    }
}
