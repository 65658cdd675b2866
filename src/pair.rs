//! Tree pairs: one group element of Thompson's F, T, or V.
//!
//! A pair couples a domain and a range prefix code of equal leaf count over
//! one alphabet. The leaf labelled ℓ in the domain maps to the leaf
//! labelled ℓ in the range; every operation here drives the two codes in
//! lock-step so that correspondence survives all structural mutation.
//!
//! Range-side operations are implemented by duality: swap the codes, run
//! the domain-side algorithm, swap back. This keeps one algorithm per
//! operation instead of two mirrored ones.

use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::{debug, instrument};

use crate::alphabet::Alphabet;
use crate::code::PrefixCode;
use crate::dfs;
use crate::errors::{TreePairError, TreePairResult};

/// A domain/range pair of prefix codes with the implicit label bijection.
///
/// Equality, hashing and ordering all work on the canonical
/// [`full_string`](TreePair::full_string) form, i.e. they compare
/// *representatives*, not group elements: call
/// [`minimise`](TreePair::minimise) first when semantic equality is wanted.
#[derive(Debug, Clone)]
pub struct TreePair {
    dom: PrefixCode,
    ran: PrefixCode,
}

impl TreePair {
    /// The trivial pair over `alphabet`: both sides a single root leaf.
    ///
    /// # Errors
    /// `InvalidAlphabet` for an empty, singleton or duplicate-symbol
    /// alphabet.
    pub fn new(alphabet: &str) -> TreePairResult<Self> {
        let alpha = Alphabet::new(alphabet)?;
        Ok(Self {
            dom: PrefixCode::new(alpha.clone()),
            ran: PrefixCode::new(alpha),
        })
    }

    /// Builds a pair from a DFS triple such as `"{11000,10100,1 2 0}"`:
    /// domain shape, range shape, and the labels the range leaves receive
    /// by dictionary rank.
    ///
    /// There is no partial success: any validation failure returns an error
    /// and no pair.
    pub fn from_dfs(alphabet: &str, triple: &str) -> TreePairResult<Self> {
        let fields = dfs::split_triple(triple)?;
        Self::from_parts(alphabet, &fields.domain, &fields.range, &fields.perm)
    }

    /// Builds a pair from already-split DFS fields and a permutation.
    ///
    /// # Errors
    /// `InvalidAlphabet`, `MalformedEncoding` / `ArityMismatch` for the DFS
    /// strings or a leaf-count disagreement between the sides, and
    /// `PermutationMismatch` when `perm` is not a bijection matching the
    /// decoded leaf count.
    pub fn from_parts(
        alphabet: &str,
        domain_dfs: &str,
        range_dfs: &str,
        perm: &[usize],
    ) -> TreePairResult<Self> {
        let alpha = Alphabet::new(alphabet)?;
        let dom = PrefixCode::from_dfs(alpha.clone(), domain_dfs)?;
        let mut ran = PrefixCode::from_dfs(alpha, range_dfs)?;
        if dom.size() != ran.size() {
            return Err(TreePairError::MalformedEncoding(format!(
                "domain decodes to {} leaves but range to {}",
                dom.size(),
                ran.size()
            )));
        }
        ran.apply_perm(perm)?;
        Ok(Self { dom, ran })
    }

    pub(crate) fn from_codes(dom: PrefixCode, ran: PrefixCode) -> Self {
        Self { dom, ran }
    }

    pub(crate) fn into_codes(self) -> (PrefixCode, PrefixCode) {
        (self.dom, self.ran)
    }

    pub fn alphabet(&self) -> &Alphabet {
        self.dom.alphabet()
    }

    /// Leaf count, equal on both sides.
    pub fn size(&self) -> usize {
        self.dom.size()
    }

    pub fn domain(&self) -> &PrefixCode {
        &self.dom
    }

    pub fn range(&self) -> &PrefixCode {
        &self.ran
    }

    /// Roots of the domain tree's exposed carets, rendered, in dictionary
    /// order.
    pub fn exposed_carets(&self) -> Vec<String> {
        self.dom
            .exposed_carets()
            .iter()
            .map(|p| self.alphabet().render_path(p))
            .collect()
    }

    /// Canonical serialization; the equality, hashing and ordering key.
    pub fn full_string(&self) -> String {
        format!("{{D: {} || R: {}}}", self.dom, self.ran)
    }

    // ------------------------------------------------------------------
    // Label and permutation operations
    // ------------------------------------------------------------------

    /// Relabels the domain side through `perm` (label ℓ becomes `perm[ℓ]`).
    pub fn apply_perm_domain(&mut self, perm: &[usize]) -> TreePairResult<()> {
        self.dom.apply_perm(perm)
    }

    /// Relabels the range side through `perm`.
    pub fn apply_perm_range(&mut self, perm: &[usize]) -> TreePairResult<()> {
        self.ran.apply_perm(perm)
    }

    /// Relabels both sides through the same `perm`, leaving the group
    /// element unchanged. Validation happens before any mutation, so a
    /// failed call leaves the pair untouched.
    pub fn permute_labels(&mut self, perm: &[usize]) -> TreePairResult<()> {
        self.dom.apply_perm(perm)?;
        // same label set on both sides, so the validated perm applies as is
        self.ran.relabel(perm);
        Ok(())
    }

    /// Gauge fix: relabels both sides by the inverse of the domain's
    /// current permutation, so domain labels become 0,1,2,… in dictionary
    /// order while the domain→range correspondence is unchanged.
    pub fn reset_labels(&mut self) {
        let current = self.dom.permutation();
        let mut inverse = vec![0; current.len()];
        for (rank, &label) in current.iter().enumerate() {
            inverse[label] = rank;
        }
        self.dom.relabel(&inverse);
        self.ran.relabel(&inverse);
    }

    // ------------------------------------------------------------------
    // Structural mutation
    // ------------------------------------------------------------------

    /// Expands the domain so `path` becomes the root of an exposed caret,
    /// and the corresponding range leaf by the same suffix, keeping the
    /// bijection intact. No-op when `path` sits at or above an internal
    /// node (expansion never contracts).
    ///
    /// # Errors
    /// `MalformedEncoding` when `path` uses symbols outside the alphabet.
    #[instrument(level = "debug", skip(self))]
    pub fn expand_domain_at(&mut self, path: &str) -> TreePairResult<()> {
        let path = self.alphabet().parse_path(path)?;
        self.expand_domain_path(&path);
        Ok(())
    }

    /// Dual of [`expand_domain_at`](TreePair::expand_domain_at) on the
    /// range side, via swap-invoke-swap.
    #[instrument(level = "debug", skip(self))]
    pub fn expand_range_at(&mut self, path: &str) -> TreePairResult<()> {
        self.invert();
        let result = self.expand_domain_at(path);
        self.invert();
        result
    }

    /// Refines the domain (and the corresponding range region) minimally so
    /// `path` becomes a leaf. No-op when `path` is already a node. This is
    /// the boundary-alignment step of composition.
    ///
    /// # Errors
    /// `MalformedEncoding` when `path` uses symbols outside the alphabet.
    pub fn refine_domain_to(&mut self, path: &str) -> TreePairResult<()> {
        let path = self.alphabet().parse_path(path)?;
        self.refine_domain_path(&path);
        Ok(())
    }

    /// Dual of [`refine_domain_to`](TreePair::refine_domain_to) on the
    /// range side.
    pub fn refine_range_to(&mut self, path: &str) -> TreePairResult<()> {
        self.invert();
        let result = self.refine_domain_to(path);
        self.invert();
        result
    }

    pub(crate) fn expand_domain_path(&mut self, path: &[u8]) {
        let Some(range_target) = self.corresponding_range_point(path) else {
            return;
        };
        self.dom.expand_at(path);
        self.ran.expand_at(&range_target);
    }

    pub(crate) fn refine_domain_path(&mut self, path: &[u8]) {
        let Some(range_target) = self.corresponding_range_point(path) else {
            return;
        };
        self.dom.refine_to(path);
        self.ran.refine_to(&range_target);
    }

    pub(crate) fn refine_range_path(&mut self, path: &[u8]) {
        self.invert();
        self.refine_domain_path(path);
        self.invert();
    }

    /// For a domain position `path` covered by the leaf `p` with label ℓ,
    /// the matching range position is the range leaf labelled ℓ extended by
    /// `path`'s suffix below `p`. `None` when no domain leaf covers `path`.
    fn corresponding_range_point(&self, path: &[u8]) -> Option<Vec<u8>> {
        let prefix = self.dom.get_prefix_of(path)?;
        let suffix = &path[prefix.len()..];
        let label = self.dom.label_at_leaf(prefix)?;
        let mut target = self.ran.leaf_at_label(label)?.to_vec();
        target.extend_from_slice(suffix);
        Some(target)
    }

    /// Collapses the exposed caret at `path` on the domain side together
    /// with its image caret on the range side, if the image leaves form an
    /// exposed caret carrying a contiguous increasing label run. Returns
    /// whether a reduction occurred.
    ///
    /// Labels are reset as a side effect even when no reduction happens.
    ///
    /// # Errors
    /// `MalformedEncoding` when `path` uses symbols outside the alphabet.
    #[instrument(level = "debug", skip(self))]
    pub fn reduce_domain_at(&mut self, path: &str) -> TreePairResult<bool> {
        let path = self.alphabet().parse_path(path)?;
        Ok(self.reduce_domain_path(&path))
    }

    /// Dual of [`reduce_domain_at`](TreePair::reduce_domain_at) on the
    /// range side; also resets labels as a side effect.
    #[instrument(level = "debug", skip(self))]
    pub fn reduce_range_at(&mut self, path: &str) -> TreePairResult<bool> {
        self.invert();
        let result = self.reduce_domain_at(path);
        self.invert();
        self.reset_labels();
        result
    }

    pub(crate) fn reduce_domain_path(&mut self, path: &[u8]) -> bool {
        self.reset_labels();

        if !self.dom.is_exposed_caret(path) {
            return false;
        }

        let arity = self.alphabet().arity();
        let mut first_child = path.to_vec();
        first_child.push(0);
        let Some(base) = self.dom.label_at_leaf(&first_child) else {
            return false;
        };
        let Some(image) = self.ran.leaf_at_label(base) else {
            return false;
        };
        let Some((_, image_root)) = image.split_last() else {
            return false;
        };
        let image_root = image_root.to_vec();

        // the image leaves must form an exposed caret whose labels run
        // base, base+1, … in alphabet order
        for a in 0..arity as u8 {
            let mut child = image_root.clone();
            child.push(a);
            if self.ran.label_at_leaf(&child) != Some(base + a as usize) {
                return false;
            }
        }

        let reduced = self.dom.reduce_at(path) && self.ran.reduce_at(&image_root);
        debug!(reduced, "collapsed matching carets");
        self.reset_labels();
        reduced
    }

    /// Reduces to the unique minimal representative: attempts every exposed
    /// domain caret, repeating until a full pass makes no reduction. Labels
    /// end in natural dictionary order on the domain side.
    #[instrument(level = "debug", skip(self))]
    pub fn minimise(&mut self) {
        loop {
            let mut reduced = false;
            for caret in self.dom.exposed_carets() {
                if self.reduce_domain_path(&caret) {
                    reduced = true;
                }
            }
            if !reduced {
                break;
            }
        }
    }

    /// [`minimise`](TreePair::minimise), for American English spellers.
    pub fn minimize(&mut self) {
        self.minimise();
    }

    // ------------------------------------------------------------------
    // Algebra and classification
    // ------------------------------------------------------------------

    /// Swaps domain and range in place. Labels are not reset; call
    /// [`reset_labels`](TreePair::reset_labels) for a normalized inverse.
    pub fn invert(&mut self) {
        std::mem::swap(&mut self.dom, &mut self.ran);
    }

    /// Membership in Thompson's group F: the leaf correspondence preserves
    /// dictionary order. Compares the current representative's permutations
    /// without minimising.
    pub fn in_f(&self) -> bool {
        self.dom.permutation() == self.ran.permutation()
    }

    /// Membership in Thompson's group T: the range permutation sequence is
    /// a cyclic rotation of the domain's.
    pub fn in_t(&self) -> bool {
        let dom_perm = self.dom.permutation();
        let ran_perm = self.ran.permutation();
        let n = dom_perm.len();
        // the start of the candidate rotation is where the range sequence
        // holds the domain sequence's first value
        let Some(start) = ran_perm.iter().position(|&v| v == dom_perm[0]) else {
            return false;
        };
        (0..n).all(|j| ran_perm[(start + j) % n] == dom_perm[j])
    }

    /// Membership in Thompson's group V: every tree pair with a leaf
    /// bijection qualifies by construction.
    pub fn in_v(&self) -> bool {
        true
    }
}

impl fmt::Display for TreePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_string())
    }
}

impl PartialEq for TreePair {
    /// Syntactic equality of representatives via the canonical string.
    fn eq(&self, other: &Self) -> bool {
        self.full_string() == other.full_string()
    }
}

impl Eq for TreePair {}

impl Hash for TreePair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_string().hash(state);
    }
}

impl PartialOrd for TreePair {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreePair {
    /// Total preorder for deterministic collections: domain leaf count
    /// first, canonical string as tie-break.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.size()
            .cmp(&other.size())
            .then_with(|| self.full_string().cmp(&other.full_string()))
    }
}

/// `a <= b` under the (leaf count, canonical string) order.
pub fn less_equal(a: &TreePair, b: &TreePair) -> bool {
    a <= b
}
