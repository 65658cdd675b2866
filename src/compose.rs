//! Composition of tree pairs through a shared boundary code.
//!
//! The product of `first` and `second` is computed by refining `first`'s
//! range and `second`'s domain to their join, aligning `second`'s labels to
//! `first`'s range labelling, and recombining the outer codes. Operands are
//! cloned before any mutation; callers' pairs are never touched.

use tracing::{debug, instrument};

use crate::errors::TreePairResult;
use crate::pair::TreePair;

/// Multiplies two tree pairs: `first` applied first, then `second`.
///
/// The result is a valid but not necessarily minimal representative; call
/// [`TreePair::minimise`] on it when the reduced form is wanted.
///
/// # Errors
/// `JoinFailure` when the operands' alphabets differ.
#[instrument(level = "debug", skip_all)]
pub fn multiply(first: &TreePair, second: &TreePair) -> TreePairResult<TreePair> {
    let mut first = first.clone();
    let mut second = second.clone();
    debug!(first = %first, second = %second, "multiplying tree pairs");

    first.reset_labels();
    second.reset_labels();

    let boundary = first.range().join(second.domain())?;
    debug!(boundary = %boundary, "boundary code joined");

    // Force every boundary leaf to be a leaf of first's range and second's
    // domain. Refinement is monotone and no-ops on existing nodes, so after
    // this loop both sides equal the boundary exactly.
    let leaf_paths: Vec<Vec<u8>> = boundary.iter().map(|(path, _)| path.to_vec()).collect();
    for path in &leaf_paths {
        first.refine_range_path(path);
        second.refine_domain_path(path);
    }
    debug!(first = %first, second = %second, "operands refined to the boundary");

    // Align second's domain labelling with first's range labelling, so the
    // two maps chain leaf-for-leaf across the boundary.
    let alignment = first.range().permutation();
    second.permute_labels(&alignment)?;

    let (dom, _) = first.into_codes();
    let (_, ran) = second.into_codes();
    Ok(TreePair::from_codes(dom, ran))
}

/// The identity-shaped pair `{domain: x.range, range: x.range}`, the
/// neutral element in the form that multiplies directly with `x`.
pub fn identity_like(pair: &TreePair) -> TreePair {
    TreePair::from_codes(pair.range().clone(), pair.range().clone())
}

/// `pair` raised to `exponent`: repeated multiplication of the minimised
/// base, the inverse for negative exponents, [`identity_like`] for zero.
/// Iterative, so large exponents cost no stack depth.
#[instrument(level = "debug", skip(pair))]
pub fn power(pair: &TreePair, exponent: i64) -> TreePairResult<TreePair> {
    let mut base = pair.clone();
    if exponent < 0 {
        base.invert();
    }
    let n = exponent.unsigned_abs();
    if n == 0 {
        return Ok(identity_like(&base));
    }

    base.minimise();
    let mut acc = identity_like(&base);
    for _ in 0..n {
        acc = multiply(&base, &acc)?;
    }
    Ok(acc)
}
