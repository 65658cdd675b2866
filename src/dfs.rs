//! Depth-first-search tree encodings.
//!
//! A tree shape is written in pre-order as a string of markers, `1` for an
//! internal node and `0` for a leaf, independent of the alphabet's actual
//! symbols. Validity is a stack-depth balance: reading left to right with a
//! starting height of one, a `1` opens `arity - 1` further obligations and a
//! `0` closes one; the height must stay positive until the final marker and
//! be exactly zero after it.

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{TreePairError, TreePairResult};

/// The `"{<domainDFS>,<rangeDFS>,<perm ints>}"` wire format, split into its
/// three fields with the permutation already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfsTriple {
    pub domain: String,
    pub range: String,
    pub perm: Vec<usize>,
}

/// Checks whether `dfs` describes a complete `arity`-ary tree.
pub fn valid_dfs(arity: usize, dfs: &str) -> bool {
    check_dfs(arity, dfs).is_ok()
}

/// Validates a DFS string, distinguishing structural damage from an arity
/// disagreement.
///
/// # Errors
/// `MalformedEncoding` for an empty string, a character other than `0`/`1`,
/// or a stack height that reaches zero before the final marker;
/// `ArityMismatch` when the height is nonzero after the final marker.
pub(crate) fn check_dfs(arity: usize, dfs: &str) -> TreePairResult<()> {
    if dfs.is_empty() {
        return Err(TreePairError::MalformedEncoding(
            "DFS tree description must not be empty".to_string(),
        ));
    }

    let last = dfs.len() - 1;
    let mut height: usize = 1;
    for (i, c) in dfs.char_indices() {
        match c {
            '1' => height += arity - 1,
            '0' => {
                height -= 1;
                if height == 0 && i < last {
                    return Err(TreePairError::MalformedEncoding(format!(
                        "DFS string {dfs:?} closes its tree before the string ends"
                    )));
                }
            }
            _ => {
                return Err(TreePairError::MalformedEncoding(format!(
                    "DFS string {dfs:?} contains {c:?}, expected only '0' and '1'"
                )));
            }
        }
    }

    if height != 0 {
        return Err(TreePairError::ArityMismatch {
            dfs: dfs.to_string(),
            arity,
        });
    }
    Ok(())
}

/// Decodes a valid DFS string into leaf index-paths in pre-order, which for
/// a pre-order walk in child order is exactly dictionary order.
pub(crate) fn decode_shape(arity: usize, dfs: &str) -> TreePairResult<Vec<Vec<u8>>> {
    check_dfs(arity, dfs)?;

    let mut leaves = Vec::new();
    let mut path: Vec<u8> = Vec::new();
    for c in dfs.chars() {
        match c {
            '1' => path.push(0),
            _ => {
                leaves.push(path.clone());
                // advance to the next pre-order position
                while let Some(last) = path.last_mut() {
                    if (*last as usize) + 1 < arity {
                        *last += 1;
                        break;
                    }
                    path.pop();
                }
            }
        }
    }
    Ok(leaves)
}

static TRIPLE_RE: OnceLock<Regex> = OnceLock::new();

fn triple_regex() -> &'static Regex {
    TRIPLE_RE.get_or_init(|| {
        Regex::new(r"^\{([01]+),([01]+),(\d+(?: \d+)*)\}$").unwrap()
    })
}

/// Splits a `"{dom,ran,perm}"` triple into its fields.
///
/// # Errors
/// `MalformedEncoding` when the bracketing or field count is wrong or the
/// permutation field is not space-separated integers.
pub fn split_triple(triple: &str) -> TreePairResult<DfsTriple> {
    let caps = triple_regex().captures(triple).ok_or_else(|| {
        TreePairError::MalformedEncoding(format!(
            "{triple:?} is not of the form {{<domainDFS>,<rangeDFS>,<permutation ints>}}"
        ))
    })?;

    let perm = caps[3]
        .split(' ')
        .map(|v| {
            v.parse::<usize>().map_err(|_| {
                TreePairError::MalformedEncoding(format!(
                    "bad permutation entry {v:?} in {triple:?}"
                ))
            })
        })
        .collect::<TreePairResult<Vec<usize>>>()?;

    Ok(DfsTriple {
        domain: caps[1].to_string(),
        range: caps[2].to_string(),
        perm,
    })
}
