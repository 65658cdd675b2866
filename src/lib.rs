//! Tree-pair algebra for R. Thompson's groups F, T and V.
//!
//! A group element is a pair of finite rooted trees over one alphabet — a
//! *domain* tree and a *range* tree with the same number of leaves — plus a
//! bijection between their leaf sets carried by integer labels. This crate
//! builds such pairs (from expansion sequences or DFS strings), reduces
//! them to their unique minimal representative, multiplies and inverts
//! them, and classifies them into F, T and V.
//!
//! ```
//! use treepair::{multiply, TreePair};
//!
//! let mut x = TreePair::from_dfs("01", "{111000100,111100000,0 1 2 3 4}").unwrap();
//! x.minimise();
//! assert_eq!(
//!     x.full_string(),
//!     "{D: [0 0], [10 1], [11 2] || R: [00 0], [01 1], [1 2]}"
//! );
//!
//! let squared = multiply(&x, &x).unwrap();
//! assert!(squared.in_f());
//! ```

pub mod alphabet;
pub mod code;
pub mod compose;
pub mod dfs;
pub mod errors;
pub mod pair;
pub mod tree_traits;

pub use alphabet::Alphabet;
pub use code::PrefixCode;
pub use compose::{identity_like, multiply, power};
pub use dfs::{split_triple, valid_dfs, DfsTriple};
pub use errors::{TreePairError, TreePairResult};
pub use pair::{less_equal, TreePair};
pub use tree_traits::ToTreeString;
