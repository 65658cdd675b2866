use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreePairError {
    #[error("Invalid alphabet {alphabet:?}: {reason}")]
    InvalidAlphabet { alphabet: String, reason: String },

    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("DFS string {dfs:?} does not close a complete {arity}-ary tree")]
    ArityMismatch { dfs: String, arity: usize },

    #[error("Permutation mismatch: {0}")]
    PermutationMismatch(String),

    #[error("Cannot join prefix codes over different alphabets: {left:?} vs {right:?}")]
    JoinFailure { left: String, right: String },
}

pub type TreePairResult<T> = Result<T, TreePairError>;
