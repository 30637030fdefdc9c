//! Error and warning types shared by the aligner crates

use thiserror::Error;

/// Error type for pairwise alignment operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignError {
    /// Bad configuration: invalid mode string, non-square/non-f64 substitution
    /// matrix, bad strand character, multi-symbol wildcard, heterogeneous gap
    /// score retrieval.
    #[error("invalid alignment configuration: {0}")]
    Validation(String),

    /// Bad input: sequence index out of range, or a symbol with no entry in
    /// the supplied `mapping`.
    #[error("invalid alignment input: {0}")]
    Domain(String),

    /// `PathEnumerator::len` overflowed `usize` while summing optimal paths.
    #[error("optimal path count overflowed")]
    Overflow,

    /// A trace-matrix or WSB gap-length allocation failed.
    #[error("allocation failed: {0}")]
    Resource(String),

    /// An algorithm/mode combination reached a branch the dispatcher
    /// considers unreachable. Should never fire in a well-formed build.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for pairwise alignment operations
pub type AlignResult<T> = Result<T, AlignError>;

/// Non-fatal conditions surfaced alongside a successful score/alignment.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignWarning {
    /// FOGSAA's admissible bounds assume `match > mismatch`; that assumption
    /// does not hold for this `ScoreModel`.
    #[error("FOGSAA bound heuristic assumes match score exceeds mismatch score")]
    MismatchNotWorseThanMatch,

    /// FOGSAA's admissible bounds assume every gap penalty is cheaper than a
    /// mismatch; some configured gap score exceeds the mismatch score.
    #[error("FOGSAA bound heuristic assumes gap scores are cheaper than a mismatch")]
    GapExceedsMismatch,
}
