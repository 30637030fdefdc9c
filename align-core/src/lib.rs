//! Pairwise sequence alignment core: scoring, trace matrices, the four DP
//! engines, co-optimal path enumeration, and the `Aligner` façade.

pub mod aligner;
pub mod engines;
pub mod enumerator;
pub mod score_model;
pub mod trace;

pub use aligner::{Aligner, AlignmentResult};
pub use enumerator::{AlignedColumn, PathCount, PathEnumerator};
pub use score_model::{
    Algorithm, GapContext, GapCostFn, GapKind, GapPenalties, Mode, ScoreModel, Scoring, Strand,
    SubstitutionMatrix, rescale_to_epsilon, ties_within,
};
pub use trace::{TraceBits, TraceMatrix};
