//! The four DP engines, sharing common cell-selection rules and an ε-tie
//! policy.

pub mod common;
pub mod fogsaa;
pub mod gotoh;
pub mod nw_sw;
pub mod wsb;

use crate::score_model::{ScoreModel, Strand};
use crate::trace::TraceMatrix;
use align_common::{AlignResult, AlignWarning};

/// Shared contract for the four DP engines.
///
/// Strand `'-'` swaps left/right gap parameters (it reflects B); the
/// enumerator remaps `j -> nB - j` at emission time, never here.
pub trait Engine {
    fn fill(
        &self,
        a: &[usize],
        b: &[usize],
        model: &ScoreModel,
        strand: Strand,
    ) -> AlignResult<(f64, TraceMatrix, Vec<AlignWarning>)>;
}
