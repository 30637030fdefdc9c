//! The public façade: validates input, selects and runs the DP engine a
//! `ScoreModel` resolves to, and hands back a score plus a lazily
//! enumerable path set.

use crate::engines::fogsaa::Fogsaa;
use crate::engines::gotoh::Gotoh;
use crate::engines::nw_sw::NwSw;
use crate::engines::wsb::Wsb;
use crate::engines::Engine;
use crate::enumerator::affine::AffineEnumerator;
use crate::enumerator::linear::LinearEnumerator;
use crate::enumerator::single::{backtrack_single, SinglePathEnumerator};
use crate::enumerator::PathEnumerator;
use crate::score_model::{Algorithm, Mode, ScoreModel, Scoring, Strand};
use crate::trace::TraceMatrix;
use align_common::{AlignError, AlignResult, AlignWarning};

/// One alignment run's score plus everything needed to walk its co-optimal
/// paths.
#[derive(Debug)]
pub struct AlignmentResult {
    pub score: f64,
    pub warnings: Vec<AlignWarning>,
    pub algorithm: Algorithm,
    trace: TraceMatrix,
    mode: Mode,
    strand: Strand,
    n_a: usize,
    n_b: usize,
}

impl AlignmentResult {
    /// Build the path enumerator matching the algorithm that produced this
    /// result. Borrows the trace matrix mutably, so only one enumerator can
    /// be live at a time.
    pub fn paths(&mut self) -> Box<dyn PathEnumerator + '_> {
        let local = self.mode == Mode::Local;
        match self.algorithm {
            Algorithm::NwSw => {
                Box::new(LinearEnumerator::new(&mut self.trace, self.n_a, self.n_b, local, self.strand))
            }
            Algorithm::Gotoh | Algorithm::Wsb => {
                Box::new(AffineEnumerator::new(&mut self.trace, self.n_a, self.n_b, local, self.strand))
            }
            Algorithm::Fogsaa => {
                let path = backtrack_single(&self.trace, self.n_a, self.n_b, self.strand);
                Box::new(SinglePathEnumerator::new(path))
            }
        }
    }
}

/// Reject symbols a substitution matrix can't resolve before the DP fill
/// does any work. A plain match/mismatch model has no alphabet to bound
/// against, so every `usize` id is accepted there.
fn validate_alphabet(seq: &[usize], model: &ScoreModel) -> AlignResult<()> {
    if let Scoring::Matrix(matrix) = model.scoring() {
        for &symbol in seq {
            if Some(symbol) == model.wildcard() {
                continue;
            }
            matrix.score(symbol, symbol).map_err(|_| {
                AlignError::Domain(format!("symbol {symbol} has no entry in the substitution matrix"))
            })?;
        }
    }
    Ok(())
}

/// Entry point for running a pairwise alignment against a `ScoreModel`.
pub struct Aligner;

impl Aligner {
    /// Validate the two sequences, select the algorithm this `ScoreModel`
    /// resolves to, run it, and return the score plus a handle for lazily
    /// walking co-optimal paths.
    pub fn align(a: &[usize], b: &[usize], model: &mut ScoreModel, strand: Strand) -> AlignResult<AlignmentResult> {
        validate_alphabet(a, model)?;
        validate_alphabet(b, model)?;

        let algorithm = model.select_algorithm();
        tracing::debug!(?algorithm, n_a = a.len(), n_b = b.len(), "running pairwise alignment");
        let (score, trace, warnings) = match algorithm {
            Algorithm::NwSw => NwSw.fill(a, b, model, strand)?,
            Algorithm::Gotoh => Gotoh.fill(a, b, model, strand)?,
            Algorithm::Wsb => Wsb.fill(a, b, model, strand)?,
            Algorithm::Fogsaa => Fogsaa.fill(a, b, model, strand)?,
        };

        for warning in &warnings {
            tracing::warn!(%warning, "alignment warning");
        }

        Ok(AlignmentResult {
            score,
            warnings,
            algorithm,
            trace,
            mode: model.mode(),
            strand,
            n_a: a.len(),
            n_b: b.len(),
        })
    }

    /// Score only, for callers that don't need a traceback.
    pub fn score(a: &[usize], b: &[usize], model: &mut ScoreModel, strand: Strand) -> AlignResult<(f64, Vec<AlignWarning>)> {
        let result = Self::align(a, b, model, strand)?;
        Ok((result.score, result.warnings))
    }
}
