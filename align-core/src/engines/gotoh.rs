//! Gotoh: affine-gap three-layer DP (M / Ix / Iy).
//!
//! `Ix` extends a deletion (gap in A, consumes B); `Iy` extends an insertion
//! (gap in B, consumes A). Each layer records, in the `GotohOverlay` nibbles,
//! which layer(s) its optimum extended from so the enumerator can walk
//! between layers without re-deriving scores.

use super::common::{effective_gaps, gap_context, pair_score, sweep_reachability, ties_within};
use super::Engine;
use crate::score_model::{GapKind, Mode, ScoreModel, Strand};
use crate::trace::{TraceBits, TraceMatrix};
use align_common::{AlignResult, AlignWarning};

pub struct Gotoh;

const NEG_INF: f64 = f64::NEG_INFINITY;

impl Engine for Gotoh {
    fn fill(
        &self,
        a: &[usize],
        b: &[usize],
        model: &ScoreModel,
        strand: Strand,
    ) -> AlignResult<(f64, TraceMatrix, Vec<AlignWarning>)> {
        let n_a = a.len();
        let n_b = b.len();
        let cols = n_b + 1;
        let len = (n_a + 1) * cols;
        let gaps = effective_gaps(model.gaps(), strand);
        let epsilon = model.epsilon();
        let local = model.mode() == Mode::Local;

        let mut m = vec![NEG_INF; len];
        let mut ix = vec![NEG_INF; len]; // gap in A (deletion), layer reached via HORIZONTAL move
        let mut iy = vec![NEG_INF; len]; // gap in B (insertion), layer reached via VERTICAL move
        let mut trace = TraceMatrix::new(n_a + 1, cols).with_gotoh();

        let idx = |i: usize, j: usize| i * cols + j;

        m[idx(0, 0)] = 0.0;

        for j in 1..=n_b {
            let ctx = gap_context(0, j, n_a, n_b);
            iy[idx(0, j)] = NEG_INF;
            ix[idx(0, j)] = if local { 0.0 } else { -gaps.run_cost(ctx, GapKind::Deletion, j as u32) };
            m[idx(0, j)] = ix[idx(0, j)];
            if !local {
                trace.set(0, j, TraceBits::HORIZONTAL);
            }
        }
        for i in 1..=n_a {
            let ctx = gap_context(i, 0, n_a, n_b);
            ix[idx(i, 0)] = NEG_INF;
            iy[idx(i, 0)] = if local { 0.0 } else { -gaps.run_cost(ctx, GapKind::Insertion, i as u32) };
            m[idx(i, 0)] = iy[idx(i, 0)];
            if !local {
                trace.set(i, 0, TraceBits::VERTICAL);
            }
        }
        if local {
            for j in 0..=n_b {
                trace.insert(0, j, TraceBits::STARTPOINT);
            }
            for i in 0..=n_a {
                trace.insert(i, 0, TraceBits::STARTPOINT);
            }
        }

        let mut running_max = m[idx(0, 0)];
        let mut endpoints: Vec<(usize, usize)> = Vec::new();
        if local {
            endpoints.push((0, 0));
            trace.insert(0, 0, TraceBits::ENDPOINT);
        }

        for i in 1..=n_a {
            for j in 1..=n_b {
                let ctx = gap_context(i, j, n_a, n_b);

                // Ix: a run of deletions (gap in A), landing at (i, j) from (i, j-1).
                let ix_from_m = m[idx(i, j - 1)] - gaps.open(ctx, GapKind::Deletion);
                let ix_from_ix = ix[idx(i, j - 1)] - gaps.extend(ctx, GapKind::Deletion);
                let ix_best = ix_from_m.max(ix_from_ix);
                let mut ix_bits = TraceBits::NONE;
                if ties_within(ix_from_m, ix_best, epsilon) {
                    ix_bits.insert(TraceBits::M_MATRIX);
                }
                if ties_within(ix_from_ix, ix_best, epsilon) {
                    ix_bits.insert(TraceBits::IX_MATRIX);
                }
                ix[idx(i, j)] = ix_best;
                if let Some(overlay) = trace.gotoh.as_mut() {
                    overlay.ix_from[idx(i, j)] = ix_bits;
                }

                // Iy: a run of insertions (gap in B), landing at (i, j) from (i-1, j).
                let iy_from_m = m[idx(i - 1, j)] - gaps.open(ctx, GapKind::Insertion);
                let iy_from_iy = iy[idx(i - 1, j)] - gaps.extend(ctx, GapKind::Insertion);
                let iy_best = iy_from_m.max(iy_from_iy);
                let mut iy_bits = TraceBits::NONE;
                if ties_within(iy_from_m, iy_best, epsilon) {
                    iy_bits.insert(TraceBits::M_MATRIX);
                }
                if ties_within(iy_from_iy, iy_best, epsilon) {
                    iy_bits.insert(TraceBits::IY_MATRIX);
                }
                iy[idx(i, j)] = iy_best;
                if let Some(overlay) = trace.gotoh.as_mut() {
                    overlay.iy_from[idx(i, j)] = iy_bits;
                }

                // M: substitution, or closing either gap layer.
                let s = pair_score(model, a, b, i, j)?;
                let diagonal = m[idx(i - 1, j - 1)] + s;
                let from_ix = ix[idx(i, j)];
                let from_iy = iy[idx(i, j)];
                let best_real = diagonal.max(from_ix).max(from_iy);
                let f = if local { best_real.max(0.0) } else { best_real };

                let mut bits = TraceBits::NONE;
                if ties_within(diagonal, f, epsilon) {
                    bits.insert(TraceBits::DIAGONAL);
                }
                if ties_within(from_ix, f, epsilon) {
                    bits.insert(TraceBits::HORIZONTAL);
                }
                if ties_within(from_iy, f, epsilon) {
                    bits.insert(TraceBits::VERTICAL);
                }
                if local && f <= epsilon {
                    bits.insert(TraceBits::STARTPOINT);
                    if best_real < -epsilon {
                        bits = TraceBits::STARTPOINT;
                    }
                }

                m[idx(i, j)] = f;
                trace.set(i, j, bits);

                if local {
                    if f > running_max + epsilon {
                        for &(ei, ej) in &endpoints {
                            let k = trace.idx(ei, ej);
                            trace.trace[k].remove(TraceBits::ENDPOINT);
                        }
                        endpoints.clear();
                        running_max = f;
                    }
                    if f > epsilon && ties_within(f, running_max, epsilon) {
                        trace.insert(i, j, TraceBits::ENDPOINT);
                        endpoints.push((i, j));
                    }
                }
            }
        }

        let score = if local { running_max } else { m[idx(n_a, n_b)] };

        if local {
            sweep_reachability(&mut trace, n_a, n_b);
            if endpoints.is_empty() {
                trace.set_path(0, 0, crate::trace::PathField::NoPath);
            }
        }

        Ok((score, trace, Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score_model::{GapPenalties, ScoreModel};

    fn seq(s: &str) -> Vec<usize> {
        s.bytes().map(|b| b as usize).collect()
    }

    #[test]
    fn affine_gap_cheaper_than_two_linear_gaps() {
        let a = seq("ACGTACGT");
        let b = seq("ACGTCGT");
        let mut model = ScoreModel::simple(1.0, -1.0, 0.0, 0.0);
        model.set_gaps(GapPenalties::affine_symmetric(5.0, 1.0, 5.0, 1.0));
        let (score, _trace, _) = Gotoh.fill(&a, &b, &model, Strand::Plus).unwrap();
        // 7 matches, one single-base gap run (symmetric cost either way): open only, length 1.
        assert_eq!(score, 7.0 - 5.0);
    }

    #[test]
    fn matches_nw_sw_when_open_equals_extend() {
        use super::super::nw_sw::NwSw;
        let a = seq("ACGTA");
        let b = seq("AGTA");
        let mut model = ScoreModel::simple(2.0, -1.0, 3.0, 3.0);
        let (gotoh_score, _, _) = Gotoh.fill(&a, &b, &model, Strand::Plus).unwrap();
        let (nw_score, _, _) = NwSw.fill(&a, &b, &model, Strand::Plus).unwrap();
        let _ = model.select_algorithm();
        assert!((gotoh_score - nw_score).abs() < 1e-9);
    }
}
