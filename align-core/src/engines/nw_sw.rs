//! NW-SW: linear-gap global (Needleman-Wunsch) and local (Smith-Waterman)
//! alignment.

use super::common::{effective_gaps, gap_context, pair_score, ties_within};
use super::Engine;
use crate::score_model::{GapKind, Mode, ScoreModel, Strand};
use crate::trace::{TraceBits, TraceMatrix};
use align_common::{AlignResult, AlignWarning};

pub struct NwSw;

impl Engine for NwSw {
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
        let gaps = effective_gaps(model.gaps(), strand);
        let epsilon = model.epsilon();
        let local = model.mode() == Mode::Local;

        let mut scores = vec![0.0f64; (n_a + 1) * cols];
        let mut trace = TraceMatrix::new(n_a + 1, cols);

        let idx = |i: usize, j: usize| i * cols + j;

        // Borders.
        for j in 1..=n_b {
            if local {
                scores[idx(0, j)] = 0.0;
            } else {
                let ctx = gap_context(0, j, n_a, n_b);
                scores[idx(0, j)] = -gaps.run_cost(ctx, GapKind::Deletion, j as u32);
                trace.set(0, j, TraceBits::HORIZONTAL);
            }
        }
        for i in 1..=n_a {
            if local {
                scores[idx(i, 0)] = 0.0;
            } else {
                let ctx = gap_context(i, 0, n_a, n_b);
                scores[idx(i, 0)] = -gaps.run_cost(ctx, GapKind::Insertion, i as u32);
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

        let mut running_max = scores[idx(0, 0)];
        let mut endpoints: Vec<(usize, usize)> = Vec::new();
        if local {
            endpoints.push((0, 0));
            trace.insert(0, 0, TraceBits::ENDPOINT);
        }

        for i in 1..=n_a {
            for j in 1..=n_b {
                let s = pair_score(model, a, b, i, j)?;
                let diagonal = scores[idx(i - 1, j - 1)] + s;

                let ctx = gap_context(i, j, n_a, n_b);
                let vertical = scores[idx(i - 1, j)] - gaps.extend(ctx, GapKind::Insertion);
                let horizontal = scores[idx(i, j - 1)] - gaps.extend(ctx, GapKind::Deletion);

                let best_real = diagonal.max(vertical).max(horizontal);
                let f = if local { best_real.max(0.0) } else { best_real };

                let mut bits = TraceBits::NONE;
                if ties_within(diagonal, f, epsilon) {
                    bits.insert(TraceBits::DIAGONAL);
                }
                if ties_within(vertical, f, epsilon) {
                    bits.insert(TraceBits::VERTICAL);
                }
                if ties_within(horizontal, f, epsilon) {
                    bits.insert(TraceBits::HORIZONTAL);
                }

                if local && f <= epsilon {
                    bits.insert(TraceBits::STARTPOINT);
                    if best_real < -epsilon {
                        // Clamped: no real predecessor direction survives.
                        bits = TraceBits::STARTPOINT;
                    }
                }

                scores[idx(i, j)] = f;
                trace.set(i, j, bits);

                if local {
                    if f > running_max + epsilon {
                        for &(ei, ej) in &endpoints {
                            trace.remove_endpoint(ei, ej);
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

        let score = if local { running_max } else { scores[idx(n_a, n_b)] };

        if local && endpoints.is_empty() {
            trace.set_path(0, 0, crate::trace::PathField::NoPath);
        }

        Ok((score, trace, Vec::new()))
    }
}

impl TraceMatrix {
    fn remove_endpoint(&mut self, i: usize, j: usize) {
        let idx = self.idx(i, j);
        self.trace[idx].remove(TraceBits::ENDPOINT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score_model::ScoreModel;

    fn seq(s: &str) -> Vec<usize> {
        s.bytes().map(|b| b as usize).collect()
    }

    #[test]
    fn identical_sequences_score_matches_length() {
        let a = seq("ACGTA");
        let b = seq("ACGTA");
        let model = ScoreModel::simple(1.0, -1.0, 1.0, 1.0);
        let (score, _trace, _) = NwSw.fill(&a, &b, &model, Strand::Plus).unwrap();
        assert_eq!(score, 5.0);
    }

    #[test]
    fn single_mismatch_scores_length_minus_two() {
        let a = seq("ACT");
        let b = seq("AGT");
        let model = ScoreModel::simple(1.0, -1.0, 1.0, 1.0);
        let (score, _trace, _) = NwSw.fill(&a, &b, &model, Strand::Plus).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn local_alignment_finds_best_common_core() {
        let a = seq("ACGT");
        let b = seq("GACGTC");
        let model = {
            let mut m = ScoreModel::simple(1.0, -1.0, 1.0, 1.0);
            m.set_mode(Mode::Local);
            m
        };
        let (score, _trace, _) = NwSw.fill(&a, &b, &model, Strand::Plus).unwrap();
        assert_eq!(score, 4.0);
    }
}
