//! Waterman-Smith-Beyer: general (possibly non-affine) gap-cost DP.
//!
//! Without the affine assumption a gap run can only be scored by its total
//! length, so `Ix[i][j]`/`Iy[i][j]` are each a max over every run length
//! ending at that cell rather than an O(1) step from the adjacent cell. Every
//! length that ties the max within epsilon is kept in the `WsbOverlay` slab
//! so the enumerator can walk gap runs of more than one length.

use super::common::{effective_gaps, gap_context, pair_score, sweep_reachability, ties_within};
use super::Engine;
use crate::score_model::{GapContext, GapKind, Mode, ScoreModel, Strand};
use crate::trace::{GapListKind, TraceBits, TraceMatrix};
use align_common::{AlignResult, AlignWarning};

pub struct Wsb;

const NEG_INF: f64 = f64::NEG_INFINITY;

/// Cost of a run of `k` deletions (gap in A) ending with B-position `j`.
fn deletion_cost(model: &ScoreModel, gaps: &crate::score_model::GapPenalties, ctx: GapContext, j: usize, k: u32) -> f64 {
    match model.gap_functions() {
        Some((_ins, del)) => del(j, k),
        None => gaps.run_cost(ctx, GapKind::Deletion, k),
    }
}

/// Cost of a run of `k` insertions (gap in B) ending with A-position `i`.
fn insertion_cost(model: &ScoreModel, gaps: &crate::score_model::GapPenalties, ctx: GapContext, i: usize, k: u32) -> f64 {
    match model.gap_functions() {
        Some((ins, _del)) => ins(i, k),
        None => gaps.run_cost(ctx, GapKind::Insertion, k),
    }
}

impl Engine for Wsb {
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
        let mut ix = vec![NEG_INF; len];
        let mut iy = vec![NEG_INF; len];
        let mut trace = TraceMatrix::new(n_a + 1, cols).with_wsb();

        let idx = |i: usize, j: usize| i * cols + j;
        m[idx(0, 0)] = 0.0;

        for j in 1..=n_b {
            let ctx = gap_context(0, j, n_a, n_b);
            ix[idx(0, j)] = if local { 0.0 } else { -deletion_cost(model, &gaps, ctx, j, j as u32) };
            m[idx(0, j)] = ix[idx(0, j)];
            if !local {
                trace.set(0, j, TraceBits::HORIZONTAL);
            }
        }
        for i in 1..=n_a {
            let ctx = gap_context(i, 0, n_a, n_b);
            iy[idx(i, 0)] = if local { 0.0 } else { -insertion_cost(model, &gaps, ctx, i, i as u32) };
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
                let cell = idx(i, j);

                // Ix[i][j]: a run of k deletions landing here, opened from M or
                // continued past a closed insertion (Iy) at the same row.
                let mut ix_best = NEG_INF;
                let mut ix_m_lens = Vec::new();
                let mut ix_iy_lens = Vec::new();
                for k in 1..=j as u32 {
                    let src = idx(i, j - k as usize);
                    let cost = deletion_cost(model, &gaps, ctx, j, k);
                    let from_m = m[src] - cost;
                    let from_iy = iy[src] - cost;
                    let best_here = from_m.max(from_iy);
                    if best_here > ix_best + epsilon {
                        ix_best = best_here;
                    }
                }
                for k in 1..=j as u32 {
                    let src = idx(i, j - k as usize);
                    let cost = deletion_cost(model, &gaps, ctx, j, k);
                    if ties_within(m[src] - cost, ix_best, epsilon) {
                        ix_m_lens.push(k);
                    }
                    if ties_within(iy[src] - cost, ix_best, epsilon) {
                        ix_iy_lens.push(k);
                    }
                }
                ix[cell] = ix_best;
                if let Some(overlay) = trace.wsb.as_mut() {
                    for k in ix_m_lens {
                        overlay.push_len(cell, GapListKind::MIx, k);
                    }
                    for k in ix_iy_lens {
                        overlay.push_len(cell, GapListKind::IyIx, k);
                    }
                }

                // Iy[i][j]: symmetric, runs of insertions down column j.
                let mut iy_best = NEG_INF;
                let mut iy_m_lens = Vec::new();
                let mut iy_ix_lens = Vec::new();
                for k in 1..=i as u32 {
                    let src = idx(i - k as usize, j);
                    let cost = insertion_cost(model, &gaps, ctx, i, k);
                    let best_here = (m[src] - cost).max(ix[src] - cost);
                    if best_here > iy_best + epsilon {
                        iy_best = best_here;
                    }
                }
                for k in 1..=i as u32 {
                    let src = idx(i - k as usize, j);
                    let cost = insertion_cost(model, &gaps, ctx, i, k);
                    if ties_within(m[src] - cost, iy_best, epsilon) {
                        iy_m_lens.push(k);
                    }
                    if ties_within(ix[src] - cost, iy_best, epsilon) {
                        iy_ix_lens.push(k);
                    }
                }
                iy[cell] = iy_best;
                if let Some(overlay) = trace.wsb.as_mut() {
                    for k in iy_m_lens {
                        overlay.push_len(cell, GapListKind::MIy, k);
                    }
                    for k in iy_ix_lens {
                        overlay.push_len(cell, GapListKind::IxIy, k);
                    }
                }

                let s = pair_score(model, a, b, i, j)?;
                let diagonal = m[idx(i - 1, j - 1)] + s;
                let best_real = diagonal.max(ix[cell]).max(iy[cell]);
                let f = if local { best_real.max(0.0) } else { best_real };

                let mut bits = TraceBits::NONE;
                if ties_within(diagonal, f, epsilon) {
                    bits.insert(TraceBits::DIAGONAL);
                }
                if ties_within(ix[cell], f, epsilon) {
                    bits.insert(TraceBits::HORIZONTAL);
                }
                if ties_within(iy[cell], f, epsilon) {
                    bits.insert(TraceBits::VERTICAL);
                }
                if local && f <= epsilon {
                    bits.insert(TraceBits::STARTPOINT);
                    if best_real < -epsilon {
                        bits = TraceBits::STARTPOINT;
                    }
                }

                m[cell] = f;
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
