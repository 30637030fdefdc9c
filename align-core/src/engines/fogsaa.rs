//! FOGSAA: best-first branch-and-bound search over the alignment grid.
//!
//! Unlike the three DP engines this never fills an (nA+1)x(nB+1) table: it
//! keeps a priority queue of partial alignments ordered by an admissible
//! upper bound on their final score and expands the most promising one
//! first, so a search tree far smaller than the full grid can still prove
//! optimality. The admissible bound assumes a match beats a mismatch and a
//! mismatch beats any gap step; `ScoreModel`s that violate either assumption
//! still run, but surface a warning rather than a silently unsound bound.

use super::common::{effective_gaps, gap_context};
use super::Engine;
use crate::score_model::{GapKind, Mode, ScoreModel, Scoring, Strand};
use crate::trace::{PathField, TraceBits, TraceMatrix};
use align_common::{AlignResult, AlignWarning};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

pub struct Fogsaa;

/// Which gap layer, if any, the path arrived at this node through — needed
/// to tell an opening step from an extending one on the next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GapState {
    None,
    Insertion,
    Deletion,
}

#[derive(Debug)]
struct Node {
    i: usize,
    j: usize,
    g: f64,
    f: f64,
    state: GapState,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f
    }
}
impl Eq for Node {}
impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f.partial_cmp(&other.f).unwrap_or(Ordering::Equal)
    }
}

/// Best achievable per-step pair score, an upper bound used by the
/// admissible heuristic.
fn best_pair_score(model: &ScoreModel) -> f64 {
    let mut best: f64 = 0.0;
    match model.scoring() {
        Scoring::MatchMismatch { match_score, mismatch_score } => {
            best = best.max(*match_score).max(*mismatch_score);
        }
        Scoring::Matrix(matrix) => {
            best = best.max(matrix.max_score());
        }
    }
    best
}

fn collect_warnings(model: &ScoreModel) -> Vec<AlignWarning> {
    let mut warnings = Vec::new();
    if let Scoring::MatchMismatch { match_score, mismatch_score } = model.scoring() {
        if mismatch_score >= match_score {
            warnings.push(AlignWarning::MismatchNotWorseThanMatch);
        }
        let mismatch_penalty = match_score - mismatch_score;
        let gaps = model.gaps();
        let worst_gap = [
            gaps.open_internal_insertion,
            gaps.extend_internal_insertion,
            gaps.open_internal_deletion,
            gaps.extend_internal_deletion,
        ]
        .into_iter()
        .fold(0.0_f64, f64::max);
        if worst_gap > mismatch_penalty {
            warnings.push(AlignWarning::GapExceedsMismatch);
        }
    }
    warnings
}

impl Engine for Fogsaa {
    fn fill(
        &self,
        a: &[usize],
        b: &[usize],
        model: &ScoreModel,
        strand: Strand,
    ) -> AlignResult<(f64, TraceMatrix, Vec<AlignWarning>)> {
        debug_assert_eq!(model.mode(), Mode::Fogsaa);
        let n_a = a.len();
        let n_b = b.len();
        let cols = n_b + 1;
        let gaps = effective_gaps(model.gaps(), strand);
        let bound = best_pair_score(model);
        let warnings = collect_warnings(model);

        let mut trace = TraceMatrix::new(n_a + 1, cols);
        // Three shadow states per cell (no gap in progress, mid-insertion,
        // mid-deletion) so an opening step never gets priced as an extend.
        let mut best_g = vec![f64::NEG_INFINITY; (n_a + 1) * cols * 3];
        // Backpointer per (cell, state): where the best-known path to it came
        // from and which move it took. Kept per state rather than collapsed
        // per cell, since the winning state at a cell isn't necessarily on
        // the chain that produced a neighboring cell's own best score.
        let mut parent: Vec<Option<(usize, usize, GapState, TraceBits)>> =
            vec![None; (n_a + 1) * cols * 3];
        let idx = |i: usize, j: usize| i * cols + j;
        let state_idx = |i: usize, j: usize, state: GapState| {
            idx(i, j) * 3
                + match state {
                    GapState::None => 0,
                    GapState::Insertion => 1,
                    GapState::Deletion => 2,
                }
        };

        let h0 = (n_a.min(n_b)) as f64 * bound;
        let mut heap = BinaryHeap::new();
        heap.push(Node { i: 0, j: 0, g: 0.0, f: h0, state: GapState::None });
        best_g[state_idx(0, 0, GapState::None)] = 0.0;

        while let Some(node) = heap.pop() {
            if node.g < best_g[state_idx(node.i, node.j, node.state)] {
                continue; // stale entry, a cheaper path already closed this state
            }
            if node.i == n_a && node.j == n_b {
                // Walk the backpointer chain for the winning state and stamp
                // trace bits only along that single path.
                let mut cur = (node.i, node.j, node.state);
                while let Some((pi, pj, pstate, bits)) =
                    parent[state_idx(cur.0, cur.1, cur.2)]
                {
                    trace.set(cur.0, cur.1, bits);
                    cur = (pi, pj, pstate);
                }
                trace.set_path(0, 0, PathField::Done);
                return Ok((node.g, trace, warnings));
            }

            let remaining = |i: usize, j: usize| (n_a - i).min(n_b - j) as f64 * bound;

            if node.i < n_a && node.j < n_b {
                let s = model.pair_score(a[node.i], b[node.j])?;
                let g = node.g + s;
                let key = state_idx(node.i + 1, node.j + 1, GapState::None);
                if g > best_g[key] {
                    best_g[key] = g;
                    parent[key] = Some((node.i, node.j, node.state, TraceBits::DIAGONAL));
                    heap.push(Node {
                        i: node.i + 1,
                        j: node.j + 1,
                        g,
                        f: g + remaining(node.i + 1, node.j + 1),
                        state: GapState::None,
                    });
                }
            }
            if node.i < n_a {
                let ctx = gap_context(node.i + 1, node.j, n_a, n_b);
                let step = if node.state == GapState::Insertion {
                    gaps.extend(ctx, GapKind::Insertion)
                } else {
                    gaps.open(ctx, GapKind::Insertion)
                };
                let g = node.g - step;
                let key = state_idx(node.i + 1, node.j, GapState::Insertion);
                if g > best_g[key] {
                    best_g[key] = g;
                    parent[key] = Some((node.i, node.j, node.state, TraceBits::VERTICAL));
                    heap.push(Node {
                        i: node.i + 1,
                        j: node.j,
                        g,
                        f: g + remaining(node.i + 1, node.j),
                        state: GapState::Insertion,
                    });
                }
            }
            if node.j < n_b {
                let ctx = gap_context(node.i, node.j + 1, n_a, n_b);
                let step = if node.state == GapState::Deletion {
                    gaps.extend(ctx, GapKind::Deletion)
                } else {
                    gaps.open(ctx, GapKind::Deletion)
                };
                let g = node.g - step;
                let key = state_idx(node.i, node.j + 1, GapState::Deletion);
                if g > best_g[key] {
                    best_g[key] = g;
                    parent[key] = Some((node.i, node.j, node.state, TraceBits::HORIZONTAL));
                    heap.push(Node {
                        i: node.i,
                        j: node.j + 1,
                        g,
                        f: g + remaining(node.i, node.j + 1),
                        state: GapState::Deletion,
                    });
                }
            }
        }

        Err(align_common::AlignError::Internal(
            "FOGSAA search exhausted without reaching the final cell".into(),
        ))
    }
}
