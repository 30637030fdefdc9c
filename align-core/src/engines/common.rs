//! Helpers shared by every DP engine: context classification, strand
//! mirroring of the terminal gap penalties, and the ε-tie comparison.

use crate::score_model::{GapContext, GapPenalties, ScoreModel, Strand};
use crate::trace::{GapListKind, TraceBits, TraceMatrix};
use align_common::AlignResult;

pub use crate::score_model::ties_within;

/// Left/internal/right classification for a transition landing on `(i, j)`.
#[inline]
pub fn gap_context(i: usize, j: usize, n_a: usize, n_b: usize) -> GapContext {
    GapContext::at(i, j, n_a, n_b)
}

/// Strand `-` reflects B: swap the left-gap and right-gap rates so the
/// engine can run exactly as it would for `+` on the mirrored coordinate
/// system. The enumerator, not the engine, remaps `j -> nB - j` coordinates
/// back at emission time.
pub fn effective_gaps(gaps: &GapPenalties, strand: Strand) -> GapPenalties {
    match strand {
        Strand::Plus => *gaps,
        Strand::Minus => GapPenalties {
            open_left_insertion: gaps.open_right_insertion,
            open_internal_insertion: gaps.open_internal_insertion,
            open_right_insertion: gaps.open_left_insertion,
            open_left_deletion: gaps.open_right_deletion,
            open_internal_deletion: gaps.open_internal_deletion,
            open_right_deletion: gaps.open_left_deletion,
            extend_left_insertion: gaps.extend_right_insertion,
            extend_internal_insertion: gaps.extend_internal_insertion,
            extend_right_insertion: gaps.extend_left_insertion,
            extend_left_deletion: gaps.extend_right_deletion,
            extend_internal_deletion: gaps.extend_internal_deletion,
            extend_right_deletion: gaps.extend_left_deletion,
        },
    }
}

#[inline]
pub fn pair_score(model: &ScoreModel, a: &[usize], b: &[usize], i: usize, j: usize) -> AlignResult<f64> {
    model.pair_score(a[i - 1], b[j - 1])
}

/// Local-mode cleanup for the affine (Gotoh/WSB) trace matrices: a tie
/// recorded by epsilon comparison names a predecessor cell/layer, but
/// nothing stops that predecessor itself from being unreachable from any
/// STARTPOINT (an edge whose source never actually begins a local
/// alignment). Call once after a local-mode fill, before the matrix is
/// handed to an enumerator, so `AffineEnumerator` and `len()` only ever
/// walk or count edges that trace back to a real start.
///
/// Reachability is computed forward, layer by layer, in the same
/// topological order the fill itself used (a cell's M/Ix/Iy reachability
/// only depends on cells with a smaller `i` or `j`), then every recorded
/// edge — top-level trace bits and, for WSB, each gap-length list entry —
/// is kept only if the source it names is reachable.
pub fn sweep_reachability(trace: &mut TraceMatrix, n_a: usize, n_b: usize) {
    let rows = n_a + 1;
    let cols = n_b + 1;
    let idx = |i: usize, j: usize| i * cols + j;

    let mut reach_m = vec![false; rows * cols];
    let mut reach_ix = vec![false; rows * cols];
    let mut reach_iy = vec![false; rows * cols];

    for i in 0..rows {
        for j in 0..cols {
            let tidx = trace.idx(i, j);

            let mut iy = false;
            if let Some(overlay) = &trace.gotoh {
                let bits = overlay.iy_from[tidx];
                if bits.contains(TraceBits::M_MATRIX) && i > 0 {
                    iy |= reach_m[idx(i - 1, j)];
                }
                if bits.contains(TraceBits::IY_MATRIX) && i > 0 {
                    iy |= reach_iy[idx(i - 1, j)];
                }
            } else if let Some(overlay) = &trace.wsb {
                for &k in overlay.lengths(tidx, GapListKind::MIy) {
                    let k = k as usize;
                    if k <= i {
                        iy |= reach_m[idx(i - k, j)];
                    }
                }
                for &k in overlay.lengths(tidx, GapListKind::IxIy) {
                    let k = k as usize;
                    if k <= i {
                        iy |= reach_ix[idx(i - k, j)];
                    }
                }
            }
            reach_iy[idx(i, j)] = iy;

            let mut ix = false;
            if let Some(overlay) = &trace.gotoh {
                let bits = overlay.ix_from[tidx];
                if bits.contains(TraceBits::M_MATRIX) && j > 0 {
                    ix |= reach_m[idx(i, j - 1)];
                }
                if bits.contains(TraceBits::IX_MATRIX) && j > 0 {
                    ix |= reach_ix[idx(i, j - 1)];
                }
            } else if let Some(overlay) = &trace.wsb {
                for &k in overlay.lengths(tidx, GapListKind::MIx) {
                    let k = k as usize;
                    if k <= j {
                        ix |= reach_m[idx(i, j - k)];
                    }
                }
                for &k in overlay.lengths(tidx, GapListKind::IyIx) {
                    let k = k as usize;
                    if k <= j {
                        ix |= reach_iy[idx(i, j - k)];
                    }
                }
            }
            reach_ix[idx(i, j)] = ix;

            let bits = trace.get(i, j);
            let is_start = (i == 0 && j == 0) || bits.contains(TraceBits::STARTPOINT);
            let mut m = is_start;
            if bits.contains(TraceBits::DIAGONAL) && i > 0 && j > 0 {
                m |= reach_m[idx(i - 1, j - 1)];
            }
            if bits.contains(TraceBits::HORIZONTAL) {
                m |= ix;
            }
            if bits.contains(TraceBits::VERTICAL) {
                m |= iy;
            }
            reach_m[idx(i, j)] = m;
        }
    }

    for i in 0..rows {
        for j in 0..cols {
            let tidx = trace.idx(i, j);
            if let Some(overlay) = trace.gotoh.as_mut() {
                let mut ix_bits = overlay.ix_from[tidx];
                if ix_bits.contains(TraceBits::M_MATRIX) && (j == 0 || !reach_m[idx(i, j - 1)]) {
                    ix_bits.remove(TraceBits::M_MATRIX);
                }
                if ix_bits.contains(TraceBits::IX_MATRIX) && (j == 0 || !reach_ix[idx(i, j - 1)]) {
                    ix_bits.remove(TraceBits::IX_MATRIX);
                }
                overlay.ix_from[tidx] = ix_bits;

                let mut iy_bits = overlay.iy_from[tidx];
                if iy_bits.contains(TraceBits::M_MATRIX) && (i == 0 || !reach_m[idx(i - 1, j)]) {
                    iy_bits.remove(TraceBits::M_MATRIX);
                }
                if iy_bits.contains(TraceBits::IY_MATRIX) && (i == 0 || !reach_iy[idx(i - 1, j)]) {
                    iy_bits.remove(TraceBits::IY_MATRIX);
                }
                overlay.iy_from[tidx] = iy_bits;
            } else if let Some(overlay) = trace.wsb.as_mut() {
                overlay.retain(tidx, GapListKind::MIx, |k| {
                    let k = k as usize;
                    k <= j && reach_m[idx(i, j - k)]
                });
                overlay.retain(tidx, GapListKind::IyIx, |k| {
                    let k = k as usize;
                    k <= j && reach_iy[idx(i, j - k)]
                });
                overlay.retain(tidx, GapListKind::MIy, |k| {
                    let k = k as usize;
                    k <= i && reach_m[idx(i - k, j)]
                });
                overlay.retain(tidx, GapListKind::IxIy, |k| {
                    let k = k as usize;
                    k <= i && reach_ix[idx(i - k, j)]
                });
            }

            let mut bits = trace.get(i, j);
            if bits.contains(TraceBits::DIAGONAL) && (i == 0 || j == 0 || !reach_m[idx(i - 1, j - 1)]) {
                bits.remove(TraceBits::DIAGONAL);
            }
            if bits.contains(TraceBits::HORIZONTAL) && !reach_ix[idx(i, j)] {
                bits.remove(TraceBits::HORIZONTAL);
            }
            if bits.contains(TraceBits::VERTICAL) && !reach_iy[idx(i, j)] {
                bits.remove(TraceBits::VERTICAL);
            }
            trace.set(i, j, bits);
        }
    }
}
