//! Co-optimal path enumeration for the three-layer (M/Ix/Iy) trace matrices
//! Gotoh and WSB produce, with a fixed M > Ix > Iy source priority. Gotoh's
//! single-step nibble overlay and WSB's variable-length gap-length lists
//! both speak through the same `Candidate` shape so one DFS drives both.

use super::{AlignedColumn, PathCount, PathEnumerator};
use crate::score_model::Strand;
use crate::trace::{GapListKind, PathField, TraceBits, TraceMatrix};
use align_common::AlignResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    M,
    Ix,
    Iy,
}

struct Candidate {
    layer: Layer,
    i: usize,
    j: usize,
    cols: Vec<AlignedColumn>,
}

struct Frame {
    layer: Layer,
    i: usize,
    j: usize,
    candidates: Vec<Candidate>,
    cursor: usize,
    /// Columns this frame's incoming move contributed, so backtracking pops
    /// exactly that many from `path`.
    contributed: usize,
}

pub struct AffineEnumerator<'a> {
    trace: &'a mut TraceMatrix,
    n_a: usize,
    n_b: usize,
    local: bool,
    strand: Strand,
    endpoints: Vec<(usize, usize)>,
    endpoint_cursor: usize,
    stack: Vec<Frame>,
    path: Vec<AlignedColumn>,
    trivial_pending: bool,
    exhausted: bool,
}

impl<'a> AffineEnumerator<'a> {
    pub fn new(trace: &'a mut TraceMatrix, n_a: usize, n_b: usize, local: bool, strand: Strand) -> Self {
        let endpoints = if local {
            let mut v = Vec::new();
            for i in 0..=n_a {
                for j in 0..=n_b {
                    if trace.get(i, j).contains(TraceBits::ENDPOINT) {
                        v.push((i, j));
                    }
                }
            }
            v
        } else {
            vec![(n_a, n_b)]
        };
        let mut this = Self {
            trace,
            n_a,
            n_b,
            local,
            strand,
            endpoints,
            endpoint_cursor: 0,
            stack: Vec::new(),
            path: Vec::new(),
            trivial_pending: false,
            exhausted: false,
        };
        this.prime_next_endpoint();
        this
    }

    /// The 0-based B-sequence index for a move consuming DP column `j`. On
    /// `'-'`, coordinates are reported from the other end (`nB - j`) instead
    /// of `j - 1`, reflecting the mirrored gap-cost frame the engine ran in.
    fn b_index(&self, j: usize) -> usize {
        match self.strand {
            Strand::Plus => j - 1,
            Strand::Minus => self.n_b - j,
        }
    }

    fn is_m_start(&self, i: usize, j: usize) -> bool {
        if i == 0 && j == 0 {
            return true;
        }
        self.local && self.trace.get(i, j).contains(TraceBits::STARTPOINT)
    }

    fn candidates(&self, layer: Layer, i: usize, j: usize) -> Vec<Candidate> {
        let mut out = Vec::new();
        match layer {
            Layer::M => {
                let bits = self.trace.get(i, j);
                if bits.contains(TraceBits::DIAGONAL) && i > 0 && j > 0 {
                    out.push(Candidate { layer: Layer::M, i: i - 1, j: j - 1, cols: vec![(Some(i - 1), Some(self.b_index(j)))] });
                }
                if bits.contains(TraceBits::HORIZONTAL) {
                    out.push(Candidate { layer: Layer::Ix, i, j, cols: Vec::new() });
                }
                if bits.contains(TraceBits::VERTICAL) {
                    out.push(Candidate { layer: Layer::Iy, i, j, cols: Vec::new() });
                }
            }
            Layer::Ix => {
                let idx = self.trace.idx(i, j);
                if let Some(overlay) = &self.trace.gotoh {
                    let bits = overlay.ix_from[idx];
                    if bits.contains(TraceBits::M_MATRIX) && j > 0 {
                        out.push(Candidate { layer: Layer::M, i, j: j - 1, cols: vec![(None, Some(self.b_index(j)))] });
                    }
                    if bits.contains(TraceBits::IX_MATRIX) && j > 0 {
                        out.push(Candidate { layer: Layer::Ix, i, j: j - 1, cols: vec![(None, Some(self.b_index(j)))] });
                    }
                } else if let Some(overlay) = &self.trace.wsb {
                    for &k in overlay.lengths(idx, GapListKind::MIx) {
                        let k = k as usize;
                        let cols = (0..k).map(|off| (None, Some(self.b_index(j - off)))).collect();
                        out.push(Candidate { layer: Layer::M, i, j: j - k, cols });
                    }
                    for &k in overlay.lengths(idx, GapListKind::IyIx) {
                        let k = k as usize;
                        let cols = (0..k).map(|off| (None, Some(self.b_index(j - off)))).collect();
                        out.push(Candidate { layer: Layer::Iy, i, j: j - k, cols });
                    }
                }
            }
            Layer::Iy => {
                let idx = self.trace.idx(i, j);
                if let Some(overlay) = &self.trace.gotoh {
                    let bits = overlay.iy_from[idx];
                    if bits.contains(TraceBits::M_MATRIX) && i > 0 {
                        out.push(Candidate { layer: Layer::M, i: i - 1, j, cols: vec![(Some(i - 1), None)] });
                    }
                    if bits.contains(TraceBits::IY_MATRIX) && i > 0 {
                        out.push(Candidate { layer: Layer::Iy, i: i - 1, j, cols: vec![(Some(i - 1), None)] });
                    }
                } else if let Some(overlay) = &self.trace.wsb {
                    for &k in overlay.lengths(idx, GapListKind::MIy) {
                        let k = k as usize;
                        let cols = (0..k).map(|off| (Some(i - 1 - off), None)).collect();
                        out.push(Candidate { layer: Layer::M, i: i - k, j, cols });
                    }
                    for &k in overlay.lengths(idx, GapListKind::IxIy) {
                        let k = k as usize;
                        let cols = (0..k).map(|off| (Some(i - 1 - off), None)).collect();
                        out.push(Candidate { layer: Layer::Ix, i: i - k, j, cols });
                    }
                }
            }
        }
        out
    }

    /// Forward-DP path count per layer, mirroring the M/Ix/Iy recurrence the
    /// fill itself used instead of walking the DFS. `count[layer][i][j]` is
    /// the number of co-optimal paths from some start cell up to `(i, j)` in
    /// that layer; `M` at a cell also counts the cell being a start in its
    /// own right, since the DFS treats `is_m_start` as a valid leaf even when
    /// it has outgoing candidates too (the zero-length local alignment case).
    fn layer_counts(&self) -> ([Vec<usize>; 3], bool) {
        let rows = self.n_a + 1;
        let cols = self.n_b + 1;
        let idx = |i: usize, j: usize| i * cols + j;
        let mut count_m = vec![0usize; rows * cols];
        let mut count_ix = vec![0usize; rows * cols];
        let mut count_iy = vec![0usize; rows * cols];
        let mut overflow = false;
        let mut add = |total: &mut usize, term: usize| {
            let (sum, of) = total.overflowing_add(term);
            *total = sum;
            overflow |= of;
        };

        for i in 0..rows {
            for j in 0..cols {
                let tidx = self.trace.idx(i, j);

                let mut iy = 0usize;
                if let Some(overlay) = &self.trace.gotoh {
                    let bits = overlay.iy_from[tidx];
                    if bits.contains(TraceBits::M_MATRIX) && i > 0 {
                        add(&mut iy, count_m[idx(i - 1, j)]);
                    }
                    if bits.contains(TraceBits::IY_MATRIX) && i > 0 {
                        add(&mut iy, count_iy[idx(i - 1, j)]);
                    }
                } else if let Some(overlay) = &self.trace.wsb {
                    for &k in overlay.lengths(tidx, GapListKind::MIy) {
                        let k = k as usize;
                        if k <= i {
                            add(&mut iy, count_m[idx(i - k, j)]);
                        }
                    }
                    for &k in overlay.lengths(tidx, GapListKind::IxIy) {
                        let k = k as usize;
                        if k <= i {
                            add(&mut iy, count_ix[idx(i - k, j)]);
                        }
                    }
                }
                count_iy[idx(i, j)] = iy;

                let mut ix = 0usize;
                if let Some(overlay) = &self.trace.gotoh {
                    let bits = overlay.ix_from[tidx];
                    if bits.contains(TraceBits::M_MATRIX) && j > 0 {
                        add(&mut ix, count_m[idx(i, j - 1)]);
                    }
                    if bits.contains(TraceBits::IX_MATRIX) && j > 0 {
                        add(&mut ix, count_ix[idx(i, j - 1)]);
                    }
                } else if let Some(overlay) = &self.trace.wsb {
                    for &k in overlay.lengths(tidx, GapListKind::MIx) {
                        let k = k as usize;
                        if k <= j {
                            add(&mut ix, count_m[idx(i, j - k)]);
                        }
                    }
                    for &k in overlay.lengths(tidx, GapListKind::IyIx) {
                        let k = k as usize;
                        if k <= j {
                            add(&mut ix, count_iy[idx(i, j - k)]);
                        }
                    }
                }
                count_ix[idx(i, j)] = ix;

                let mut m = if self.is_m_start(i, j) { 1 } else { 0 };
                let bits = self.trace.get(i, j);
                if bits.contains(TraceBits::DIAGONAL) && i > 0 && j > 0 {
                    add(&mut m, count_m[idx(i - 1, j - 1)]);
                }
                if bits.contains(TraceBits::HORIZONTAL) {
                    add(&mut m, ix);
                }
                if bits.contains(TraceBits::VERTICAL) {
                    add(&mut m, iy);
                }
                count_m[idx(i, j)] = m;
            }
        }

        ([count_m, count_ix, count_iy], overflow)
    }

    fn prime_next_endpoint(&mut self) {
        self.stack.clear();
        self.path.clear();
        self.trivial_pending = false;
        if self.endpoint_cursor >= self.endpoints.len() {
            self.exhausted = true;
            return;
        }
        let (i, j) = self.endpoints[self.endpoint_cursor];
        self.trivial_pending = self.is_m_start(i, j);
        let candidates = self.candidates(Layer::M, i, j);
        self.stack.push(Frame { layer: Layer::M, i, j, candidates, cursor: 0, contributed: 0 });
    }

    fn at_leaf(&self, frame: &Frame) -> bool {
        frame.layer == Layer::M && self.is_m_start(frame.i, frame.j)
    }

    fn advance(&mut self) -> bool {
        loop {
            let top_is_leaf = match self.stack.last() {
                Some(f) => self.at_leaf(f) && f.cursor == 0 && f.candidates.is_empty(),
                None => return false,
            };
            if top_is_leaf {
                // Already returned a path ending here; pop to try a sibling.
                let frame = self.stack.pop().unwrap();
                for _ in 0..frame.contributed {
                    self.path.pop();
                }
                if self.stack.is_empty() {
                    return false;
                }
                continue;
            }
            let frame = self.stack.last_mut().unwrap();
            if frame.cursor >= frame.candidates.len() {
                let frame = self.stack.pop().unwrap();
                for _ in 0..frame.contributed {
                    self.path.pop();
                }
                if self.stack.is_empty() {
                    return false;
                }
                continue;
            }
            let cand_idx = frame.cursor;
            frame.cursor += 1;
            let candidate_cols_len = frame.candidates[cand_idx].cols.len();
            let (layer, i, j) = (frame.candidates[cand_idx].layer, frame.candidates[cand_idx].i, frame.candidates[cand_idx].j);
            for col in frame.candidates[cand_idx].cols.clone() {
                self.path.push(col);
            }
            if self.at_leaf(&Frame { layer, i, j, candidates: Vec::new(), cursor: 0, contributed: 0 }) {
                self.stack.push(Frame {
                    layer,
                    i,
                    j,
                    candidates: Vec::new(),
                    cursor: 0,
                    contributed: candidate_cols_len,
                });
                return true;
            }
            let candidates = self.candidates(layer, i, j);
            self.stack.push(Frame { layer, i, j, candidates, cursor: 0, contributed: candidate_cols_len });
        }
    }
}

impl<'a> PathEnumerator for AffineEnumerator<'a> {
    fn len(&mut self) -> AlignResult<PathCount> {
        let ([count_m, _, _], overflow) = self.layer_counts();
        if overflow {
            return Ok(PathCount::Overflowed);
        }
        let cols = self.n_b + 1;
        let idx = |i: usize, j: usize| i * cols + j;
        if self.local {
            let mut total = 0usize;
            let mut of = false;
            for &(i, j) in &self.endpoints {
                let (sum, o) = total.overflowing_add(count_m[idx(i, j)]);
                total = sum;
                of |= o;
            }
            Ok(if of { PathCount::Overflowed } else { PathCount::Exact(total) })
        } else {
            Ok(PathCount::Exact(count_m[idx(self.n_a, self.n_b)]))
        }
    }

    fn next(&mut self) -> AlignResult<Option<Vec<AlignedColumn>>> {
        loop {
            if self.exhausted {
                self.trace.set_path(0, 0, PathField::Done);
                return Ok(None);
            }
            if self.trivial_pending {
                self.trivial_pending = false;
                return Ok(Some(Vec::new()));
            }
            if self.advance() {
                let mut cols = self.path.clone();
                cols.reverse();
                return Ok(Some(cols));
            }
            self.endpoint_cursor += 1;
            self.prime_next_endpoint();
        }
    }

    fn reset(&mut self) {
        self.endpoint_cursor = 0;
        self.prime_next_endpoint();
        self.exhausted = self.endpoints.is_empty();
    }
}
