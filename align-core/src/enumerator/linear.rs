//! Co-optimal path enumeration for the linear-gap NW-SW trace matrix, with
//! a fixed HORIZONTAL > VERTICAL > DIAGONAL tie-break order.

use super::{AlignedColumn, PathCount, PathEnumerator};
use crate::score_model::Strand;
use crate::trace::{PathField, TraceBits, TraceMatrix};
use align_common::AlignResult;

const ORDER: [TraceBits; 3] = [TraceBits::HORIZONTAL, TraceBits::VERTICAL, TraceBits::DIAGONAL];

struct Frame {
    i: usize,
    j: usize,
    remaining: TraceBits,
}

/// DFS-over-the-trace-bits enumerator. The stack is the suspended
/// traversal state: calling `next` again resumes it from the last leaf
/// instead of restarting, which is what makes this lazy rather than
/// "enumerate everything up front."
pub struct LinearEnumerator<'a> {
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

impl<'a> LinearEnumerator<'a> {
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

    fn is_start(&self, i: usize, j: usize) -> bool {
        if i == 0 && j == 0 {
            return true;
        }
        self.local && self.trace.get(i, j).contains(TraceBits::STARTPOINT)
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
        let bits = self.trace.get(i, j);
        self.trivial_pending = self.is_start(i, j);
        self.stack.push(Frame { i, j, remaining: bits });
    }

    /// Resume the DFS, returning `true` once it lands on a start cell (a
    /// complete path is now in `self.path`, root-to-leaf order reversed on
    /// the way out), or `false` once this endpoint's tree is exhausted.
    fn advance(&mut self) -> bool {
        loop {
            let (fi, fj, f_remaining_empty) = match self.stack.last() {
                Some(f) => (f.i, f.j, f.remaining.is_empty()),
                None => return false,
            };
            if self.is_start(fi, fj) && f_remaining_empty {
                self.stack.pop();
                self.path.pop();
                continue;
            }
            let frame = match self.stack.last_mut() {
                Some(f) => f,
                None => return false,
            };
            let mut chosen = None;
            for &dir in ORDER.iter() {
                if frame.remaining.contains(dir) {
                    frame.remaining.remove(dir);
                    chosen = Some(dir);
                    break;
                }
            }
            let (i, j) = (frame.i, frame.j);
            match chosen {
                None => {
                    self.stack.pop();
                    self.path.pop();
                    if self.stack.is_empty() {
                        return false;
                    }
                }
                Some(dir) => {
                    let (ni, nj, col) = match dir {
                        TraceBits::HORIZONTAL => (i, j - 1, (None, Some(self.b_index(j)))),
                        TraceBits::VERTICAL => (i - 1, j, (Some(i - 1), None)),
                        TraceBits::DIAGONAL => (i - 1, j - 1, (Some(i - 1), Some(self.b_index(j)))),
                        _ => unreachable!(),
                    };
                    self.path.push(col);
                    if self.is_start(ni, nj) {
                        self.stack.push(Frame { i: ni, j: nj, remaining: TraceBits::NONE });
                        return true;
                    }
                    let bits = self.trace.get(ni, nj);
                    self.stack.push(Frame { i: ni, j: nj, remaining: bits });
                }
            }
        }
    }

    fn count_table(&self) -> (Vec<usize>, bool) {
        let rows = self.n_a + 1;
        let cols = self.n_b + 1;
        let idx = |i: usize, j: usize| i * cols + j;
        let mut counts = vec![0usize; rows * cols];
        let mut overflow = false;
        for i in 0..rows {
            for j in 0..cols {
                let bits = self.trace.get(i, j);
                let mut total: usize = if self.is_start(i, j) { 1 } else { 0 };
                for (dir, di, dj) in [
                    (TraceBits::HORIZONTAL, 0usize, 1usize),
                    (TraceBits::VERTICAL, 1, 0),
                    (TraceBits::DIAGONAL, 1, 1),
                ] {
                    if bits.contains(dir) && i >= di && j >= dj {
                        let (sum, of) = total.overflowing_add(counts[idx(i - di, j - dj)]);
                        total = sum;
                        overflow |= of;
                    }
                }
                counts[idx(i, j)] = total;
            }
        }
        (counts, overflow)
    }
}

impl<'a> PathEnumerator for LinearEnumerator<'a> {
    fn len(&mut self) -> AlignResult<PathCount> {
        let (counts, overflow) = self.count_table();
        if overflow {
            return Ok(PathCount::Overflowed);
        }
        let cols = self.n_b + 1;
        let idx = |i: usize, j: usize| i * cols + j;
        if self.local {
            let mut total = 0usize;
            let mut of = false;
            for &(i, j) in &self.endpoints {
                let (sum, o) = total.overflowing_add(counts[idx(i, j)]);
                total = sum;
                of |= o;
            }
            Ok(if of { PathCount::Overflowed } else { PathCount::Exact(total) })
        } else {
            Ok(PathCount::Exact(counts[idx(self.n_a, self.n_b)]))
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
