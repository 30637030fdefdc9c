//! ScoreModel: match/mismatch or substitution-matrix scoring, twelve gap
//! penalties or a pair of variable-length gap callbacks, and algorithm
//! selection.

use align_common::{AlignError, AlignResult};
use std::sync::Arc;

/// Alignment mode, independent of which DP algorithm ends up running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Global,
    Local,
    Fogsaa,
}

impl Mode {
    pub fn from_str_name(s: &str) -> AlignResult<Mode> {
        match s {
            "global" => Ok(Mode::Global),
            "local" => Ok(Mode::Local),
            "fogsaa" => Ok(Mode::Fogsaa),
            other => Err(AlignError::Validation(format!("unknown mode: {other}"))),
        }
    }
}

/// Which DP engine a `ScoreModel` resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    NwSw,
    Gotoh,
    Wsb,
    Fogsaa,
}

/// `+` or `-` as validated at the façade boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
}

impl TryFrom<char> for Strand {
    type Error = AlignError;

    fn try_from(c: char) -> AlignResult<Strand> {
        match c {
            '+' => Ok(Strand::Plus),
            '-' | '\u{2212}' => Ok(Strand::Minus),
            other => Err(AlignError::Validation(format!(
                "invalid strand '{other}', expected '+' or '-'"
            ))),
        }
    }
}

/// Which side of a gap run a cell sits on: `left` when `i==0 || j==0`,
/// `right` when `i==nA || j==nB`, else `internal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapContext {
    Left,
    Internal,
    Right,
}

impl GapContext {
    pub fn at(i: usize, j: usize, n_a: usize, n_b: usize) -> GapContext {
        if i == 0 || j == 0 {
            GapContext::Left
        } else if i == n_a || j == n_b {
            GapContext::Right
        } else {
            GapContext::Internal
        }
    }
}

/// Which affine layer a gap step belongs to. `Insertion` extends Iy
/// (consumes A only, a gap in B); `Deletion` extends Ix (consumes B only, a
/// gap in A).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapKind {
    Insertion,
    Deletion,
}

/// The twelve open/extend gap penalties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapPenalties {
    pub open_left_insertion: f64,
    pub open_internal_insertion: f64,
    pub open_right_insertion: f64,
    pub open_left_deletion: f64,
    pub open_internal_deletion: f64,
    pub open_right_deletion: f64,
    pub extend_left_insertion: f64,
    pub extend_internal_insertion: f64,
    pub extend_right_insertion: f64,
    pub extend_left_deletion: f64,
    pub extend_internal_deletion: f64,
    pub extend_right_deletion: f64,
}

impl GapPenalties {
    /// A single open/extend rate applied uniformly to every side and kind.
    pub fn uniform(open: f64, extend: f64) -> Self {
        Self {
            open_left_insertion: open,
            open_internal_insertion: open,
            open_right_insertion: open,
            open_left_deletion: open,
            open_internal_deletion: open,
            open_right_deletion: open,
            extend_left_insertion: extend,
            extend_internal_insertion: extend,
            extend_right_insertion: extend,
            extend_left_deletion: extend,
            extend_internal_deletion: extend,
            extend_right_deletion: extend,
        }
    }

    /// Linear gaps: `open == extend` for every side/kind.
    pub fn linear(cost: f64) -> Self {
        Self::uniform(cost, cost)
    }

    /// Symmetric affine gaps with independent insertion/deletion rates but a
    /// single rate across left/internal/right.
    pub fn affine_symmetric(open_ins: f64, extend_ins: f64, open_del: f64, extend_del: f64) -> Self {
        Self {
            open_left_insertion: open_ins,
            open_internal_insertion: open_ins,
            open_right_insertion: open_ins,
            open_left_deletion: open_del,
            open_internal_deletion: open_del,
            open_right_deletion: open_del,
            extend_left_insertion: extend_ins,
            extend_internal_insertion: extend_ins,
            extend_right_insertion: extend_ins,
            extend_left_deletion: extend_del,
            extend_internal_deletion: extend_del,
            extend_right_deletion: extend_del,
        }
    }

    pub fn open(&self, context: GapContext, kind: GapKind) -> f64 {
        use GapContext::*;
        use GapKind::*;
        match (context, kind) {
            (Left, Insertion) => self.open_left_insertion,
            (Internal, Insertion) => self.open_internal_insertion,
            (Right, Insertion) => self.open_right_insertion,
            (Left, Deletion) => self.open_left_deletion,
            (Internal, Deletion) => self.open_internal_deletion,
            (Right, Deletion) => self.open_right_deletion,
        }
    }

    pub fn extend(&self, context: GapContext, kind: GapKind) -> f64 {
        use GapContext::*;
        use GapKind::*;
        match (context, kind) {
            (Left, Insertion) => self.extend_left_insertion,
            (Internal, Insertion) => self.extend_internal_insertion,
            (Right, Insertion) => self.extend_right_insertion,
            (Left, Deletion) => self.extend_left_deletion,
            (Internal, Deletion) => self.extend_internal_deletion,
            (Right, Deletion) => self.extend_right_deletion,
        }
    }

    /// Linear-gap cost of a run of length `k` in the given context/kind.
    pub fn run_cost(&self, context: GapContext, kind: GapKind, k: u32) -> f64 {
        debug_assert!(k >= 1);
        self.open(context, kind) + self.extend(context, kind) * (k as f64 - 1.0)
    }

    /// True when every open/extend pair is equal within `epsilon` — the
    /// condition under which the linear-gap NW-SW engine suffices.
    pub fn is_uniform(&self, epsilon: f64) -> bool {
        let pairs = [
            (self.open_left_insertion, self.extend_left_insertion),
            (self.open_internal_insertion, self.extend_internal_insertion),
            (self.open_right_insertion, self.extend_right_insertion),
            (self.open_left_deletion, self.extend_left_deletion),
            (self.open_internal_deletion, self.extend_internal_deletion),
            (self.open_right_deletion, self.extend_right_deletion),
        ];
        pairs.iter().all(|&(open, extend)| (open - extend).abs() <= epsilon)
    }
}

impl Default for GapPenalties {
    fn default() -> Self {
        Self::uniform(10.0, 1.0)
    }
}

/// A contiguous row-major `size x size` view over a substitution matrix, with
/// an optional injective `mapping: user symbol -> matrix index` resolved
/// once before the DP fill.
#[derive(Debug, Clone)]
pub struct SubstitutionMatrix {
    values: Vec<f64>,
    size: usize,
    mapping: Option<Vec<usize>>,
}

impl SubstitutionMatrix {
    pub fn new(values: Vec<f64>, size: usize) -> AlignResult<Self> {
        if size == 0 || values.len() != size * size {
            return Err(AlignError::Validation(format!(
                "substitution matrix must be square: got {} values for size {size}",
                values.len()
            )));
        }
        Ok(Self { values, size, mapping: None })
    }

    pub fn with_mapping(mut self, mapping: Vec<usize>) -> AlignResult<Self> {
        if mapping.iter().any(|&m| m >= self.size) {
            return Err(AlignError::Validation(
                "substitution matrix mapping targets an out-of-range index".into(),
            ));
        }
        self.mapping = Some(mapping);
        Ok(self)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn resolve(&self, symbol: usize) -> AlignResult<usize> {
        match &self.mapping {
            Some(map) => map.get(symbol).copied().ok_or_else(|| {
                AlignError::Domain(format!("symbol {symbol} has no entry in mapping"))
            }),
            None => {
                if symbol >= self.size {
                    Err(AlignError::Domain(format!(
                        "symbol {symbol} out of range for matrix of size {}",
                        self.size
                    )))
                } else {
                    Ok(symbol)
                }
            }
        }
    }

    pub fn score(&self, a: usize, b: usize) -> AlignResult<f64> {
        let i = self.resolve(a)?;
        let j = self.resolve(b)?;
        Ok(self.values[i * self.size + j])
    }

    /// The largest entry anywhere in the matrix, for callers that need an
    /// admissible per-step upper bound without knowing which pair of
    /// symbols they'll see next.
    pub fn max_score(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// `(position_after, gap_length) -> score` capability for WSB's general gap
/// model — a plain callback rather than a trait object hierarchy, so a
/// caller can hand in any cost curve without implementing a trait.
pub type GapCostFn = Arc<dyn Fn(usize, u32) -> f64 + Send + Sync>;

#[derive(Clone)]
pub enum Scoring {
    MatchMismatch { match_score: f64, mismatch_score: f64 },
    Matrix(SubstitutionMatrix),
}

impl std::fmt::Debug for Scoring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scoring::MatchMismatch { match_score, mismatch_score } => f
                .debug_struct("MatchMismatch")
                .field("match", match_score)
                .field("mismatch", mismatch_score)
                .finish(),
            Scoring::Matrix(m) => f.debug_struct("Matrix").field("size", &m.size()).finish(),
        }
    }
}

/// The full scoring configuration for one alignment.
#[derive(Clone)]
pub struct ScoreModel {
    scoring: Scoring,
    wildcard: Option<usize>,
    gaps: GapPenalties,
    gap_fns: Option<(GapCostFn, GapCostFn)>,
    epsilon: f64,
    mode: Mode,
    cached_algorithm: Option<Algorithm>,
}

impl std::fmt::Debug for ScoreModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreModel")
            .field("scoring", &self.scoring)
            .field("wildcard", &self.wildcard)
            .field("gaps", &self.gaps)
            .field("has_gap_fns", &self.gap_fns.is_some())
            .field("epsilon", &self.epsilon)
            .field("mode", &self.mode)
            .finish()
    }
}

impl ScoreModel {
    /// A match/mismatch model with linear gaps, the common starting point.
    pub fn simple(match_score: f64, mismatch_score: f64, gap_open: f64, gap_extend: f64) -> Self {
        Self {
            scoring: Scoring::MatchMismatch { match_score, mismatch_score },
            wildcard: None,
            gaps: GapPenalties::uniform(gap_open, gap_extend),
            gap_fns: None,
            epsilon: 1e-6,
            mode: Mode::Global,
            cached_algorithm: None,
        }
    }

    /// A substitution-matrix model, optionally with a wildcard symbol.
    pub fn with_matrix(matrix: SubstitutionMatrix, gaps: GapPenalties) -> Self {
        Self {
            scoring: Scoring::Matrix(matrix),
            wildcard: None,
            gaps,
            gap_fns: None,
            epsilon: 1e-6,
            mode: Mode::Global,
            cached_algorithm: None,
        }
    }

    pub fn set_wildcard(&mut self, wildcard: Option<usize>) -> &mut Self {
        self.wildcard = wildcard;
        self.cached_algorithm = None;
        self
    }

    pub fn set_gaps(&mut self, gaps: GapPenalties) -> &mut Self {
        self.gaps = gaps;
        self.gap_fns = None;
        self.cached_algorithm = None;
        self
    }

    pub fn set_gap_functions(&mut self, insertion: GapCostFn, deletion: GapCostFn) -> &mut Self {
        self.gap_fns = Some((insertion, deletion));
        self.cached_algorithm = None;
        self
    }

    pub fn set_epsilon(&mut self, epsilon: f64) -> &mut Self {
        self.epsilon = epsilon;
        self
    }

    pub fn set_mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self.cached_algorithm = None;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn gaps(&self) -> &GapPenalties {
        &self.gaps
    }

    pub fn wildcard(&self) -> Option<usize> {
        self.wildcard
    }

    pub fn gap_functions(&self) -> Option<&(GapCostFn, GapCostFn)> {
        self.gap_fns.as_ref()
    }

    pub fn scoring(&self) -> &Scoring {
        &self.scoring
    }

    /// Pair score `s(A[i-1], B[j-1])`, honoring the wildcard symbol if set.
    pub fn pair_score(&self, a: usize, b: usize) -> AlignResult<f64> {
        if let Some(w) = self.wildcard {
            if a == w || b == w {
                return Ok(0.0);
            }
        }
        match &self.scoring {
            Scoring::MatchMismatch { match_score, mismatch_score } => {
                Ok(if a == b { *match_score } else { *mismatch_score })
            }
            Scoring::Matrix(m) => m.score(a, b),
        }
    }

    /// Resolve and cache the algorithm, most-specific mode first: explicit
    /// FOGSAA mode, then general gap callbacks, then uniform linear gaps,
    /// falling back to affine.
    pub fn select_algorithm(&mut self) -> Algorithm {
        if let Some(alg) = self.cached_algorithm {
            return alg;
        }
        let alg = if self.mode == Mode::Fogsaa {
            Algorithm::Fogsaa
        } else if self.gap_fns.is_some() {
            Algorithm::Wsb
        } else if self.gaps.is_uniform(self.epsilon) {
            Algorithm::NwSw
        } else {
            Algorithm::Gotoh
        };
        self.cached_algorithm = Some(alg);
        alg
    }
}

/// `|a - b| <= epsilon`: the tie policy used by every engine and enumerator.
#[inline]
pub fn ties_within(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Round every value in a substitution matrix to the nearest multiple of
/// `epsilon`, collapsing near-tied scores before the DP fill so downstream
/// tie detection is a plain float comparison.
pub fn rescale_to_epsilon(values: &mut [f64], epsilon: f64) {
    if epsilon <= 0.0 {
        return;
    }
    for v in values.iter_mut() {
        *v = (*v / epsilon).round() * epsilon;
    }
}
