//! Property-based tests over random short sequences: invariants that must
//! hold regardless of the specific bases chosen.

use align_core::{Aligner, GapContext, GapKind, GapPenalties, ScoreModel, Strand};
use proptest::prelude::*;

fn dna_strategy(max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')], 0..=max_len)
        .prop_map(|bytes| bytes.into_iter().map(|b| b as usize).collect())
}

proptest! {
    /// Aligning a sequence against itself under linear gaps scores exactly
    /// `len * match_score` — every base lines up on the diagonal, and no
    /// cheaper path exists.
    #[test]
    fn identical_sequence_scores_length_times_match(seq in dna_strategy(40)) {
        let mut model = ScoreModel::simple(1.0, -1.0, 3.0, 3.0);
        let (score, _) = Aligner::score(&seq, &seq, &mut model, Strand::Plus).unwrap();
        prop_assert_eq!(score, seq.len() as f64);
    }

    /// NW-SW and Gotoh must agree whenever open == extend, since Gotoh's
    /// affine recurrence degenerates to the linear one in that case.
    #[test]
    fn gotoh_matches_nw_sw_when_gaps_are_linear(a in dna_strategy(20), b in dna_strategy(20)) {
        let mut linear_model = ScoreModel::simple(2.0, -1.0, 2.0, 2.0);
        let (nw_score, _) = Aligner::score(&a, &b, &mut linear_model, Strand::Plus).unwrap();

        let mut affine_model = ScoreModel::simple(2.0, -1.0, 0.0, 0.0);
        affine_model.set_gaps(GapPenalties::affine_symmetric(2.0, 2.0, 2.0, 2.0));
        let (gotoh_score, _) = Aligner::score(&a, &b, &mut affine_model, Strand::Plus).unwrap();

        prop_assert!((nw_score - gotoh_score).abs() < 1e-6);
    }

    /// `PathEnumerator::len` must always agree with a manual count of
    /// however many times `next` yields `Some` before returning `None`.
    #[test]
    fn path_count_matches_manual_enumeration(a in dna_strategy(6), b in dna_strategy(6)) {
        prop_assume!(!a.is_empty() || !b.is_empty());
        let mut model = ScoreModel::simple(1.0, -1.0, 1.0, 1.0);
        let mut result = Aligner::align(&a, &b, &mut model, Strand::Plus).unwrap();
        let mut paths = result.paths();
        let reported = paths.len().unwrap();
        let mut counted = 0usize;
        while paths.next().unwrap().is_some() {
            counted += 1;
        }
        match reported {
            align_core::PathCount::Exact(n) => prop_assert_eq!(n, counted),
            align_core::PathCount::Overflowed => {}
        }
    }

    /// Every path an enumerator yields must consume exactly the cells
    /// needed to walk from the end of both sequences back to the start:
    /// the number of non-gap entries on each side equals that side's
    /// length.
    #[test]
    fn enumerated_path_consumes_every_input_symbol(a in dna_strategy(10), b in dna_strategy(10)) {
        prop_assume!(!a.is_empty() && !b.is_empty());
        let mut model = ScoreModel::simple(1.0, -1.0, 2.0, 1.0);
        let mut result = Aligner::align(&a, &b, &mut model, Strand::Plus).unwrap();
        let mut paths = result.paths();
        if let Some(path) = paths.next().unwrap() {
            let a_consumed = path.iter().filter(|(x, _)| x.is_some()).count();
            let b_consumed = path.iter().filter(|(_, y)| y.is_some()).count();
            prop_assert_eq!(a_consumed, a.len());
            prop_assert_eq!(b_consumed, b.len());
        }
    }

    /// Every column an enumerator yields must advance A or B (or both) by
    /// exactly one cell — a path never contains a step that consumes
    /// neither side.
    #[test]
    fn enumerated_path_steps_are_monotone(a in dna_strategy(10), b in dna_strategy(10)) {
        prop_assume!(!a.is_empty() && !b.is_empty());
        let mut model = ScoreModel::simple(1.0, -1.0, 2.0, 1.0);
        let mut result = Aligner::align(&a, &b, &mut model, Strand::Plus).unwrap();
        let mut paths = result.paths();
        if let Some(path) = paths.next().unwrap() {
            for (x, y) in &path {
                prop_assert!(x.is_some() || y.is_some());
            }
        }
    }

    /// Rescoring a yielded path symbol-by-symbol (pair scores minus the
    /// per-step gap cost at each step's own left/internal/right context)
    /// must reproduce the score NW-SW reported, within `epsilon`.
    #[test]
    fn rescoring_a_path_matches_the_reported_score(a in dna_strategy(12), b in dna_strategy(12)) {
        prop_assume!(!a.is_empty() || !b.is_empty());
        let mut model = ScoreModel::simple(2.0, -1.0, 3.0, 3.0);
        let mut result = Aligner::align(&a, &b, &mut model, Strand::Plus).unwrap();
        let reported_score = result.score;
        let mut paths = result.paths();
        if let Some(path) = paths.next().unwrap() {
            let (mut i, mut j) = (0usize, 0usize);
            let mut rescored = 0.0f64;
            for (x, y) in &path {
                match (x, y) {
                    (Some(_), Some(_)) => {
                        rescored += model.pair_score(a[i], b[j]).unwrap();
                        i += 1;
                        j += 1;
                    }
                    (Some(_), None) => {
                        i += 1;
                        let ctx = GapContext::at(i, j, a.len(), b.len());
                        rescored -= model.gaps().extend(ctx, GapKind::Insertion);
                    }
                    (None, Some(_)) => {
                        j += 1;
                        let ctx = GapContext::at(i, j, a.len(), b.len());
                        rescored -= model.gaps().extend(ctx, GapKind::Deletion);
                    }
                    (None, None) => unreachable!("enumerator never yields a null step"),
                }
            }
            prop_assert!((rescored - reported_score).abs() < 1e-6);
        }
    }
}
