use align_core::{Aligner, GapPenalties, Mode, ScoreModel, Strand};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn dna_sequence(length: usize) -> Vec<usize> {
    let bases = b"ATGC";
    (0..length).map(|i| bases[i % 4] as usize).collect()
}

fn with_mutations(base: &[usize], mutation_rate: f64) -> Vec<usize> {
    base.iter()
        .map(|&b| {
            if rand::random::<f64>() < mutation_rate {
                match b as u8 {
                    b'A' => b'T' as usize,
                    b'T' => b'G' as usize,
                    b'G' => b'C' as usize,
                    b'C' => b'A' as usize,
                    _ => b,
                }
            } else {
                b
            }
        })
        .collect()
}

fn bench_nw_sw(c: &mut Criterion) {
    let mut group = c.benchmark_group("nw_sw");
    for length in &[50, 100, 500, 1000] {
        let a = dna_sequence(*length);
        let b_seq = with_mutations(&a, 0.05);
        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(BenchmarkId::new("global", length), &(a.clone(), b_seq.clone()), |bencher, (a, b)| {
            bencher.iter(|| {
                let mut model = ScoreModel::simple(1.0, -1.0, 2.0, 2.0);
                Aligner::score(black_box(a), black_box(b), &mut model, Strand::Plus).unwrap()
            });
        });
    }
    group.finish();
}

fn bench_gotoh(c: &mut Criterion) {
    let mut group = c.benchmark_group("gotoh");
    for length in &[50, 100, 500] {
        let a = dna_sequence(*length);
        let mut b_seq = a.clone();
        b_seq.retain(|_| rand::random::<f64>() > 0.1);
        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(BenchmarkId::new("affine", length), &(a.clone(), b_seq.clone()), |bencher, (a, b)| {
            bencher.iter(|| {
                let mut model = ScoreModel::simple(1.0, -1.0, 0.0, 0.0);
                model.set_gaps(GapPenalties::affine_symmetric(6.0, 1.0, 6.0, 1.0));
                Aligner::score(black_box(a), black_box(b), &mut model, Strand::Plus).unwrap()
            });
        });
    }
    group.finish();
}

fn bench_wsb(c: &mut Criterion) {
    let mut group = c.benchmark_group("wsb");
    for length in &[20, 50, 100] {
        let a = dna_sequence(*length);
        let mut b_seq = a.clone();
        b_seq.retain(|_| rand::random::<f64>() > 0.1);
        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(BenchmarkId::new("general_gap", length), &(a.clone(), b_seq.clone()), |bencher, (a, b)| {
            bencher.iter(|| {
                let mut model = ScoreModel::simple(1.0, -1.0, 0.0, 0.0);
                let ins: align_core::GapCostFn = std::sync::Arc::new(|_pos, k| (k as f64).sqrt() * 3.0);
                let del: align_core::GapCostFn = std::sync::Arc::new(|_pos, k| (k as f64).sqrt() * 3.0);
                model.set_gap_functions(ins, del);
                Aligner::score(black_box(a), black_box(b), &mut model, Strand::Plus).unwrap()
            });
        });
    }
    group.finish();
}

fn bench_fogsaa(c: &mut Criterion) {
    let mut group = c.benchmark_group("fogsaa");
    for length in &[50, 100, 500, 1000] {
        let a = dna_sequence(*length);
        let b_seq = with_mutations(&a, 0.05);
        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(BenchmarkId::new("best_first", length), &(a.clone(), b_seq.clone()), |bencher, (a, b)| {
            bencher.iter(|| {
                let mut model = ScoreModel::simple(2.0, -1.0, 2.0, 2.0);
                model.set_mode(Mode::Fogsaa);
                Aligner::score(black_box(a), black_box(b), &mut model, Strand::Plus).unwrap()
            });
        });
    }
    group.finish();
}

fn bench_local_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_alignment");
    for length in &[50, 100, 500] {
        let core = dna_sequence(*length / 2);
        let mut a = dna_sequence(*length / 4);
        a.extend(&core);
        a.extend(dna_sequence(*length / 4));
        let mut b_seq = dna_sequence(*length / 3);
        b_seq.extend(&core);
        b_seq.extend(dna_sequence(*length / 3));
        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(BenchmarkId::new("smith_waterman", length), &(a.clone(), b_seq.clone()), |bencher, (a, b)| {
            bencher.iter(|| {
                let mut model = ScoreModel::simple(2.0, -1.0, 2.0, 2.0);
                model.set_mode(Mode::Local);
                Aligner::score(black_box(a), black_box(b), &mut model, Strand::Plus).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_nw_sw, bench_gotoh, bench_wsb, bench_fogsaa, bench_local_alignment);
criterion_main!(benches);
