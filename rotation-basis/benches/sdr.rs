use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use rotation_basis::basis::find_optimal_basis;
use rotation_basis::sdr::{decode, decode_masks, encode_bitwise, encode_iterative};

// The number of values encoded during one benchmark iteration.
const N_VALUES: usize = 1_000;

fn random_values() -> Vec<u64> {
    let mut rng = rand::thread_rng();
    (0..N_VALUES).map(|_| rng.gen()).collect()
}

fn naf_encoding(c: &mut Criterion) {
    let values = random_values();
    let mut group = c.benchmark_group("naf_encoding");
    group.bench_function("iterative", |b| {
        b.iter(|| {
            values.iter().for_each(|&x| {
                black_box(encode_iterative(black_box(x)));
            })
        })
    });
    group.bench_function("bitwise", |b| {
        b.iter(|| {
            values.iter().for_each(|&x| {
                black_box(encode_bitwise(black_box(x)));
            })
        })
    });
    group.finish();
}

fn naf_decoding(c: &mut Criterion) {
    let values = random_values();
    let digits: Vec<_> = values.iter().map(|&x| encode_iterative(x)).collect();
    let masks: Vec<_> = values.iter().map(|&x| encode_bitwise(x)).collect();
    let mut group = c.benchmark_group("naf_decoding");
    group.bench_function("digits", |b| {
        b.iter(|| {
            digits.iter().for_each(|d| {
                black_box(decode(black_box(d)));
            })
        })
    });
    group.bench_function("masks", |b| {
        b.iter(|| {
            masks.iter().for_each(|m| {
                black_box(decode_masks(black_box(m.negative), black_box(m.positive)));
            })
        })
    });
    group.finish();
}

fn basis_selection(c: &mut Criterion) {
    let rotations = [3, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
    c.bench_function("basis_selection_n16", |b| {
        b.iter(|| find_optimal_basis(black_box(&rotations), 16, 0.5, 10.0))
    });
}

criterion_group!(benches, naf_encoding, naf_decoding, basis_selection);
criterion_main!(benches);
