//! Run with:
//! ```bash
//! cargo bench --bench search
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vsearch::{calc, numeric, search_constant, skeleton, SearchOptions};

/// Count valid skeletons of one length by walking the full candidate
/// space, the same scan the search driver performs per level.
fn count_valid(k: u32) -> u64 {
    let mut slots = vec![skeleton::Slot::Constant; k as usize];
    let mut count = 0;
    skeleton::decode(0, &mut slots);
    for index in 0..skeleton::total_candidates(k) {
        if skeleton::is_valid(&slots) {
            count += 1;
        }
        if index + 1 < skeleton::total_candidates(k) {
            skeleton::increment(&mut slots);
        }
    }
    count
}

fn bench_skeleton_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("skeleton_enumeration");
    for k in [8u32, 10] {
        group.bench_function(format!("K{k}"), |b| {
            b.iter(|| black_box(count_valid(black_box(k))));
        });
    }
    group.finish();
}

fn bench_constant_search(c: &mut Criterion) {
    // A target with no short closed form, so the search always runs the
    // whole length budget: worst-case throughput.
    let target = 0.007_297_352_569_3;
    let opts = SearchOptions::new().with_k_range(1, 4);

    c.bench_function("search_fine_structure_k4", |b| {
        b.iter(|| black_box(search_constant(black_box(target), 0.0, calc::calc4(), &opts)));
    });
}

fn bench_ulp_distance(c: &mut Criterion) {
    c.bench_function("ulp_distance", |b| {
        b.iter(|| {
            black_box(numeric::ulp_distance(
                black_box(std::f64::consts::PI),
                black_box(3.141_592_653_589_8),
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_skeleton_enumeration,
    bench_constant_search,
    bench_ulp_distance
);
criterion_main!(benches);
