use chained_hashmap::{ChainedHashMap, Release, TableBuilder};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(n: usize, seed: u64) -> (ChainedHashMap<String, u64>, Vec<String>) {
    let mut m = ChainedHashMap::new();
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        m.insert(k.clone(), i as u64);
    }
    (m, keys)
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("chained::insert_fresh_100k", |b| {
        b.iter_batched(
            ChainedHashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    let _ = m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

// Pre-grown table: measures chain work without resizes.
fn bench_insert_presized_100k(c: &mut Criterion) {
    c.bench_function("chained::insert_presized_100k", |b| {
        b.iter_batched(
            || {
                TableBuilder::new()
                    .with_capacity(262_144)
                    .build::<String, u64>()
            },
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    let _ = m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_replace_10k(c: &mut Criterion) {
    c.bench_function("chained::replace_10k_of_100k", |b| {
        b.iter_batched(
            || filled(100_000, 2),
            |(mut m, keys)| {
                for (i, k) in keys.iter().take(10_000).enumerate() {
                    black_box(m.insert(k.clone(), i as u64));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lookup_hit_miss(c: &mut Criterion) {
    let (m, keys) = filled(100_000, 3);
    let misses: Vec<String> = lcg(99).take(10_000).map(key).collect();
    c.bench_function("chained::lookup_hit_10k", |b| {
        b.iter(|| {
            for k in keys.iter().take(10_000) {
                black_box(m.lookup(k));
            }
        })
    });
    c.bench_function("chained::lookup_miss_10k", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(m.is_present(k));
            }
        })
    });
}

fn bench_remove_10k(c: &mut Criterion) {
    c.bench_function("chained::remove_10k_of_100k", |b| {
        b.iter_batched(
            || filled(100_000, 4),
            |(mut m, keys)| {
                for k in keys.iter().step_by(10) {
                    black_box(m.remove(k));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_destroy_100k(c: &mut Criterion) {
    c.bench_function("chained::destroy_release_all_100k", |b| {
        b.iter_batched(
            || filled(100_000, 5).0,
            |m| black_box(m.destroy(Release::ALL)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_presized_100k, bench_replace_10k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_lookup_hit_miss,
              bench_remove_10k,
              bench_destroy_100k
}
criterion_main!(benches_insert, benches_ops);
