use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rb_tree_map::TreeMap;
use std::collections::BTreeMap;
use std::hint::black_box;

struct KeyGenerator {
    rng: StdRng,
    limit: u32,
}
impl KeyGenerator {
    fn new() -> Self {
        const LIMIT: u32 = 1_000_000;
        Self {
            rng: StdRng::from_seed([0; 32]),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> u32 {
        self.rng.gen_range(0..self.limit)
    }

    fn take(&mut self, count: usize) -> Vec<u32> {
        std::iter::repeat_with(|| self.next()).take(count).collect()
    }
}

// insert helper fn
fn tree_map_insert(count: usize, bench: &mut Bencher) {
    let keys = KeyGenerator::new().take(count);
    bench.iter(|| {
        let mut map = TreeMap::new();
        for k in keys.clone() {
            black_box(map.insert(k, ()));
        }
    });
}

// insert and remove helper fn
fn tree_map_insert_remove(count: usize, bench: &mut Bencher) {
    let keys = KeyGenerator::new().take(count);
    bench.iter(|| {
        let mut map = TreeMap::new();
        for k in keys.clone() {
            black_box(map.insert(k, ()));
        }
        for k in &keys {
            black_box(map.remove(k));
        }
    });
}

// lookup helper fn
fn tree_map_get(count: usize, bench: &mut Bencher) {
    let keys = KeyGenerator::new().take(count);
    let map: TreeMap<_, _> = keys.iter().map(|k| (*k, ())).collect();
    bench.iter(|| {
        for k in &keys {
            black_box(map.get(k));
        }
    });
}

// range helper fn
fn tree_map_range(count: usize, bench: &mut Bencher) {
    let mut gen = KeyGenerator::new();
    let keys = gen.take(count);
    let map: TreeMap<_, _> = keys.iter().map(|k| (*k, ())).collect();
    let bounds = gen.take(count);
    bench.iter(|| {
        for low in &bounds {
            black_box(map.range(*low..low.saturating_add(10_000)).count());
        }
    });
}

// std BTreeMap baseline for insert and remove
fn btree_map_insert_remove(count: usize, bench: &mut Bencher) {
    let keys = KeyGenerator::new().take(count);
    bench.iter(|| {
        let mut map = BTreeMap::new();
        for k in keys.clone() {
            black_box(map.insert(k, ()));
        }
        for k in &keys {
            black_box(map.remove(k));
        }
    });
}

fn bench_tree_map_insert(c: &mut Criterion) {
    c.bench_function("bench_tree_map_insert_100", |b| tree_map_insert(100, b));
    c.bench_function("bench_tree_map_insert_1000", |b| tree_map_insert(1000, b));
    c.bench_function("bench_tree_map_insert_10,000", |b| {
        tree_map_insert(10_000, b)
    });
    c.bench_function("bench_tree_map_insert_100,000", |b| {
        tree_map_insert(100_000, b)
    });
}

fn bench_tree_map_insert_remove(c: &mut Criterion) {
    c.bench_function("bench_tree_map_insert_remove_100", |b| {
        tree_map_insert_remove(100, b)
    });
    c.bench_function("bench_tree_map_insert_remove_1000", |b| {
        tree_map_insert_remove(1000, b)
    });
    c.bench_function("bench_tree_map_insert_remove_10,000", |b| {
        tree_map_insert_remove(10_000, b)
    });
    c.bench_function("bench_btree_map_insert_remove_10,000", |b| {
        btree_map_insert_remove(10_000, b)
    });
}

fn bench_tree_map_get(c: &mut Criterion) {
    c.bench_function("bench_tree_map_get_1000", |b| tree_map_get(1000, b));
    c.bench_function("bench_tree_map_get_100,000", |b| tree_map_get(100_000, b));
}

fn bench_tree_map_range(c: &mut Criterion) {
    c.bench_function("bench_tree_map_range_100", |b| tree_map_range(100, b));
    c.bench_function("bench_tree_map_range_1000", |b| tree_map_range(1000, b));
}

fn criterion_config() -> Criterion {
    Criterion::default().configure_from_args().without_plots()
}

criterion_group! {
    name = benches_basic_op;
    config = criterion_config();
    targets = bench_tree_map_insert, bench_tree_map_insert_remove, bench_tree_map_get,
}

criterion_group! {
    name = benches_iter;
    config = criterion_config();
    targets = bench_tree_map_range
}

criterion_main!(benches_basic_op, benches_iter);
