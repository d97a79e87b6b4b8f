use chained_hashtable::{ChainScan, ChainedHashTable, TableConfig};
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

fn bench_insert(c: &mut Criterion) {
    let keys: Vec<_> = lcg(1).take(10_000).map(key).collect();
    for (name, scan) in [
        ("chained_table_insert_10k_truncated", ChainScan::Truncated),
        ("chained_table_insert_10k_full", ChainScan::Full),
    ] {
        c.bench_function(name, |b| {
            b.iter_batched(
                || ChainedHashTable::with_config(TableConfig::default().with_scan(scan)),
                |mut t| {
                    for (i, k) in keys.iter().enumerate() {
                        t.insert(k, i as i32);
                    }
                    black_box(t)
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("chained_table_get_hit", |b| {
        let mut t = ChainedHashTable::new(8);
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            t.insert(k, i as i32);
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(t.get(k).unwrap());
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("chained_table_get_miss", |b| {
        let mut t = ChainedHashTable::new(8);
        for (i, x) in lcg(11).take(10_000).enumerate() {
            t.insert(&key(x), i as i32);
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // generate keys unlikely in the table
            let k = key(miss.next().unwrap());
            black_box(t.get(&k).is_err());
        })
    });
}

// The reference driver: 59 three-letter keys into 8 buckets, then read back.
fn bench_demo_workload(c: &mut Criterion) {
    let keys: Vec<String> = (1..60u8)
        .map(|i| ((b'A' + i) as char).to_string().repeat(3))
        .collect();
    c.bench_function("chained_table_demo_59", |b| {
        b.iter(|| {
            let mut t = ChainedHashTable::new(8);
            for (i, k) in keys.iter().enumerate() {
                t.insert(k, i as i32 + 1);
            }
            let mut sum = 0i64;
            for k in &keys {
                sum += i64::from(t.get(k).unwrap());
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_get_hit, bench_get_miss, bench_demo_workload
}
criterion_main!(benches);
