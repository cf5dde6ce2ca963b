use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput, BenchmarkId};
use rand::prelude::*;
use rand::rngs::SmallRng;
use fibrope::Rope;

const SIZES: &[usize] = &[100, 1_000, 10_000, 100_000];

fn random_ascii_string(rng: &mut SmallRng, len: usize) -> String {
    let mut s = String::new();
    for _ in 0..len {
        // Mostly letters, with a line feed every so often.
        let c = if rng.gen_bool(0.05) { '\n' } else { rng.gen_range(b'a'..=b'z') as char };
        s.push(c);
    }
    s
}

fn random_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_edits");
    for &size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("insert", size), &size, |b, &size| {
            b.iter(|| {
                let mut rng = SmallRng::seed_from_u64(123);
                let mut r = Rope::default();
                for _ in 0..size {
                    let pos = rng.gen_range(0..=r.len_chars());
                    r = r.insert_str(pos, "x");
                }
                black_box(r.len_chars());
            })
        });

        group.bench_with_input(BenchmarkId::new("edit_big_text", size), &size, |b, &size| {
            let mut rng = SmallRng::seed_from_u64(123);
            let start = Rope::chunked(&random_ascii_string(&mut rng, size * 10));
            b.iter(|| {
                let mut r = start.clone();
                for _ in 0..100 {
                    let len = r.len_chars();
                    let pos = rng.gen_range(0..len);
                    let del = rng.gen_range(0..=(len - pos).min(5));
                    r = r.replace_str(pos, del, "abc");
                }
                black_box(r.len_chars());
            })
        });
    }
    group.finish();
}

fn appends(c: &mut Criterion) {
    let mut group = c.benchmark_group("appends");
    for &size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("char_at_a_time", size), &size, |b, &size| {
            b.iter(|| {
                let mut r = Rope::default();
                for _ in 0..size {
                    r = r.append_str("a");
                }
                black_box(r.depth());
            })
        });
    }
    group.finish();
}

fn line_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("lines");
    for &size in SIZES {
        let mut rng = SmallRng::seed_from_u64(321);
        let r = Rope::chunked(&random_ascii_string(&mut rng, size * 10));
        let lines = r.line_count();

        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::new("find_line_start", size), &r, |b, r| {
            b.iter(|| {
                for line in 0..lines {
                    black_box(r.find_line_start(line));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("position_of", size), &r, |b, r| {
            let mut rng = SmallRng::seed_from_u64(7);
            b.iter(|| {
                let index = rng.gen_range(0..=r.len_chars());
                black_box(r.position_of(index).ok());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, random_edits, appends, line_lookups);
criterion_main!(benches);
