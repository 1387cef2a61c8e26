// crates/rowbin_partition/benches/scan_bench.rs
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rowbin_partition::Partition;
use rowbin_table::TableWriter;

fn make_fixture(dir: &std::path::Path, files: u64, rows_per_file: u64) {
    for f in 0..files {
        let mut w = TableWriter::create(dir.join(format!("{f:03}.rbt"))).with_key_width(5);
        for i in 0..rows_per_file {
            w.append(format!("row {f}/{i}").as_bytes());
        }
        w.finish().unwrap();
    }
}

fn bench_scan(c: &mut Criterion) {
    let tmp = tempfile::tempdir().unwrap();
    make_fixture(tmp.path(), 8, 2_000);
    let p = Partition::open(tmp.path()).unwrap();
    let total = p.total_count();

    c.bench_function("locate", |b| {
        let mut n = 1u64;
        b.iter(|| {
            let hit = p.locate(n);
            n = (n * 7919) % total + 1;
            black_box(hit.map(|(_, off)| off))
        })
    });

    c.bench_function("full_scan", |b| {
        b.iter(|| {
            let mut rows = 0u64;
            for e in p.scan(0, None).unwrap() {
                black_box(e.unwrap().index);
                rows += 1;
            }
            rows
        })
    });
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
