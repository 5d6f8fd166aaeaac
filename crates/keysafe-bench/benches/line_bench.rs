//! Secret line reader benchmarks.

use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use keysafe_bench::secret_image;
use keysafe_core::line::read_line;

fn bench_read_line(c: &mut Criterion) {
    let sizes: &[usize] = &[16, 64, 256, 1024, 4096];
    let mut group = c.benchmark_group("read_line");

    for &size in sizes {
        let image = secret_image(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("cursor", size), &image, |b, image| {
            b.iter(|| {
                let line = read_line(&mut Cursor::new(image.as_slice())).unwrap();
                black_box(line.len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_read_line);
criterion_main!(benches);
