//! Benchmark suite for package decoding
//!
//! Measures manifest parsing and array view construction, and the cost of
//! slicing clip streams out of a decoded package.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use cutout_benches::{generate_package, sizes};
use cutout_types::package::{Package, ParseConfig};
use std::hint::black_box;

/// Benchmark full decoding of synthetic packages
fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("package_decode");

	for (name, (slots, clips, duration)) in
		[("prop", sizes::PROP), ("character", sizes::CHARACTER), ("boss", sizes::BOSS)]
	{
		let data = generate_package(slots, clips, duration);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("default", name), &data, |b, data| {
			b.iter(|| {
				let result = Package::from_bytes(black_box(data.clone()));
				black_box(result)
			});
		});
		group.bench_with_input(BenchmarkId::new("strict", name), &data, |b, data| {
			b.iter(|| {
				let result = Package::from_bytes_with_config(black_box(data.clone()), &ParseConfig::strict());
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark clip stream slicing
fn bench_clip_indices(c: &mut Criterion) {
	let mut group = c.benchmark_group("clip_indices");

	let (slots, clips, duration) = sizes::CHARACTER;
	let package = match Package::from_bytes(generate_package(slots, clips, duration)) {
		Ok(package) => package,
		Err(error) => {
			eprintln!("Warning: could not decode generated package: {error}");
			return;
		}
	};

	group.bench_function("slice_all_clips", |b| {
		b.iter(|| {
			for clip in 0..clips {
				black_box(package.clip_indices(0, clip).ok());
			}
		});
	});

	group.finish();
}

criterion_group!(benches, bench_decode, bench_clip_indices);

criterion_main!(benches);
