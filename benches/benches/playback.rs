//! Benchmark suite for movie playback
//!
//! Measures per-tick cost of `advance_time` with cold and warm bounds caches,
//! against a renderer that discards every call.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml -- playback

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use cutout_benches::{MOVIE_NAME, atlas, generate_package, sizes};
use cutout_runtime::prelude::*;
use std::hint::black_box;

/// Renderer that ignores every call.
#[derive(Default)]
struct NullRenderer {
	nodes: u64,
}

impl Renderer for NullRenderer {
	fn create_node(&mut self, _movie: &str, _slots: &[&str]) -> NodeId {
		self.nodes += 1;
		NodeId(self.nodes)
	}

	fn release_node(&mut self, _node: NodeId) {}

	fn set_display_visible(&mut self, _slot: SlotRef, _visible: bool) {}

	fn set_display_image_region(&mut self, _slot: SlotRef, _texture: &AtlasTexture, _region: &Rectangle) {}

	fn set_display_transform(&mut self, _slot: SlotRef, _transform: &Transform) {}

	fn set_display_color(&mut self, _slot: SlotRef, _color: &ColorTransform) {}

	fn clear_display_color(&mut self, _slot: SlotRef, _alpha: f32) {}

	fn set_blend_mode(&mut self, _slot: SlotRef, _mode: BlendMode) {}

	fn attach_child_display(&mut self, _slot: SlotRef, _child: NodeId) {}

	fn detach_child_display(&mut self, _slot: SlotRef, _child: NodeId) {}
}

fn registry(slots: usize, clips: usize, duration: f64) -> Registry {
	let mut registry = Registry::new();
	if let Err(error) = registry.add_group(generate_package(slots, clips, duration), atlas(), None) {
		eprintln!("Warning: could not register generated package: {error}");
	}
	registry
}

/// Benchmark one second of playback at 60 ticks per second
fn bench_advance(c: &mut Criterion) {
	let mut group = c.benchmark_group("playback_advance");

	for (name, (slots, clips, duration)) in
		[("prop", sizes::PROP), ("character", sizes::CHARACTER), ("boss", sizes::BOSS)]
	{
		let registry = registry(slots, clips, duration);
		let mut renderer = NullRenderer::default();
		let mut events = ();
		let mut host = Host::new(&mut renderer, &mut events, &());
		let Ok(mut movie) = registry.build_movie_with(MOVIE_NAME, None, &BuildOptions::nested(), &mut host) else {
			continue;
		};
		if movie.play(Some("clip0"), Some(0)).is_err() {
			continue;
		}

		group.bench_function(BenchmarkId::new("second_at_60hz", name), |b| {
			b.iter(|| {
				for _ in 0..60 {
					movie.advance_time(black_box(1.0 / 60.0), &mut host);
				}
			});
		});
	}

	group.finish();
}

/// Benchmark building instances from a registered group
fn bench_build(c: &mut Criterion) {
	let mut group = c.benchmark_group("playback_build");

	let (slots, clips, duration) = sizes::CHARACTER;
	let registry = registry(slots, clips, duration);
	let mut renderer = NullRenderer::default();
	let mut events = ();

	group.bench_function("build_and_dispose", |b| {
		b.iter(|| {
			let mut host = Host::new(&mut renderer, &mut events, &());
			if let Ok(mut movie) = registry.build_movie(MOVIE_NAME, None, &mut host) {
				movie.dispose(&mut host);
				black_box(movie.is_disposed());
			}
		});
	});

	group.finish();
}

criterion_group!(benches, bench_advance, bench_build);

criterion_main!(benches);
