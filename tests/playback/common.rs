//! Shared fixtures

use cutout_rs::prelude::*;

/// Timeline key names of the "walk" clip, in time order.
pub const WALK_KEYS: [&str; 5] = ["k0", "k1", "k2", "k3", "k4"];

/// Start of each key in seconds.
pub const WALK_KEY_POSITIONS: [f64; 5] = [0.0, 0.2, 0.4, 0.6, 0.8];

/// Frames per second of the "walker" movie.
pub const FRAME_RATE: f64 = 10.0;

/// A "walker" movie with a looping "walk" clip of ten cache frames and a
/// "jump" clip played twice.
pub fn walker_builder(group: &str) -> PackageBuilder {
	let mut builder = PackageBuilder::new(group);

	let torso_region = builder.add_rectangle(Rectangle::new(0.0, 0.0, 20.0, 40.0));
	let arm_region = builder.add_rectangle(Rectangle::new(20.0, 0.0, 8.0, 24.0));
	let torso = builder.add_display(DisplayDescriptor::image("torso", torso_region)) as i16;
	let arm = builder.add_display(DisplayDescriptor::image("arm", arm_region)) as i16;
	let torso_frame = builder.add_display_frame(torso, -1);
	let arm_frame = builder.add_display_frame(arm, -1);

	let steps: Vec<i16> =
		(0..10).map(|step| builder.add_transform(Transform::translation(step as f32 * 2.0, 0.0))).collect();

	let mut walker = MovieDescriptor::new("walker", FRAME_RATE);
	walker.action = Some("walk".to_string());
	walker.slot.push(SlotDescriptor::new("torso"));
	walker.slot.push(SlotDescriptor::new("arm"));
	let walker = builder.add_movie(walker);

	let walk_samples: Vec<[i16; 2]> = steps
		.iter()
		.enumerate()
		.flat_map(|(step, &transform)| {
			let arm = if step % 2 == 0 { arm_frame } else { -1 };
			[[torso_frame, transform], [arm, steps[0]]]
		})
		.collect();
	let walk = builder.add_clip(walker, "walk", 0, 1.0, 10.0, &walk_samples);
	let keys = WALK_KEY_POSITIONS
		.iter()
		.zip(WALK_KEYS)
		.map(|(&position, name)| (position, vec![ActionDescriptor::frame_event(name)]))
		.collect();
	builder.set_timeline(walker, walk, keys);

	let jump_samples: Vec<[i16; 2]> =
		steps[..5].iter().flat_map(|&transform| [[torso_frame, transform], [arm_frame, transform]]).collect();
	builder.add_clip(walker, "jump", 2, 0.5, 10.0, &jump_samples);

	builder
}

/// Encoded "walker" package.
pub fn walker_bytes(group: &str) -> Vec<u8> {
	walker_builder(group).to_bytes().unwrap()
}

/// Atlas the fixtures' regions live in.
pub fn atlas() -> Vec<AtlasTexture> {
	vec![AtlasTexture::new("walker", 64.0, 64.0)]
}

/// Registry with the "walker" package registered as group "walkers".
pub fn walker_registry() -> Registry {
	let mut registry = Registry::new();
	registry.add_group(walker_bytes("walkers"), atlas(), None).unwrap();
	registry
}

/// Renderer and event sink owned by a test.
#[derive(Default)]
pub struct Harness {
	pub renderer: RecordingRenderer,
	pub events: Vec<MovieEvent>,
}

impl Harness {
	pub fn host(&mut self) -> Host<'_> {
		Host::new(&mut self.renderer, &mut self.events, &())
	}

	/// Builds a movie that is ticked by the test, dropping build-time output.
	pub fn build(&mut self, registry: &Registry, movie: &str) -> MovieInstance {
		let movie = registry.build_movie_with(movie, None, &BuildOptions::nested(), &mut self.host()).unwrap();
		self.renderer.take();
		self.events.clear();
		movie
	}

	/// Names of the frame events received so far.
	pub fn frame_events(&self) -> Vec<String> {
		self.events
			.iter()
			.filter(|event| event.kind == EventKind::FrameEvent)
			.filter_map(|event| event.name.clone())
			.collect()
	}
}

/// Slot snapshots of a movie, in draw order.
pub fn snapshots(movie: &MovieInstance) -> Vec<SlotSnapshot> {
	movie.slots().iter().map(SlotState::snapshot).collect()
}
