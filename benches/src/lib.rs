//! Benchmark helper utilities for cutout-rs
//!
//! This module generates synthetic packages shaped like exporter output: one
//! rig with many slots, a handful of clips sampled at a fixed cache rate and a
//! timeline with frame events.

use cutout_types::geom::{Rectangle, Transform};
use cutout_types::package::{
	ActionDescriptor, AtlasTexture, DisplayDescriptor, MovieDescriptor, PackageBuilder, SlotDescriptor,
};

/// Name of the generated movie.
pub const MOVIE_NAME: &str = "rig";

/// Texture the generated regions are laid out on.
pub fn atlas() -> Vec<AtlasTexture> {
	vec![AtlasTexture::new("atlas", 2048.0, 2048.0)]
}

/// Generates a package with `slots` slots and `clips` looping clips of
/// `duration` seconds, cached at 24 samples per second.
///
/// Every slot cycles through its own image and moves on every sample; every
/// fourth sample hides one slot so display swaps are exercised too.
pub fn generate_package(slots: usize, clips: usize, duration: f64) -> Vec<u8> {
	let mut builder = PackageBuilder::new("bench");
	let cache_rate = 24.0;
	let samples = (duration * cache_rate).ceil() as usize;

	let mut display_frames = Vec::with_capacity(slots);
	for slot in 0..slots {
		let x = (slot % 32) as f32 * 64.0;
		let y = (slot / 32) as f32 * 64.0;
		let region = builder.add_rectangle(Rectangle::new(x, y, 48.0, 48.0));
		let display = builder.add_display(DisplayDescriptor::image(&format!("part{slot}"), region)) as i16;
		let color = if slot % 3 == 0 { builder.add_color([100, 100, 100, 80, 0, 0, 0, 0]) } else { -1 };
		display_frames.push(builder.add_display_frame(display, color));
	}

	let transforms: Vec<i16> = (0..samples)
		.map(|sample| {
			let angle = sample as f32 * 0.1;
			builder.add_transform(Transform::from_array([
				angle.cos(),
				angle.sin(),
				-angle.sin(),
				angle.cos(),
				sample as f32,
				0.0,
			]))
		})
		.collect();

	let mut movie = MovieDescriptor::new(MOVIE_NAME, cache_rate);
	movie.action = Some("clip0".to_string());
	for slot in 0..slots {
		movie.slot.push(SlotDescriptor::new(&format!("slot{slot}")));
	}
	let movie = builder.add_movie(movie);

	for clip in 0..clips {
		let mut stream = Vec::with_capacity(samples * slots);
		for (sample, &transform) in transforms.iter().enumerate() {
			for (slot, &display_frame) in display_frames.iter().enumerate() {
				let hidden = (sample + slot + clip) % 4 == 0;
				stream.push([if hidden { -1 } else { display_frame }, transform]);
			}
		}
		let clip_index = builder.add_clip(movie, &format!("clip{clip}"), 0, duration, cache_rate, &stream);

		let keys = (0..samples)
			.step_by(6)
			.map(|sample| {
				let event = ActionDescriptor::frame_event(&format!("mark{sample}"));
				(sample as f64 / cache_rate, vec![event])
			})
			.collect();
		builder.set_timeline(movie, clip_index, keys);
	}

	builder.to_bytes().unwrap_or_default()
}

/// Common benchmark package shapes: (slots, clips, duration)
pub mod sizes {
	/// A small prop: 8 slots, 2 short clips
	pub const PROP: (usize, usize, f64) = (8, 2, 1.0);
	/// A typical character: 40 slots, 6 clips
	pub const CHARACTER: (usize, usize, f64) = (40, 6, 2.0);
	/// A boss rig: 120 slots, 12 long clips
	pub const BOSS: (usize, usize, f64) = (120, 12, 4.0);
}

#[cfg(test)]
mod tests {
	use super::*;
	use cutout_types::package::Package;

	#[test]
	fn test_generate_package() {
		let (slots, clips, duration) = sizes::PROP;
		let data = generate_package(slots, clips, duration);
		let package = Package::from_bytes(data).unwrap();

		assert_eq!(package.movie_names(), vec![MOVIE_NAME.to_string()]);
		let movie = package.movie(0).unwrap();
		assert_eq!(movie.slot.len(), slots);
		assert_eq!(movie.clip.len(), clips);
		assert_eq!(package.clip_cache(0, 0).unwrap().frame_count(), 24);
		assert_eq!(package.frames().len(), clips * 4);
	}

	#[test]
	fn test_sizes_constants() {
		assert_eq!(sizes::PROP.0, 8);
		assert_eq!(sizes::CHARACTER.1, 6);
		assert_eq!(sizes::BOSS.2, 4.0);
	}
}
