//! Package construction and serialization.
//!
//! [`PackageBuilder`] assembles a manifest and the five packed arrays and
//! writes them in the exact container layout [`super::Package`] decodes. It is
//! used by tooling, benchmarks and tests to produce packages without an
//! exporter.

use std::fs::File as FsFile;
use std::io::Write;
use std::path::Path;

use crate::geom::{Rectangle, Transform};

use super::constants;
use super::error::FormatError;
use super::manifest::{
	ActionDescriptor, ClipDescriptor, DisplayDescriptor, FrameDescriptor, GroupManifest,
	MovieDescriptor,
};

/// Builder for package buffers.
#[derive(Debug, Clone, Default)]
pub struct PackageBuilder {
	header: [u8; constants::HEADER_SIZE],
	name: String,
	version: f64,
	displays: Vec<DisplayDescriptor>,
	frames: Vec<FrameDescriptor>,
	movies: Vec<MovieDescriptor>,
	clip_stream: Vec<i16>,
	display_frames: Vec<i16>,
	rectangles: Vec<f32>,
	transforms: Vec<f32>,
	colors: Vec<i16>,
}

impl PackageBuilder {
	/// Creates an empty package named `name`.
	pub fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			version: 1.0,
			..Default::default()
		}
	}

	/// Sets the reserved header bytes.
	pub fn with_header(mut self, header: [u8; constants::HEADER_SIZE]) -> Self {
		self.header = header;
		self
	}

	/// Sets the format version written to the manifest.
	pub fn with_version(mut self, version: f64) -> Self {
		self.version = version;
		self
	}

	/// Appends a display and returns its index.
	pub fn add_display(&mut self, display: DisplayDescriptor) -> usize {
		self.displays.push(display);
		self.displays.len() - 1
	}

	/// Appends a rectangle quad and returns its quad index.
	pub fn add_rectangle(&mut self, rect: Rectangle) -> usize {
		self.rectangles.extend_from_slice(&[rect.x, rect.y, rect.width, rect.height]);
		self.rectangles.len() / constants::RECTANGLE_STRIDE - 1
	}

	/// Appends a transform record and returns its record index.
	pub fn add_transform(&mut self, transform: Transform) -> i16 {
		self.transforms.extend_from_slice(&transform.to_array());
		(self.transforms.len() / constants::TRANSFORM_STRIDE - 1) as i16
	}

	/// Appends a packed color record and returns its record index.
	///
	/// Multipliers are percentages, offsets are raw channel values.
	pub fn add_color(&mut self, packed: [i16; constants::COLOR_STRIDE]) -> i16 {
		self.colors.extend_from_slice(&packed);
		(self.colors.len() / constants::COLOR_STRIDE - 1) as i16
	}

	/// Appends a display-frame record and returns its record index.
	///
	/// `color` is a color record index; pass [`constants::NO_INDEX`] for none.
	pub fn add_display_frame(&mut self, display: i16, color: i16) -> i16 {
		self.display_frames.extend_from_slice(&[display, color]);
		(self.display_frames.len() / constants::DISPLAY_FRAME_STRIDE - 1) as i16
	}

	/// Appends a movie and returns its index.
	pub fn add_movie(&mut self, movie: MovieDescriptor) -> usize {
		self.movies.push(movie);
		self.movies.len() - 1
	}

	/// Mutable access to a movie added earlier.
	pub fn movie_mut(&mut self, movie: usize) -> Option<&mut MovieDescriptor> {
		self.movies.get_mut(movie)
	}

	/// Mutable access to a clip added earlier.
	pub fn clip_mut(&mut self, movie: usize, clip: usize) -> Option<&mut ClipDescriptor> {
		self.movies.get_mut(movie).and_then(|movie| movie.clip.get_mut(clip))
	}

	/// Appends a clip to `movie` and returns its index.
	///
	/// `samples` holds one `[display frame, transform]` pair per slot per cache
	/// frame, cache frame major. A display-frame index of `-1` hides the slot.
	///
	/// # Panics
	///
	/// Panics if `movie` was not added.
	pub fn add_clip(
		&mut self,
		movie: usize,
		name: &str,
		play_times: u32,
		duration: f64,
		cache_time_to_frame_scale: f64,
		samples: &[[i16; 2]],
	) -> usize {
		let p = (self.clip_stream.len() * 2) as u64;
		for pair in samples {
			self.clip_stream.extend_from_slice(pair);
		}
		let s = (samples.len() * constants::SLOT_RECORD_WIDTH * 2) as u64;

		let clips = &mut self.movies[movie].clip;
		clips.push(ClipDescriptor {
			name: name.to_string(),
			play_times,
			duration,
			scale: 1.0,
			cache_time_to_frame_scale,
			p,
			s,
			frame: Vec::new(),
		});
		clips.len() - 1
	}

	/// Appends a raw frame to the global frame table and returns its index.
	pub fn add_frame(&mut self, frame: FrameDescriptor) -> usize {
		self.frames.push(frame);
		self.frames.len() - 1
	}

	/// Builds the timeline of a clip.
	///
	/// `keys` lists `(position, actions)` in ascending position order. The keys
	/// become a circular linked list in the global frame table, and the clip's
	/// frame lookup gets one entry per `1 / frameRate` step.
	///
	/// # Panics
	///
	/// Panics if the clip was not added.
	pub fn set_timeline(&mut self, movie: usize, clip: usize, keys: Vec<(f64, Vec<ActionDescriptor>)>) {
		if keys.is_empty() {
			return;
		}

		let first = self.frames.len();
		let count = keys.len();
		for (offset, (position, actions)) in keys.into_iter().enumerate() {
			let prev = first + (offset + count - 1) % count;
			let next = first + (offset + 1) % count;
			let mut frame = FrameDescriptor::new(prev, next, position);
			frame.action_and_event = actions;
			self.frames.push(frame);
		}

		let frame_rate = self.movies[movie].frame_rate;
		let duration = self.movies[movie].clip[clip].duration;
		let steps = (duration * frame_rate).floor().max(0.0) as usize + 1;
		let lookup = (0..steps)
			.map(|step| {
				let time = step as f64 / frame_rate;
				let key = self.frames[first..first + count]
					.iter()
					.rposition(|frame| frame.position <= time)
					.unwrap_or(0);
				first + key
			})
			.collect();
		self.movies[movie].clip[clip].frame = lookup;
	}

	/// Returns the manifest as it would be written.
	pub fn manifest(&self) -> GroupManifest {
		let mut position = Vec::with_capacity(constants::ARRAY_COUNT * constants::POSITION_STRIDE);
		let mut offset = 0u64;
		let mut push = |length: usize, element_size: usize| {
			let length = length as u64;
			position.extend_from_slice(&[offset, length, element_size as u64]);
			offset += length;
			offset += constants::alignment_padding(offset as usize) as u64;
		};
		push(self.clip_stream.len() * 2, 2);
		push(self.display_frames.len() * 2, 2);
		push(self.rectangles.len() * 4, 4);
		push(self.transforms.len() * 4, 4);
		push(self.colors.len() * 2, 2);

		GroupManifest {
			name: self.name.clone(),
			version: self.version,
			position,
			display: self.displays.clone(),
			frame: self.frames.clone(),
			movie: self.movies.clone(),
		}
	}

	/// Serializes the package to bytes.
	///
	/// # Errors
	///
	/// Returns [`FormatError::ManifestTooLarge`] if the manifest does not fit
	/// its 16-bit length field.
	pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
		let manifest = serde_json::to_string(&self.manifest())?;
		if manifest.len() > u16::MAX as usize {
			return Err(FormatError::ManifestTooLarge {
				length: manifest.len(),
				limit: u16::MAX as usize,
			});
		}

		let mut buffer = Vec::new();
		buffer.extend_from_slice(&self.header);
		buffer.extend_from_slice(&(manifest.len() as u16).to_le_bytes());
		buffer.extend_from_slice(manifest.as_bytes());
		pad(&mut buffer);

		for value in &self.clip_stream {
			buffer.extend_from_slice(&value.to_le_bytes());
		}
		pad(&mut buffer);
		for value in &self.display_frames {
			buffer.extend_from_slice(&value.to_le_bytes());
		}
		pad(&mut buffer);
		for value in &self.rectangles {
			buffer.extend_from_slice(&value.to_le_bytes());
		}
		pad(&mut buffer);
		for value in &self.transforms {
			buffer.extend_from_slice(&value.to_le_bytes());
		}
		pad(&mut buffer);
		for value in &self.colors {
			buffer.extend_from_slice(&value.to_le_bytes());
		}

		Ok(buffer)
	}

	/// Writes the package to any writer.
	pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), FormatError> {
		writer.write_all(&self.to_bytes()?)?;
		Ok(())
	}

	/// Saves the package to a file.
	pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), FormatError> {
		let mut file = FsFile::create(path)?;
		self.write_to(&mut file)
	}
}

fn pad(buffer: &mut Vec<u8>) {
	let padding = constants::alignment_padding(buffer.len());
	buffer.resize(buffer.len() + padding, 0);
}
