//! Decoded animation package.
//!
//! This module defines [`Package`], the immutable result of decoding a package
//! buffer: the manifest, five zero-copy typed array views and one bounds cache
//! per clip.

use std::fmt::Display;

use bytes::Bytes;

use crate::geom::{ColorTransform, Rectangle, Transform};

use super::{
	array::{Element, NumericArray},
	cache::ClipCache,
	constants,
	error::{ArrayKind, FormatError},
	manifest::{ClipDescriptor, DisplayDescriptor, FrameDescriptor, GroupManifest, MovieDescriptor},
	parse_config::ParseConfig,
};

/// Texture atlas page supplied by the host when a group is registered.
///
/// Only the dimensions matter to the runtime; `name` identifies the page to the
/// host renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasTexture {
	/// Host-side identifier
	pub name: String,
	/// Page width in pixels
	pub width: f32,
	/// Page height in pixels
	pub height: f32,
}

impl AtlasTexture {
	/// Creates a texture descriptor.
	pub fn new(name: &str, width: f32, height: f32) -> Self {
		Self {
			name: name.to_string(),
			width,
			height,
		}
	}
}

/// Decoded animation package ("group").
///
/// The package keeps the buffer it was decoded from; every typed array is a
/// view into that buffer. Apart from the append-only bounds caches, nothing in
/// a package changes after decoding, so it is shared between instances
/// through an `Arc`.
///
/// # Examples
///
/// ```no_run
/// use cutout_types::package::Package;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let package = Package::open("hero.dbmv")?;
/// for name in package.movie_names() {
///     println!("movie: {name}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Package {
	header: [u8; constants::HEADER_SIZE],
	manifest: GroupManifest,
	buffer: Bytes,
	array_base: usize,
	clip_stream: NumericArray<i16>,
	display_frames: NumericArray<i16>,
	rectangles: NumericArray<f32>,
	transforms: NumericArray<f32>,
	colors: NumericArray<i16>,
	clip_caches: Vec<Vec<ClipCache>>,
	textures: Vec<AtlasTexture>,
}

impl Package {
	/// Opens and decodes a package file.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or is not a valid package.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, FormatError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(data)
	}

	/// Decodes a package with the default [`ParseConfig`].
	///
	/// Passing a `Vec<u8>` or [`Bytes`] hands the buffer over without copying.
	///
	/// # Errors
	///
	/// Returns a [`FormatError`] if the container or manifest is malformed.
	pub fn from_bytes(data: impl Into<Bytes>) -> Result<Self, FormatError> {
		Self::from_bytes_with_config(data, &ParseConfig::default())
	}

	/// Decodes a package with a custom configuration.
	///
	/// # Errors
	///
	/// Returns a [`FormatError`] if the container or manifest is malformed, or
	/// if a check enabled by `config` fails.
	pub fn from_bytes_with_config(
		data: impl Into<Bytes>,
		config: &ParseConfig,
	) -> Result<Self, FormatError> {
		let buffer: Bytes = data.into();
		if buffer.len() < constants::MANIFEST_OFFSET {
			return Err(FormatError::insufficient_data(constants::MANIFEST_OFFSET, buffer.len()));
		}

		let mut header = [0u8; constants::HEADER_SIZE];
		header.copy_from_slice(&buffer[..constants::HEADER_SIZE]);

		let manifest_len =
			u16::from_le_bytes([buffer[constants::HEADER_SIZE], buffer[constants::HEADER_SIZE + 1]])
				as usize;
		if manifest_len > config.max_manifest_len {
			return Err(FormatError::ManifestTooLarge {
				length: manifest_len,
				limit: config.max_manifest_len,
			});
		}

		let manifest_end = constants::MANIFEST_OFFSET + manifest_len;
		if buffer.len() < manifest_end {
			return Err(FormatError::insufficient_data(manifest_end, buffer.len()));
		}

		let text = std::str::from_utf8(&buffer[constants::MANIFEST_OFFSET..manifest_end])?;
		let manifest: GroupManifest = serde_json::from_str(text)?;
		let array_base = manifest_end + constants::alignment_padding(manifest_end);

		let expected = constants::ARRAY_COUNT * constants::POSITION_STRIDE;
		if manifest.position.len() < expected
			|| manifest.position.len() % constants::POSITION_STRIDE != 0
		{
			return Err(FormatError::MalformedPosition {
				length: manifest.position.len(),
				expected: constants::ARRAY_COUNT,
			});
		}

		let clip_stream = Self::array_view(&buffer, &manifest.position, array_base, ArrayKind::ClipStream)?;
		let display_frames =
			Self::array_view(&buffer, &manifest.position, array_base, ArrayKind::DisplayFrame)?;
		let rectangles = Self::array_view(&buffer, &manifest.position, array_base, ArrayKind::Rectangle)?;
		let transforms = Self::array_view(&buffer, &manifest.position, array_base, ArrayKind::Transform)?;
		let colors = Self::array_view(&buffer, &manifest.position, array_base, ArrayKind::Color)?;

		let clip_caches = manifest
			.movie
			.iter()
			.map(|movie| {
				let frame_width = movie.frame_width();
				movie
					.clip
					.iter()
					.map(|clip| {
						let elements = usize::try_from(clip.s).unwrap_or(0) / i16::SIZE;
						ClipCache::new(elements.checked_div(frame_width).unwrap_or(0))
					})
					.collect()
			})
			.collect();

		let package = Self {
			header,
			manifest,
			buffer,
			array_base,
			clip_stream,
			display_frames,
			rectangles,
			transforms,
			colors,
			clip_caches,
			textures: Vec::new(),
		};

		if config.validate_clip_ranges {
			package.validate_clip_ranges()?;
		}
		if config.validate_frame_links {
			package.validate_frame_links()?;
		}

		log::debug!(
			"Decoded package '{}': {} movies, {} displays, {} frames",
			package.name(),
			package.manifest.movie.len(),
			package.manifest.display.len(),
			package.manifest.frame.len()
		);

		Ok(package)
	}

	fn array_view<T: Element>(
		buffer: &Bytes,
		position: &[u64],
		array_base: usize,
		array: ArrayKind,
	) -> Result<NumericArray<T>, FormatError> {
		let triplet = ArrayKind::ALL.iter().position(|kind| *kind == array).unwrap_or(0)
			* constants::POSITION_STRIDE;
		let (offset, length, element_size) =
			(position[triplet], position[triplet + 1], position[triplet + 2]);

		if element_size != T::SIZE as u64 || element_size != array.element_size() as u64 {
			return Err(FormatError::ElementSize {
				array,
				expected: array.element_size(),
				actual: element_size,
			});
		}
		if length % element_size != 0 {
			return Err(FormatError::MisalignedLength {
				array,
				length,
				element_size: T::SIZE,
			});
		}

		let out_of_bounds = || FormatError::RangeOutOfBounds {
			array,
			offset: (array_base as u64).saturating_add(offset),
			length,
			buffer_len: buffer.len(),
		};
		let start = usize::try_from(offset)
			.ok()
			.and_then(|offset| array_base.checked_add(offset))
			.ok_or_else(out_of_bounds)?;
		let count = usize::try_from(length / element_size).map_err(|_| out_of_bounds())?;

		NumericArray::view(buffer, array, start, count)
	}

	fn validate_clip_ranges(&self) -> Result<(), FormatError> {
		for (movie_index, movie) in self.manifest.movie.iter().enumerate() {
			for clip_index in 0..movie.clip.len() {
				self.clip_indices(movie_index, clip_index)?;
			}
		}
		Ok(())
	}

	fn validate_frame_links(&self) -> Result<(), FormatError> {
		let frame_count = self.manifest.frame.len();
		for (index, frame) in self.manifest.frame.iter().enumerate() {
			let linked = |link: Option<usize>| link.is_some_and(|link| link < frame_count);
			if !linked(frame.prev_index()) || !linked(frame.next_index()) {
				return Err(FormatError::FrameLink {
					message: format!(
						"frame {} links to prev={} next={} (frame table has {} entries)",
						index, frame.prev, frame.next, frame_count
					),
				});
			}
		}
		for movie in &self.manifest.movie {
			for clip in &movie.clip {
				if let Some(missing) = clip.frame.iter().find(|&&frame| frame >= frame_count) {
					return Err(FormatError::FrameLink {
						message: format!(
							"clip '{}' of movie '{}' references frame {} (frame table has {} entries)",
							clip.name, movie.name, missing, frame_count
						),
					});
				}
			}
		}
		Ok(())
	}

	/// Attaches the atlas textures used by image displays.
	pub fn with_textures(mut self, textures: Vec<AtlasTexture>) -> Self {
		self.textures = textures;
		self
	}

	/// Group name from the manifest.
	pub fn name(&self) -> &str {
		&self.manifest.name
	}

	/// Format version from the manifest.
	pub fn version(&self) -> f64 {
		self.manifest.version
	}

	/// Reserved header bytes.
	pub fn header(&self) -> &[u8; constants::HEADER_SIZE] {
		&self.header
	}

	/// Decoded manifest.
	pub fn manifest(&self) -> &GroupManifest {
		&self.manifest
	}

	/// Raw `position` triplets.
	pub fn position(&self) -> &[u64] {
		&self.manifest.position
	}

	/// Buffer the package was decoded from.
	pub fn buffer(&self) -> &Bytes {
		&self.buffer
	}

	/// Absolute offset of the aligned array region.
	pub fn array_base(&self) -> usize {
		self.array_base
	}

	/// Whole packed clip-index stream.
	pub fn clip_stream(&self) -> &NumericArray<i16> {
		&self.clip_stream
	}

	/// Display-frame pairs (display index, color index).
	pub fn display_frames(&self) -> &NumericArray<i16> {
		&self.display_frames
	}

	/// Rectangle quads.
	pub fn rectangles(&self) -> &NumericArray<f32> {
		&self.rectangles
	}

	/// Transform sextuples.
	pub fn transforms(&self) -> &NumericArray<f32> {
		&self.transforms
	}

	/// Color octets.
	pub fn colors(&self) -> &NumericArray<i16> {
		&self.colors
	}

	/// Display table.
	pub fn displays(&self) -> &[DisplayDescriptor] {
		&self.manifest.display
	}

	/// Global frame table.
	pub fn frames(&self) -> &[FrameDescriptor] {
		&self.manifest.frame
	}

	/// Movies in declaration order.
	pub fn movies(&self) -> &[MovieDescriptor] {
		&self.manifest.movie
	}

	/// Returns the movie at `index`.
	pub fn movie(&self, index: usize) -> Option<&MovieDescriptor> {
		self.manifest.movie.get(index)
	}

	/// Finds a movie by exact name (first match).
	pub fn find_movie(&self, name: &str) -> Option<usize> {
		self.manifest.movie.iter().position(|movie| movie.name == name)
	}

	/// Names of all movies in declaration order.
	pub fn movie_names(&self) -> Vec<String> {
		self.manifest.movie.iter().map(|movie| movie.name.clone()).collect()
	}

	/// Returns a clip descriptor.
	pub fn clip(&self, movie: usize, clip: usize) -> Option<&ClipDescriptor> {
		self.movie(movie).and_then(|movie| movie.clip.get(clip))
	}

	/// Bounds cache of a clip.
	pub fn clip_cache(&self, movie: usize, clip: usize) -> Option<&ClipCache> {
		self.clip_caches.get(movie).and_then(|clips| clips.get(clip))
	}

	/// Zero-copy view of one clip's packed indices.
	///
	/// # Errors
	///
	/// Returns [`FormatError::ClipRange`] if the clip does not exist or its byte
	/// range is misaligned or outside the clip stream.
	pub fn clip_indices(&self, movie: usize, clip: usize) -> Result<NumericArray<i16>, FormatError> {
		let (movie_desc, clip_desc) = match self.movie(movie).zip(self.clip(movie, clip)) {
			Some(found) => found,
			None => {
				return Err(FormatError::clip_range(
					&movie.to_string(),
					&clip.to_string(),
					0,
					0,
					"no such clip",
				));
			}
		};

		let element_size = i16::SIZE as u64;
		let invalid = |message: &str| {
			FormatError::clip_range(&movie_desc.name, &clip_desc.name, clip_desc.p, clip_desc.s, message)
		};
		if clip_desc.p % element_size != 0 || clip_desc.s % element_size != 0 {
			return Err(invalid("range is not aligned to 16-bit elements"));
		}

		let start = usize::try_from(clip_desc.p / element_size).map_err(|_| invalid("offset overflow"))?;
		let count = usize::try_from(clip_desc.s / element_size).map_err(|_| invalid("size overflow"))?;
		self.clip_stream.slice(start, count).ok_or_else(|| {
			invalid(&format!("range exceeds clip stream of {} bytes", self.clip_stream.as_bytes().len()))
		})
	}

	/// Attached atlas textures.
	pub fn textures(&self) -> &[AtlasTexture] {
		&self.textures
	}

	/// Display-frame record at `offset` (element offset): display index and color index.
	pub fn display_frame_at(&self, offset: usize) -> Option<(i16, i16)> {
		self.display_frames.get_array::<{ constants::DISPLAY_FRAME_STRIDE }>(offset).map(|[d, c]| (d, c))
	}

	/// Transform record at `offset` (element offset).
	pub fn transform_at(&self, offset: usize) -> Option<Transform> {
		self.transforms.get_array::<{ constants::TRANSFORM_STRIDE }>(offset).map(Transform::from_array)
	}

	/// Color record at `offset` (element offset).
	pub fn color_at(&self, offset: usize) -> Option<ColorTransform> {
		self.colors.get_array::<{ constants::COLOR_STRIDE }>(offset).map(ColorTransform::from_packed)
	}

	/// Atlas texture and clamped region shown by an image display.
	///
	/// Returns `None` for displays without a region or whose texture or
	/// rectangle is missing.
	pub fn display_region(&self, display: usize) -> Option<(&AtlasTexture, Rectangle)> {
		let descriptor = self.manifest.display.get(display)?;
		let region_index = descriptor.region_index?;
		let texture = self.textures.get(descriptor.texture_index.unwrap_or(0))?;
		let quad = self.rectangles.get_array::<{ constants::RECTANGLE_STRIDE }>(
			region_index.checked_mul(constants::RECTANGLE_STRIDE)?,
		)?;

		let mut region = Rectangle::from_quad(quad);
		region.width = region.width.min(texture.width - region.x);
		region.height = region.height.min(texture.height - region.y);
		Some((texture, region))
	}
}

impl Display for Package {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Package {{ name: {}, version: {}, movies: {}, displays: {}, frames: {}, bytes: {} }}",
			self.name(),
			self.version(),
			self.manifest.movie.len(),
			self.manifest.display.len(),
			self.manifest.frame.len(),
			self.buffer.len()
		)
	}
}
