//! Error types for package decoding.

use std::fmt::Display;

use thiserror::Error;

/// Typed arrays stored in a package's array region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayKind {
	/// Packed per-clip slot indices
	ClipStream,
	/// Display-frame pairs
	DisplayFrame,
	/// Atlas region rectangles
	Rectangle,
	/// Affine transforms
	Transform,
	/// Color transforms
	Color,
}

impl ArrayKind {
	/// All arrays in `position` triplet order.
	pub const ALL: [ArrayKind; 5] = [
		ArrayKind::ClipStream,
		ArrayKind::DisplayFrame,
		ArrayKind::Rectangle,
		ArrayKind::Transform,
		ArrayKind::Color,
	];

	/// Returns the expected element size in bytes.
	pub const fn element_size(self) -> usize {
		match self {
			Self::ClipStream | Self::DisplayFrame | Self::Color => 2,
			Self::Rectangle | Self::Transform => 4,
		}
	}
}

impl Display for ArrayKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::ClipStream => "clip stream",
			Self::DisplayFrame => "display frame",
			Self::Rectangle => "rectangle",
			Self::Transform => "transform",
			Self::Color => "color",
		};
		write!(f, "{name}")
	}
}

/// Errors that can occur when decoding an animation package.
///
/// A failed decode never touches the registry or the source buffer.
#[derive(Debug, Error)]
pub enum FormatError {
	/// Not enough data to parse
	#[error("Insufficient data: expected at least {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Manifest longer than the configured limit
	#[error("Manifest too large: {length} bytes (limit {limit})")]
	ManifestTooLarge {
		/// Declared manifest length
		length: usize,
		/// Configured limit
		limit: usize,
	},

	/// Manifest is not valid UTF-8
	#[error("Manifest is not valid UTF-8: {0}")]
	ManifestEncoding(#[from] std::str::Utf8Error),

	/// Manifest is not valid JSON or has the wrong shape
	#[error("Invalid manifest: {0}")]
	Manifest(#[from] serde_json::Error),

	/// `position` list is not a list of complete triplets
	#[error("Malformed position list: {length} entries, expected {expected} triplets")]
	MalformedPosition {
		/// Number of entries found
		length: usize,
		/// Number of triplets required
		expected: usize,
	},

	/// Element size does not match the array type
	#[error("Invalid element size for {array} array: expected {expected}, got {actual}")]
	ElementSize {
		/// Array being decoded
		array: ArrayKind,
		/// Expected element size in bytes
		expected: usize,
		/// Declared element size in bytes
		actual: u64,
	},

	/// Byte length is not a whole number of elements
	#[error("Byte length {length} of {array} array is not a multiple of {element_size}")]
	MisalignedLength {
		/// Array being decoded
		array: ArrayKind,
		/// Declared byte length
		length: u64,
		/// Element size in bytes
		element_size: usize,
	},

	/// Array range exceeds the buffer
	#[error(
		"{array} array range {offset}..{offset}+{length} exceeds buffer of {buffer_len} bytes"
	)]
	RangeOutOfBounds {
		/// Array being decoded
		array: ArrayKind,
		/// Absolute start offset
		offset: u64,
		/// Length in bytes
		length: u64,
		/// Total buffer length
		buffer_len: usize,
	},

	/// Clip range does not fit the clip stream
	#[error("Clip '{clip}' of movie '{movie}' has invalid range p={offset} s={size}: {message}")]
	ClipRange {
		/// Movie name
		movie: String,
		/// Clip name
		clip: String,
		/// Byte offset into the clip stream
		offset: u64,
		/// Byte size
		size: u64,
		/// Detailed message
		message: String,
	},

	/// Frame link or clip frame entry points to a missing frame
	#[error("Broken frame reference: {message}")]
	FrameLink {
		/// Detailed message
		message: String,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl FormatError {
	/// Creates an [`FormatError::InsufficientData`] error.
	pub fn insufficient_data(expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			expected,
			actual,
		}
	}

	/// Creates a [`FormatError::ClipRange`] error.
	pub fn clip_range(
		movie: &str,
		clip: &str,
		offset: u64,
		size: u64,
		message: impl Into<String>,
	) -> Self {
		Self::ClipRange {
			movie: movie.to_string(),
			clip: clip.to_string(),
			offset,
			size,
			message: message.into(),
		}
	}
}
