//! Package container constants.
//!
//! Offsets, sizes and table positions used by the binary container that wraps
//! the JSON manifest and the packed numeric arrays.

/// Size of the reserved header at the start of every package (8 bytes)
pub const HEADER_SIZE: usize = 8;

/// Size of the little-endian manifest length prefix (u16)
pub const MANIFEST_LENGTH_SIZE: usize = 2;

/// Offset where the UTF-8 manifest text starts
pub const MANIFEST_OFFSET: usize = HEADER_SIZE + MANIFEST_LENGTH_SIZE;

/// The array region starts on this boundary
pub const ARRAY_ALIGNMENT: usize = 4;

/// Number of entries per `position` triplet: byte offset, byte length, element size
pub const POSITION_STRIDE: usize = 3;

/// Number of typed arrays described by the `position` list
pub const ARRAY_COUNT: usize = 5;

/// Triplet index of the packed clip-index stream
pub const CLIP_STREAM_TRIPLET: usize = 0;

/// Triplet index of the display-frame array
pub const DISPLAY_FRAME_TRIPLET: usize = 1;

/// Triplet index of the rectangle array
pub const RECTANGLE_TRIPLET: usize = 2;

/// Triplet index of the transform array
pub const TRANSFORM_TRIPLET: usize = 3;

/// Triplet index of the color array
pub const COLOR_TRIPLET: usize = 4;

/// Components per display-frame record (display index, color index)
pub const DISPLAY_FRAME_STRIDE: usize = 2;

/// Components per rectangle record (x, y, width, height)
pub const RECTANGLE_STRIDE: usize = 4;

/// Components per transform record (a, b, c, d, tx, ty)
pub const TRANSFORM_STRIDE: usize = 6;

/// Components per color record (4 multipliers, 4 offsets)
pub const COLOR_STRIDE: usize = 8;

/// Packed indices per slot per cache frame (display frame, transform)
pub const SLOT_RECORD_WIDTH: usize = 2;

/// Color multipliers are stored as percentages
pub const COLOR_MULTIPLIER_SCALE: f32 = 0.01;

/// Index value marking "no entry" in the packed streams
pub const NO_INDEX: i16 = -1;

/// Computes the padding needed to align `offset` to [`ARRAY_ALIGNMENT`].
pub const fn alignment_padding(offset: usize) -> usize {
	(ARRAY_ALIGNMENT - offset % ARRAY_ALIGNMENT) % ARRAY_ALIGNMENT
}
