//! Zero-copy typed views over the package buffer.
//!
//! Each view is a [`Bytes`] slice of the buffer the package was decoded from,
//! so cloning a view or taking a sub-view never copies array data. Elements are
//! read little-endian at a fixed stride; every access is bounds-checked.

use std::marker::PhantomData;

use bytes::Bytes;

use super::error::{ArrayKind, FormatError};

/// Numeric element stored in a packed array.
pub trait Element: Copy {
	/// Size of one element in bytes
	const SIZE: usize;

	/// Reads one element from exactly [`Self::SIZE`] little-endian bytes.
	fn read_le(bytes: &[u8]) -> Self;
}

impl Element for i16 {
	const SIZE: usize = 2;

	fn read_le(bytes: &[u8]) -> Self {
		i16::from_le_bytes([bytes[0], bytes[1]])
	}
}

impl Element for f32 {
	const SIZE: usize = 4;

	fn read_le(bytes: &[u8]) -> Self {
		f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
	}
}

/// Read-only typed view into a shared byte buffer.
#[derive(Clone)]
pub struct NumericArray<T: Element> {
	bytes: Bytes,
	/// Absolute offset of the view inside the backing buffer
	offset: usize,
	_marker: PhantomData<T>,
}

impl<T: Element> NumericArray<T> {
	/// Creates a view of `count` elements starting at `offset` inside `buffer`.
	///
	/// # Errors
	///
	/// Returns [`FormatError::RangeOutOfBounds`] if the range does not fit.
	pub fn view(
		buffer: &Bytes,
		array: ArrayKind,
		offset: usize,
		count: usize,
	) -> Result<Self, FormatError> {
		let length = count.checked_mul(T::SIZE);
		let end = length.and_then(|length| offset.checked_add(length));
		match (length, end) {
			(Some(_), Some(end)) if end <= buffer.len() => Ok(Self {
				bytes: buffer.slice(offset..end),
				offset,
				_marker: PhantomData,
			}),
			_ => Err(FormatError::RangeOutOfBounds {
				array,
				offset: offset as u64,
				length: (count as u64).saturating_mul(T::SIZE as u64),
				buffer_len: buffer.len(),
			}),
		}
	}

	/// Creates an empty view.
	pub fn empty() -> Self {
		Self {
			bytes: Bytes::new(),
			offset: 0,
			_marker: PhantomData,
		}
	}

	/// Number of elements in the view.
	pub fn len(&self) -> usize {
		self.bytes.len() / T::SIZE
	}

	/// Returns `true` if the view holds no elements.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Absolute byte offset of the first element inside the backing buffer.
	pub fn byte_offset(&self) -> usize {
		self.offset
	}

	/// Raw bytes of the view (shares the backing buffer).
	pub fn as_bytes(&self) -> &Bytes {
		&self.bytes
	}

	/// Reads the element at `index`.
	pub fn get(&self, index: usize) -> Option<T> {
		let start = index.checked_mul(T::SIZE)?;
		let bytes = self.bytes.get(start..start.checked_add(T::SIZE)?)?;
		Some(T::read_le(bytes))
	}

	/// Reads the element at a possibly negative index.
	pub fn get_signed(&self, index: i64) -> Option<T> {
		usize::try_from(index).ok().and_then(|index| self.get(index))
	}

	/// Reads `N` consecutive elements starting at `index`.
	pub fn get_array<const N: usize>(&self, index: usize) -> Option<[T; N]> {
		let start = index.checked_mul(T::SIZE)?;
		let end = start.checked_add(N.checked_mul(T::SIZE)?)?;
		let bytes = self.bytes.get(start..end)?;
		Some(std::array::from_fn(|i| T::read_le(&bytes[i * T::SIZE..(i + 1) * T::SIZE])))
	}

	/// Returns a sub-view of `count` elements starting at element `start`.
	///
	/// The sub-view shares the same backing buffer.
	pub fn slice(&self, start: usize, count: usize) -> Option<Self> {
		let begin = start.checked_mul(T::SIZE)?;
		let end = begin.checked_add(count.checked_mul(T::SIZE)?)?;
		if end > self.bytes.len() {
			return None;
		}
		Some(Self {
			bytes: self.bytes.slice(begin..end),
			offset: self.offset + begin,
			_marker: PhantomData,
		})
	}

	/// Iterates over all elements.
	pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
		self.bytes.chunks_exact(T::SIZE).map(T::read_le)
	}
}

impl<T: Element> Default for NumericArray<T> {
	fn default() -> Self {
		Self::empty()
	}
}

impl<T: Element> std::fmt::Debug for NumericArray<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NumericArray")
			.field("offset", &self.offset)
			.field("len", &self.len())
			.field("element_size", &T::SIZE)
			.finish()
	}
}
