//! Per-clip content bounds cache.
//!
//! Every clip keeps one bounding box per cache frame. Boxes are computed the
//! first time any instance visits a cache frame and are never overwritten, so
//! the table can be shared by all instances playing the clip.

use std::sync::{
	OnceLock,
	atomic::{AtomicUsize, Ordering},
};

use crate::geom::Rectangle;

/// Append-only table of memoized cache-frame bounds for one clip.
#[derive(Debug, Default)]
pub struct ClipCache {
	rectangles: Box<[OnceLock<Rectangle>]>,
	computations: AtomicUsize,
}

impl ClipCache {
	/// Creates a table with room for `frame_count` cache frames.
	pub fn new(frame_count: usize) -> Self {
		Self {
			rectangles: (0..frame_count).map(|_| OnceLock::new()).collect(),
			computations: AtomicUsize::new(0),
		}
	}

	/// Number of cache frames the table can hold.
	pub fn frame_count(&self) -> usize {
		self.rectangles.len()
	}

	/// Returns the memoized bounds of `frame`, if already computed.
	pub fn get(&self, frame: usize) -> Option<Rectangle> {
		self.rectangles.get(frame).and_then(|cell| cell.get().copied())
	}

	/// Returns the memoized bounds of `frame`, computing them with `compute`
	/// on the first visit.
	///
	/// Frames outside the table are computed but not stored.
	pub fn get_or_compute(&self, frame: usize, compute: impl FnOnce() -> Rectangle) -> Rectangle {
		match self.rectangles.get(frame) {
			Some(cell) => *cell.get_or_init(|| {
				self.computations.fetch_add(1, Ordering::Relaxed);
				compute()
			}),
			None => {
				self.computations.fetch_add(1, Ordering::Relaxed);
				compute()
			}
		}
	}

	/// Number of cache frames with memoized bounds.
	pub fn cached_count(&self) -> usize {
		self.rectangles.iter().filter(|cell| cell.get().is_some()).count()
	}

	/// Number of times bounds were computed for this clip.
	pub fn computations(&self) -> usize {
		self.computations.load(Ordering::Relaxed)
	}
}
