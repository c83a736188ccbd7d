//! Time mapping and the per-tick update.

use std::sync::Arc;

use cutout_types::geom::Rectangle;
use cutout_types::package::ActionDescriptor;

use crate::event::{EventKind, MovieEvent};
use crate::host::{Host, SlotRef};

use super::MovieInstance;

/// Clip position derived from raw elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePosition {
	/// Position inside the current loop, in seconds
	pub current_time: f64,
	/// Completed loops
	pub current_play_times: u32,
	/// The final loop finished
	pub completed: bool,
}

/// Maps raw elapsed `time` onto a clip of `duration` seconds played
/// `play_times` times (0 loops forever).
///
/// Negative time counts loops backwards from the end of the clip. A clip
/// without positive duration stays at position zero.
pub fn map_time(time: f64, duration: f64, play_times: u32) -> TimePosition {
	if play_times > 0 && time.abs() >= duration * f64::from(play_times) {
		return TimePosition {
			current_time: if time < 0.0 { 0.0 } else { duration.max(0.0) },
			current_play_times: play_times,
			completed: true,
		};
	}

	if duration <= 0.0 || !time.is_finite() {
		return TimePosition {
			current_time: 0.0,
			current_play_times: 0,
			completed: false,
		};
	}

	let (current_time, loops) = if time < 0.0 {
		(duration - (-time % duration), (-time / duration).floor())
	} else {
		(time % duration, (time / duration).floor())
	};
	let mut current_play_times = loops as u32;
	if play_times > 0 {
		current_play_times = current_play_times.min(play_times);
	}

	TimePosition {
		current_time,
		current_play_times,
		completed: false,
	}
}

/// Wraps `time` into `0..duration`.
pub fn wrap_time(time: f64, duration: f64) -> f64 {
	if duration <= 0.0 || !time.is_finite() {
		return 0.0;
	}
	let wrapped = time % duration;
	if wrapped < 0.0 { wrapped + duration } else { wrapped }
}

impl MovieInstance {
	/// Advances playback by `delta` seconds.
	///
	/// Does nothing unless playing. The sign of `delta` is ignored; play
	/// backwards with a negative time scale. Problems found in the package
	/// while ticking are logged and skipped.
	pub fn advance_time(&mut self, delta: f64, host: &mut Host<'_>) {
		if self.disposed {
			return;
		}
		if self.dispose_handle.is_requested() {
			self.dispose(host);
			return;
		}
		if !self.playing {
			return;
		}
		self.advance(delta, host, false);
	}

	/// One tick. `force` resolves the pose even if the position is unchanged.
	pub(super) fn advance(&mut self, delta: f64, host: &mut Host<'_>, force: bool) {
		let Some(clip_index) = self.clip_index else {
			return;
		};
		let package = Arc::clone(&self.package);
		let movie = &package.movies()[self.movie_index];
		let clip = &movie.clip[clip_index];

		let delta = if delta.is_finite() { delta.abs() } else { 0.0 };
		let passed = delta * self.time_scale;
		self.time += passed * self.clip_time_scale;

		let position = map_time(self.time, clip.duration, self.play_times);
		self.completed = position.completed;
		let prev_time = self.current_time;
		let prev_play_times = self.current_play_times;

		if !force
			&& position.current_time == prev_time
			&& position.current_play_times == prev_play_times
		{
			if self.completed {
				self.playing = false;
			}
			self.advance_children(passed, host);
			self.finish_tick(host);
			return;
		}

		if let Some(cache_frame) = self.cache_frame_at(clip_index, position.current_time)
			&& self.cache_frame_index != Some(cache_frame)
		{
			self.cache_frame_index = Some(cache_frame);
			self.update_slots(clip_index, cache_frame, !movie.is_nested, host);
		}

		if self.completed {
			self.playing = false;
		}

		if !self.started {
			self.started = true;
			self.emit(EventKind::Start, None, host);
		}

		self.reversing = position.current_time < prev_time && position.current_play_times == prev_play_times;
		self.cross_frames(
			clip_index,
			prev_time,
			position.current_time,
			position.current_play_times != prev_play_times,
			host,
		);
		self.current_time = position.current_time;

		self.advance_children(passed, host);

		if position.current_play_times != prev_play_times {
			self.current_play_times = position.current_play_times;
			self.emit(EventKind::LoopComplete, None, host);
			if self.completed {
				self.emit(EventKind::Complete, None, host);
			}
		}

		self.apply_pending_plays();
		self.finish_tick(host);
	}

	/// Cache frame for `current_time`, clamped to the samples the clip stores.
	fn cache_frame_at(&self, clip_index: usize, current_time: f64) -> Option<usize> {
		let last = self.package.clip_cache(self.movie_index, clip_index)?.frame_count().checked_sub(1)?;
		let clip = &self.package.movies()[self.movie_index].clip[clip_index];
		let frame = (current_time * clip.cache_time_to_frame_scale).floor();
		Some(if frame > 0.0 { (frame as usize).min(last) } else { 0 })
	}

	fn update_slots(&mut self, clip_index: usize, cache_frame: usize, track_bounds: bool, host: &mut Host<'_>) {
		let package = Arc::clone(&self.package);
		let cache = package.clip_cache(self.movie_index, clip_index).filter(|_| track_bounds);
		let needs_bounds = cache.is_some_and(|cache| cache.get(cache_frame).is_none());

		let mut bounds: Option<Rectangle> = None;
		for slot_index in 0..self.slots.len() {
			let contribution = self.resolve_slot(slot_index, cache_frame, host);
			if let Some(rect) = contribution.filter(|_| needs_bounds) {
				bounds = Some(bounds.map_or(rect, |bounds| bounds.union(&rect)));
			}
		}

		if let Some(cache) = cache {
			let previous = self.cache_rectangle;
			let rect = cache.get_or_compute(cache_frame, || bounds.or(previous).unwrap_or_default());
			self.cache_rectangle = Some(rect);
			host.renderer.set_content_bounds(self.node, &rect);
		}
	}

	/// Advances nested movies in attach order.
	fn advance_children(&mut self, passed: f64, host: &mut Host<'_>) {
		let mut position = 0;
		while position < self.children.len() {
			let slot_index = self.children[position];
			let slot_ref = SlotRef {
				node: self.node,
				index: slot_index,
			};
			let slot = &mut self.slots[slot_index];
			let Some(child) = slot.active_child_mut() else {
				self.children.remove(position);
				continue;
			};

			child.advance_time(passed, host);
			if child.is_disposed() {
				let name = child.name().to_string();
				host.renderer.detach_child_display(slot_ref, child.node());
				slot.forget_child(&name);
				self.children.remove(position);
				continue;
			}
			position += 1;
		}
	}

	fn finish_tick(&mut self, host: &mut Host<'_>) {
		if self.dispose_handle.is_requested() && !self.disposed {
			self.dispose(host);
		}
	}

	pub(super) fn emit(&self, kind: EventKind, action: Option<&ActionDescriptor>, host: &mut Host<'_>) {
		if !host.events.has_listener(kind) {
			return;
		}
		let event = MovieEvent {
			kind,
			movie: self.id,
			movie_name: self.name().to_string(),
			clip_name: self.clip_name().unwrap_or_default().to_string(),
			name: action.map(|action| action.name.clone()),
			slot: action.and_then(|action| action.slot.clone()),
			data: action.and_then(|action| action.data.clone()),
		};
		log::trace!("Movie '{}' {} emits {kind}", event.movie_name, self.id);
		host.events.emit(&event);
	}
}
