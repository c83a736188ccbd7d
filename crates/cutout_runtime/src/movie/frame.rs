//! Timeline frame crossing and action dispatch.
//!
//! Timeline frames of a clip form a circular linked list in the group frame
//! table. The clip's frame lookup maps every `1 / frameRate` step to the frame
//! active at that step. When the active frame changes, every frame between the
//! previously crossed one and the new one fires its actions in list order.
//! Moving forward fires the frames entered; moving backward fires the frames
//! left behind.

use std::sync::Arc;

use cutout_types::package::{ActionDescriptor, ActionType, FrameDescriptor};

use crate::event::EventKind;
use crate::host::Host;

use super::MovieInstance;

/// Timeline frame active at `time`, clamped to the lookup.
fn frame_at(lookup: &[usize], frames: &[FrameDescriptor], frame_rate: f64, time: f64) -> Option<usize> {
	let last = lookup.len().checked_sub(1)?;
	let step = (time * frame_rate).floor();
	let step = if step > 0.0 { (step as usize).min(last) } else { 0 };
	lookup.get(step).copied().filter(|&frame| frame < frames.len())
}

fn linked(frames: &[FrameDescriptor], link: Option<usize>) -> Option<usize> {
	link.filter(|&frame| frame < frames.len())
}

impl MovieInstance {
	/// Fires the actions of every timeline frame crossed since the last tick.
	pub(super) fn cross_frames(
		&mut self,
		clip_index: usize,
		prev_time: f64,
		current_time: f64,
		play_times_changed: bool,
		host: &mut Host<'_>,
	) {
		let package = Arc::clone(&self.package);
		let movie = &package.movies()[self.movie_index];
		let lookup = &movie.clip[clip_index].frame;
		let frames = package.frames();

		let Some(current) = frame_at(lookup, frames, movie.frame_rate, current_time) else {
			return;
		};
		if self.current_frame == Some(current) {
			return;
		}
		let previous = self.current_frame.replace(current);

		// single frame timeline
		if lookup.len() == 1 || frames[current].next_index() == Some(current) {
			self.fire_frame(&frames[current], host);
			return;
		}

		if self.reversing {
			let start = previous.or_else(|| frame_at(lookup, frames, movie.frame_rate, prev_time));
			self.walk_backward(frames, start, current, host);
		} else {
			let start = match previous {
				Some(frame) => linked(frames, frames[frame].next_index()),
				None => match frame_at(lookup, frames, movie.frame_rate, prev_time) {
					Some(frame) if prev_time <= frames[frame].position || play_times_changed => Some(frame),
					Some(frame) if frame == current => return,
					Some(frame) => linked(frames, frames[frame].next_index()),
					None => None,
				},
			};
			self.walk_forward(frames, start, current, host);
		}
	}

	/// Fires `start` and every following frame up to and including `current`.
	fn walk_forward(
		&mut self,
		frames: &[FrameDescriptor],
		start: Option<usize>,
		current: usize,
		host: &mut Host<'_>,
	) {
		let mut crossed = start;
		for _ in 0..=frames.len() {
			let Some(frame) = crossed else {
				log::debug!("Movie '{}': broken timeline link before frame {current}", self.name());
				return;
			};
			self.fire_frame(&frames[frame], host);
			if frame == current {
				return;
			}
			crossed = linked(frames, frames[frame].next_index());
		}
		log::debug!("Movie '{}': timeline walk never reached frame {current}", self.name());
	}

	/// Fires `start` and every preceding frame down to, but excluding, `current`.
	fn walk_backward(
		&mut self,
		frames: &[FrameDescriptor],
		start: Option<usize>,
		current: usize,
		host: &mut Host<'_>,
	) {
		let mut crossed = start;
		for _ in 0..=frames.len() {
			let Some(frame) = crossed else {
				log::debug!("Movie '{}': broken timeline link before frame {current}", self.name());
				return;
			};
			if frame == current {
				return;
			}
			self.fire_frame(&frames[frame], host);
			crossed = linked(frames, frames[frame].prev_index());
		}
		log::debug!("Movie '{}': timeline walk never reached frame {current}", self.name());
	}

	fn fire_frame(&mut self, frame: &FrameDescriptor, host: &mut Host<'_>) {
		for action in &frame.action_and_event {
			self.dispatch_action(action, host);
		}
	}

	fn dispatch_action(&mut self, action: &ActionDescriptor, host: &mut Host<'_>) {
		match action.kind {
			ActionType::SoundEvent => self.emit(EventKind::SoundEvent, Some(action), host),
			ActionType::FrameEvent => self.emit(EventKind::FrameEvent, Some(action), host),
			ActionType::Play | ActionType::FadeIn => match &action.slot {
				Some(slot) => self.play_in_slot(slot, &action.name),
				None => self.pending_plays.push(action.name.clone()),
			},
			other => {
				log::trace!("Movie '{}': ignoring {other:?} action '{}'", self.name(), action.name);
			}
		}
	}

	fn play_in_slot(&mut self, slot: &str, clip: &str) {
		let Some(child) = self.child_mut(slot) else {
			log::debug!("No nested movie in slot '{slot}' to play '{clip}'");
			return;
		};
		let clip = (!clip.is_empty()).then_some(clip);
		if let Err(error) = child.play(clip, None) {
			log::debug!("Slot '{slot}': {error}");
		}
	}

	/// Plays clips requested by this instance's own timeline during the tick.
	pub(super) fn apply_pending_plays(&mut self) {
		for clip in std::mem::take(&mut self.pending_plays) {
			if self.disposed || self.dispose_handle.is_requested() {
				return;
			}
			let clip = (!clip.is_empty()).then_some(clip.as_str());
			if let Err(error) = self.play(clip, None) {
				log::debug!("Movie '{}': timeline play failed: {error}", self.name());
			}
		}
	}
}
