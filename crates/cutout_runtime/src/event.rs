//! Playback notifications.

use std::fmt::Display;

use crate::host::MovieId;

/// Kind of playback notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// First tick after a clip started playing
	Start,
	/// The play count changed
	LoopComplete,
	/// The clip finished its final loop
	Complete,
	/// A timeline frame event was crossed
	FrameEvent,
	/// A timeline sound event was crossed
	SoundEvent,
}

impl Display for EventKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::Start => "start",
			Self::LoopComplete => "loopComplete",
			Self::Complete => "complete",
			Self::FrameEvent => "frameEvent",
			Self::SoundEvent => "soundEvent",
		};
		write!(f, "{name}")
	}
}

/// Notification emitted by a movie instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieEvent {
	/// Event kind
	pub kind: EventKind,
	/// Emitting instance
	pub movie: MovieId,
	/// Movie name of the emitting instance
	pub movie_name: String,
	/// Clip playing when the event fired
	pub clip_name: String,
	/// Timeline event name (frame and sound events only)
	pub name: Option<String>,
	/// Slot named by the timeline event
	pub slot: Option<String>,
	/// Free-form timeline payload
	pub data: Option<serde_json::Value>,
}

/// Receiver of playback notifications.
pub trait EventSink {
	/// Whether anyone listens for `kind`. Events without listeners are not built.
	fn has_listener(&self, _kind: EventKind) -> bool {
		true
	}

	/// Delivers an event.
	fn emit(&mut self, event: &MovieEvent);
}

impl EventSink for () {
	fn has_listener(&self, _kind: EventKind) -> bool {
		false
	}

	fn emit(&mut self, _event: &MovieEvent) {}
}

impl EventSink for Vec<MovieEvent> {
	fn emit(&mut self, event: &MovieEvent) {
		self.push(event.clone());
	}
}
