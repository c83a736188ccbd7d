//! JSON manifest descriptors.
//!
//! The manifest is the UTF-8 JSON document embedded after the package header.
//! It names every movie, slot, clip, display and timeline frame; numeric data
//! lives in the packed arrays and is addressed by index from here.

use serde::{Deserialize, Deserializer, Serialize};

/// Root object of the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupManifest {
	/// Group name (used when no explicit name is given at registration)
	pub name: String,
	/// Format version
	#[serde(default)]
	pub version: f64,
	/// Flat `[byteOffset, byteLength, elementSize]` triplets
	pub position: Vec<u64>,
	/// Display table
	#[serde(default)]
	pub display: Vec<DisplayDescriptor>,
	/// Global frame table shared by all clips
	#[serde(default)]
	pub frame: Vec<FrameDescriptor>,
	/// Movies in the group
	#[serde(default)]
	pub movie: Vec<MovieDescriptor>,
}

/// Kind of content a display shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum DisplayType {
	/// Atlas image region
	#[default]
	Image,
	/// Nested movie
	Armature,
	/// Mesh (not supported by cutout playback, shown as nothing)
	Mesh,
	/// Unrecognized type code
	Unknown(i32),
}

impl From<i32> for DisplayType {
	fn from(value: i32) -> Self {
		match value {
			0 => Self::Image,
			1 => Self::Armature,
			2 => Self::Mesh,
			other => Self::Unknown(other),
		}
	}
}

impl From<DisplayType> for i32 {
	fn from(value: DisplayType) -> Self {
		match value {
			DisplayType::Image => 0,
			DisplayType::Armature => 1,
			DisplayType::Mesh => 2,
			DisplayType::Unknown(other) => other,
		}
	}
}

/// Slot blend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
#[allow(missing_docs)]
pub enum BlendMode {
	#[default]
	Normal,
	Add,
	Alpha,
	Darken,
	Difference,
	Erase,
	HardLight,
	Invert,
	Layer,
	Lighten,
	Multiply,
	Overlay,
	Screen,
	Subtract,
	/// Unrecognized blend code
	Unknown(i32),
}

impl From<i32> for BlendMode {
	fn from(value: i32) -> Self {
		match value {
			0 => Self::Normal,
			1 => Self::Add,
			2 => Self::Alpha,
			3 => Self::Darken,
			4 => Self::Difference,
			5 => Self::Erase,
			6 => Self::HardLight,
			7 => Self::Invert,
			8 => Self::Layer,
			9 => Self::Lighten,
			10 => Self::Multiply,
			11 => Self::Overlay,
			12 => Self::Screen,
			13 => Self::Subtract,
			other => Self::Unknown(other),
		}
	}
}

impl From<BlendMode> for i32 {
	fn from(value: BlendMode) -> Self {
		match value {
			BlendMode::Normal => 0,
			BlendMode::Add => 1,
			BlendMode::Alpha => 2,
			BlendMode::Darken => 3,
			BlendMode::Difference => 4,
			BlendMode::Erase => 5,
			BlendMode::HardLight => 6,
			BlendMode::Invert => 7,
			BlendMode::Layer => 8,
			BlendMode::Lighten => 9,
			BlendMode::Multiply => 10,
			BlendMode::Overlay => 11,
			BlendMode::Screen => 12,
			BlendMode::Subtract => 13,
			BlendMode::Unknown(other) => other,
		}
	}
}

/// Type code of a timeline action or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ActionType {
	/// Play a clip
	Play,
	/// Stop playback (reserved)
	Stop,
	/// Jump and play (reserved)
	GotoAndPlay,
	/// Jump and stop (reserved)
	GotoAndStop,
	/// Fade into a clip; played like [`ActionType::Play`]
	FadeIn,
	/// Fade out (reserved)
	FadeOut,
	/// Frame event notification
	FrameEvent,
	/// Sound event notification
	SoundEvent,
	/// Unrecognized code
	Unknown(i32),
}

impl From<i32> for ActionType {
	fn from(value: i32) -> Self {
		match value {
			0 => Self::Play,
			1 => Self::Stop,
			2 => Self::GotoAndPlay,
			3 => Self::GotoAndStop,
			4 => Self::FadeIn,
			5 => Self::FadeOut,
			10 => Self::FrameEvent,
			11 => Self::SoundEvent,
			other => Self::Unknown(other),
		}
	}
}

impl From<ActionType> for i32 {
	fn from(value: ActionType) -> Self {
		match value {
			ActionType::Play => 0,
			ActionType::Stop => 1,
			ActionType::GotoAndPlay => 2,
			ActionType::GotoAndStop => 3,
			ActionType::FadeIn => 4,
			ActionType::FadeOut => 5,
			ActionType::FrameEvent => 10,
			ActionType::SoundEvent => 11,
			ActionType::Unknown(other) => other,
		}
	}
}

/// Entry of the display table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayDescriptor {
	/// Display name; for nested movies this is the movie name
	pub name: String,
	/// Display type
	#[serde(rename = "type", default)]
	pub kind: DisplayType,
	/// Atlas texture index (0 when absent)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub texture_index: Option<usize>,
	/// Quad index into the rectangle array
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub region_index: Option<usize>,
}

impl DisplayDescriptor {
	/// Creates an image display showing rectangle quad `region_index`.
	pub fn image(name: &str, region_index: usize) -> Self {
		Self {
			name: name.to_string(),
			kind: DisplayType::Image,
			texture_index: None,
			region_index: Some(region_index),
		}
	}

	/// Creates a display that embeds the movie called `movie_name`.
	pub fn armature(movie_name: &str) -> Self {
		Self {
			name: movie_name.to_string(),
			kind: DisplayType::Armature,
			texture_index: None,
			region_index: None,
		}
	}
}

/// Action or event attached to a timeline frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
	/// Type code
	#[serde(rename = "type")]
	pub kind: ActionType,
	/// Event name or target clip name
	#[serde(default)]
	pub name: String,
	/// Free-form payload
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<serde_json::Value>,
	/// Slot the action targets, or the slot reported with the event
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub slot: Option<String>,
}

impl ActionDescriptor {
	/// Creates an action of the given kind.
	pub fn new(kind: ActionType, name: &str, slot: Option<&str>) -> Self {
		Self {
			kind,
			name: name.to_string(),
			data: None,
			slot: slot.map(str::to_string),
		}
	}

	/// Creates a frame event.
	pub fn frame_event(name: &str) -> Self {
		Self::new(ActionType::FrameEvent, name, None)
	}

	/// Creates a sound event.
	pub fn sound_event(name: &str) -> Self {
		Self::new(ActionType::SoundEvent, name, None)
	}
}

/// Timeline frame in the group's global frame table.
///
/// Frames of one clip form a circular doubly linked list ordered by time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDescriptor {
	/// Index of the previous frame
	pub prev: i64,
	/// Index of the next frame
	pub next: i64,
	/// Start of the frame in seconds
	pub position: f64,
	/// Actions and events fired when the frame is crossed
	#[serde(default, deserialize_with = "skip_nulls")]
	pub action_and_event: Vec<ActionDescriptor>,
}

impl FrameDescriptor {
	/// Creates a frame with no actions.
	pub fn new(prev: usize, next: usize, position: f64) -> Self {
		Self {
			prev: prev as i64,
			next: next as i64,
			position,
			action_and_event: Vec::new(),
		}
	}

	/// Returns the previous frame index, if it is non-negative.
	pub fn prev_index(&self) -> Option<usize> {
		usize::try_from(self.prev).ok()
	}

	/// Returns the next frame index, if it is non-negative.
	pub fn next_index(&self) -> Option<usize> {
		usize::try_from(self.next).ok()
	}
}

/// Named animation rig: slots plus clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDescriptor {
	/// Movie name
	pub name: String,
	/// Timeline frame rate used to index clip frame lists
	pub frame_rate: f64,
	/// Authoring type code
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<i32>,
	/// Default clip to play
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<String>,
	/// Nested movies skip content-bounds caching
	#[serde(default)]
	pub is_nested: bool,
	/// Slots in draw order
	#[serde(default)]
	pub slot: Vec<SlotDescriptor>,
	/// Clips
	#[serde(default)]
	pub clip: Vec<ClipDescriptor>,
}

impl MovieDescriptor {
	/// Creates a movie without slots or clips.
	pub fn new(name: &str, frame_rate: f64) -> Self {
		Self {
			name: name.to_string(),
			frame_rate,
			kind: None,
			action: None,
			is_nested: false,
			slot: Vec::new(),
			clip: Vec::new(),
		}
	}

	/// Finds a clip by name. When names repeat, the last match wins.
	pub fn find_clip(&self, name: &str) -> Option<usize> {
		self.clip.iter().rposition(|clip| clip.name == name)
	}

	/// Finds a slot by name (first match).
	pub fn find_slot(&self, name: &str) -> Option<usize> {
		self.slot.iter().position(|slot| slot.name == name)
	}

	/// Packed indices per cache frame (two per slot).
	pub fn frame_width(&self) -> usize {
		super::constants::SLOT_RECORD_WIDTH * self.slot.len()
	}
}

/// Attachment point showing one display at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDescriptor {
	/// Slot name
	pub name: String,
	/// Blend mode
	#[serde(default)]
	pub blend_mode: BlendMode,
	/// Clip played by a nested movie shown in this slot
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<String>,
}

impl SlotDescriptor {
	/// Creates a slot with normal blending.
	pub fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			blend_mode: BlendMode::Normal,
			action: None,
		}
	}
}

/// Named timeline of a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipDescriptor {
	/// Clip name
	pub name: String,
	/// Authored play count, 0 loops forever
	pub play_times: u32,
	/// Duration in seconds
	pub duration: f64,
	/// Playback-rate scale; the clip time scale is its reciprocal
	#[serde(default = "default_scale")]
	pub scale: f64,
	/// Cache frames per second of clip time
	pub cache_time_to_frame_scale: f64,
	/// Byte offset into the clip stream
	pub p: u64,
	/// Byte size inside the clip stream
	pub s: u64,
	/// Global frame index per timeline frame (`1 / frameRate` steps)
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub frame: Vec<usize>,
}

fn default_scale() -> f64 {
	1.0
}

fn skip_nulls<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	let items = Vec::<Option<T>>::deserialize(deserializer)?;
	Ok(items.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_manifest_from_json() {
		let json = r#"{
			"name": "hero",
			"version": 4.7,
			"position": [0, 8, 2, 8, 4, 2, 12, 16, 4, 28, 24, 4, 52, 16, 2],
			"display": [{"name": "body", "type": 0, "regionIndex": 0}, {"name": "cape", "type": 1}],
			"frame": [{"prev": 0, "next": 0, "position": 0, "actionAndEvent": [null, {"type": 10, "name": "step"}]}],
			"movie": [{
				"name": "hero",
				"frameRate": 24,
				"action": "idle",
				"slot": [{"name": "body"}, {"name": "cape", "blendMode": 1, "action": "wave"}],
				"clip": [{"name": "idle", "playTimes": 0, "duration": 1, "scale": 1,
					"cacheTimeToFrameScale": 24, "p": 0, "s": 8, "frame": [0]}]
			}]
		}"#;

		let manifest: GroupManifest = serde_json::from_str(json).unwrap();
		assert_eq!(manifest.position.len(), 15);
		assert_eq!(manifest.display[0].kind, DisplayType::Image);
		assert_eq!(manifest.display[1].kind, DisplayType::Armature);
		assert_eq!(manifest.frame[0].action_and_event.len(), 1);
		assert_eq!(manifest.frame[0].action_and_event[0].kind, ActionType::FrameEvent);

		let movie = &manifest.movie[0];
		assert_eq!(movie.slot[0].blend_mode, BlendMode::Normal);
		assert_eq!(movie.slot[1].blend_mode, BlendMode::Add);
		assert_eq!(movie.frame_width(), 4);
		assert!(!movie.is_nested);
	}

	#[test]
	fn test_find_clip_last_match_wins() {
		let mut movie = MovieDescriptor::new("m", 24.0);
		for (name, duration) in [("walk", 1.0), ("run", 2.0), ("walk", 3.0)] {
			movie.clip.push(ClipDescriptor {
				name: name.to_string(),
				play_times: 0,
				duration,
				scale: 1.0,
				cache_time_to_frame_scale: 24.0,
				p: 0,
				s: 0,
				frame: Vec::new(),
			});
		}
		assert_eq!(movie.find_clip("walk"), Some(2));
		assert_eq!(movie.find_clip("run"), Some(1));
		assert_eq!(movie.find_clip("jump"), None);
	}

	#[test]
	fn test_unknown_codes_roundtrip() {
		assert_eq!(BlendMode::from(42), BlendMode::Unknown(42));
		assert_eq!(i32::from(BlendMode::Unknown(42)), 42);
		assert_eq!(ActionType::from(7), ActionType::Unknown(7));
		assert_eq!(i32::from(ActionType::SoundEvent), 11);
		assert_eq!(DisplayType::from(-3), DisplayType::Unknown(-3));
	}
}
