//! Movie instances and playback.
//!
//! A [`MovieInstance`] plays the clips of one movie from a shared package.
//! Each tick maps elapsed time to a clip position, resolves the cache frame
//! for that position, re-derives every slot from the clip's packed index
//! stream and pushes only the changes to the host renderer.
//!
//! ```text
//! advance_time(delta)
//!   time      += |delta| * time_scale * clip_time_scale
//!   position   = map_time(time, duration, play_times)
//!   cacheFrame = floor(position * cacheTimeToFrameScale)
//!   slots      <- clip stream record of cacheFrame (only on change)
//!   events     <- start, crossed timeline frames, loop complete, complete
//!   children   <- advance_time(|delta| * time_scale)
//! ```

mod frame;
mod playback;
mod slot;


use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cutout_types::geom::Rectangle;
use cutout_types::package::{MovieDescriptor, NumericArray, Package};

use crate::error::MovieError;
use crate::host::{Host, MovieId, NodeId, SlotRef, TickSource};

pub use playback::{TimePosition, map_time, wrap_time};
pub use slot::{DisplayKind, SlotSnapshot, SlotState};

/// Delta used to resolve the initial pose of a new instance.
pub const INITIAL_POSE_DELTA: f64 = 0.000_001;

/// Deepest chain of nested movies built from armature displays.
pub const MAX_NESTING_DEPTH: usize = 8;

/// Options for building a movie instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
	/// Register with the host tick source
	pub self_driven: bool,
	/// Initial instance time scale
	pub time_scale: f64,
}

impl Default for BuildOptions {
	fn default() -> Self {
		Self {
			self_driven: true,
			time_scale: 1.0,
		}
	}
}

impl BuildOptions {
	/// Options used for nested movies: ticked by their parent.
	pub fn nested() -> Self {
		Self {
			self_driven: false,
			..Self::default()
		}
	}
}

/// Playback state of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
	/// Paused or never started
	Stopped,
	/// Advancing on every tick
	Playing,
	/// Finished its final loop
	Completed,
}

/// Shared flag through which host callbacks request disposal.
///
/// A request made while the instance is ticking is honored when the tick
/// ends; a request made between ticks is honored at the start of the next one.
#[derive(Debug, Clone, Default)]
pub struct DisposeHandle(Arc<AtomicBool>);

impl DisposeHandle {
	/// Requests disposal.
	pub fn request(&self) {
		self.0.store(true, Ordering::Release);
	}

	/// Returns `true` once disposal was requested or performed.
	pub fn is_requested(&self) -> bool {
		self.0.load(Ordering::Acquire)
	}
}

/// Playing instance of a movie.
#[derive(Debug)]
pub struct MovieInstance {
	id: MovieId,
	node: NodeId,
	package: Arc<Package>,
	group_name: String,
	movie_index: usize,
	depth: usize,
	slots: Vec<SlotState>,
	frame_width: usize,

	clip_index: Option<usize>,
	clip_indices: NumericArray<i16>,
	time: f64,
	current_time: f64,
	play_times: u32,
	current_play_times: u32,
	playing: bool,
	completed: bool,
	started: bool,
	reversing: bool,
	cache_frame_index: Option<usize>,
	current_frame: Option<usize>,
	cache_rectangle: Option<Rectangle>,
	/// Slots with an active nested movie, in attach order
	children: Vec<usize>,
	/// Clips requested by timeline actions on this instance
	pending_plays: Vec<String>,

	time_scale: f64,
	clip_time_scale: f64,
	self_driven: bool,
	disposed: bool,
	dispose_handle: DisposeHandle,
}

impl MovieInstance {
	/// Builds an instance of the movie at `movie_index` in `package`.
	///
	/// The instance gets a host node, optionally registers with the tick
	/// source, then resolves the first pose of its default clip and stops.
	///
	/// # Errors
	///
	/// Returns [`MovieError::MovieNotFound`] if `movie_index` is out of range.
	pub fn new(
		package: Arc<Package>,
		group_name: &str,
		movie_index: usize,
		options: &BuildOptions,
		host: &mut Host<'_>,
	) -> Result<Self, MovieError> {
		Self::build(package, group_name, movie_index, options, 0, host)
	}

	pub(crate) fn build(
		package: Arc<Package>,
		group_name: &str,
		movie_index: usize,
		options: &BuildOptions,
		depth: usize,
		host: &mut Host<'_>,
	) -> Result<Self, MovieError> {
		let Some(descriptor) = package.movie(movie_index) else {
			return Err(MovieError::movie_not_found(&format!("#{movie_index}"), Some(group_name)));
		};

		let slot_names: Vec<&str> = descriptor.slot.iter().map(|slot| slot.name.as_str()).collect();
		let node = host.renderer.create_node(&descriptor.name, &slot_names);
		let slots: Vec<SlotState> =
			descriptor.slot.iter().enumerate().map(|(index, slot)| SlotState::new(index, slot)).collect();
		for slot in &slots {
			host.renderer.set_blend_mode(
				SlotRef {
					node,
					index: slot.index(),
				},
				slot.blend_mode(),
			);
		}

		let mut movie = Self {
			id: MovieId::next(),
			node,
			frame_width: descriptor.frame_width(),
			package: Arc::clone(&package),
			group_name: group_name.to_string(),
			movie_index,
			depth,
			slots,
			clip_index: None,
			clip_indices: NumericArray::empty(),
			time: 0.0,
			current_time: 0.0,
			play_times: 0,
			current_play_times: 0,
			playing: false,
			completed: false,
			started: false,
			reversing: false,
			cache_frame_index: None,
			current_frame: None,
			cache_rectangle: None,
			children: Vec::new(),
			pending_plays: Vec::new(),
			time_scale: options.time_scale,
			clip_time_scale: 1.0,
			self_driven: false,
			disposed: false,
			dispose_handle: DisposeHandle::default(),
		};

		log::debug!(
			"Built movie '{}' {} from group '{}' ({} slots, {} clips)",
			movie.name(),
			movie.id,
			group_name,
			movie.slots.len(),
			movie.descriptor().clip.len()
		);

		movie.set_self_driven(options.self_driven, host.ticker);
		if let Err(error) = movie.play(None, None) {
			log::debug!("Movie '{}' has no initial pose: {error}", movie.name());
		}
		movie.advance_time(INITIAL_POSE_DELTA, host);
		movie.stop();

		Ok(movie)
	}

	fn descriptor(&self) -> &MovieDescriptor {
		&self.package.movies()[self.movie_index]
	}

	/// Plays a clip.
	///
	/// With a name, the clip is looked up by exact name (the last match wins)
	/// and restarted from time zero. `play_times` of `None` uses the clip's
	/// authored count; `Some(0)` loops forever.
	///
	/// Without a name, a playing instance is left alone, and a stopped or
	/// completed one restarts its current clip from time zero with the
	/// previous play count. An instance with no clip loaded plays the movie's
	/// default action, or its first clip.
	///
	/// # Errors
	///
	/// Returns [`MovieError::ClipNotFound`] if the clip does not exist, and
	/// [`MovieError::Disposed`] on a disposed instance. State is unchanged on
	/// error.
	pub fn play(&mut self, clip: Option<&str>, play_times: Option<u32>) -> Result<(), MovieError> {
		if self.disposed {
			return Err(MovieError::Disposed);
		}

		let package = Arc::clone(&self.package);
		let movie = &package.movies()[self.movie_index];
		match (clip, self.clip_index) {
			(Some(name), _) => {
				let Some(clip_index) = movie.find_clip(name) else {
					log::warn!("No clip '{name}' in movie '{}'", movie.name);
					return Err(MovieError::clip_not_found(&movie.name, name));
				};
				self.load_clip(clip_index, play_times);
			}
			(None, Some(clip_index)) => {
				if self.playing && !self.completed {
					return Ok(());
				}
				self.load_clip(clip_index, Some(play_times.unwrap_or(self.play_times)));
			}
			(None, None) => match &movie.action {
				Some(action) => return self.play(Some(action), play_times),
				None if !movie.clip.is_empty() => self.load_clip(0, play_times),
				None => log::debug!("Movie '{}' has no clips to play", movie.name),
			},
		}
		Ok(())
	}

	fn load_clip(&mut self, clip_index: usize, play_times: Option<u32>) {
		let package = Arc::clone(&self.package);
		let clip = &package.movies()[self.movie_index].clip[clip_index];

		self.clip_indices =
			package.clip_indices(self.movie_index, clip_index).unwrap_or_else(|error| {
				log::debug!("Clip '{}' plays without poses: {error}", clip.name);
				NumericArray::empty()
			});
		self.clip_index = Some(clip_index);
		self.play_times = play_times.unwrap_or(clip.play_times);
		self.clip_time_scale = if clip.scale.is_finite() && clip.scale != 0.0 {
			1.0 / clip.scale
		} else {
			1.0
		};

		self.time = 0.0;
		self.current_time = 0.0;
		self.current_play_times = 0;
		self.cache_frame_index = None;
		self.current_frame = None;
		self.cache_rectangle = None;
		self.playing = true;
		self.started = false;
		self.completed = false;
		self.reversing = false;

		log::trace!(
			"Movie '{}' {} plays clip '{}' x{}",
			self.name(),
			self.id,
			clip.name,
			self.play_times
		);
	}

	/// Pauses playback, keeping the current position.
	pub fn stop(&mut self) {
		self.playing = false;
	}

	/// Plays a clip from `time` seconds, wrapped into the clip's duration.
	///
	/// # Errors
	///
	/// Same as [`MovieInstance::play`].
	pub fn goto_and_play(
		&mut self,
		clip: Option<&str>,
		time: f64,
		play_times: Option<u32>,
	) -> Result<(), MovieError> {
		self.play(clip, play_times)?;
		let time = wrap_time(time, self.total_time());
		self.time = time;
		self.current_time = time;
		Ok(())
	}

	/// Shows the pose of a clip at `time` seconds and stops there.
	///
	/// Afterwards [`MovieInstance::current_time`] is `time` wrapped into the
	/// clip's duration.
	///
	/// # Errors
	///
	/// Same as [`MovieInstance::play`].
	pub fn goto_and_stop(
		&mut self,
		clip: Option<&str>,
		time: f64,
		host: &mut Host<'_>,
	) -> Result<(), MovieError> {
		self.play(clip, Some(1))?;
		let time = wrap_time(time, self.total_time());
		self.time = time;
		self.current_time = time;
		self.advance(0.0, host, true);
		self.stop();
		Ok(())
	}

	/// Turns self-driven ticking on or off.
	pub fn set_self_driven(&mut self, on: bool, ticker: &dyn TickSource) {
		if self.disposed || self.self_driven == on {
			return;
		}
		self.self_driven = on;
		if on {
			ticker.register(self.id);
		} else {
			ticker.unregister(self.id);
		}
	}

	/// Releases the host node and all nested movies.
	///
	/// Idempotent. Every later operation on the instance is a no-op.
	pub fn dispose(&mut self, host: &mut Host<'_>) {
		if self.disposed {
			return;
		}

		self.set_self_driven(false, host.ticker);
		for slot in &mut self.slots {
			let slot_ref = SlotRef {
				node: self.node,
				index: slot.index(),
			};
			if let Some(child) = slot.active_child() {
				host.renderer.detach_child_display(slot_ref, child.node());
			}
			slot.dispose_children(host);
		}
		host.renderer.release_node(self.node);

		self.children.clear();
		self.pending_plays.clear();
		self.playing = false;
		self.cache_rectangle = None;
		self.current_frame = None;
		self.disposed = true;
		self.dispose_handle.request();
		log::debug!("Disposed movie '{}' {}", self.name(), self.id);
	}

	/// Instance identifier.
	pub fn id(&self) -> MovieId {
		self.id
	}

	/// Host node of this instance.
	pub fn node(&self) -> NodeId {
		self.node
	}

	/// Movie name.
	pub fn name(&self) -> &str {
		&self.descriptor().name
	}

	/// Name of the group the movie was built from.
	pub fn group_name(&self) -> &str {
		&self.group_name
	}

	/// Package the movie was built from.
	pub fn package(&self) -> &Arc<Package> {
		&self.package
	}

	/// Name of the loaded clip.
	pub fn clip_name(&self) -> Option<&str> {
		let clip_index = self.clip_index?;
		Some(&self.descriptor().clip[clip_index].name)
	}

	/// Names of all clips of the movie.
	pub fn clip_names(&self) -> Vec<String> {
		self.descriptor().clip.iter().map(|clip| clip.name.clone()).collect()
	}

	/// Returns `true` if the movie has a clip named `name`.
	pub fn has_clip(&self, name: &str) -> bool {
		self.descriptor().find_clip(name).is_some()
	}

	/// Current playback state.
	pub fn state(&self) -> PlayState {
		if self.completed {
			PlayState::Completed
		} else if self.playing {
			PlayState::Playing
		} else {
			PlayState::Stopped
		}
	}

	/// Returns `true` while playing and not completed.
	pub fn is_playing(&self) -> bool {
		self.playing && !self.completed
	}

	/// Returns `true` once the final loop finished.
	pub fn is_complete(&self) -> bool {
		self.completed
	}

	/// Returns `true` if the last tick moved backwards within one loop.
	pub fn is_reversing(&self) -> bool {
		self.reversing
	}

	/// Position inside the current loop, in seconds.
	pub fn current_time(&self) -> f64 {
		self.current_time
	}

	/// Duration of the loaded clip, 0 without a clip.
	pub fn total_time(&self) -> f64 {
		self.clip_index.map_or(0.0, |clip| self.descriptor().clip[clip].duration)
	}

	/// Completed loops of the current clip.
	pub fn current_play_times(&self) -> u32 {
		self.current_play_times
	}

	/// Configured play count, 0 loops forever.
	pub fn play_times(&self) -> u32 {
		self.play_times
	}

	/// Cache frame shown by the slots.
	pub fn cache_frame_index(&self) -> Option<usize> {
		self.cache_frame_index
	}

	/// Content bounds of the current cache frame.
	pub fn cache_rectangle(&self) -> Option<Rectangle> {
		self.cache_rectangle
	}

	/// Slots in draw order.
	pub fn slots(&self) -> &[SlotState] {
		&self.slots
	}

	/// Finds a slot by name.
	pub fn slot(&self, name: &str) -> Option<&SlotState> {
		self.slots.iter().find(|slot| slot.name() == name)
	}

	/// Nested movie shown by the named slot.
	pub fn child(&self, slot: &str) -> Option<&MovieInstance> {
		self.slot(slot).and_then(SlotState::active_child)
	}

	/// Mutable access to the nested movie shown by the named slot.
	pub fn child_mut(&mut self, slot: &str) -> Option<&mut MovieInstance> {
		self.slots.iter_mut().find(|state| state.name() == slot).and_then(SlotState::active_child_mut)
	}

	/// Number of active nested movies.
	pub fn child_count(&self) -> usize {
		self.children.len()
	}

	/// Instance time scale.
	pub fn time_scale(&self) -> f64 {
		self.time_scale
	}

	/// Sets the instance time scale. Negative values play backwards.
	pub fn set_time_scale(&mut self, time_scale: f64) {
		self.time_scale = time_scale;
	}

	/// Clip time scale, the reciprocal of the clip's authored scale.
	pub fn clip_time_scale(&self) -> f64 {
		self.clip_time_scale
	}

	/// Overrides the clip time scale until the next clip starts.
	pub fn set_clip_time_scale(&mut self, clip_time_scale: f64) {
		self.clip_time_scale = clip_time_scale;
	}

	/// Returns `true` if the instance is registered with the tick source.
	pub fn is_self_driven(&self) -> bool {
		self.self_driven
	}

	/// Returns `true` once disposed.
	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	/// Handle through which host callbacks can request disposal.
	pub fn dispose_handle(&self) -> DisposeHandle {
		self.dispose_handle.clone()
	}
}
