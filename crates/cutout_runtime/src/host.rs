//! Capabilities the runtime requires from its host.
//!
//! The runtime never owns a scene graph. Each movie instance asks the
//! [`Renderer`] for a node, then pushes slot updates to it as playback
//! resolves new poses. Ticking is driven from outside through a
//! [`TickSource`], and notifications go to an [`EventSink`].

use std::sync::atomic::{AtomicU64, Ordering};

use cutout_types::geom::{ColorTransform, Rectangle, Transform};
use cutout_types::package::{AtlasTexture, BlendMode};

use crate::event::EventSink;

/// Unique identifier of a movie instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MovieId(u64);

impl MovieId {
	pub(crate) fn next() -> Self {
		static NEXT_ID: AtomicU64 = AtomicU64::new(1);
		Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
	}

	/// Raw numeric value.
	pub fn get(self) -> u64 {
		self.0
	}
}

impl std::fmt::Display for MovieId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Host scene-graph node allocated for a movie instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Addresses one slot display of a host node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
	/// Node owning the slot
	pub node: NodeId,
	/// Slot position in draw order
	pub index: usize,
}

/// Scene-graph operations the runtime performs.
///
/// Every slot has an image display, which the runtime shows, hides, points at
/// atlas regions, transforms and tints. A slot may additionally host the node
/// of a nested movie through [`Renderer::attach_child_display`].
pub trait Renderer {
	/// Allocates a node for a movie with one display per slot, in draw order.
	fn create_node(&mut self, movie: &str, slots: &[&str]) -> NodeId;

	/// Releases a node created by [`Renderer::create_node`].
	fn release_node(&mut self, node: NodeId);

	/// Shows or hides a slot's image display.
	fn set_display_visible(&mut self, slot: SlotRef, visible: bool);

	/// Points a slot's image display at an atlas region.
	fn set_display_image_region(&mut self, slot: SlotRef, texture: &AtlasTexture, region: &Rectangle);

	/// Sets a slot's local transform.
	fn set_display_transform(&mut self, slot: SlotRef, transform: &Transform);

	/// Applies a color filter to a slot.
	fn set_display_color(&mut self, slot: SlotRef, color: &ColorTransform);

	/// Removes any color filter from a slot and sets its opacity.
	fn clear_display_color(&mut self, slot: SlotRef, alpha: f32);

	/// Sets a slot's blend mode.
	fn set_blend_mode(&mut self, slot: SlotRef, mode: BlendMode);

	/// Places the node of a nested movie into a slot.
	fn attach_child_display(&mut self, slot: SlotRef, child: NodeId);

	/// Removes the node of a nested movie from a slot.
	fn detach_child_display(&mut self, slot: SlotRef, child: NodeId);

	/// Reports the memoized content bounds of the current cache frame.
	fn set_content_bounds(&mut self, _node: NodeId, _bounds: &Rectangle) {}
}

/// Scheduler that drives self-driven movie instances.
pub trait TickSource {
	/// Starts ticking a movie.
	fn register(&self, movie: MovieId);

	/// Stops ticking a movie.
	fn unregister(&self, movie: MovieId);
}

impl TickSource for () {
	fn register(&self, _movie: MovieId) {}

	fn unregister(&self, _movie: MovieId) {}
}

/// Host capabilities passed into every runtime operation that has side effects.
pub struct Host<'a> {
	/// Scene-graph sink
	pub renderer: &'a mut dyn Renderer,
	/// Notification sink
	pub events: &'a mut dyn EventSink,
	/// Scheduler for self-driven instances
	pub ticker: &'a dyn TickSource,
}

impl<'a> Host<'a> {
	/// Bundles host capabilities.
	pub fn new(
		renderer: &'a mut dyn Renderer,
		events: &'a mut dyn EventSink,
		ticker: &'a dyn TickSource,
	) -> Self {
		Self {
			renderer,
			events,
			ticker,
		}
	}
}

/// Renderer call captured by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum RenderCall {
	CreateNode { node: NodeId, movie: String },
	ReleaseNode(NodeId),
	Visible(SlotRef, bool),
	ImageRegion(SlotRef, String, Rectangle),
	Transform(SlotRef, Transform),
	Color(SlotRef, ColorTransform),
	ClearColor(SlotRef, f32),
	BlendMode(SlotRef, BlendMode),
	AttachChild(SlotRef, NodeId),
	DetachChild(SlotRef, NodeId),
	ContentBounds(NodeId, Rectangle),
}

/// Renderer that records every call, for tooling and tests.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
	/// Calls in the order they were made
	pub calls: Vec<RenderCall>,
	next_node: u64,
}

impl RecordingRenderer {
	/// Creates an empty recorder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Removes and returns all recorded calls.
	pub fn take(&mut self) -> Vec<RenderCall> {
		std::mem::take(&mut self.calls)
	}

	/// Number of recorded calls matching `predicate`.
	pub fn count(&self, predicate: impl Fn(&RenderCall) -> bool) -> usize {
		self.calls.iter().filter(|call| predicate(call)).count()
	}
}

impl Renderer for RecordingRenderer {
	fn create_node(&mut self, movie: &str, _slots: &[&str]) -> NodeId {
		self.next_node += 1;
		let node = NodeId(self.next_node);
		self.calls.push(RenderCall::CreateNode {
			node,
			movie: movie.to_string(),
		});
		node
	}

	fn release_node(&mut self, node: NodeId) {
		self.calls.push(RenderCall::ReleaseNode(node));
	}

	fn set_display_visible(&mut self, slot: SlotRef, visible: bool) {
		self.calls.push(RenderCall::Visible(slot, visible));
	}

	fn set_display_image_region(&mut self, slot: SlotRef, texture: &AtlasTexture, region: &Rectangle) {
		self.calls.push(RenderCall::ImageRegion(slot, texture.name.clone(), *region));
	}

	fn set_display_transform(&mut self, slot: SlotRef, transform: &Transform) {
		self.calls.push(RenderCall::Transform(slot, *transform));
	}

	fn set_display_color(&mut self, slot: SlotRef, color: &ColorTransform) {
		self.calls.push(RenderCall::Color(slot, *color));
	}

	fn clear_display_color(&mut self, slot: SlotRef, alpha: f32) {
		self.calls.push(RenderCall::ClearColor(slot, alpha));
	}

	fn set_blend_mode(&mut self, slot: SlotRef, mode: BlendMode) {
		self.calls.push(RenderCall::BlendMode(slot, mode));
	}

	fn attach_child_display(&mut self, slot: SlotRef, child: NodeId) {
		self.calls.push(RenderCall::AttachChild(slot, child));
	}

	fn detach_child_display(&mut self, slot: SlotRef, child: NodeId) {
		self.calls.push(RenderCall::DetachChild(slot, child));
	}

	fn set_content_bounds(&mut self, node: NodeId, bounds: &Rectangle) {
		self.calls.push(RenderCall::ContentBounds(node, *bounds));
	}
}
