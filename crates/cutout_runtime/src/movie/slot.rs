//! Per-slot state and display resolution.

use std::collections::HashMap;
use std::sync::Arc;

use cutout_types::geom::{ColorTransform, Rectangle, Transform};
use cutout_types::package::constants::{
	COLOR_STRIDE, DISPLAY_FRAME_STRIDE, SLOT_RECORD_WIDTH, TRANSFORM_STRIDE,
};
use cutout_types::package::{AtlasTexture, BlendMode, DisplayType, Package, SlotDescriptor};

use crate::host::{Host, Renderer, SlotRef};

use super::{MAX_NESTING_DEPTH, MovieInstance};

/// What a slot currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
	/// Nothing
	Empty,
	/// An atlas image
	Image,
	/// A nested movie
	Movie,
}

/// Comparable summary of a slot's resolved state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotSnapshot {
	/// Display table index
	pub display_index: Option<usize>,
	/// Color record offset
	pub color_index: Option<usize>,
	/// Transform record offset
	pub transform_index: Option<usize>,
	/// Resolved transform
	pub transform: Transform,
	/// What the slot shows
	pub kind: DisplayKind,
}

/// Runtime state of one slot.
///
/// Indices are re-derived from the clip stream on every cache-frame change;
/// renderer updates are issued only for the parts that changed.
#[derive(Debug)]
pub struct SlotState {
	name: String,
	index: usize,
	blend_mode: BlendMode,
	action: Option<String>,
	display_index: Option<usize>,
	color_index: Option<usize>,
	transform_index: Option<usize>,
	transform: Transform,
	region: Option<Rectangle>,
	image_visible: bool,
	/// Nested movies built for this slot, by movie name
	child_movies: HashMap<String, MovieInstance>,
	active_child: Option<String>,
}

impl SlotState {
	pub(crate) fn new(index: usize, descriptor: &SlotDescriptor) -> Self {
		Self {
			name: descriptor.name.clone(),
			index,
			blend_mode: descriptor.blend_mode,
			action: descriptor.action.clone(),
			display_index: None,
			color_index: None,
			transform_index: None,
			transform: Transform::IDENTITY,
			region: None,
			image_visible: false,
			child_movies: HashMap::new(),
			active_child: None,
		}
	}

	/// Slot name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Position in draw order.
	pub fn index(&self) -> usize {
		self.index
	}

	/// Blend mode from the slot descriptor.
	pub fn blend_mode(&self) -> BlendMode {
		self.blend_mode
	}

	/// Display table index, `None` when the slot is empty.
	pub fn display_index(&self) -> Option<usize> {
		self.display_index
	}

	/// Element offset of the color record, `None` for no tint.
	pub fn color_index(&self) -> Option<usize> {
		self.color_index
	}

	/// Element offset of the transform record.
	pub fn transform_index(&self) -> Option<usize> {
		self.transform_index
	}

	/// Last resolved transform.
	pub fn transform(&self) -> Transform {
		self.transform
	}

	/// Atlas region of the image shown, if any.
	pub fn region(&self) -> Option<Rectangle> {
		self.region
	}

	/// What the slot shows.
	pub fn kind(&self) -> DisplayKind {
		if self.active_child.is_some() {
			DisplayKind::Movie
		} else if self.image_visible {
			DisplayKind::Image
		} else {
			DisplayKind::Empty
		}
	}

	/// Comparable summary of the slot.
	pub fn snapshot(&self) -> SlotSnapshot {
		SlotSnapshot {
			display_index: self.display_index,
			color_index: self.color_index,
			transform_index: self.transform_index,
			transform: self.transform,
			kind: self.kind(),
		}
	}

	/// Nested movie currently shown.
	pub fn active_child(&self) -> Option<&MovieInstance> {
		self.active_child.as_ref().and_then(|name| self.child_movies.get(name))
	}

	/// Mutable access to the nested movie currently shown.
	pub fn active_child_mut(&mut self) -> Option<&mut MovieInstance> {
		match &self.active_child {
			Some(name) => self.child_movies.get_mut(name),
			None => None,
		}
	}

	/// Number of nested movies built for this slot so far.
	pub fn cached_child_count(&self) -> usize {
		self.child_movies.len()
	}

	pub(crate) fn dispose_children(&mut self, host: &mut Host<'_>) {
		for child in self.child_movies.values_mut() {
			child.dispose(host);
		}
		self.child_movies.clear();
		self.active_child = None;
	}

	/// Drops a nested movie that disposed itself.
	///
	/// The display index is cleared so the next cache frame rebuilds it.
	pub(crate) fn forget_child(&mut self, name: &str) {
		self.child_movies.remove(name);
		if self.active_child.as_deref() == Some(name) {
			self.active_child = None;
			self.display_index = None;
		}
	}

	fn set_image_visible(&mut self, slot_ref: SlotRef, visible: bool, renderer: &mut dyn Renderer) {
		if self.image_visible != visible {
			self.image_visible = visible;
			renderer.set_display_visible(slot_ref, visible);
		}
	}
}

/// Content a display index resolves to.
enum Target<'p> {
	Hidden,
	Image(&'p AtlasTexture, Rectangle),
	Movie(&'p str),
}

fn apply_color(
	package: &Package,
	color_index: Option<usize>,
	slot_ref: SlotRef,
	renderer: &mut dyn Renderer,
) {
	let color =
		color_index.and_then(|offset| package.color_at(offset)).unwrap_or(ColorTransform::IDENTITY);
	if color.is_alpha_only() {
		renderer.clear_display_color(slot_ref, color.alpha_multiplier);
	} else {
		renderer.set_display_color(slot_ref, &color);
	}
}

impl MovieInstance {
	fn slot_ref(&self, slot_index: usize) -> SlotRef {
		SlotRef {
			node: self.node,
			index: slot_index,
		}
	}

	/// Re-derives one slot from the clip stream record of `cache_frame`.
	///
	/// Returns the slot's contribution to the content bounds.
	pub(super) fn resolve_slot(
		&mut self,
		slot_index: usize,
		cache_frame: usize,
		host: &mut Host<'_>,
	) -> Option<Rectangle> {
		let record = self.frame_width * cache_frame + slot_index * SLOT_RECORD_WIDTH;
		let Some(display_frame) = self.clip_indices.get(record) else {
			log::trace!("Movie '{}': no clip record {record} for slot {slot_index}", self.name());
			return None;
		};

		if display_frame < 0 {
			if self.slots[slot_index].display_index.is_some() {
				self.slots[slot_index].display_index = None;
				self.update_slot_display(slot_index, host);
			}
			return None;
		}

		let package = Arc::clone(&self.package);
		let Some((display, color)) = package.display_frame_at(display_frame as usize * DISPLAY_FRAME_STRIDE)
		else {
			log::debug!("Movie '{}': display frame {display_frame} out of range", self.name());
			return None;
		};
		let display_index = usize::try_from(display).ok();
		let color_index = usize::try_from(color).ok().map(|color| color * COLOR_STRIDE);
		let transform_index = self
			.clip_indices
			.get(record + 1)
			.and_then(|transform| usize::try_from(transform).ok())
			.map(|transform| transform * TRANSFORM_STRIDE);
		let slot_ref = self.slot_ref(slot_index);

		let mut display_changed = false;
		if self.slots[slot_index].display_index != display_index {
			self.slots[slot_index].display_index = display_index;
			display_changed = true;
			self.update_slot_display(slot_index, host);
		}

		let slot = &mut self.slots[slot_index];
		if slot.color_index != color_index || display_changed {
			slot.color_index = color_index;
			apply_color(&package, color_index, slot_ref, host.renderer);
		}

		if slot.transform_index != transform_index {
			slot.transform_index = transform_index;
			if let Some(transform) = transform_index.and_then(|offset| package.transform_at(offset)) {
				slot.transform = transform;
				host.renderer.set_display_transform(slot_ref, &transform);
			}
		}

		match (slot.region, &slot.active_child) {
			(Some(region), None) => Some(
				slot.transform.transform_bounds(&Rectangle::new(0.0, 0.0, region.width, region.height)),
			),
			_ => None,
		}
	}

	/// Swaps the slot's display after its display index changed.
	pub(super) fn update_slot_display(&mut self, slot_index: usize, host: &mut Host<'_>) {
		let package = Arc::clone(&self.package);
		let slot_ref = self.slot_ref(slot_index);
		let display_index = self.slots[slot_index].display_index;

		let mut target = match display_index.and_then(|index| Some((index, package.displays().get(index)?))) {
			Some((_, display)) if display.kind == DisplayType::Armature => Target::Movie(&display.name),
			Some((index, display)) if display.kind == DisplayType::Image => {
				match package.display_region(index) {
					Some((texture, region)) => Target::Image(texture, region),
					None => {
						log::trace!("Display '{}' has no region or texture", display.name);
						Target::Hidden
					}
				}
			}
			Some((_, display)) => {
				log::trace!("Display '{}' of type {:?} is not shown", display.name, display.kind);
				Target::Hidden
			}
			None => Target::Hidden,
		};

		if let Target::Movie(name) = target
			&& !self.slots[slot_index].child_movies.contains_key(name)
		{
			match self.build_child(name, host) {
				Some(child) => {
					self.slots[slot_index].child_movies.insert(name.to_string(), child);
				}
				None => target = Target::Hidden,
			}
		}

		let slot = &mut self.slots[slot_index];
		let previous_child = slot.active_child.take();
		let next_child = match target {
			Target::Movie(name) => Some(name.to_string()),
			_ => None,
		};

		match target {
			Target::Image(texture, region) => {
				host.renderer.set_display_image_region(slot_ref, texture, &region);
				slot.region = Some(region);
				slot.set_image_visible(slot_ref, true, host.renderer);
			}
			Target::Hidden | Target::Movie(_) => {
				slot.region = None;
				slot.set_image_visible(slot_ref, false, host.renderer);
			}
		}

		if previous_child != next_child {
			if let Some(previous) = previous_child.as_ref().and_then(|name| slot.child_movies.get_mut(name)) {
				host.renderer.detach_child_display(slot_ref, previous.node());
				previous.stop();
				self.children.retain(|&index| index != slot_index);
			}

			if let Some(child) = next_child.as_ref().and_then(|name| slot.child_movies.get_mut(name)) {
				host.renderer.attach_child_display(slot_ref, child.node());
				if !self.children.contains(&slot_index) {
					self.children.push(slot_index);
				}
				let action = slot.action.clone().or_else(|| child.descriptor().action.clone());
				if let Err(error) = child.play(action.as_deref(), None) {
					log::debug!("Nested movie '{}' did not start: {error}", child.name());
				}
			}

			host.renderer.set_blend_mode(slot_ref, slot.blend_mode);
		}

		slot.active_child = next_child;
	}

	fn build_child(&self, movie: &str, host: &mut Host<'_>) -> Option<MovieInstance> {
		if self.depth + 1 >= MAX_NESTING_DEPTH {
			log::debug!("Movie '{}': nesting too deep to build '{movie}'", self.name());
			return None;
		}
		let Some(movie_index) = self.package.find_movie(movie) else {
			log::debug!("Movie '{}': no nested movie '{movie}' in group", self.name());
			return None;
		};

		let options = super::BuildOptions::nested();
		match MovieInstance::build(
			Arc::clone(&self.package),
			&self.group_name,
			movie_index,
			&options,
			self.depth + 1,
			host,
		) {
			Ok(child) => Some(child),
			Err(error) => {
				log::debug!("Movie '{}': nested movie '{movie}' failed: {error}", self.name());
				None
			}
		}
	}
}
