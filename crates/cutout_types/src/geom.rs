//! Geometry and color value types shared by the decoder and the runtime.

use std::fmt::Display;

use crate::package::constants::COLOR_MULTIPLIER_SCALE;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
	/// Left edge
	pub x: f32,
	/// Top edge
	pub y: f32,
	/// Width
	pub width: f32,
	/// Height
	pub height: f32,
}

impl Rectangle {
	/// Creates a rectangle.
	pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}

	/// Builds a rectangle from an `[x, y, w, h]` quad.
	pub const fn from_quad(quad: [f32; 4]) -> Self {
		Self::new(quad[0], quad[1], quad[2], quad[3])
	}

	/// Right edge.
	pub fn right(&self) -> f32 {
		self.x + self.width
	}

	/// Bottom edge.
	pub fn bottom(&self) -> f32 {
		self.y + self.height
	}

	/// Returns `true` when the rectangle has no area.
	pub fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}

	/// Smallest rectangle containing both `self` and `other`.
	pub fn union(&self, other: &Rectangle) -> Rectangle {
		let x = self.x.min(other.x);
		let y = self.y.min(other.y);
		let right = self.right().max(other.right());
		let bottom = self.bottom().max(other.bottom());
		Rectangle::new(x, y, right - x, bottom - y)
	}
}

impl Display for Rectangle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "({}, {}, {}x{})", self.x, self.y, self.width, self.height)
	}
}

/// 2D affine transform `[a c tx; b d ty]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
	/// X scale / rotation
	pub a: f32,
	/// Y skew / rotation
	pub b: f32,
	/// X skew / rotation
	pub c: f32,
	/// Y scale / rotation
	pub d: f32,
	/// X translation
	pub tx: f32,
	/// Y translation
	pub ty: f32,
}

impl Default for Transform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl Transform {
	/// Identity transform.
	pub const IDENTITY: Transform = Transform {
		a: 1.0,
		b: 0.0,
		c: 0.0,
		d: 1.0,
		tx: 0.0,
		ty: 0.0,
	};

	/// Builds a transform from an `[a, b, c, d, tx, ty]` record.
	pub const fn from_array(values: [f32; 6]) -> Self {
		Self {
			a: values[0],
			b: values[1],
			c: values[2],
			d: values[3],
			tx: values[4],
			ty: values[5],
		}
	}

	/// Returns the record form `[a, b, c, d, tx, ty]`.
	pub const fn to_array(self) -> [f32; 6] {
		[self.a, self.b, self.c, self.d, self.tx, self.ty]
	}

	/// Pure translation.
	pub const fn translation(tx: f32, ty: f32) -> Self {
		Self {
			tx,
			ty,
			..Self::IDENTITY
		}
	}

	/// Maps a point through the transform.
	pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
		(self.a * x + self.c * y + self.tx, self.b * x + self.d * y + self.ty)
	}

	/// Axis-aligned bounds of `rect` after transformation.
	pub fn transform_bounds(&self, rect: &Rectangle) -> Rectangle {
		let corners = [
			self.apply(rect.x, rect.y),
			self.apply(rect.right(), rect.y),
			self.apply(rect.x, rect.bottom()),
			self.apply(rect.right(), rect.bottom()),
		];
		let (mut min_x, mut min_y) = corners[0];
		let (mut max_x, mut max_y) = corners[0];
		for &(x, y) in &corners[1..] {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}
		Rectangle::new(min_x, min_y, max_x - min_x, max_y - min_y)
	}
}

/// Color transform: per-channel multipliers followed by offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub struct ColorTransform {
	pub red_multiplier: f32,
	pub green_multiplier: f32,
	pub blue_multiplier: f32,
	pub alpha_multiplier: f32,
	pub red_offset: f32,
	pub green_offset: f32,
	pub blue_offset: f32,
	pub alpha_offset: f32,
}

impl Default for ColorTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ColorTransform {
	/// No tint.
	pub const IDENTITY: ColorTransform = ColorTransform {
		red_multiplier: 1.0,
		green_multiplier: 1.0,
		blue_multiplier: 1.0,
		alpha_multiplier: 1.0,
		red_offset: 0.0,
		green_offset: 0.0,
		blue_offset: 0.0,
		alpha_offset: 0.0,
	};

	/// Decodes a packed color record: multipliers are percentages, offsets are raw.
	pub fn from_packed(values: [i16; 8]) -> Self {
		let multiplier = |value: i16| f32::from(value) * COLOR_MULTIPLIER_SCALE;
		Self {
			red_multiplier: multiplier(values[0]),
			green_multiplier: multiplier(values[1]),
			blue_multiplier: multiplier(values[2]),
			alpha_multiplier: multiplier(values[3]),
			red_offset: f32::from(values[4]),
			green_offset: f32::from(values[5]),
			blue_offset: f32::from(values[6]),
			alpha_offset: f32::from(values[7]),
		}
	}

	/// Returns `true` when only the alpha multiplier differs from identity.
	///
	/// Such a transform can be applied as plain opacity instead of a color filter.
	pub fn is_alpha_only(&self) -> bool {
		self.red_multiplier == 1.0
			&& self.green_multiplier == 1.0
			&& self.blue_multiplier == 1.0
			&& self.red_offset == 0.0
			&& self.green_offset == 0.0
			&& self.blue_offset == 0.0
			&& self.alpha_offset == 0.0
	}
}
