//! Prelude module for `cutout_types`.
//!
//! This module provides a convenient way to import commonly used types.
//!
//! # Examples
//!
//! ```no_run
//! use cutout_types::prelude::*;
//!
//! let builder = PackageBuilder::new("demo");
//! let config = ParseConfig::lenient();
//! ```

// Geometry
#[doc(inline)]
pub use crate::geom::{ColorTransform, Rectangle, Transform};

// Package types
#[doc(inline)]
pub use crate::package::{
	ActionDescriptor, ActionType, ArrayKind, AtlasTexture, BlendMode, ClipCache, ClipDescriptor,
	DisplayDescriptor, DisplayType, FormatError, FrameDescriptor, GroupManifest, MovieDescriptor,
	NumericArray, Package, PackageBuilder, ParseConfig, SlotDescriptor,
};

// Re-export the package module for advanced usage
#[doc(inline)]
pub use crate::package;
