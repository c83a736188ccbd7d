//! Animation package format support.
//!
//! This module decodes the binary animation packages ("groups") produced by the
//! cutout exporter. A package carries a JSON manifest describing movies, slots,
//! clips, displays and timeline frames, followed by five packed numeric arrays
//! that hold the per-frame pose data.
//!
//! # File Structure Overview
//!
//! ```text
//! Offset        Size      Field       Description
//! ------------  --------  ----------  ------------------------------------------
//! 0x00          8         header      Reserved bytes, ignored
//! 0x08          2         length      Manifest length in bytes (u16 little-endian)
//! 0x0A          length    manifest    UTF-8 JSON manifest
//! 0x0A+length   0..3      padding     Zero bytes up to the next 4-byte boundary
//! base          ...       arrays      Packed arrays, addressed by `position`
//! ```
//!
//! ## Position Triplets
//!
//! The manifest's `position` list holds `[byteOffset, byteLength, elementSize]`
//! triplets, relative to the aligned array base:
//!
//! ```text
//! Triplet  Array           Element  Record
//! -------  --------------  -------  ------------------------------------------
//! 0        clip stream     i16      2 per slot per cache frame
//! 1        display frame   i16      (display index, color index)
//! 2        rectangle       f32      (x, y, width, height)
//! 3        transform       f32      (a, b, c, d, tx, ty)
//! 4        color           i16      (rM, gM, bM, aM, rO, gO, bO, aO)
//! ```
//!
//! Color multipliers are stored as percentages (`100` is `1.0`).
//!
//! ## Clip Stream
//!
//! Each clip owns the byte range `p..p+s` of the clip stream. For cache frame
//! `f` of a movie with `n` slots, slot `i` reads:
//!
//! ```text
//! stream[(2n)·f + 2i]      display-frame record index (negative hides the slot)
//! stream[(2n)·f + 2i + 1]  transform record index
//! ```
//!
//! # Examples
//!
//! ```
//! use cutout_types::package::{Package, PackageBuilder};
//! use cutout_types::package::manifest::{ClipDescriptor, MovieDescriptor, SlotDescriptor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut movie = MovieDescriptor::new("hero", 24.0);
//! movie.slot.push(SlotDescriptor::new("body"));
//!
//! let mut builder = PackageBuilder::new("demo");
//! builder.add_movie(movie);
//! builder.add_clip(0, "idle", 0, 1.0, 24.0, &[[0, 0]]);
//!
//! let package = Package::from_bytes(builder.to_bytes()?)?;
//! assert_eq!(package.name(), "demo");
//! assert_eq!(package.clip_indices(0, 0)?.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod array;
pub mod builder;
pub mod cache;
pub mod constants;
pub mod error;
pub mod file;
pub mod manifest;
pub mod parse_config;

pub use array::NumericArray;
pub use builder::PackageBuilder;
pub use cache::ClipCache;
pub use error::{ArrayKind, FormatError};
pub use file::{AtlasTexture, Package};
pub use manifest::{
	ActionDescriptor, ActionType, BlendMode, ClipDescriptor, DisplayDescriptor, DisplayType,
	FrameDescriptor, GroupManifest, MovieDescriptor, SlotDescriptor,
};
pub use parse_config::ParseConfig;
