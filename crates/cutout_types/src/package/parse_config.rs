//! Parse configuration for package decoding.
//!
//! This module provides configuration options controlling how much validation
//! runs up front when a package is decoded.

/// Configuration for decoding animation packages.
///
/// Every index read at playback time is bounds-checked regardless of this
/// configuration; the options here only decide which problems are reported
/// eagerly as decode errors instead of degrading silently during playback.
///
/// # Presets
///
/// - `default()`: validate clip ranges, manifest up to 64 KiB
/// - `lenient()`: skip clip range validation
/// - `strict()`: validate clip ranges and frame links, manifest up to 32 KiB
///
/// # Examples
///
/// ```
/// use cutout_types::package::ParseConfig;
///
/// let config = ParseConfig::default();
/// assert!(config.validate_clip_ranges);
///
/// let config = ParseConfig::strict();
/// assert!(config.validate_frame_links);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
	/// Check every clip's `p`/`s` range against the clip stream
	pub validate_clip_ranges: bool,
	/// Check frame `prev`/`next` links and clip frame lists
	pub validate_frame_links: bool,
	/// Maximum accepted manifest length in bytes
	pub max_manifest_len: usize,
}

impl Default for ParseConfig {
	fn default() -> Self {
		Self {
			validate_clip_ranges: true,
			validate_frame_links: false,
			max_manifest_len: u16::MAX as usize,
		}
	}
}

impl ParseConfig {
	/// Create a new parse configuration.
	///
	/// # Arguments
	/// * `validate_clip_ranges` - Check clip ranges at decode time
	/// * `validate_frame_links` - Check frame links at decode time
	/// * `max_manifest_len` - Manifest length limit in bytes
	pub fn new(
		validate_clip_ranges: bool,
		validate_frame_links: bool,
		max_manifest_len: usize,
	) -> Self {
		Self {
			validate_clip_ranges,
			validate_frame_links,
			max_manifest_len,
		}
	}

	/// Create a lenient configuration.
	///
	/// Broken clip ranges are left to degrade at playback time.
	pub fn lenient() -> Self {
		Self {
			validate_clip_ranges: false,
			validate_frame_links: false,
			max_manifest_len: u16::MAX as usize,
		}
	}

	/// Create a strict configuration.
	///
	/// Suitable for validating assets in tooling before shipping them.
	pub fn strict() -> Self {
		Self {
			validate_clip_ranges: true,
			validate_frame_links: true,
			max_manifest_len: 32 * 1024,
		}
	}
}
