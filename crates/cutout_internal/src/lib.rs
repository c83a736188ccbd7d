//! This module is separated into its own crate to enable simple dynamic linking for `cutout-rs`, and should not be used directly.

/// `use cutout_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use cutout_runtime;
pub use cutout_types;

// Re-export commonly used types at crate root
pub use cutout_runtime::{MovieError, MovieInstance, Registry};
pub use cutout_types::package::{AtlasTexture, FormatError, Package, PackageBuilder, ParseConfig};
